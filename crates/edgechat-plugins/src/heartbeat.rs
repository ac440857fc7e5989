//! Keep-alive notices for a running scan.
//!
//! Emits a fixed notice into the session's frame channel at a regular
//! interval until cancelled. Heartbeats are best effort: when the channel
//! is full the tick is skipped rather than delaying the terminal frame.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::bridge::StreamFrame;

/// Counts reported when the heartbeat loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartbeatStats {
    pub sent: u32,
    pub dropped: u32,
}

/// Periodic "still working" notices.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    interval: Duration,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run the loop on its own task.
    pub fn spawn(
        self,
        tx: mpsc::Sender<StreamFrame>,
        cancel: CancellationToken,
    ) -> JoinHandle<HeartbeatStats> {
        tokio::spawn(async move { self.run(tx, cancel).await })
    }

    /// Emit a heartbeat every interval until `cancel` fires or the
    /// receiver is gone.
    ///
    /// The first heartbeat arrives one full interval after the call.
    pub async fn run(&self, tx: mpsc::Sender<StreamFrame>, cancel: CancellationToken) -> HeartbeatStats {
        let mut stats = HeartbeatStats::default();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick fires immediately; skip it.
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(sent = stats.sent, dropped = stats.dropped, "heartbeat stopped");
                    return stats;
                }
                _ = interval.tick() => {
                    match tx.try_send(StreamFrame::heartbeat()) {
                        Ok(()) => {
                            stats.sent += 1;
                            trace!(sent = stats.sent, "heartbeat sent");
                        }
                        Err(TrySendError::Full(_)) => {
                            stats.dropped += 1;
                            debug!("client not draining, heartbeat dropped");
                        }
                        Err(TrySendError::Closed(_)) => {
                            debug!("client gone, heartbeat exiting");
                            return stats;
                        }
                    }
                }
            }
        }
    }
}
