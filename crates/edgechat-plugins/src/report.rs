//! Scan report helpers: timestamps and result lines.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use edgechat_types::config::ReportConfig;
use tracing::warn;

/// Renders scan timestamps in a fixed display offset.
#[derive(Debug, Clone)]
pub struct ReportClock {
    offset: FixedOffset,
    label: String,
}

impl ReportClock {
    /// Build from config. An offset outside ±23 h falls back to UTC.
    pub fn from_config(config: &ReportConfig) -> Self {
        let offset = config
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    hours = config.utc_offset_hours,
                    "report offset out of range, using UTC"
                );
                Utc.fix()
            });
        Self {
            offset,
            label: config.offset_label.clone(),
        }
    }

    /// `M/D/YYYY, h:mm:ss AM (<label>)` for `now`.
    pub fn stamp(&self, now: DateTime<Utc>) -> String {
        let local = now.with_timezone(&self.offset);
        format!("{} ({})", local.format("%-m/%-d/%Y, %-I:%M:%S %p"), self.label)
    }

    /// [`stamp`](Self::stamp) for the current instant.
    pub fn stamp_now(&self) -> String {
        self.stamp(Utc::now())
    }
}

impl Default for ReportClock {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

/// Non-blank lines of raw tool output, untrimmed.
pub fn result_lines(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
