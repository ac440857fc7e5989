//! Security-tool plugin commands for edgechat.
//!
//! A chat message such as `/naabu -host example.com -p 80,443` is parsed
//! against the tool's flag table, and on success a scan is started on the
//! plugin backend. The client receives an incremental stream: a start
//! notice, periodic heartbeats while the scan runs, then a report or an
//! error notice.
//!
//! # Architecture
//!
//! - [`command`]: flag tables, typed validators, [`CommandError`]
//! - [`naabu`]: the `/naabu` flag table, parameters, query and report
//! - [`PluginBackend`] / [`HttpPluginBackend`]: the blocking backend call
//! - [`PluginStreamBridge`]: session state machine with [`heartbeat`]
//! - [`PluginDispatcher`]: message → notice or stream

pub mod backend;
pub mod bridge;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod heartbeat;
pub mod job;
pub mod naabu;
pub mod report;
pub mod validate;

pub use backend::{HttpPluginBackend, PluginBackend, PluginOutput};
pub use bridge::{BridgeSettings, FrameKind, PluginStream, PluginStreamBridge, SessionState, StreamFrame};
pub use command::CommandError;
pub use dispatch::{PluginDispatcher, PluginReply, Tool};
pub use error::{PluginError, Result};
pub use job::PluginJob;
pub use naabu::NaabuParams;
pub use report::ReportClock;
