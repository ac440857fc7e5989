//! # edgechat-types
//!
//! Shared type definitions for the edgechat edge API.
//!
//! Every other edgechat crate depends on this one. It contains:
//!
//! - **[`message`]** -- conversation turns ([`Message`], [`Role`])
//! - **[`config`]** -- the [`EdgeConfig`] schema, discovery and loading
//! - **[`secret`]** -- [`SecretString`] for credentials
//! - **[`error`]** -- [`EdgeError`] for configuration failures

pub mod config;
pub mod error;
pub mod message;
pub mod secret;

pub use config::EdgeConfig;
pub use error::{EdgeError, Result};
pub use message::{Message, Role};
pub use secret::SecretString;
