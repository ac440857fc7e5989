//! CLI command implementations for `edgechat`.
//!
//! - [`serve`] -- run the HTTP edge server.
//! - [`parse`] -- validate a plugin command and print its parameters.
//! - [`scan`] -- run a plugin command and print the stream as it arrives.
//! - [`config_cmd`] -- show the resolved configuration.

pub mod config_cmd;
pub mod parse;
pub mod scan;
pub mod serve;

use std::path::Path;

use edgechat_types::EdgeConfig;

/// Load configuration from the given path override or via auto-discovery,
/// then overlay environment variables.
///
/// Discovery chain when no override is given:
/// 1. `EDGECHAT_CONFIG` env var
/// 2. `~/.edgechat/config.json`
///
/// Returns defaults if no config file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<EdgeConfig> {
    let mut config = EdgeConfig::load(config_override.map(Path::new))?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Rejoin trailing CLI words into one chat message.
pub fn join_message(words: &[String]) -> String {
    words.join(" ")
}
