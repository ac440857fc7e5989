//! Routing chat messages to plugin commands.

use std::sync::Arc;

use edgechat_types::config::EdgeConfig;
use tracing::{debug, info};

use crate::backend::{HttpPluginBackend, PluginBackend};
use crate::bridge::{BridgeSettings, PluginStream, PluginStreamBridge};
use crate::command::split_command;
use crate::error::Result;
use crate::naabu;

/// Reply for a disabled `/naabu`.
pub const NAABU_DISABLED: &str = "The Naabu feature is disabled.";

/// Plugin commands this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Naabu,
}

impl Tool {
    pub const ALL: &[Tool] = &[Tool::Naabu];

    /// Command word without the slash.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Naabu => naabu::TOOL,
        }
    }

    /// Look a tool up by its command word.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

/// How a plugin command was answered.
#[derive(Debug)]
pub enum PluginReply {
    /// A single plain-text answer (help, validation error, feature off).
    Notice(String),
    /// A live scan.
    Stream(PluginStream),
}

/// Entry point for plugin commands arriving as chat messages.
#[derive(Clone)]
pub struct PluginDispatcher {
    bridge: PluginStreamBridge,
    naabu_enabled: bool,
}

impl PluginDispatcher {
    pub fn new(backend: Arc<dyn PluginBackend>, settings: BridgeSettings, naabu_enabled: bool) -> Self {
        Self {
            bridge: PluginStreamBridge::new(backend, settings),
            naabu_enabled,
        }
    }

    /// Build with the HTTP backend described by `config`.
    pub fn from_config(config: &EdgeConfig) -> Result<Self> {
        let backend = HttpPluginBackend::from_config(&config.plugins)?;
        Ok(Self::new(
            Arc::new(backend),
            BridgeSettings::from_config(config),
            config.plugins.naabu_enabled,
        ))
    }

    /// The plugin `message` invokes, if any.
    pub fn detect(message: &str) -> Option<Tool> {
        split_command(message).and_then(|(name, _)| Tool::from_name(name))
    }

    /// Answer `message`, or `None` when it is not a plugin command.
    ///
    /// Must be called inside a tokio runtime (scans are spawned).
    pub fn handle(&self, message: &str) -> Option<PluginReply> {
        let (name, args) = split_command(message)?;
        let tool = Tool::from_name(name)?;

        Some(match tool {
            Tool::Naabu => self.handle_naabu(args),
        })
    }

    fn handle_naabu(&self, args: &str) -> PluginReply {
        if !self.naabu_enabled {
            return PluginReply::Notice(NAABU_DISABLED.into());
        }
        if naabu::wants_help(args) {
            return PluginReply::Notice(naabu::HELP.into());
        }
        match naabu::parse(args) {
            Ok(params) => {
                info!(tool = naabu::TOOL, hosts = params.hosts.len(), "starting scan");
                PluginReply::Stream(self.bridge.run(params))
            }
            Err(e) => {
                debug!(tool = naabu::TOOL, error = %e, "command rejected");
                PluginReply::Notice(e.notice())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::backend::PluginOutput;

    struct Unreachable;

    #[async_trait]
    impl PluginBackend for Unreachable {
        async fn fetch(&self, _tool: &str, _query: &[(&'static str, String)]) -> Result<PluginOutput> {
            panic!("backend must not be called");
        }
    }

    fn dispatcher(enabled: bool) -> PluginDispatcher {
        PluginDispatcher::new(Arc::new(Unreachable), BridgeSettings::default(), enabled)
    }

    fn notice(reply: Option<PluginReply>) -> String {
        match reply {
            Some(PluginReply::Notice(text)) => text,
            other => panic!("expected notice, got {other:?}"),
        }
    }

    #[test]
    fn detects_known_tools_only() {
        assert_eq!(PluginDispatcher::detect("/naabu -host a.com"), Some(Tool::Naabu));
        assert_eq!(PluginDispatcher::detect("  /naabu"), Some(Tool::Naabu));
        assert_eq!(PluginDispatcher::detect("/nuclei -u x"), None);
        assert_eq!(PluginDispatcher::detect("how do I use naabu?"), None);
    }

    #[test]
    fn non_commands_are_not_handled() {
        assert!(dispatcher(true).handle("hello").is_none());
    }

    #[test]
    fn disabled_feature_wins_over_parsing() {
        assert_eq!(notice(dispatcher(false).handle("/naabu -bogus")), NAABU_DISABLED);
    }

    #[test]
    fn help_is_static() {
        assert_eq!(notice(dispatcher(true).handle("/naabu -host a.com -h")), naabu::HELP);
    }

    #[test]
    fn validation_errors_are_notices() {
        assert_eq!(
            notice(dispatcher(true).handle("/naabu -p 80")),
            "🚨 No host provided"
        );
        assert_eq!(
            notice(dispatcher(true).handle("/naabu -host a.com -timeout 100000")),
            "🚨 The timeout value exceeds the maximum limit of 90000"
        );
    }
}
