//! Configuration schema, discovery and loading.
//!
//! All process-wide settings (upstream URLs, shared secrets, sampling
//! defaults) live in one [`EdgeConfig`] that is built once at startup and
//! handed to each component by value or `Arc`. Nothing reads the
//! environment after startup.
//!
//! Discovery order:
//! 1. An explicit path (the CLI `--config` flag).
//! 2. The `EDGECHAT_CONFIG` environment variable.
//! 3. `~/.edgechat/config.json`
//! 4. Built-in defaults.
//!
//! Secrets may additionally be overlaid from the environment, see
//! [`EdgeConfig::apply_env_overrides`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EdgeError, Result};
use crate::secret::SecretString;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "EDGECHAT_CONFIG";

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for the edge API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EdgeConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Plugin backend connection and stream behaviour.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Model completion settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Scan report presentation.
    #[serde(default)]
    pub report: ReportConfig,
}

// ── Server ───────────────────────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allowed CORS origins. Empty means any origin.
    #[serde(default, alias = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: Vec::new(),
        }
    }
}

// ── Plugins ──────────────────────────────────────────────────────────────

/// Settings shared by every security-tool plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Base URL of the plugin backend (without `/api/...`).
    #[serde(default = "default_plugins_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Value sent verbatim in the `Authorization` header.
    #[serde(default, alias = "authToken")]
    pub auth_token: SecretString,

    /// Value for the `Host` header, when the backend sits behind a
    /// name-based proxy.
    #[serde(default = "default_host_header", alias = "hostHeader")]
    pub host_header: Option<String>,

    /// Seconds between keep-alive notices while a scan is running.
    #[serde(default = "default_heartbeat_secs", alias = "heartbeatIntervalSecs")]
    pub heartbeat_interval_secs: u64,

    /// Overall timeout for one backend call, in seconds.
    #[serde(default = "default_request_timeout_secs", alias = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,

    /// Frames buffered towards a slow client before heartbeats are dropped.
    #[serde(default = "default_stream_buffer", alias = "streamBuffer")]
    pub stream_buffer: usize,

    /// Whether `/naabu` commands are served.
    #[serde(default = "default_true", alias = "naabuEnabled")]
    pub naabu_enabled: bool,
}

fn default_plugins_base_url() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_host_header() -> Option<String> {
    Some("plugins.hackergpt.co".into())
}

fn default_heartbeat_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    // One full 90 s scan plus backend startup.
    150
}

fn default_stream_buffer() -> usize {
    16
}

fn default_true() -> bool {
    true
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            base_url: default_plugins_base_url(),
            auth_token: SecretString::default(),
            host_header: default_host_header(),
            heartbeat_interval_secs: default_heartbeat_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            stream_buffer: default_stream_buffer(),
            naabu_enabled: true,
        }
    }
}

// ── Completion ───────────────────────────────────────────────────────────

/// Settings for the model completion path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// OpenAI-compatible base URL (e.g. `https://api.openai.com/v1`).
    #[serde(default = "default_completion_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Bearer token for the model backend.
    #[serde(default, alias = "apiKey")]
    pub api_key: SecretString,

    /// Model name sent upstream for the `hackergpt` model id.
    #[serde(default = "default_upstream_model", alias = "upstreamModel")]
    pub upstream_model: String,

    /// Fixed system prompt prepended to every conversation.
    #[serde(default, alias = "systemPrompt")]
    pub system_prompt: SecretString,

    /// Temperature used when the request omits one.
    #[serde(default = "default_temperature", alias = "defaultTemperature")]
    pub default_temperature: f64,

    /// `max_tokens` used when the request omits one.
    #[serde(default = "default_max_tokens", alias = "defaultMaxTokens")]
    pub default_max_tokens: u32,

    /// Tokens held back for the model's answer.
    #[serde(default = "default_reserved_tokens", alias = "reservedTokens")]
    pub reserved_tokens: usize,

    /// Endpoint that approves a request for the caller's account.
    #[serde(default, alias = "statusCheckUrl")]
    pub status_check_url: Option<String>,

    /// Skip the account status call entirely.
    #[serde(default, alias = "skipStatusCheck")]
    pub skip_status_check: bool,

    /// Request timeout for the model backend, in seconds.
    #[serde(default = "default_completion_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,

    /// Collapse history into strict user/assistant alternation before
    /// budgeting, for backends that reject anything else.
    #[serde(default, alias = "alternateTurns")]
    pub alternate_turns: bool,
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_upstream_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_reserved_tokens() -> usize {
    2000
}

fn default_completion_timeout_secs() -> u64 {
    120
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_base_url(),
            api_key: SecretString::default(),
            upstream_model: default_upstream_model(),
            system_prompt: SecretString::default(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            reserved_tokens: default_reserved_tokens(),
            status_check_url: None,
            skip_status_check: false,
            timeout_secs: default_completion_timeout_secs(),
            alternate_turns: false,
        }
    }
}

// ── Report ───────────────────────────────────────────────────────────────

/// How scan reports render their timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Fixed display offset from UTC, in whole hours.
    #[serde(default = "default_utc_offset_hours", alias = "utcOffsetHours")]
    pub utc_offset_hours: i32,

    /// Label printed next to the timestamp.
    #[serde(default = "default_offset_label", alias = "offsetLabel")]
    pub offset_label: String,
}

fn default_utc_offset_hours() -> i32 {
    -5
}

fn default_offset_label() -> String {
    "UTC-5".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            offset_label: default_offset_label(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────

impl EdgeConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| EdgeError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, the discovery chain, or defaults.
    ///
    /// An explicit path that does not exist is an error; a discovered path
    /// that does not exist falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(EdgeError::ConfigNotFound {
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            None => {
                let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
                match discover_config_path(env_path, dirs::home_dir()) {
                    Some(path) => path,
                    None => {
                        info!("no config file found, using defaults");
                        return Ok(Self::default());
                    }
                }
            }
        };

        debug!(path = %path.display(), "loading config file");
        let raw = std::fs::read_to_string(&path).map_err(|source| EdgeError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&raw, &path)
    }

    /// Overlay secrets and switches from environment variables.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a
    /// closure over a map. Recognised variables:
    ///
    /// | variable | field |
    /// |----------|-------|
    /// | `EDGECHAT_PLUGINS_URL` | `plugins.base_url` |
    /// | `EDGECHAT_PLUGINS_AUTH` | `plugins.auth_token` |
    /// | `EDGECHAT_MODEL_API_KEY` | `completion.api_key` |
    /// | `EDGECHAT_SYSTEM_PROMPT` | `completion.system_prompt` |
    /// | `EDGECHAT_TEMPERATURE` | `completion.default_temperature` |
    /// | `EDGECHAT_STATUS_URL` | `completion.status_check_url` |
    /// | `EDGECHAT_SKIP_STATUS_CHECK` | `completion.skip_status_check` (`TRUE`) |
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EDGECHAT_PLUGINS_URL") {
            self.plugins.base_url = url;
        }
        if let Some(token) = lookup("EDGECHAT_PLUGINS_AUTH") {
            self.plugins.auth_token = token.into();
        }
        if let Some(key) = lookup("EDGECHAT_MODEL_API_KEY") {
            self.completion.api_key = key.into();
        }
        if let Some(prompt) = lookup("EDGECHAT_SYSTEM_PROMPT") {
            self.completion.system_prompt = prompt.into();
        }
        if let Some(raw) = lookup("EDGECHAT_TEMPERATURE") {
            self.completion.default_temperature =
                raw.trim().parse().map_err(|_| EdgeError::ConfigInvalid {
                    reason: format!("EDGECHAT_TEMPERATURE is not a number: {raw}"),
                })?;
        }
        if let Some(url) = lookup("EDGECHAT_STATUS_URL") {
            self.completion.status_check_url = Some(url);
        }
        if let Some(flag) = lookup("EDGECHAT_SKIP_STATUS_CHECK") {
            self.completion.skip_status_check = flag == "TRUE";
        }
        Ok(())
    }
}

/// Resolve the config file location.
///
/// Returns the env-provided path unconditionally (a typo there should
/// surface as a read error, not silently fall back), otherwise
/// `~/.edgechat/config.json` if it exists.
pub fn discover_config_path(env_path: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_path {
        return Some(path);
    }
    let candidate = home?.join(".edgechat").join("config.json");
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EdgeConfig::default();
        assert_eq!(cfg.server.bind, "127.0.0.1:3000");
        assert_eq!(cfg.plugins.heartbeat_interval_secs, 15);
        assert!(cfg.plugins.naabu_enabled);
        assert_eq!(cfg.completion.reserved_tokens, 2000);
        assert_eq!(cfg.completion.default_max_tokens, 1000);
        assert!((cfg.completion.default_temperature - 0.6).abs() < f64::EPSILON);
        assert_eq!(cfg.report.utc_offset_hours, -5);
        assert_eq!(cfg.report.offset_label, "UTC-5");
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let cfg = EdgeConfig::from_json("{}", Path::new("inline")).unwrap();
        assert_eq!(cfg.plugins.stream_buffer, 16);
        assert_eq!(
            cfg.plugins.host_header.as_deref(),
            Some("plugins.hackergpt.co")
        );
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let raw = r#"{
            "plugins": { "baseUrl": "http://scanner:9000", "heartbeatIntervalSecs": 5 },
            "completion": { "skipStatusCheck": true, "reservedTokens": 100 }
        }"#;
        let cfg = EdgeConfig::from_json(raw, Path::new("inline")).unwrap();
        assert_eq!(cfg.plugins.base_url, "http://scanner:9000");
        assert_eq!(cfg.plugins.heartbeat_interval_secs, 5);
        assert!(cfg.completion.skip_status_check);
        assert_eq!(cfg.completion.reserved_tokens, 100);
    }

    #[test]
    fn parse_error_names_origin() {
        let err = EdgeConfig::from_json("{not json", Path::new("/tmp/x.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse config /tmp/x.json"));
    }

    #[test]
    fn load_explicit_missing_file_is_error() {
        let err = EdgeConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, EdgeError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": {{"bind": "0.0.0.0:8443"}}}}"#).unwrap();
        let cfg = EdgeConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:8443");
    }

    #[test]
    fn discover_prefers_env_path() {
        let path = discover_config_path(Some(PathBuf::from("/custom.json")), None);
        assert_eq!(path, Some(PathBuf::from("/custom.json")));
    }

    #[test]
    fn discover_home_requires_existing_file() {
        let home = tempfile::tempdir().unwrap();
        assert!(discover_config_path(None, Some(home.path().to_path_buf())).is_none());

        let dir = home.path().join(".edgechat");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        assert_eq!(
            discover_config_path(None, Some(home.path().to_path_buf())),
            Some(dir.join("config.json"))
        );
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("EDGECHAT_PLUGINS_AUTH", "shared-secret"),
            ("EDGECHAT_TEMPERATURE", "0.2"),
            ("EDGECHAT_SKIP_STATUS_CHECK", "TRUE"),
            ("EDGECHAT_SYSTEM_PROMPT", "You are a security assistant."),
        ]);
        let mut cfg = EdgeConfig::default();
        cfg.apply_env_overrides(|k| vars.get(k).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(cfg.plugins.auth_token.expose(), "shared-secret");
        assert!((cfg.completion.default_temperature - 0.2).abs() < f64::EPSILON);
        assert!(cfg.completion.skip_status_check);
        assert_eq!(
            cfg.completion.system_prompt.expose(),
            "You are a security assistant."
        );
    }

    #[test]
    fn skip_status_check_requires_literal_true() {
        let mut cfg = EdgeConfig::default();
        cfg.apply_env_overrides(|k| (k == "EDGECHAT_SKIP_STATUS_CHECK").then(|| "yes".into()))
            .unwrap();
        assert!(!cfg.completion.skip_status_check);
    }

    #[test]
    fn bad_temperature_is_rejected() {
        let mut cfg = EdgeConfig::default();
        let err = cfg
            .apply_env_overrides(|k| (k == "EDGECHAT_TEMPERATURE").then(|| "warm".into()))
            .unwrap_err();
        assert!(matches!(err, EdgeError::ConfigInvalid { .. }));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut cfg = EdgeConfig::default();
        cfg.plugins.auth_token = "top-secret".into();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("top-secret"));
    }
}
