//! `edgechat config` -- show the resolved configuration.

use edgechat_types::EdgeConfig;

/// Print the configuration as pretty JSON. Secrets serialize empty.
pub fn show(config: &EdgeConfig) -> anyhow::Result<()> {
    println!("{}", render(config)?);
    Ok(())
}

/// Print one top-level section.
pub fn section(config: &EdgeConfig, name: &str) -> anyhow::Result<()> {
    let value = serde_json::to_value(config)?;
    match value.get(name) {
        Some(section) => println!("{}", serde_json::to_string_pretty(section)?),
        None => anyhow::bail!("unknown config section: {name} (expected server, plugins, completion or report)"),
    }
    Ok(())
}

fn render(config: &EdgeConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_do_not_leak() {
        let mut config = EdgeConfig::default();
        config.plugins.auth_token = "plugin-secret".into();
        config.completion.api_key = "sk-live".into();
        let out = render(&config).unwrap();
        assert!(!out.contains("plugin-secret"));
        assert!(!out.contains("sk-live"));
        assert!(out.contains("\"heartbeat_interval_secs\": 15"));
    }

    #[test]
    fn unknown_section_is_an_error() {
        assert!(section(&EdgeConfig::default(), "nope").is_err());
        assert!(section(&EdgeConfig::default(), "report").is_ok());
    }
}
