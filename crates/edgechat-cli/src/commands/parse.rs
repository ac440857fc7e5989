//! `edgechat parse` -- validate a plugin command without running it.

use clap::Args;
use edgechat_plugins::command::split_command;
use edgechat_plugins::{Tool, naabu};

/// Arguments for `edgechat parse`.
#[derive(Args)]
pub struct ParseArgs {
    /// The chat message, e.g. `/naabu -host example.com -p 80,443`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    let message = super::join_message(&args.message);
    println!("{}", render(&message)?);
    Ok(())
}

/// Text printed for `message`: help, parameters as JSON, or an error.
pub fn render(message: &str) -> anyhow::Result<String> {
    let Some((name, args)) = split_command(message) else {
        anyhow::bail!("not a plugin command: {message}");
    };
    let Some(tool) = Tool::from_name(name) else {
        anyhow::bail!("unknown plugin: /{name}");
    };

    match tool {
        Tool::Naabu => {
            if naabu::wants_help(args) {
                return Ok(naabu::HELP.to_string());
            }
            match naabu::parse(args) {
                Ok(params) => Ok(serde_json::to_string_pretty(&params)?),
                Err(e) => anyhow::bail!(e.notice()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_command_renders_json() {
        let out = render("/naabu -host example.com -p 80,443").unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["hosts"], serde_json::json!(["example.com"]));
        assert_eq!(json["port"], "80,443");
        assert_eq!(json["timeout"], 10000);
    }

    #[test]
    fn invalid_command_is_an_error() {
        let err = render("/naabu -host example.com -timeout 999999").unwrap_err();
        assert!(err.to_string().contains("90000"));
    }

    #[test]
    fn help_is_printed() {
        assert_eq!(render("/naabu -h").unwrap(), naabu::HELP);
    }

    #[test]
    fn non_plugin_messages_are_rejected() {
        assert!(render("hello").is_err());
        assert!(render("/nmap -p 80").unwrap_err().to_string().contains("/nmap"));
    }
}
