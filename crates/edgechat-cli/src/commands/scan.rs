//! `edgechat scan` -- run a plugin command against the configured backend
//! and print the stream as it arrives.

use std::io::Write;

use clap::Args;
use edgechat_plugins::{PluginDispatcher, PluginReply};
use futures_util::StreamExt;

/// Arguments for `edgechat scan`.
#[derive(Args)]
pub struct ScanArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// The chat message, e.g. `/naabu -host example.com`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}

pub async fn run(args: ScanArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let dispatcher = PluginDispatcher::from_config(&config)?;
    let message = super::join_message(&args.message);

    let Some(reply) = dispatcher.handle(&message) else {
        anyhow::bail!("not a plugin command: {message}");
    };

    let mut stdout = std::io::stdout();
    match reply {
        PluginReply::Notice(text) => writeln!(stdout, "{text}")?,
        PluginReply::Stream(mut stream) => {
            while let Some(frame) = stream.next().await {
                stdout.write_all(frame.into_chunk().as_bytes())?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}
