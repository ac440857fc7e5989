//! `edgechat serve` -- run the HTTP edge server until Ctrl-C.

use clap::Args;
use edgechat_server::AppState;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Arguments for `edgechat serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.bind`).
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let state = AppState::from_config(&config)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
        }
        shutdown.cancel();
    });

    edgechat_server::serve(state, &config.server, cancel).await?;
    Ok(())
}
