use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use driftnet::app::AppContext;
use driftnet::cli::{commands, Cli, Commands};
use driftnet::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("driftnet=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Commands::Scrape(ref args) = cli.command {
        args.apply(&mut config);
        config.validate()?;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Scrape(_) => {
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, finishing up");
                    interrupt.cancel();
                }
            });

            if let Err(e) = commands::scrape(&ctx, cancel).await {
                error!("Scrape failed: {}", e);
                return Err(e.into());
            }
        }
        Commands::Classify { text } => {
            commands::classify(&ctx, &text)?;
        }
        Commands::Summary { input, latest, run } => {
            commands::summary(&ctx, input.as_deref(), run, latest)?;
        }
    }

    Ok(())
}
