//! `burrowd`: the Burrow game server.
//!
//! Loads the optional JSON config, applies command-line overrides,
//! initializes logging and serves until Ctrl+C.

use std::path::PathBuf;

use burrow::prelude::*;
use clap::Parser;

/// Command line arguments. Flags override the config file.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cooperative heist game server")]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, e.g. 0.0.0.0:7777
    #[arg(short, long)]
    bind: Option<String>,
    /// Transport to listen with
    #[arg(short, long, value_enum)]
    transport: Option<TransportKind>,
    /// Seed for the bandwidth shuffle (reproducible games)
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, config: &mut BurrowConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(seed) = self.seed {
            config.room.seed = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BurrowError> {
    let mut args = Args::parse();
    let mut config = match args.config.take() {
        Some(path) => BurrowConfig::load(&path)?,
        None => BurrowConfig::default(),
    };
    args.apply(&mut config);

    init_logging(&config.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.bind,
        transport = %config.transport,
        "starting burrowd"
    );

    let builder = BurrowServer::builder().config(&config);
    match config.transport {
        TransportKind::Tcp => serve(builder.build().await?).await,
        TransportKind::WebSocket => serve(builder.build_websocket().await?).await,
    }
}

async fn serve<T: Transport>(server: BurrowServer<T>) -> Result<(), BurrowError> {
    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
            Ok(())
        }
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_target(true).init();
}
