//! # Transmission RPC command line client
//!
//! ## Usage
//!
//! ```sh,ignore
//! cargo run --release -p transmission-rpc-cli -- session-get --host seedbox.lan
//! cargo run --release -p transmission-rpc-cli -- torrent-get --arguments '{"fields":["id","name"]}'
//! ```
//!
//! Connection flags fall back to `TRANSMISSION_*` environment variables, which may also be set
//! in a `.env` file.

mod cli;

use std::io;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transmission_rpc::{Connector, ConnectorConfig};

use crate::cli::Cli;

/// Initializes the tracing subscriber. Logs go to stderr so stdout only carries the result.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let request = cli.request();
    let config = ConnectorConfig::from(cli.connection);
    debug!("Using {config:?}");

    let mut connector = Connector::new(config);
    let arguments = connector.post(&request).await?;
    println!("{}", serde_json::to_string_pretty(&arguments)?);

    Ok(())
}
