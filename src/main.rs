//! SDK Configuration Tool
//!
//! Reads an SDK configuration file, expands it into one record per node
//! connection and prints the records as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin sdk-config -- --config config.toml --pretty
//! ```
//!
//! Or set the config path via environment variable:
//!
//! ```bash
//! SDK_CONFIG_PATH=config.toml cargo run --bin sdk-config
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sdk_config::config::{expand_document, load_document_from_path, CONFIG_PATH_ENV};
use sdk_config::encode_configs;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sdk-config")]
#[command(about = "Expands an SDK configuration file into per-connection JSON records")]
struct Args {
    /// Path to the configuration file (default: config.toml or SDK_CONFIG_PATH env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments first (before initializing logging)
    let args = Args::parse();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Some(path) = &args.config {
        info!("Loading configuration from: {}", path);
    } else if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        info!("Loading configuration from {}: {}", CONFIG_PATH_ENV, path);
    } else {
        info!("Loading configuration from default location");
    }

    let document = load_document_from_path(args.config.as_deref())?;
    info!("SDK log directory: {}", document.log_path());

    let configs = expand_document(&document).context("Invalid SDK configuration")?;
    for config in &configs {
        info!(
            "Group {} -> {} ({})",
            config.group_id,
            config.node_url,
            if config.is_http { "rpc" } else { "channel" }
        );
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&configs)?
    } else {
        encode_configs(&configs)?
    };
    println!("{}", output);

    Ok(())
}
