#![forbid(unsafe_code)]

mod dispatch;
mod envelope;
mod payload;
mod transport;

use clap::Parser;
use std::env;
use tally_core::AppState;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::transport::HttpRollup;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tallyd: rollup node for the tally task ledger",
    long_about = None
)]
struct Cli {
    /// Coordinator base URL; falls back to the `ROLLUP_HTTP_SERVER_URL`
    /// environment variable.
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
}

impl Cli {
    /// Resolve the coordinator URL from the flag or the environment.
    fn resolve_server_url(&self) -> anyhow::Result<String> {
        if let Some(url) = &self.server_url {
            return Ok(url.clone());
        }
        env::var("ROLLUP_HTTP_SERVER_URL").map_err(|_| {
            anyhow::anyhow!("no coordinator URL: pass --server-url or set ROLLUP_HTTP_SERVER_URL")
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tally=debug,info"
        } else {
            "tally=info,warn"
        })
    });

    let format = env::var("TALLY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let server_url = cli.resolve_server_url()?;
    info!(server_url = %server_url, "starting tally node");

    let mut state = AppState::new();
    let mut rollup = HttpRollup::new(server_url);
    dispatch::run(&mut state, &mut rollup)
}
