//! fitboard - terminal host for the fitboard dashboard
//!
//! Reads commands from stdin, renders the dashboard as lines of text, loads
//! datasets from the catalog directory and fetches fits from the modeling
//! service.

mod app;
mod commands;
mod terminal;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fitboard_core::DashboardConfig;

use app::App;

fn config_path() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (None, _) => Ok(None),
        (Some("--config" | "-c"), Some(path)) => Ok(Some(PathBuf::from(path))),
        (Some(other), _) => Err(format!("usage: fitboard [--config PATH] (got '{}')", other).into()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let explicit = config_path()?;
    let config = DashboardConfig::resolve(explicit.as_deref())?;
    info!(
        datasets = config.catalog.datasets.len(),
        service = %config.service.base_url,
        "starting fitboard"
    );

    let app = App::new(config)?;
    app.flush();
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match app.execute(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("error: {}", err),
        }
        app.flush();
    }

    Ok(())
}
