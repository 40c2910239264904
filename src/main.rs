//! ngram-fts - command line search over a task store.
//!
//! Usage: `ngram-fts <query words...>`. Hits are printed to stdout as JSON,
//! best match first.

use anyhow::{bail, Result};
use ngram_fts::{Config, SearchRequest, SqliteTaskRepository, TaskRepository};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr, stdout carries the results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        bail!("usage: ngram-fts <query>");
    }

    let repo = SqliteTaskRepository::open(&config)?;
    let hits = repo.search(&SearchRequest::new(query))?;
    info!(
        total = hits.len(),
        shown = hits.len().min(config.max_results),
        "Search finished"
    );

    let shown: Vec<_> = hits.into_iter().take(config.max_results).collect();
    println!("{}", serde_json::to_string_pretty(&shown)?);

    info!(metrics = ?repo.metrics().summary(), "Done");
    Ok(())
}
