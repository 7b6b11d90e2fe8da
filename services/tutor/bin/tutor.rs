//! Main Entrypoint for the Web Development Tutor
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and `.env.local`.
//! 2. Initializing logging on stderr (stdout carries the MCP transport).
//! 3. Loading or bootstrapping the course content.
//! 4. Prewarming the worker process.
//! 5. Running the tutor job on the stdio runtime until the host disconnects.

use anyhow::Context;
use std::sync::Arc;
use tracing::{Instrument, info};
use tutor_core::{
    ContentStore, default_topics,
    session::VadConfig,
    worker::{JobContext, JobProcess, entrypoint, prewarm},
};
use tutor_service::{config::Config, runtime::StdioRuntime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
    info!("Configuration loaded. Loading course content...");

    // --- 3. Load Content ---
    let store = Arc::new(ContentStore::load(&config.content_path, &default_topics()));
    info!(topics = store.len(), ids = %store.id_list(), "Course content ready");

    // --- 4. Prewarm ---
    let process = Arc::new(JobProcess::new());
    prewarm(&process, VadConfig::default());

    // --- 5. Run the Job ---
    let ctx = JobContext {
        room: config.room.clone(),
        process,
    };
    let mut runtime = StdioRuntime::new();
    let job_span = tracing::info_span!("job", room = %ctx.room);
    entrypoint(&ctx, config.session.clone(), store, &mut runtime)
        .instrument(job_span)
        .await?;

    info!("Tutor has shut down.");
    Ok(())
}
