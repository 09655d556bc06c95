//! The murmur reflection daemon.
//!
//! Connects to the database, builds the OpenAI collaborators from the
//! environment, and runs the reflection scheduler until ctrl-c.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use database::Database;
use openai_services::{ChatSummarizer, OpenAiConfig, WhisperTranscriber};
use scheduler::{ReflectionScheduler, WeekProcessor, DEFAULT_TICK_PERIOD};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:murmur.db?mode=rwc".to_string());
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let config = OpenAiConfig::from_env()?;
    let transcriber = WhisperTranscriber::new(config.clone())?;
    let summarizer = ChatSummarizer::new(config)?;

    let processor = Arc::new(WeekProcessor::new(
        db.clone(),
        Arc::new(transcriber),
        Arc::new(summarizer),
    ));

    let tick_period = env::var("SCHEDULER_TICK_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TICK_PERIOD);

    let handle = ReflectionScheduler::new(db.clone(), processor)
        .with_tick_period(tick_period)
        .start();

    info!("reflectd running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    handle.shutdown().await;
    db.close().await;

    Ok(())
}
