use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::event::Event;
use crate::stackdriver::{MetricsClient, WriteError};

pub mod auth;
pub mod config;
pub mod event;
pub mod stackdriver;
pub mod timeseries;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

/// Processes one Sensu event: builds the time series for its metric points
/// and writes them to Cloud Monitoring. Events without points are a no-op,
/// no write request is issued for them.
pub async fn handle_event(
    config: &Config,
    client: &MetricsClient,
    event: &Event,
) -> Result<(), WriteError> {
    info!(project_id = %config.project_id, "executing handler");

    if !event.has_metrics() {
        info!("event carries no metric points; nothing to write");
        return Ok(());
    }

    let series = timeseries::create_time_series(config, event);
    client.write_time_series(&config.project_id, &series).await
}
