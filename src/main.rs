use anyhow::Context;
use clap::Parser;
use sensu_stackdriver_handler::config::Config;
use sensu_stackdriver_handler::event::Event;
use sensu_stackdriver_handler::stackdriver::MetricsClient;
use tokio::io::AsyncReadExt;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sensu_stackdriver_handler::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::parse();
    config.validate()?;

    // Sensu delivers the event to the handler as JSON on stdin.
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("failed to read event from stdin")?;
    let event: Event = serde_json::from_str(&raw).context("failed to decode Sensu event")?;

    let client = MetricsClient::connect(&config)
        .await
        .context("failed to create Cloud Monitoring client")?;

    sensu_stackdriver_handler::handle_event(&config, &client, &event).await?;

    Ok(())
}
