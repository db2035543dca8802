use clap::Parser;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--project-id or STACKDRIVER_PROJECTID environment variable is required")]
    MissingProjectId,
}

/// Handler configuration, resolved once from CLI flags and environment
/// variables before the event is processed and read-only afterwards.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sensu-stackdriver-handler",
    about = "Send Sensu Go collected metrics to Google Cloud Monitoring (Stackdriver)",
    version
)]
pub struct Config {
    /// The Google Cloud Project ID
    #[arg(
        short = 'p',
        long = "project-id",
        env = "STACKDRIVER_PROJECTID",
        default_value = "",
        hide_default_value = true
    )]
    pub project_id: String,

    /// Include entity and check labels in the metric labels
    #[arg(short = 'l', long = "include-labels")]
    pub include_labels: bool,

    /// Base URL of the Cloud Monitoring API
    #[arg(
        long = "endpoint",
        env = "STACKDRIVER_ENDPOINT",
        default_value = "https://monitoring.googleapis.com"
    )]
    pub endpoint: String,

    /// OAuth access token; falls back to the GCE metadata service when unset
    #[arg(long = "access-token", env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl Config {
    /// Precondition check run before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        Ok(())
    }
}
