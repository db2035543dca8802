use http::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{AuthError, Authenticator};
use crate::config::Config;
use crate::timeseries::TimeSeries;

/// Hard per-request cap imposed by the Cloud Monitoring API.
pub const MAX_TIME_SERIES_PER_REQUEST: usize = 200;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("could not write time series: {0}")]
    Request(#[source] reqwest::Error),
    #[error("could not write time series: {name} rejected with status {status}: {body}")]
    Rejected {
        name: String,
        status: StatusCode,
        body: String,
    },
}

/// Body of one `timeSeries.create` call.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateTimeSeriesRequest<'a> {
    time_series: &'a [TimeSeries],
}

/// Client for the Cloud Monitoring v3 REST API. Built once per handler
/// invocation; neither the connection nor the credential outlives the call.
pub struct MetricsClient {
    http: reqwest::Client,
    endpoint: String,
    auth: Authenticator,
}

impl MetricsClient {
    pub async fn connect(config: &Config) -> Result<Self, ConnectError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConnectError::BuildHttpClient)?;
        let auth = Authenticator::resolve(&http, config.access_token.as_deref()).await?;

        Ok(MetricsClient {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Writes the full sequence in chunks of at most
    /// [`MAX_TIME_SERIES_PER_REQUEST`], strictly in order and one request at
    /// a time. The first failed chunk aborts the batch; chunks already
    /// accepted by the backend stay written.
    pub async fn write_time_series(
        &self,
        project_id: &str,
        series: &[TimeSeries],
    ) -> Result<(), WriteError> {
        let name = format!("projects/{}", project_id);
        let uri = format!("{}/v3/{}/timeSeries", self.endpoint, name);

        for chunk in chunk_time_series(series) {
            let request = CreateTimeSeriesRequest { time_series: chunk };
            debug!(name = %name, "writeTimeSeriesRequest: {:?}", request);
            info!(name = %name, time_series = chunk.len(), "writing time series chunk");

            let response = self
                .auth
                .apply(self.http.post(&uri))
                .header(CONTENT_TYPE, "application/json")
                .json(&request)
                .send()
                .await
                .map_err(WriteError::Request)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(WriteError::Rejected { name, status, body });
            }
        }

        Ok(())
    }
}

fn chunk_time_series(series: &[TimeSeries]) -> std::slice::Chunks<'_, TimeSeries> {
    series.chunks(MAX_TIME_SERIES_PER_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::{Metric, Point, TimeInterval, TypedValue};

    fn series(n: usize) -> Vec<TimeSeries> {
        (0..n)
            .map(|i| TimeSeries {
                metric: Metric {
                    r#type: format!("custom.googleapis.com/sensu/metric.{}", i),
                    labels: Default::default(),
                },
                points: vec![Point {
                    interval: TimeInterval {
                        start_time: 1700000000,
                        end_time: 1700000000,
                    },
                    value: TypedValue { double_value: i as f64 },
                }],
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(chunk_time_series(&series(0)).count(), 0);
    }

    #[test]
    fn chunks_are_bounded_and_ordered() {
        let input = series(450);
        let chunks: Vec<_> = chunk_time_series(&input).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 200);
        assert_eq!(chunks[1].len(), 200);
        assert_eq!(chunks[2].len(), 50);

        let flattened: Vec<_> = chunks.into_iter().flatten().cloned().collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let input = series(400);
        let chunks: Vec<_> = chunk_time_series(&input).collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 200));
    }

    #[test]
    fn single_partial_chunk() {
        assert_eq!(chunk_time_series(&series(7)).count(), 1);
    }
}
