use http::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const SERVICE_ACCOUNT_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("failed to get implicit GCP token: {0}")]
    GetImplicitToken(#[source] reqwest::Error),
    #[error("failed to parse OAuth token JSON: {0}")]
    TokenFromJson(#[source] reqwest::Error),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

/// Resolved bearer credential for the Monitoring API. Resolved once per
/// invocation, before any write is attempted.
#[derive(Debug, Clone)]
pub struct Authenticator {
    header: String,
}

impl Authenticator {
    /// Uses an explicitly supplied access token when there is one, otherwise
    /// fetches an implicit token from the GCE metadata service (the ambient
    /// credential chain of the instance the handler runs on).
    pub async fn resolve(
        http: &reqwest::Client,
        access_token: Option<&str>,
    ) -> Result<Self, AuthError> {
        match access_token {
            Some(token) => Ok(Self {
                header: format!("Bearer {}", token),
            }),
            None => {
                debug!("fetching implicit GCP authentication token");
                let token: TokenResponse = http
                    .get(SERVICE_ACCOUNT_TOKEN_URL)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(AuthError::GetImplicitToken)?
                    .json()
                    .await
                    .map_err(AuthError::TokenFromJson)?;

                Ok(Self {
                    header: format!("{} {}", token.token_type, token.access_token),
                })
            }
        }
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(AUTHORIZATION, &self.header)
    }
}
