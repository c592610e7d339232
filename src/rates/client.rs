//! Rate fetching from external providers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::convert::RateTable;

/// Default timeout for rate provider requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from a single rate lookup attempt.
#[derive(Debug)]
pub enum RateFetchError {
    /// The provider could not be reached.
    Http(String),
    /// The provider answered with a non-success status.
    Status(u16),
    /// The provider answered 200 but the body did not carry a usable rate table.
    Malformed(String),
}

impl std::fmt::Display for RateFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "rate provider unreachable: {}", msg),
            Self::Status(code) => write!(f, "rate provider returned status {}", code),
            Self::Malformed(msg) => write!(f, "rate provider response malformed: {}", msg),
        }
    }
}

impl std::error::Error for RateFetchError {}

/// A trait for fetching the rate table of a base currency.
/// In practice this is an HTTP call to a public exchange-rate service via
/// `reqwest`; see `ReqwestRateSource`. The trait seam keeps the fallback
/// logic in `RateClient` testable without a network.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self, base: &str) -> Result<RateTable, RateFetchError>;
}

/// Which provider shape a `ReqwestRateSource` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// exchangerate-api.com v4: `{"base": "...", "rates": {...}}`
    Primary,
    /// open.er-api.com v6: `{"result": "success", "rates": {...}}`
    Fallback,
}

// The two providers disagree on their envelope but agree on the `rates`
// field, which is the only one conversion needs.
#[derive(Debug, Deserialize)]
struct PrimaryRatesBody {
    #[allow(dead_code)]
    base: Option<String>,
    rates: RateTable,
}

#[derive(Debug, Deserialize)]
struct FallbackRatesBody {
    result: Option<String>,
    rates: RateTable,
}

/// The concrete `reqwest`-backed implementation of `RateSource`.
pub struct ReqwestRateSource {
    client: Client,
    base_url: Url,
    kind: SourceKind,
}

impl ReqwestRateSource {
    pub fn new(base_url: Url, kind: SourceKind) -> Result<Self, RateFetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RateFetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: ensure_slash(&base_url),
            kind,
        })
    }
}

/// Makes sure a url has a trailing slash, so that `Url::join` appends the
/// currency code instead of replacing the last path segment.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

fn validate_table(rates: RateTable) -> Result<RateTable, RateFetchError> {
    if rates.is_empty() {
        return Err(RateFetchError::Malformed("empty rate table".to_string()));
    }
    Ok(rates)
}

#[async_trait]
impl RateSource for ReqwestRateSource {
    async fn fetch(&self, base: &str) -> Result<RateTable, RateFetchError> {
        let url = self
            .base_url
            .join(base)
            .map_err(|e| RateFetchError::Http(format!("failed to construct rates URL: {}", e)))?;

        debug!("Fetching rates from {} ({:?})", url, self.kind);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateFetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::Status(status.as_u16()));
        }

        match self.kind {
            SourceKind::Primary => {
                let body: PrimaryRatesBody = response
                    .json()
                    .await
                    .map_err(|e| RateFetchError::Malformed(e.to_string()))?;
                validate_table(body.rates)
            }
            SourceKind::Fallback => {
                let body: FallbackRatesBody = response
                    .json()
                    .await
                    .map_err(|e| RateFetchError::Malformed(e.to_string()))?;
                if let Some(result) = &body.result {
                    if result != "success" {
                        return Err(RateFetchError::Malformed(format!(
                            "provider reported result '{}'",
                            result
                        )));
                    }
                }
                validate_table(body.rates)
            }
        }
    }
}

/// Fetches rate tables, trying the primary provider first and the fallback
/// provider exactly once when the primary fails. Results are never cached.
pub struct RateClient {
    primary: Box<dyn RateSource>,
    fallback: Box<dyn RateSource>,
}

impl RateClient {
    pub fn new(primary: Box<dyn RateSource>, fallback: Box<dyn RateSource>) -> Self {
        Self { primary, fallback }
    }

    pub async fn latest(&self, base: &str) -> Result<RateTable, RateFetchError> {
        match self.primary.fetch(base).await {
            Ok(rates) => Ok(rates),
            Err(primary_err) => {
                warn!(
                    "Primary rate provider failed for base {}: {}. Trying fallback.",
                    base, primary_err
                );
                self.fallback.fetch(base).await.map_err(|fallback_err| {
                    warn!(
                        "Fallback rate provider also failed for base {}: {}",
                        base, fallback_err
                    );
                    fallback_err
                })
            }
        }
    }
}
