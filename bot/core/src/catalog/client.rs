//! Catalog HTTP Client
//!
//! [`CatalogClient`] is the [`CatalogBackend`] implementation that actually
//! issues HTTP requests. One request per user action, a 15 second timeout
//! as the only latency bound, and no automatic retries.
//!
//! Every way the call can fail maps onto one [`CatalogError`] kind so the
//! engine can pick a distinct user-facing message per kind instead of
//! catching ad-hoc exceptions at each call site.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::query::CatalogRequest;
use super::types::CatalogPage;
use crate::config::EngineConfig;

/// Catalog request failures
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No credential configured; the request was never attempted
    #[error("catalog API key is not configured")]
    MissingApiKey,

    /// The catalog rejected the credential (401)
    #[error("catalog rejected the API key")]
    Auth,

    /// The endpoint does not exist (404); the API shape may have changed
    #[error("catalog endpoint not found")]
    NotFound,

    /// Any other non-2xx status, including 400 from the filter endpoints
    #[error("catalog returned status {status}")]
    Server {
        /// The HTTP status code
        status: u16,
    },

    /// Could not reach the catalog at all
    #[error("could not connect to the catalog")]
    Connection,

    /// The request exceeded the configured timeout
    #[error("catalog request timed out")]
    Timeout,

    /// 2xx response with a blank body
    #[error("catalog returned an empty response")]
    EmptyResponse,

    /// Body present but not parseable into the expected shape
    #[error("could not parse catalog response: {0}")]
    Malformed(String),
}

impl CatalogError {
    /// User-facing message for this failure
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => {
                "The search service is not configured. Please contact the administrator."
                    .to_string()
            }
            Self::Auth => "Authorization failed: the catalog rejected our API key.".to_string(),
            Self::NotFound => {
                "The catalog endpoint was not found. The API may have changed.".to_string()
            }
            Self::Server { status } => {
                format!("The catalog returned a server error ({status}). Please try again.")
            }
            Self::Connection => {
                "Could not reach the movie catalog. Check your connection and try again."
                    .to_string()
            }
            Self::Timeout => {
                "The movie catalog took too long to respond. Please try again.".to_string()
            }
            Self::EmptyResponse => {
                "The catalog returned an empty response. Please try again.".to_string()
            }
            Self::Malformed(_) => {
                "Received an unreadable response from the catalog. Please try again.".to_string()
            }
        }
    }
}

/// Source of catalog pages
///
/// The engine is generic over this trait; [`CatalogClient`] is the HTTP
/// implementation, tests substitute canned pages.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch one page of results
    async fn fetch(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError>;
}

/// HTTP client for the catalog API
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    /// Create a client from engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a client with an explicit timeout, for embedders
    pub fn with_timeout(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let config = EngineConfig {
            api_key,
            base_url: base_url.into(),
            timeout,
        };
        Self::new(&config)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CatalogBackend for CatalogClient {
    async fn fetch(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CatalogError::MissingApiKey)?;

        let response = self
            .http
            .get(self.endpoint_url(request.path))
            .header("X-API-KEY", api_key)
            .header("Accept", "application/json")
            .query(&request.params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        if body.trim().is_empty() {
            return Err(CatalogError::EmptyResponse);
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Malformed(e.to_string()))
    }
}

fn classify_status(status: u16) -> CatalogError {
    match status {
        401 => CatalogError::Auth,
        404 => CatalogError::NotFound,
        // 400 from the filter endpoints stays a generic server error; the
        // upstream contract does not distinguish bad filter syntax.
        other => CatalogError::Server { status: other },
    }
}

fn classify_transport_error(error: reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Connection
    }
}
