//! Remote image search.
//!
//! The rest of the app only sees the [`SearchService`] trait; the Pixabay
//! client is the production implementation.

pub mod pixabay;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::state::data::SearchPage;

pub use pixabay::PixabayClient;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("pixel-finder/", env!("CARGO_PKG_VERSION"));

/// Errors surfaced by a search request.
///
/// The `Display` text is what the user sees after
/// "Failed to fetch images: ".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("{0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("Request failed with status code {status}")]
    Service {
        status: u16,
        /// Response body, kept for the logs
        message: String,
    },

    /// The response body was not the expected JSON
    #[error("Unexpected response from the search service: {0}")]
    Decode(String),
}

/// Boxed future returned by [`SearchService::search`]
pub type SearchFuture = Pin<Box<dyn Future<Output = Result<SearchPage, SearchError>> + Send>>;

/// A paged image search backend.
///
/// `page` is 1-based. The returned `total_matches` is taken as-is for
/// every page; it does not need to be stable between calls.
pub trait SearchService: Send + Sync {
    fn search(&self, query: &str, page: u32) -> SearchFuture;
}

/// Build the HTTP client shared by the search service and image downloads
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Convert a transport error into a user-presentable one.
///
/// The URL is stripped because it carries the API key.
pub(crate) fn network_error(error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        return SearchError::Network("request timed out".to_string());
    }
    SearchError::Network(error.without_url().to_string())
}
