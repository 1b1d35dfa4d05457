// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - http: the real fetcher, built on reqwest
//
// The crawler only sees the Fetcher trait, so tests can hand it an
// in-memory web instead of a network.
// =============================================================================

mod http;

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

pub use http::HttpFetcher;

/// Default per-request timeout, including connect and body download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            redirect_limit: 5,
            user_agent: concat!("data-gatherer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Where the body actually came from, after redirects
    pub url: Url,
    pub body: String,
}

/// Fetches the body of a page as text.
///
/// Any non-success outcome (transport error, non-2xx status, timeout) is an
/// `Err`; there are no retries at this layer.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
