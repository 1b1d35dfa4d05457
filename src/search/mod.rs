// src/search/mod.rs
// =============================================================================
// This module turns a keyword into a handful of seed URLs.
//
// Submodules:
// - serpapi: Google results through SerpAPI
// - keywords: reads the keyword file used by keyword mode
// =============================================================================

mod keywords;
mod serpapi;

use async_trait::async_trait;
use url::Url;

use crate::error::SearchError;
use crate::extract::normalize_url;

pub use keywords::read_keywords;
pub use serpapi::{SerpApiSearch, SerpApiSettings, DEFAULT_SERPAPI_BASE_URL};

/// Most seeds taken from a single search.
pub const MAX_SEARCH_RESULTS: usize = 5;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns up to MAX_SEARCH_RESULTS http(s) URLs, best match first.
    async fn search(&self, term: &str) -> Result<Vec<Url>, SearchError>;
}

// Parses raw result links, keeping provider order, dropping anything that
// isn't a valid http(s) URL, and capping at MAX_SEARCH_RESULTS. Google
// links often carry a "#:~:text=" fragment, which is stripped here.
pub(crate) fn seed_urls<'a, I>(links: I) -> Vec<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    links
        .into_iter()
        .filter_map(|link| Url::parse(link).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(normalize_url)
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
