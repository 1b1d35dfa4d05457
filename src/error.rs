// src/error.rs
// =============================================================================
// Error types for every collaborator the crawler talks to.
//
// Each boundary gets its own enum so callers can decide what to do:
// - FetchError: ends one worker's pipeline, never the whole run
// - OracleError: never leaves the oracle, it becomes a "no" verdict
// - PersistError: logged and counted, the crawl keeps going
// - SearchError: skips one keyword, the next one is still processed
//
// "Page had no content" is deliberately missing here: the extractor returns
// None for that, it is a skip condition and not a failure.
// =============================================================================

use thiserror::Error;

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures inside the content oracle. These are mapped to `false` before
/// they reach the crawler.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no API key configured (set GROQ_API_KEY)")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no API key configured (set SERPAPI_KEY)")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
}
