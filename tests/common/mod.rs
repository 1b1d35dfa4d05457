// tests/common/mod.rs
// In-memory collaborators for driving whole crawls without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use data_gatherer::crawl::{CrawlContext, CrawlSettings};
use data_gatherer::error::{FetchError, PersistError, SearchError};
use data_gatherer::fetch::{FetchedPage, Fetcher};
use data_gatherer::oracle::ContentOracle;
use data_gatherer::persist::{ArtifactSink, SavedArtifact};
use data_gatherer::search::SearchProvider;

/// URL -> HTML. Unknown URLs 404. Every fetch is counted.
#[derive(Default)]
pub struct FakeWeb {
    pages: HashMap<String, String>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().values().sum()
    }
}

#[async_trait]
impl Fetcher for FakeWeb {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        *self.fetches.lock().entry(url.to_string()).or_insert(0) += 1;
        // Give other workers a chance to interleave, like a real request would
        tokio::task::yield_now().await;
        let body = self
            .pages
            .get(url.as_str())
            .cloned()
            .ok_or(FetchError::Status(404))?;
        Ok(FetchedPage {
            url: url.clone(),
            body,
        })
    }
}

/// Always answers `verdict` and remembers what it was asked.
pub struct FixedOracle {
    verdict: bool,
    calls: Mutex<Vec<String>>,
}

impl FixedOracle {
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ContentOracle for FixedOracle {
    async fn classify(&self, text: &str) -> bool {
        self.calls.lock().push(text.to_string());
        self.verdict
    }
}

#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(Url, String)>>,
}

impl MemorySink {
    pub fn saved_urls(&self) -> Vec<String> {
        self.saved.lock().iter().map(|(url, _)| url.to_string()).collect()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn save(&self, url: &Url, text: &str) -> Result<SavedArtifact, PersistError> {
        let mut saved = self.saved.lock();
        saved.push((url.clone(), text.to_string()));
        let ordinal = saved.len() as u64;
        Ok(SavedArtifact {
            ordinal,
            path: PathBuf::from(format!("page_{}.txt", ordinal)),
        })
    }
}

/// keyword -> results; keywords not in the map fail.
#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, Vec<Url>>,
}

impl FakeSearch {
    pub fn with(mut self, keyword: &str, urls: &[&str]) -> Self {
        self.results.insert(
            keyword.to_string(),
            urls.iter().map(|u| Url::parse(u).unwrap()).collect(),
        );
        self
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, term: &str) -> Result<Vec<Url>, SearchError> {
        self.results
            .get(term)
            .cloned()
            .ok_or_else(|| SearchError::Api(format!("no results for {}", term)))
    }
}

pub fn context(
    web: Arc<FakeWeb>,
    oracle: Arc<dyn ContentOracle>,
    sink: Arc<dyn ArtifactSink>,
    settings: CrawlSettings,
) -> Arc<CrawlContext> {
    Arc::new(CrawlContext {
        fetcher: web,
        oracle,
        sink,
        settings,
    })
}

/// A page body with exactly `chars` characters of text plus the given links.
pub fn page_with(chars: usize, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}"></a>"#, href))
        .collect();
    format!(
        "<html><body><p>{}</p>{}</body></html>",
        "t".repeat(chars),
        anchors
    )
}
