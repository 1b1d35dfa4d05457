// src/search/serpapi.rs
// =============================================================================
// Keyword search through SerpAPI's Google engine.
//
// We only care about `organic_results[].link`; ads, knowledge graph and the
// rest of the response are ignored.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;
use url::Url;

use super::{seed_urls, SearchProvider, MAX_SEARCH_RESULTS};
use crate::error::SearchError;

pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

#[derive(Debug, Clone)]
pub struct SerpApiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SerpApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

pub struct SerpApiSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiSearch {
    pub fn new(settings: SerpApiSettings) -> Result<Self, SearchError> {
        let api_key = settings
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(SearchError::MissingCredential)?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url,
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    async fn search(&self, term: &str) -> Result<Vec<Url>, SearchError> {
        info!(term, "searching");

        let num = MAX_SEARCH_RESULTS.to_string();
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url.trim_end_matches('/')))
            .query(&[
                ("engine", "google"),
                ("q", term),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let seeds = seed_urls(
            results
                .organic_results
                .iter()
                .filter_map(|result| result.link.as_deref()),
        );
        for seed in &seeds {
            info!(term, url = %seed, "found link");
        }

        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_for(server: &MockServer) -> SerpApiSearch {
        SerpApiSearch::new(SerpApiSettings {
            api_key: Some("serp-key".to_string()),
            base_url: server.uri(),
            ..SerpApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            SerpApiSearch::new(SerpApiSettings::default()),
            Err(SearchError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_search_returns_organic_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "rust async"))
            .and(query_param("num", "5"))
            .and(query_param("api_key", "serp-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic_results": [
                    { "position": 1, "link": "https://tokio.rs/" },
                    { "position": 2 },
                    { "position": 3, "link": "mailto:someone@example.com" },
                    { "position": 4, "link": "https://rust-lang.github.io/async-book/" }
                ]
            })))
            .mount(&server)
            .await;

        let urls: Vec<String> = search_for(&server)
            .search("rust async")
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            urls,
            vec!["https://tokio.rs/", "https://rust-lang.github.io/async-book/"]
        );
    }

    #[tokio::test]
    async fn test_search_without_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "search_metadata": {} })))
            .mount(&server)
            .await;

        assert!(search_for(&server).search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        assert!(matches!(
            search_for(&server).search("rust").await,
            Err(SearchError::Api(_))
        ));
    }
}
