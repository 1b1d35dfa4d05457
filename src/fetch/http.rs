// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP(S).
//
// Key functionality:
// - One shared reqwest Client (connection pooling across all workers)
// - A hard timeout per request so a slow server can't stall a worker
// - Sorts failures into FetchError variants (timeout, status, network)
// - Follows redirects and reports where the page really lives
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{FetchSettings, FetchedPage, Fetcher};
use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // response.url() is the last hop of any redirect chain
        let final_url = response.url().clone();

        // The body download is covered by the same client timeout,
        // so a server that stalls mid-body still ends up as Timeout
        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

// Sorts reqwest errors into the crawler's fetch failure kinds
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_with_timeout(timeout: Duration) -> HttpFetcher {
        let settings = FetchSettings {
            timeout,
            ..FetchSettings::default()
        };
        HttpFetcher::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchSettings::default()).unwrap();
        let url = Url::parse(&format!("{}/doc", server.uri())).unwrap();

        let page = fetcher.fetch(&url).await.unwrap();
        assert_eq!(page.body, "<html>ok</html>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn test_fetch_reports_url_after_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("index"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchSettings::default()).unwrap();
        let url = Url::parse(&format!("{}/docs", server.uri())).unwrap();

        let page = fetcher.fetch(&url).await.unwrap();
        assert_eq!(page.url.as_str(), format!("{}/docs/", server.uri()));
        assert_eq!(page.body, "index");
    }

    #[tokio::test]
    async fn test_fetch_fails_on_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&FetchSettings::default()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        assert_eq!(fetcher.fetch(&url).await, Err(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_string("slow"),
            )
            .mount(&server)
            .await;

        let fetcher = fetcher_with_timeout(Duration::from_millis(50));
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();

        assert_eq!(fetcher.fetch(&url).await, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let fetcher = HttpFetcher::new(&FetchSettings::default()).unwrap();
        let url = Url::parse("ftp://example.com/file").unwrap();

        assert!(matches!(
            fetcher.fetch(&url).await,
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
