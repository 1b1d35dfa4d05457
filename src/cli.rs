// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two ways to start a crawl:
//   data-gatherer https://example.com          (one seed URL)
//   data-gatherer --keywords words.txt         (search each keyword, crawl results)
//
// API keys can be passed as flags but normally come from the environment
// (GROQ_API_KEY, SERPAPI_KEY) via clap's `env` feature.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use data_gatherer::crawl::{CrawlSettings, VisitedScope};
use data_gatherer::fetch::FetchSettings;
use data_gatherer::oracle::{GroqSettings, DEFAULT_GROQ_BASE_URL, DEFAULT_MODEL};
use data_gatherer::search::{SerpApiSettings, DEFAULT_SERPAPI_BASE_URL};

#[derive(Parser, Debug)]
#[command(
    name = "data-gatherer",
    version,
    about = "Recursively crawl the web and save only the pages an LLM considers worth keeping",
    long_about = "data-gatherer starts from a seed URL (or from search results for a list of keywords), \
                  follows every http(s) link it finds, and asks an LLM whether each page's text is \
                  worth storing. Accepted pages are written to page_<n>.txt files."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    #[arg(conflicts_with = "keywords")]
    pub seed_url: Option<String>,

    /// File with one search keyword per line; each keyword's top results become seeds
    #[arg(long, value_name = "FILE")]
    pub keywords: Option<PathBuf>,

    /// Directory where accepted pages are written
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Seconds to wait for a page before giving up on it
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Don't follow links from pages this many hops away from a seed (seeds are 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Stop admitting new URLs after this many (per visited set)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Model used to judge pages
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible Groq API
    #[arg(long, default_value = DEFAULT_GROQ_BASE_URL)]
    pub groq_base_url: String,

    /// SerpAPI key (keyword mode only)
    #[arg(long, env = "SERPAPI_KEY", hide_env_values = true)]
    pub serpapi_key: Option<String>,

    /// Base URL of the SerpAPI service
    #[arg(long, default_value = DEFAULT_SERPAPI_BASE_URL)]
    pub serpapi_base_url: String,

    /// Keyword mode: share one visited set across keywords, or start fresh per keyword
    #[arg(long, value_enum, default_value_t = VisitedScope::Shared)]
    pub visited_scope: VisitedScope,

    /// Print the final summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Log every pipeline stage (same as RUST_LOG=data_gatherer=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            max_depth: self.max_depth,
            max_pages: self.max_pages,
        }
    }

    pub fn groq_settings(&self) -> GroqSettings {
        GroqSettings {
            api_key: self.groq_api_key.clone(),
            model: self.model.clone(),
            base_url: self.groq_base_url.clone(),
            ..GroqSettings::default()
        }
    }

    pub fn serpapi_settings(&self) -> SerpApiSettings {
        SerpApiSettings {
            api_key: self.serpapi_key.clone(),
            base_url: self.serpapi_base_url.clone(),
            ..SerpApiSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_url_is_positional() {
        let cli = Cli::try_parse_from(["data-gatherer", "https://example.com"]).unwrap();
        assert_eq!(cli.seed_url.as_deref(), Some("https://example.com"));
        assert_eq!(cli.timeout_secs, 15);
        assert_eq!(cli.visited_scope, VisitedScope::Shared);
    }

    #[test]
    fn test_seed_is_optional_at_parse_time() {
        // main() turns "nothing to do" into a usage message and exit code 1
        let cli = Cli::try_parse_from(["data-gatherer"]).unwrap();
        assert!(cli.seed_url.is_none());
        assert!(cli.keywords.is_none());
    }

    #[test]
    fn test_seed_and_keywords_conflict() {
        let result =
            Cli::try_parse_from(["data-gatherer", "https://example.com", "--keywords", "words.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_keyword_mode_options() {
        let cli = Cli::try_parse_from([
            "data-gatherer",
            "--keywords",
            "words.txt",
            "--visited-scope",
            "per-keyword",
            "--max-pages",
            "50",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.keywords, Some(PathBuf::from("words.txt")));
        assert_eq!(cli.visited_scope, VisitedScope::PerKeyword);
        assert_eq!(cli.crawl_settings().max_pages, Some(50));
        assert_eq!(cli.fetch_settings().timeout, Duration::from_secs(5));
    }
}
