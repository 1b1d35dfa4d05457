// src/crawl/run.rs
// =============================================================================
// Entry points for a whole crawl:
// - crawl_from_seed: one URL, one Coordinator, run until the link graph
//   reachable from it is drained
// - crawl_keywords: search each keyword, crawl the results
//
// Keyword mode and the visited set
// --------------------------------
// By default all keywords share ONE Coordinator (VisitedScope::Shared): a
// page found by "rust async" isn't fetched or classified again for
// "tokio tutorial". VisitedScope::PerKeyword gives every keyword a fresh
// Coordinator instead, so overlapping results are crawled once per keyword.
// The choice is always explicit, never mixed within a run.
// =============================================================================

use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use super::coordinator::{Coordinator, StatsSnapshot};
use super::worker::{CrawlContext, CrawlWorker};
use crate::extract::normalize_url;
use crate::search::SearchProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitedScope {
    /// One visited set for the whole keyword run
    #[default]
    Shared,
    /// A fresh visited set for every keyword
    PerKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Unique URLs admitted during the run (fetched or attempted)
    pub pages_visited: usize,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSummary {
    pub keyword: String,
    /// Seed URLs returned by the search provider
    pub seeds: usize,
    /// URLs first admitted while crawling this keyword's seeds
    pub pages_visited: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordRunSummary {
    pub scope: VisitedScope,
    pub keywords: Vec<KeywordSummary>,
    /// Unique URLs across every keyword in the run
    pub total_unique_visited: usize,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}

// Crawls everything reachable from `seed`
pub async fn crawl_from_seed(seed: Url, context: Arc<CrawlContext>) -> RunSummary {
    let coordinator = Coordinator::with_max_pages(context.settings.max_pages);
    crawl_seeds(&coordinator, &context, vec![seed]).await;

    RunSummary {
        pages_visited: coordinator.visited_count(),
        stats: coordinator.stats().snapshot(),
    }
}

// Runs a search-then-crawl cycle per keyword. A failed search is recorded in
// that keyword's summary and the next keyword is still processed.
pub async fn crawl_keywords(
    keywords: &[String],
    search: &dyn SearchProvider,
    context: Arc<CrawlContext>,
    scope: VisitedScope,
) -> KeywordRunSummary {
    let max_pages = context.settings.max_pages;
    let shared = Coordinator::with_max_pages(max_pages);

    let mut summaries = Vec::with_capacity(keywords.len());
    let mut visited_per_keyword: HashSet<Url> = HashSet::new();
    let mut per_keyword_stats = StatsSnapshot::default();

    for keyword in keywords {
        let seeds = match search.search(keyword).await {
            Ok(seeds) => seeds,
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "search failed, skipping keyword");
                summaries.push(KeywordSummary {
                    keyword: keyword.clone(),
                    seeds: 0,
                    pages_visited: 0,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let coordinator = match scope {
            VisitedScope::Shared => shared.clone(),
            VisitedScope::PerKeyword => Coordinator::with_max_pages(max_pages),
        };

        let seed_count = seeds.len();
        let before = coordinator.visited_count();
        crawl_seeds(&coordinator, &context, seeds).await;
        let pages_visited = coordinator.visited_count() - before;

        info!(keyword = %keyword, pages_visited, "finished crawling keyword");

        if scope == VisitedScope::PerKeyword {
            visited_per_keyword.extend(coordinator.visited_urls());
            per_keyword_stats += coordinator.stats().snapshot();
        }

        summaries.push(KeywordSummary {
            keyword: keyword.clone(),
            seeds: seed_count,
            pages_visited,
            error: None,
        });
    }

    let (total_unique_visited, stats) = match scope {
        VisitedScope::Shared => (shared.visited_count(), shared.stats().snapshot()),
        VisitedScope::PerKeyword => (visited_per_keyword.len(), per_keyword_stats),
    };

    KeywordRunSummary {
        scope,
        keywords: summaries,
        total_unique_visited,
        stats,
    }
}

// Admits and launches every seed, then waits for the whole tree under them
async fn crawl_seeds(
    coordinator: &Coordinator,
    context: &Arc<CrawlContext>,
    seeds: impl IntoIterator<Item = Url>,
) {
    for seed in seeds.into_iter().map(normalize_url) {
        if coordinator.admit(&seed) {
            CrawlWorker::new(seed, 0, coordinator.clone(), context.clone()).launch();
        }
    }
    coordinator.await_completion().await;
}
