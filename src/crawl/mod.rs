// src/crawl/mod.rs
// =============================================================================
// This module runs the crawl itself.
//
// Features:
// - Coordinator: shared visited set + registry of running workers
// - CrawlWorker: fetch -> extract -> classify -> save -> discover, per page
// - run: single-seed and keyword-driven entry points
//
// Workers run concurrently as tokio tasks. There is no queue and no
// recursion: each worker launches its children and finishes, and the
// Coordinator knows when the last one is done.
// =============================================================================

mod coordinator;
mod run;
mod worker;

pub use coordinator::{Coordinator, CrawlStats, StatsSnapshot, TaskId};
pub use run::{
    crawl_from_seed, crawl_keywords, KeywordRunSummary, KeywordSummary, RunSummary, VisitedScope,
};
pub use worker::{CrawlContext, CrawlSettings, CrawlWorker, PageContent, Stage};
