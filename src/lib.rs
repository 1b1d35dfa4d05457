// src/lib.rs
// =============================================================================
// data-gatherer: crawl the web, keep only what an LLM thinks is worth keeping.
//
// Modules:
// - crawl: Coordinator, CrawlWorker and the seed / keyword entry points
// - fetch: downloading pages (reqwest)
// - extract: readable text and links from HTML (scraper)
// - oracle: "is this worth saving?" (Groq chat completions)
// - search: keyword -> seed URLs (SerpAPI) and the keyword file reader
// - persist: one text file per accepted page
// - error: error types for each of the above
// - telemetry: tracing subscriber setup for the binary
// =============================================================================

pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod oracle;
pub mod persist;
pub mod search;
pub mod telemetry;
