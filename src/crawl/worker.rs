// src/crawl/worker.rs
// =============================================================================
// One CrawlWorker = one page.
//
// Pipeline:
// 1. Fetch the page (a failure ends this worker, nothing else). If it
//    redirected, claim the landing URL or stop if someone else has it
// 2. Extract readable text and links
// 3. Ask the oracle about the text, if there is enough of it
// 4. Save the text if the oracle said yes
// 5. Admit every new link and launch a worker for it
//
// Workers never wait for their children. The Coordinator tracks them all,
// so the run ends when the last worker anywhere in the tree is done.
// =============================================================================

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::coordinator::{Coordinator, TaskId};
use crate::extract::{normalize_url, parse_page, ParsedPage};
use crate::fetch::{FetchedPage, Fetcher};
use crate::oracle::ContentOracle;
use crate::persist::ArtifactSink;

/// Knobs that limit how far a crawl spreads. `None` means unbounded.
#[derive(Debug, Clone, Default)]
pub struct CrawlSettings {
    /// Links are not followed from pages at this depth (seeds are depth 0)
    pub max_depth: Option<usize>,
    /// Upper bound on URLs admitted per coordinator
    pub max_pages: Option<usize>,
}

/// The collaborators every worker in a run shares.
pub struct CrawlContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub oracle: Arc<dyn ContentOracle>,
    pub sink: Arc<dyn ArtifactSink>,
    pub settings: CrawlSettings,
}

/// Extracted text of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub url: Url,
    pub text: String,
}

/// Where a worker is in its pipeline. `Failed` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Fetching,
    Failed,
    Extracting,
    Classifying,
    Saving,
    DiscoveringLinks,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Fetching => "fetching",
            Stage::Failed => "failed",
            Stage::Extracting => "extracting",
            Stage::Classifying => "classifying",
            Stage::Saving => "saving",
            Stage::DiscoveringLinks => "discovering-links",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct CrawlWorker {
    url: Url,
    depth: usize,
    coordinator: Coordinator,
    context: Arc<CrawlContext>,
    stage: Stage,
}

impl CrawlWorker {
    pub fn new(url: Url, depth: usize, coordinator: Coordinator, context: Arc<CrawlContext>) -> Self {
        Self {
            url,
            depth,
            coordinator,
            context,
            stage: Stage::Pending,
        }
    }

    /// Hands this worker to the Coordinator to run in the background.
    ///
    /// The URL is expected to have been admitted already.
    pub fn launch(self) -> TaskId {
        let coordinator = self.coordinator.clone();
        let url = self.url.clone();
        coordinator.spawn(&url, async move {
            self.run().await;
        })
    }

    /// Runs the whole pipeline for this page and returns the terminal stage.
    pub async fn run(mut self) -> Stage {
        info!(url = %self.url, depth = self.depth, "crawling");

        self.enter(Stage::Fetching);
        let fetched = self.context.fetcher.fetch(&self.url).await;
        let FetchedPage { url: landed, body: html } = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %self.url, error = %e, "failed to fetch");
                self.coordinator.stats().record_fetch_failure();
                self.enter(Stage::Failed);
                return self.stage;
            }
        };
        self.coordinator.stats().record_fetched();

        let landed = normalize_url(landed);
        if landed != self.url {
            if !self.coordinator.admit(&landed) {
                debug!(url = %self.url, landed = %landed, "redirected to a page that is already claimed");
                self.enter(Stage::Done);
                return self.stage;
            }
            debug!(url = %self.url, landed = %landed, "followed redirect");
            // Relative links on the page are relative to where it was served from
            self.url = landed;
        }

        self.enter(Stage::Extracting);
        let ParsedPage { text, links } = parse_page(&html, &self.url);

        match text {
            Some(text) => {
                let page = PageContent {
                    url: self.url.clone(),
                    text,
                };
                if self.classify(&page).await {
                    self.save(&page).await;
                }
            }
            None => debug!(url = %self.url, "not enough content, skipping classification"),
        }

        self.enter(Stage::DiscoveringLinks);
        self.discover(links);

        self.enter(Stage::Done);
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!(url = %self.url, from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }

    async fn classify(&mut self, page: &PageContent) -> bool {
        self.enter(Stage::Classifying);
        self.coordinator.stats().record_classified();

        let verdict = self.context.oracle.classify(&page.text).await;
        debug!(url = %page.url, verdict, "classified");
        verdict
    }

    async fn save(&mut self, page: &PageContent) {
        self.enter(Stage::Saving);

        match self.context.sink.save(&page.url, &page.text).await {
            Ok(artifact) => {
                self.coordinator.stats().record_saved();
                info!(url = %page.url, path = %artifact.path.display(), "saved relevant content");
            }
            Err(e) => {
                self.coordinator.stats().record_save_failure();
                warn!(url = %page.url, error = %e, "failed to save page");
            }
        }
    }

    // Admits each link and launches a child worker for every one we won
    fn discover(&self, links: Vec<Url>) {
        if let Some(max_depth) = self.context.settings.max_depth {
            if self.depth >= max_depth {
                debug!(url = %self.url, depth = self.depth, "max depth reached, not following links");
                return;
            }
        }

        let mut admitted = 0;
        for link in links {
            if self.coordinator.admit(&link) {
                admitted += 1;
                CrawlWorker::new(
                    link,
                    self.depth + 1,
                    self.coordinator.clone(),
                    self.context.clone(),
                )
                .launch();
            }
        }
        debug!(url = %self.url, admitted, "links discovered");
    }
}
