// src/crawl/coordinator.rs
// =============================================================================
// The Coordinator is the only shared state of a crawl run.
//
// It owns:
// - the visited set: which URLs have been claimed (admit)
// - the task registry: which crawl workers are still running (spawn)
// - the run counters: fetched / failed / classified / saved
//
// The hard part is knowing when the crawl is over. Workers spawn more
// workers, so "wait for the tasks we know about" is not enough: by the time
// those finish they may have started new ones. Instead every task is
// registered *before* it starts, removed when it ends, and a Notify fires
// whenever the registry drains to empty. A worker always registers its
// children before its own entry is removed, so the registry can only be
// empty when nothing is left to do.
// =============================================================================

use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::ops::AddAssign;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use url::Url;

/// Identifies one spawned crawl worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Point-in-time copy of the run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub fetched: usize,
    pub fetch_failures: usize,
    pub classified: usize,
    pub saved: usize,
    pub save_failures: usize,
}

impl AddAssign for StatsSnapshot {
    fn add_assign(&mut self, other: Self) {
        self.fetched += other.fetched;
        self.fetch_failures += other.fetch_failures;
        self.classified += other.classified;
        self.saved += other.saved;
        self.save_failures += other.save_failures;
    }
}

#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    classified: AtomicUsize,
    saved: AtomicUsize,
    save_failures: AtomicUsize,
}

impl CrawlStats {
    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_classified(&self) {
        self.classified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_failure(&self) {
        self.save_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            classified: self.classified.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
        }
    }
}

struct Shared {
    visited: Mutex<HashSet<Url>>,
    in_flight: Mutex<HashSet<TaskId>>,
    drained: Notify,
    next_task_id: AtomicU64,
    max_pages: Option<usize>,
    stats: CrawlStats,
}

/// Per-run crawl state. Cloning is cheap and every clone sees the same run.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_max_pages(None)
    }

    /// A coordinator that stops admitting URLs once `max_pages` were admitted.
    pub fn with_max_pages(max_pages: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                visited: Mutex::new(HashSet::new()),
                in_flight: Mutex::new(HashSet::new()),
                drained: Notify::new(),
                next_task_id: AtomicU64::new(0),
                max_pages,
                stats: CrawlStats::default(),
            }),
        }
    }

    /// Claims `url` for this run.
    ///
    /// Returns true the first time a URL is seen and false on every later
    /// call. Check and insert happen under one lock, so two workers that find
    /// the same link at the same moment can't both win. Also returns false,
    /// without recording the URL, once the page budget is used up.
    pub fn admit(&self, url: &Url) -> bool {
        let mut visited = self.shared.visited.lock();
        if visited.contains(url) {
            return false;
        }
        if let Some(max_pages) = self.shared.max_pages {
            if visited.len() >= max_pages {
                debug!(url = %url, max_pages, "page budget spent, not admitting");
                return false;
            }
        }
        visited.insert(url.clone());
        true
    }

    /// Registers `task` as a crawl of `url` and starts it in the background.
    ///
    /// The task is in the registry before this returns, so a caller that
    /// spawns children before finishing keeps the run alive. Must be called
    /// from inside a tokio runtime.
    pub fn spawn<F>(&self, url: &Url, task: F) -> TaskId
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = TaskId(self.shared.next_task_id.fetch_add(1, Ordering::Relaxed));
        self.shared.in_flight.lock().insert(id);

        let guard = TaskGuard {
            shared: self.shared.clone(),
            id,
        };
        let url = url.clone();
        tokio::spawn(async move {
            // Dropped on every exit path, panics included
            let _guard = guard;
            if AssertUnwindSafe(task).catch_unwind().await.is_err() {
                warn!(%id, url = %url, "crawl task panicked");
            }
        });

        id
    }

    /// Waits until no spawned task is running, including tasks spawned while
    /// we were waiting.
    pub async fn await_completion(&self) {
        loop {
            let drained = self.shared.drained.notified();
            tokio::pin!(drained);
            // Arm before checking, so a drain between the check and the
            // await still wakes us
            drained.as_mut().enable();

            if self.shared.in_flight.lock().is_empty() {
                return;
            }
            drained.await;
        }
    }

    pub fn visited_count(&self) -> usize {
        self.shared.visited.lock().len()
    }

    pub fn visited_urls(&self) -> Vec<Url> {
        self.shared.visited.lock().iter().cloned().collect()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.shared.visited.lock().contains(url)
    }

    /// Number of spawned tasks that haven't finished yet.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.lock().len()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.shared.stats
    }
}

// Removes a task from the registry when its future is dropped
struct TaskGuard {
    shared: Arc<Shared>,
    id: TaskId,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        let mut in_flight = self.shared.in_flight.lock();
        in_flight.remove(&self.id);
        if in_flight.is_empty() {
            self.shared.drained.notify_waiters();
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not keep a Vec<JoinHandle> and join_all() it?
//    - join_all() only sees the handles that exist when it is called
//    - Workers started later would never be awaited
//    - The registry + Notify pair sees every task, whenever it was started
//
// 2. Why notify_waiters() and enable()?
//    - notify_waiters() only wakes futures that are already registered
//    - enable() registers our Notified future before we look at the registry
//    - Both sides touch the registry under the same lock, so there is no gap
//      where the last task can finish unseen
//
// 3. Why parking_lot::Mutex instead of tokio::sync::Mutex?
//    - The lock is never held across an .await
//    - A plain mutex is cheaper and can be used from Drop
// -----------------------------------------------------------------------------
