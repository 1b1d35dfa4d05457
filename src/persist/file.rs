// src/persist/file.rs
// =============================================================================
// Writes each accepted page to `<dir>/page_<n>.txt`:
//
//   URL: https://example.com/page
//
//   <extracted text>
//
// `n` comes from an atomic counter owned by the sink. Two workers saving at
// the same moment always get different numbers, so one never overwrites the
// other's file.
// =============================================================================

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

use super::{ArtifactSink, SavedArtifact};
use crate::error::PersistError;

#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    next_ordinal: AtomicU64,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_ordinal: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn save(&self, url: &Url, text: &str) -> Result<SavedArtifact, PersistError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let ordinal = self.next_ordinal.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!("page_{}.txt", ordinal));
        tokio::fs::write(&path, render(url, text)).await?;

        Ok(SavedArtifact { ordinal, path })
    }
}

fn render(url: &Url, text: &str) -> String {
    format!("URL: {}\n\n{}\n", url, text)
}
