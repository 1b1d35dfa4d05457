// src/persist/mod.rs
// =============================================================================
// This module stores the pages the oracle accepted.
//
// Submodules:
// - file: one text file per page in an output directory
// =============================================================================

mod file;

use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

use crate::error::PersistError;

pub use file::FileSink;

/// A page that was written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Issued once per save, never reused within a sink
    pub ordinal: u64,
    pub path: PathBuf,
}

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn save(&self, url: &Url, text: &str) -> Result<SavedArtifact, PersistError>;
}
