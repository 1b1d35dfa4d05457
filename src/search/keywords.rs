// src/search/keywords.rs
// Reads the newline-delimited keyword file for keyword mode.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

// One keyword per line; surrounding whitespace and blank lines are ignored
pub async fn read_keywords(path: &Path) -> Result<Vec<String>> {
    info!(path = %path.display(), "reading keywords");

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read keyword file {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
