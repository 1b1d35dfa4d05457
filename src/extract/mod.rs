// src/extract/mod.rs
// =============================================================================
// This module pulls readable text and outbound links out of HTML pages.
//
// Submodules:
// - html: scraper-based text and link extraction
// =============================================================================

mod html;

pub use html::{
    extract_links, extract_text, normalize_url, parse_page, ParsedPage, MIN_CONTENT_CHARS,
};
