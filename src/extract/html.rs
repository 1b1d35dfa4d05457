// src/extract/html.rs
// =============================================================================
// This module turns raw HTML into the two things the crawler needs:
// - the readable text of the page (for the oracle and the saved file)
// - the absolute http(s) links on the page (for the next crawl wave)
//
// We use the `scraper` crate to parse the HTML into a DOM and the `url`
// crate to resolve relative links against the page's own URL.
//
// scraper's Html type is not Send, so everything here is synchronous and
// returns owned data. The worker calls it between two .await points and
// never holds a parsed document across one.
// =============================================================================

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Pages whose extracted text is this long or shorter count as "no content".
pub const MIN_CONTENT_CHARS: usize = 100;

// Structural tags whose text is chrome, not content
const SKIPPED_TAGS: [&str; 6] = ["script", "style", "nav", "footer", "header", "aside"];

/// Everything the crawler needs from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Readable text, or None when the page is below the content floor
    pub text: Option<String>,
    /// Absolute, de-fragmented http(s) links in document order (may repeat)
    pub links: Vec<Url>,
}

// Parses the HTML once and pulls out both text and links
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    ParsedPage {
        text: text_of(&document),
        links: links_of(&document, page_url),
    }
}

// Extracts the readable text of a page
//
// Returns: None if the cleaned text is MIN_CONTENT_CHARS characters or shorter
//
// Example:
//   "<body><nav>Menu</nav><p>  Hello  </p><p></p><p>World</p></body>"
//   -> "Hello\nWorld" (before the length check)
pub fn extract_text(html: &str) -> Option<String> {
    text_of(&Html::parse_document(html))
}

// Extracts every crawlable link from a page
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   page_url = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    links_of(&Html::parse_document(html), page_url)
}

fn text_of(document: &Html) -> Option<String> {
    let mut chunks = Vec::new();
    collect_text(document.root_element(), &mut chunks);

    let text = chunks
        .join("\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    // Count characters, not bytes, so non-ASCII pages aren't favoured
    if text.chars().count() > MIN_CONTENT_CHARS {
        Some(text)
    } else {
        None
    }
}

// Walks the DOM depth-first, collecting text nodes outside skipped subtrees
fn collect_text(element: ElementRef, chunks: &mut Vec<String>) {
    if SKIPPED_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => chunks.push(text.to_string()),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, chunks);
                }
            }
            _ => {}
        }
    }
}

fn links_of(document: &Html, page_url: &Url) -> Vec<Url> {
    // "a[href]" is a constant selector, parsing it can't fail
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(page_url, href))
        .collect()
}

// Resolves a link (possibly relative) to an absolute crawlable URL
//
// Returns None for:
// - empty hrefs and fragment-only hrefs ("#section"), which point back
//   at the page we are already on
// - anything that doesn't end up as http:// or https:// (mailto:, ftp:,
//   javascript:, tel:, data: ...)
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    Some(normalize_url(url))
}

/// Canonical form of a URL for the visited set.
///
/// Drops the fragment, so "/a#top" and "/a" are one page. Every URL passes
/// through here before it is admitted.
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
