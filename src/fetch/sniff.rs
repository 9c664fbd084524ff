// src/fetch/sniff.rs
//
// A sheet that isn't shared publicly answers with a login page and a 200.
// Catch that before it reaches the parser. Substring matching only: this is a
// diagnostic, not a content-type check.

use scraper::{Html, Selector};
use tracing::warn;

use crate::error::{CatalogError, Result};

const HTML_MARKERS: &[&str] = &["<html", "doctype html", "login"];

/// True when the first `window` characters look like an HTML page.
pub fn looks_like_html(text: &str, window: usize) -> bool {
    let preview: String = text.chars().take(window).collect::<String>().to_lowercase();
    HTML_MARKERS.iter().any(|m| preview.contains(m))
}

/// Text of the page's `<title>`, when there is a non-empty one.
pub fn html_title(text: &str) -> Option<String> {
    let doc = Html::parse_document(text);
    let sel = Selector::parse("title").expect("title selector should parse");
    doc.select(&sel)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `Err(HtmlResponse)` when the body looks like HTML.
pub fn ensure_not_html(text: &str, window: usize) -> Result<()> {
    if !looks_like_html(text, window) {
        return Ok(());
    }
    let title = html_title(text);
    warn!(title = ?title, "response body is HTML, not sheet data");
    Err(CatalogError::HtmlResponse { title })
}
