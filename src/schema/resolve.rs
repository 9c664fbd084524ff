// src/schema/resolve.rs

use tracing::trace;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold a header for comparison: decompose, drop combining marks, trim, lowercase.
///
/// `"Pôle"`, `" POLE "` and `"pole"` all fold to `"pole"`.
pub fn normalize_header(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.trim().to_lowercase()
}

/// Position of the first header matching a candidate, trying candidates in order.
///
/// Candidate order wins over header order: with headers `[Annee, Groupe]` and
/// candidates `[Groupe, Annee]` the result is 1.
pub fn resolve<H, C>(headers: &[H], candidates: &[C]) -> Option<usize>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let folded: Vec<String> = headers
        .iter()
        .map(|h| normalize_header(h.as_ref()))
        .collect();

    candidates.iter().find_map(|c| {
        let want = normalize_header(c.as_ref());
        let idx = folded.iter().position(|h| *h == want);
        trace!(candidate = c.as_ref(), ?idx, "header lookup");
        idx
    })
}
