// src/process/delimiter.rs

use tracing::trace;

use super::parse::strip_bom;

/// Pick `;` or `,` from the first non-blank line, ignoring a leading BOM.
///
/// Semicolon wins only when it strictly outnumbers commas there. Quoted header
/// cells are not special-cased, so a header like `"a,b";c` can mislead it; set
/// the delimiter explicitly in the config when that happens.
pub fn detect_delimiter(text: &str) -> char {
    let first = strip_bom(text)
        .lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let commas = first.matches(',').count();
    let semicolons = first.matches(';').count();
    trace!(commas, semicolons, "delimiter counts");
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}
