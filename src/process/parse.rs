// src/process/parse.rs

use std::mem::take;

use tracing::{debug, instrument};

use super::delimiter::detect_delimiter;
use super::table::{Row, Table};

const BOM: char = '\u{feff}';

/// Drop a single leading byte-order mark, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Split delimited text into a [`Table`] of trimmed cells.
///
/// - `"` toggles quoting; `""` inside quotes is a literal quote.
/// - `delimiter` ends a field outside quotes.
/// - CR/LF outside quotes ends the row, and any run of CR/LF that follows is
///   a single break, so CRLF and blank lines never produce empty rows.
///
/// Never fails: an unterminated quote just keeps the rest of the input in the
/// last cell.
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn parse(text: &str, delimiter: char) -> Table {
    let text = strip_bom(text);

    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == delimiter && !in_quotes => {
                row.push(take(&mut field));
            }
            '\r' | '\n' if !in_quotes => {
                if !field.is_empty() || !row.is_empty() {
                    row.push(take(&mut field));
                    rows.push(take(&mut row));
                }
                while matches!(chars.peek(), Some('\r' | '\n')) {
                    chars.next();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    for cell in rows.iter_mut().flatten() {
        let trimmed = cell.trim();
        if trimmed.len() != cell.len() {
            *cell = trimmed.to_string();
        }
    }

    debug!(rows = rows.len(), "parsed delimited text");
    Table::new(rows)
}

/// [`parse`] with the delimiter picked by [`detect_delimiter`].
pub fn parse_auto(text: &str) -> Table {
    parse(text, detect_delimiter(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(t: &Table) -> Vec<Vec<&str>> {
        t.rows()
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn quoted_delimiter_stays_in_field() {
        let t = parse("a,\"b,c\",d\n1,2,3", ',');
        assert_eq!(rows(&t), vec![vec!["a", "b,c", "d"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn doubled_quote_is_literal() {
        let t = parse(r#""Say ""Hello""",world"#, ',');
        assert_eq!(rows(&t), vec![vec![r#"Say "Hello""#, "world"]]);
    }

    #[test]
    fn newline_inside_quotes_does_not_split() {
        let t = parse("\"Line 1\nLine 2\",normal\r\nx,y", ',');
        assert_eq!(
            rows(&t),
            vec![vec!["Line 1\nLine 2", "normal"], vec!["x", "y"]]
        );
    }

    #[test]
    fn bom_is_stripped() {
        let with = parse("\u{feff}pole,spec\nX,Y", ',');
        let without = parse("pole,spec\nX,Y", ',');
        assert_eq!(with, without);
        assert_eq!(with.headers().unwrap()[0], "pole");
    }

    #[test]
    fn line_break_runs_collapse() {
        let t = parse("a,b\r\n\r\n\n1,2\r\n", ',');
        assert_eq!(rows(&t), vec![vec!["a", "b"], vec!["1", "2"]]);

        let lone_cr = parse("a,b\r1,2\r", ',');
        assert_eq!(rows(&lone_cr), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn empty_and_newline_only_inputs_have_no_rows() {
        assert!(parse("", ',').is_empty());
        assert!(parse("\n\r\n\n", ',').is_empty());
        assert!(parse("\u{feff}", ',').is_empty());
    }

    #[test]
    fn cells_are_trimmed_and_ragged_rows_kept() {
        let t = parse("  a , b \n1\n2,3,4", ',');
        assert_eq!(
            rows(&t),
            vec![vec!["a", "b"], vec!["1"], vec!["2", "3", "4"]]
        );
    }

    #[test]
    fn trailing_delimiter_yields_empty_cell() {
        let t = parse("a,b,\n", ',');
        assert_eq!(rows(&t), vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn unterminated_quote_keeps_rest_literally() {
        let t = parse("a,\"b,c\nd", ',');
        assert_eq!(rows(&t), vec![vec!["a", "b,c\nd"]]);
    }

    #[test]
    fn unquoted_text_matches_naive_split() {
        let text = "Pôle;Spécialité;Groupe\nDigital;Dev;DEV101\nGestion;Compta;GC201";
        let t = parse(text, ';');
        let naive: Vec<Vec<&str>> = text.lines().map(|l| l.split(';').collect()).collect();
        assert_eq!(rows(&t), naive);
    }

    #[test]
    fn auto_detects_semicolon_header() {
        let t = parse_auto("a;b;c\nx,1;y;z");
        assert_eq!(rows(&t), vec![vec!["a", "b", "c"], vec!["x,1", "y", "z"]]);
    }

    #[test]
    fn bom_then_blank_line_still_splits_on_semicolon() {
        let t = parse_auto("\u{feff}\nPôle;Spécialité;Groupe\nDigital;Dev;DEV101\n");
        assert_eq!(
            rows(&t),
            vec![
                vec!["Pôle", "Spécialité", "Groupe"],
                vec!["Digital", "Dev", "DEV101"]
            ]
        );
    }
}
