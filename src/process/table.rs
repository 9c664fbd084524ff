// src/process/table.rs

use indexmap::IndexSet;
use serde_json::{Map, Value};

pub type Row = Vec<String>;

/// Parsed sheet contents. Row 0 is the header; rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Zero-length rows are dropped; everything else is kept as-is.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    /// Build a table from JSON records, the shape sheet-to-JSON proxies return.
    ///
    /// The header is every key seen, in order of first appearance. Missing keys
    /// and `null` become empty cells; strings are trimmed; other scalars use
    /// their JSON text.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let keys: IndexSet<&str> = records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();
        if keys.is_empty() {
            return Self::default();
        }

        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(keys.iter().map(|k| k.trim().to_string()).collect());
        for rec in records {
            rows.push(keys.iter().map(|k| cell_text(rec.get(*k))).collect());
        }
        Self::new(rows)
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows, i.e. everything after the header.
    pub fn records(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: Value) -> Vec<Map<String, Value>> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn header_and_records_split() {
        let t = Table::new(vec![
            vec!["Pôle".into(), "Spécialité".into()],
            vec![],
            vec!["Digital".into(), "Dev".into()],
        ]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.headers().unwrap(), ["Pôle", "Spécialité"]);
        assert_eq!(t.records().len(), 1);
        assert!(Table::default().records().is_empty());
        assert!(Table::default().headers().is_none());
    }

    #[test]
    fn json_records_union_keys_in_order() {
        let t = Table::from_records(&records(json!([
            { "Pôle": " Digital ", "Spécialité": "Dev" },
            { "Pôle": "Gestion", "Groupe": 101, "Actif": true, "Note": null },
        ])));
        assert_eq!(
            t.headers().unwrap(),
            ["Pôle", "Spécialité", "Groupe", "Actif", "Note"]
        );
        assert_eq!(t.records()[0], ["Digital", "Dev", "", "", ""]);
        assert_eq!(t.records()[1], ["Gestion", "", "101", "true", ""]);
    }

    #[test]
    fn no_records_is_empty() {
        assert!(Table::from_records(&[]).is_empty());
        assert!(Table::from_records(&records(json!([{}]))).is_empty());
    }
}
