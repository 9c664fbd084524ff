// src/catalog/mod.rs

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::{CatalogError, Result};
use crate::process::{Row, Table};
use crate::schema::{resolve, Column, ColumnAliases};

/// A distinct value of a column, with the data row it first appeared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    /// Index into [`Table::records`].
    pub row: usize,
}

/// The end of the drill-down: where a group's timetable lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub pole: String,
    pub specialite: String,
    pub groupe: String,
    /// `None` when the matching row has an empty link cell.
    pub link: Option<String>,
}

/// Distinct non-empty values of column `idx`, first occurrence wins, input order kept.
pub fn unique_by_first(rows: &[Row], idx: usize) -> Vec<Entry> {
    first_occurrences(rows.iter().enumerate(), idx)
}

fn first_occurrences<'a, I>(rows: I, idx: usize) -> Vec<Entry>
where
    I: IntoIterator<Item = (usize, &'a Row)>,
{
    let mut seen: IndexMap<&str, usize> = IndexMap::new();
    for (i, row) in rows {
        let Some(value) = row.get(idx).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
            continue;
        };
        seen.entry(value).or_insert(i);
    }
    seen.into_iter()
        .map(|(label, row)| Entry {
            label: label.to_string(),
            row,
        })
        .collect()
}

/// A parsed sheet with its logical columns resolved once.
///
/// Columns are looked up at construction; a column that is absent only becomes
/// an error when a level that needs it is asked for.
#[derive(Debug, Clone)]
pub struct Catalog {
    table: Table,
    aliases: ColumnAliases,
    resolved: BTreeMap<Column, usize>,
}

impl Catalog {
    #[instrument(level = "debug", skip_all, fields(rows = table.len()))]
    pub fn new(table: Table, aliases: &ColumnAliases) -> Result<Self> {
        let headers = table.headers().ok_or(CatalogError::NoData)?;
        let mut resolved = BTreeMap::new();
        for column in Column::ALL {
            match resolve(headers, aliases.get(column)) {
                Some(idx) => {
                    debug!(%column, idx, "resolved column");
                    resolved.insert(column, idx);
                }
                None => debug!(%column, "column not in header"),
            }
        }
        Ok(Self {
            table,
            aliases: aliases.clone(),
            resolved,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn column(&self, column: Column) -> Option<usize> {
        self.resolved.get(&column).copied()
    }

    pub fn require(&self, column: Column) -> Result<usize> {
        self.column(column)
            .ok_or_else(|| CatalogError::MissingColumn {
                column,
                candidates: self.aliases.get(column).to_vec(),
            })
    }

    /// Data rows (with their index) whose cells equal, after trimming, every
    /// `(column, value)` filter.
    fn matching(&self, filters: &[(Column, &str)]) -> Result<Vec<(usize, &Row)>> {
        let idxs = filters
            .iter()
            .map(|(c, v)| self.require(*c).map(|i| (i, v.trim())))
            .collect::<Result<Vec<_>>>()?;

        Ok(self
            .table
            .records()
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                idxs.iter()
                    .all(|(i, want)| row.get(*i).map(|v| v.trim()) == Some(*want))
            })
            .collect())
    }

    fn level(&self, target: Column, filters: &[(Column, &str)]) -> Result<Vec<Entry>> {
        let idx = self.require(target)?;
        Ok(first_occurrences(self.matching(filters)?, idx))
    }

    pub fn poles(&self) -> Result<Vec<Entry>> {
        self.level(Column::Pole, &[])
    }

    pub fn specialites(&self, pole: &str) -> Result<Vec<Entry>> {
        self.level(Column::Specialite, &[(Column::Pole, pole)])
    }

    pub fn groupes(&self, pole: &str, specialite: &str) -> Result<Vec<Entry>> {
        self.level(
            Column::Groupe,
            &[(Column::Pole, pole), (Column::Specialite, specialite)],
        )
    }

    /// First row matching all three levels, or `None` if there is none.
    pub fn schedule(&self, pole: &str, specialite: &str, groupe: &str) -> Result<Option<Schedule>> {
        let link_idx = self.require(Column::Link)?;
        let rows = self.matching(&[
            (Column::Pole, pole),
            (Column::Specialite, specialite),
            (Column::Groupe, groupe),
        ])?;
        Ok(rows.first().map(|(_, row)| Schedule {
            pole: pole.trim().to_string(),
            specialite: specialite.trim().to_string(),
            groupe: groupe.trim().to_string(),
            link: row
                .get(link_idx)
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::parse;

    const SHEET: &str = "\
Pôle,Spécialité,Année,Lien
Digital,Développement,DEV101,https://ex.test/dev101.pdf
Digital,Développement,DEV102,https://ex.test/dev102.pdf
Digital,Infrastructure,ID101,
Gestion,Comptabilité,GC101,https://ex.test/gc101.pdf
,Orphan,X1,https://ex.test/x1.pdf
Digital,Développement,DEV101,https://ex.test/duplicate.pdf
";

    fn catalog() -> Catalog {
        Catalog::new(parse(SHEET, ','), &ColumnAliases::default()).unwrap()
    }

    fn labels(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let rows = vec![
            vec!["Digital".to_string(), "a".to_string()],
            vec!["Digital".to_string(), "b".to_string()],
        ];
        assert_eq!(
            unique_by_first(&rows, 0),
            vec![Entry {
                label: "Digital".into(),
                row: 0
            }]
        );
    }

    #[test]
    fn dedup_skips_blank_and_short_rows() {
        let rows = vec![
            vec!["x".to_string()],
            vec!["  ".to_string(), "".to_string()],
            vec!["B".to_string(), "y".to_string()],
            vec!["A".to_string(), "z".to_string()],
        ];
        let out = unique_by_first(&rows, 1);
        assert_eq!(labels(&out), ["y", "z"]);
        assert_eq!(out[0].row, 2);
    }

    #[test]
    fn poles_in_sheet_order() {
        let c = catalog();
        assert_eq!(labels(&c.poles().unwrap()), ["Digital", "Gestion"]);
    }

    #[test]
    fn drill_down_levels() {
        let c = catalog();
        let specs = c.specialites("Digital").unwrap();
        assert_eq!(labels(&specs), ["Développement", "Infrastructure"]);
        assert_eq!(specs[1].row, 2);

        let groups = c.groupes("Digital", "Développement").unwrap();
        assert_eq!(labels(&groups), ["DEV101", "DEV102"]);
        assert!(c.specialites("Inconnu").unwrap().is_empty());
    }

    #[test]
    fn schedule_uses_first_matching_row() {
        let c = catalog();
        let s = c.schedule("Digital", "Développement", "DEV101").unwrap().unwrap();
        assert_eq!(s.link.as_deref(), Some("https://ex.test/dev101.pdf"));

        let no_link = c.schedule("Digital", "Infrastructure", "ID101").unwrap().unwrap();
        assert_eq!(no_link.link, None);
        assert_eq!(c.schedule("Digital", "Infrastructure", "ZZZ").unwrap(), None);
    }

    #[test]
    fn empty_table_is_no_data() {
        let err = Catalog::new(parse("\n\n", ','), &ColumnAliases::default()).unwrap_err();
        assert!(matches!(err, CatalogError::NoData));
    }

    #[test]
    fn header_only_sheet_has_no_poles() {
        let c = Catalog::new(parse("Pôle,Spécialité\n", ','), &ColumnAliases::default()).unwrap();
        assert!(c.poles().unwrap().is_empty());
    }

    #[test]
    fn missing_column_reported_when_needed() {
        let c = Catalog::new(parse("Pôle,Nom\nDigital,x", ','), &ColumnAliases::default()).unwrap();
        assert_eq!(c.column(Column::Pole), Some(0));
        assert!(c.poles().is_ok());
        match c.specialites("Digital") {
            Err(CatalogError::MissingColumn { column, candidates }) => {
                assert_eq!(column, Column::Specialite);
                assert_eq!(candidates[0], "Spécialité");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
