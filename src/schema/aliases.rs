// src/schema/aliases.rs

use serde::{Deserialize, Serialize};

use super::types::Column;

/// Accepted header spellings per logical column.
///
/// Deserialises from the `columns:` section of the config; any column left out
/// keeps its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub pole: Vec<String>,
    pub specialite: Vec<String>,
    pub groupe: Vec<String>,
    pub link: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let owned = |c: Column| -> Vec<String> {
            c.default_aliases().iter().map(|s| s.to_string()).collect()
        };
        Self {
            pole: owned(Column::Pole),
            specialite: owned(Column::Specialite),
            groupe: owned(Column::Groupe),
            link: owned(Column::Link),
        }
    }
}

impl ColumnAliases {
    pub fn get(&self, column: Column) -> &[String] {
        match column {
            Column::Pole => &self.pole,
            Column::Specialite => &self.specialite,
            Column::Groupe => &self.groupe,
            Column::Link => &self.link,
        }
    }
}
