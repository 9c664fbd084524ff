// src/schema/types.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical columns the catalog drills through, outermost first.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Pole,
    Specialite,
    Groupe,
    Link,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Pole,
        Column::Specialite,
        Column::Groupe,
        Column::Link,
    ];

    /// Name shown to users in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Column::Pole => "Pôle",
            Column::Specialite => "Spécialité",
            Column::Groupe => "Groupe",
            Column::Link => "Lien",
        }
    }

    /// Spellings accepted when no override is configured.
    pub fn default_aliases(self) -> &'static [&'static str] {
        match self {
            Column::Pole => &["Pôle", "Pole"],
            Column::Specialite => &["Spécialité", "Specialite", "Filière", "Filiere"],
            Column::Groupe => &["Groupe", "Année", "Annee", "Niveau", "Classe"],
            Column::Link => &["Lien", "Emploi du temps", "Emploi", "URL", "Link"],
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
