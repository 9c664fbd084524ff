// src/error.rs

use thiserror::Error;

use crate::schema::Column;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Everything that can go wrong between the fetch and the rendered page.
///
/// None of these are fatal: the binaries print the message in place of the
/// page and exit non-zero.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Erreur réseau : {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Réponse HTTP {status} ({url})")]
    Http { status: u16, url: String },

    #[error(
        "La feuille renvoie une page HTML{} (vérifie que \"Anyone with the link\" est en Viewer).",
        title.as_deref().map(|t| format!(" ({t})")).unwrap_or_default()
    )]
    HtmlResponse { title: Option<String> },

    #[error("Réponse JSON invalide : {0}")]
    InvalidJson(String),

    #[error("Feuille vide ou CSV mal formé.")]
    NoData,

    #[error(
        "Colonne \"{column}\" introuvable (vérifie l'en-tête ; acceptés : {}).",
        candidates.join(", ")
    )]
    MissingColumn {
        column: Column,
        candidates: Vec<String>,
    },

    #[error("Paramètre de navigation \"{name}\" manquant.")]
    MissingParameter { name: &'static str },

    #[error("Page inconnue : \"{id}\".")]
    UnknownRoute { id: String },

    #[error("Lien de la feuille invalide : {0}")]
    Url(#[from] url::ParseError),
}

impl CatalogError {
    /// Failures the user fixes on the spreadsheet side rather than by retrying.
    pub fn is_sheet_misconfigured(&self) -> bool {
        matches!(
            self,
            CatalogError::HtmlResponse { .. } | CatalogError::MissingColumn { .. }
        )
    }
}
