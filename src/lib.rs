pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod nav;
pub mod process;
pub mod router;
pub mod schema;

pub use error::{CatalogError, Result};

/// Printed under sheet-side errors (login page, missing column).
pub const SHARING_HINT: &str = "Vérifie : 1) le partage est \"Anyone with the link → Viewer\", \
2) le lien CSV est correct (gviz/tq?tqx=out:csv), 3) le lien CSV s'ouvre dans un navigateur.";
