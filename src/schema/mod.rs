pub mod aliases;
pub mod resolve;
pub mod types;

pub use aliases::ColumnAliases;
pub use resolve::{normalize_header, resolve};
pub use types::Column;
