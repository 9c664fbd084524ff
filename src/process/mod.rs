// src/process/mod.rs
//
// Raw response text → Table. The parser is infallible; deciding whether the
// body is data at all happens in `fetch` before we get here.

pub mod delimiter;
pub mod parse;
pub mod table;

pub use delimiter::detect_delimiter;
pub use parse::{parse, parse_auto, strip_bom};
pub use table::{Row, Table};
