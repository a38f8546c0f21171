//! Row ingestion: splitting delimited text and choosing input/output columns.

pub mod builder;
pub mod columns;
pub mod csv;

pub use builder::TableBuilder;
pub use columns::ColumnPicker;
pub use csv::{looks_like_header, split_rows};
