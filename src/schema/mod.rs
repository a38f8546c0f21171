pub mod field_type;
pub mod schema;

pub use field_type::{classify, FieldType};
pub use schema::{Field, Schema};
