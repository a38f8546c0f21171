use std::fmt;

/// Every failure the library can report.
///
/// Errors are raised where they are detected and abort the enclosing
/// operation; nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A row's width disagrees with the schema (or a header with the rows).
    SchemaMismatch { row: usize, expected: usize, got: usize },
    /// A token in a numeric (or boolean) field could not be encoded.
    NumericParseError { row: usize, col: usize, token: String },
    /// Operand sizes disagree.
    DimensionMismatch { context: String, expected: usize, got: usize },
    /// Zero usable rows.
    EmptyDataset { context: String },
    /// Blend weight outside the open interval (0, 1).
    InvalidWeight(f64),
    /// Two datasets cannot be concatenated.
    SchemaConflict(String),
    /// Training configuration rejected before any work started.
    InvalidConfig(String),
    /// Column selection refers to a column the table does not have.
    ColumnOutOfRange { col: usize, num_columns: usize },
    /// The stop flag was raised; the partially trained state was discarded.
    Cancelled { completed_epochs: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SchemaMismatch { row, expected, got } => {
                write!(f, "schema mismatch: row {row} has {got} values, schema has {expected} fields")
            }
            Error::NumericParseError { row, col, token } => {
                write!(f, "cannot encode '{token}' at row {row}, column {col} as a number")
            }
            Error::DimensionMismatch { context, expected, got } => {
                write!(f, "dimension mismatch in {context}: expected {expected}, got {got}")
            }
            Error::EmptyDataset { context } => write!(f, "empty dataset: {context}"),
            Error::InvalidWeight(w) => {
                write!(f, "invalid weight {w}: must lie strictly between 0 and 1")
            }
            Error::SchemaConflict(msg) => write!(f, "schema conflict: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::ColumnOutOfRange { col, num_columns } => {
                write!(f, "column {col} is out of range of number of columns ({num_columns})")
            }
            Error::Cancelled { completed_epochs } => {
                write!(f, "training cancelled after {completed_epochs} completed epochs")
            }
        }
    }
}

impl std::error::Error for Error {}
