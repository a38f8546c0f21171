use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::schema::field_type::{classify, FieldType};

/// One column: its label and inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Field {
        Field { label: label.into(), field_type }
    }
}

/// Ordered description of every column of a row set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Schema {
        Schema { fields }
    }

    /// Infers a schema from the first row only; later rows never refine it.
    ///
    /// Labels come from `header` when given, otherwise spreadsheet-style
    /// names are generated (`A1`, `B1`, ..., `Z1`, `A2`, ...).
    pub fn infer<S: AsRef<str>>(first_row: &[S], header: Option<&[String]>) -> Result<Schema> {
        if let Some(h) = header {
            if h.len() != first_row.len() {
                return Err(Error::SchemaMismatch { row: 0, expected: first_row.len(), got: h.len() });
            }
        }
        let fields = first_row.iter()
            .enumerate()
            .map(|(i, token)| {
                let label = match header {
                    Some(h) => h[i].clone(),
                    None => default_label(i),
                };
                Field::new(label, classify(token.as_ref()))
            })
            .collect();
        Ok(Schema { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, col: usize) -> Option<&Field> {
        self.fields.get(col)
    }

    /// Positional compatibility: same width and same type in every column.
    /// Labels are not compared.
    pub fn check_compatible(&self, other: &Schema) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::SchemaConflict(format!(
                "field count differs ({} vs {})",
                self.len(),
                other.len()
            )));
        }
        for (i, (a, b)) in self.fields.iter().zip(other.fields.iter()).enumerate() {
            if a.field_type != b.field_type {
                return Err(Error::SchemaConflict(format!(
                    "field {i} ('{}') is {:?} here but {:?} in the other dataset",
                    a.label, a.field_type, b.field_type
                )));
            }
        }
        Ok(())
    }
}

fn default_label(i: usize) -> String {
    let letter = (b'A' + (i % 26) as u8) as char;
    format!("{}{}", letter, i / 26 + 1)
}
