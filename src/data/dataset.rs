use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::schema::field_type::{parse_bool, parse_number, FieldType};
use crate::schema::Schema;

/// A raw value recovered from a numeric network output.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<'a> {
    Number(f64),
    Label(&'a str),
    Flag(bool),
}

impl fmt::Display for Decoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Number(v) => write!(f, "{v}"),
            Decoded::Label(s) => write!(f, "{s}"),
            Decoded::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Schema plus rectangular raw rows, with a first-seen vocabulary per
/// categorical field.
///
/// A `Dataset` is read-only once built; `extend` returns a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    rows: Vec<Vec<String>>,
    /// Indexed by column; `None` for non-categorical fields.
    vocabularies: Vec<Option<Vocabulary>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Vocabulary {
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn insert(&mut self, value: &str) {
        if !self.index.contains_key(value) {
            self.index.insert(value.to_string(), self.values.len());
            self.values.push(value.to_string());
        }
    }
}

impl Dataset {
    /// Builds a dataset, rejecting any row whose width differs from the schema.
    pub fn build(rows: Vec<Vec<String>>, schema: Schema) -> Result<Dataset> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(Error::SchemaMismatch { row: i, expected: schema.len(), got: row.len() });
            }
        }

        let vocabularies = schema.fields().iter()
            .enumerate()
            .map(|(col, field)| {
                if !field.field_type.is_categorical() {
                    return None;
                }
                let mut vocab = Vocabulary::default();
                for row in &rows {
                    vocab.insert(&row[col]);
                }
                Some(vocab)
            })
            .collect();

        Ok(Dataset { schema, rows, vocabularies })
    }

    /// Infers the schema from the first row and builds the dataset.
    pub fn from_rows(rows: Vec<Vec<String>>, header: Option<&[String]>) -> Result<Dataset> {
        let first = rows.first().ok_or_else(|| Error::EmptyDataset {
            context: "no rows provided".into(),
        })?;
        let schema = Schema::infer(first, header)?;
        Dataset::build(rows, schema)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.schema.len()
    }

    /// Distinct values of a categorical column in first-seen order.
    pub fn vocabulary(&self, col: usize) -> Option<&[String]> {
        self.vocabularies.get(col)?.as_ref().map(|v| v.values.as_slice())
    }

    /// Numeric feature for one cell.
    pub fn encode(&self, row: usize, col: usize) -> Result<f64> {
        let field = self.schema.field(col).ok_or_else(|| Error::DimensionMismatch {
            context: "encode column".into(),
            expected: self.width(),
            got: col + 1,
        })?;
        let token = self.rows.get(row)
            .ok_or_else(|| Error::DimensionMismatch {
                context: "encode row".into(),
                expected: self.len(),
                got: row + 1,
            })?
            .get(col)
            .map(String::as_str)
            .unwrap_or_default();

        let parse_error = || Error::NumericParseError { row, col, token: token.to_string() };

        match field.field_type {
            FieldType::Numerical => parse_number(token).ok_or_else(parse_error),
            FieldType::Boolean => parse_bool(token)
                .map(|b| if b { 1.0 } else { 0.0 })
                .ok_or_else(parse_error),
            FieldType::Categorical => self.vocabularies[col]
                .as_ref()
                .and_then(|v| v.index.get(token))
                .map(|&i| i as f64)
                .ok_or_else(parse_error),
        }
    }

    /// Encodes every column of one row.
    pub fn encode_row(&self, row: usize) -> Result<Vec<f64>> {
        (0..self.width()).map(|col| self.encode(row, col)).collect()
    }

    /// Encodes one column across every row.
    pub fn encode_column(&self, col: usize) -> Result<Vec<f64>> {
        (0..self.len()).map(|row| self.encode(row, col)).collect()
    }

    /// Approximate inverse of `encode`.
    ///
    /// Categorical outputs are re-quantized into `k` buckets:
    /// `vocabulary[clamp(floor(value * k), 0, k - 1)]`. A value of exactly 1.0
    /// therefore maps to the last entry, and NaN to the first.
    pub fn decode(&self, col: usize, value: f64) -> Result<Decoded<'_>> {
        let field = self.schema.field(col).ok_or_else(|| Error::DimensionMismatch {
            context: "decode column".into(),
            expected: self.width(),
            got: col + 1,
        })?;
        match field.field_type {
            FieldType::Numerical => Ok(Decoded::Number(value)),
            FieldType::Boolean => Ok(Decoded::Flag(value >= 0.5)),
            FieldType::Categorical => {
                let values = self.vocabulary(col).unwrap_or_default();
                if values.is_empty() {
                    return Err(Error::EmptyDataset {
                        context: format!("column {col} has no categorical values to decode into"),
                    });
                }
                let last = values.len() - 1;
                let bucket = (value * values.len() as f64).floor();
                // `as usize` saturates negatives to 0 and maps NaN to 0.
                let idx = (bucket as usize).min(last);
                Ok(Decoded::Label(&values[idx]))
            }
        }
    }

    /// Returns a new dataset holding `self`'s rows followed by `other`'s.
    ///
    /// Any positional difference in field count or type is rejected. The
    /// vocabularies are rebuilt over the concatenation, so every index that
    /// was valid in `self` keeps its meaning.
    pub fn extend(&self, other: &Dataset) -> Result<Dataset> {
        self.schema.check_compatible(&other.schema)?;
        let rows = self.rows.iter().chain(other.rows.iter()).cloned().collect();
        Dataset::build(rows, self.schema.clone())
    }

    /// Keeps only the given columns, in the given order.
    pub fn select(&self, cols: &[usize]) -> Result<Dataset> {
        if let Some(&bad) = cols.iter().find(|&&c| c >= self.width()) {
            return Err(Error::ColumnOutOfRange { col: bad, num_columns: self.width() });
        }
        let fields = cols.iter().map(|&c| self.schema.fields()[c].clone()).collect();
        let rows = self.rows.iter()
            .map(|r| cols.iter().map(|&c| r[c].clone()).collect())
            .collect();
        Dataset::build(rows, Schema::new(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    fn xyz() -> Dataset {
        Dataset::from_rows(rows(&[&["X", "1.5"], &["Y", "2"], &["X", "-3"], &["Z", "0"]]), None).unwrap()
    }

    #[test]
    fn build_rejects_ragged_rows() {
        let schema = Schema::new(vec![Field::new("a", FieldType::Numerical), Field::new("b", FieldType::Numerical)]);
        let err = Dataset::build(rows(&[&["1", "2"], &["3"]]), schema).unwrap_err();
        assert_eq!(err, Error::SchemaMismatch { row: 1, expected: 2, got: 1 });
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        assert!(matches!(Dataset::from_rows(vec![], None), Err(Error::EmptyDataset { .. })));
    }

    #[test]
    fn vocabulary_keeps_first_seen_order() {
        assert_eq!(xyz().vocabulary(0).unwrap(), &["X", "Y", "Z"]);
        assert_eq!(xyz().vocabulary(1), None);
    }

    #[test]
    fn encodes_numbers_exactly_and_categories_by_index() {
        let ds = xyz();
        assert_eq!(ds.encode(0, 1).unwrap(), 1.5);
        assert_eq!(ds.encode(2, 1).unwrap(), -3.0);
        assert_eq!(ds.encode_column(0).unwrap(), vec![0.0, 1.0, 0.0, 2.0]);
        assert_eq!(ds.encode_row(1).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn non_numeric_token_in_numeric_column_is_surfaced() {
        let ds = Dataset::from_rows(rows(&[&["1"], &["oops"], &["NaN"]]), None).unwrap();
        assert_eq!(
            ds.encode(1, 0).unwrap_err(),
            Error::NumericParseError { row: 1, col: 0, token: "oops".into() }
        );
        assert!(matches!(ds.encode(2, 0), Err(Error::NumericParseError { row: 2, .. })));
    }

    #[test]
    fn booleans_encode_as_zero_one() {
        let ds = Dataset::from_rows(rows(&[&["true"], &["FALSE"], &["maybe"]]), None).unwrap();
        assert_eq!(ds.encode(0, 0).unwrap(), 1.0);
        assert_eq!(ds.encode(1, 0).unwrap(), 0.0);
        assert!(ds.encode(2, 0).is_err());
        assert_eq!(ds.decode(0, 0.7).unwrap(), Decoded::Flag(true));
        assert_eq!(ds.decode(0, 0.2).unwrap(), Decoded::Flag(false));
    }

    #[test]
    fn decode_buckets_and_clamps() {
        let ds = xyz();
        assert_eq!(ds.decode(0, 0.0).unwrap(), Decoded::Label("X"));
        assert_eq!(ds.decode(0, 0.5).unwrap(), Decoded::Label("Y"));
        assert_eq!(ds.decode(0, 0.99).unwrap(), Decoded::Label("Z"));
        assert_eq!(ds.decode(0, 1.0).unwrap(), Decoded::Label("Z"));
        assert_eq!(ds.decode(0, 7.0).unwrap(), Decoded::Label("Z"));
        assert_eq!(ds.decode(0, -0.4).unwrap(), Decoded::Label("X"));
        assert_eq!(ds.decode(0, f64::NAN).unwrap(), Decoded::Label("X"));
    }

    #[test]
    fn decode_numeric_is_identity() {
        assert_eq!(xyz().decode(1, 0.1234).unwrap(), Decoded::Number(0.1234));
    }

    #[test]
    fn extend_concatenates_and_preserves_indices() {
        let a = xyz();
        let b = Dataset::from_rows(rows(&[&["W", "9"], &["Y", "1"]]), None).unwrap();
        let merged = a.extend(&b).unwrap();
        assert_eq!(merged.len(), 6);
        assert_eq!(merged.vocabulary(0).unwrap(), &["X", "Y", "Z", "W"]);
        assert_eq!(merged.encode(5, 0).unwrap(), 1.0);
        // originals untouched
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn extend_rejects_conflicting_schema() {
        let a = xyz();
        let b = Dataset::from_rows(rows(&[&["1", "X"]]), None).unwrap();
        assert!(matches!(a.extend(&b), Err(Error::SchemaConflict(_))));
        let narrow = Dataset::from_rows(rows(&[&["X"]]), None).unwrap();
        assert!(matches!(a.extend(&narrow), Err(Error::SchemaConflict(_))));
    }

    #[test]
    fn select_picks_columns() {
        let ds = xyz().select(&[1]).unwrap();
        assert_eq!(ds.width(), 1);
        assert_eq!(ds.schema().fields()[0].label, "B1");
        assert!(matches!(xyz().select(&[2]), Err(Error::ColumnOutOfRange { col: 2, num_columns: 2 })));
    }
}
