use tracing::debug;

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::ingest::columns::ColumnPicker;
use crate::ingest::csv::{looks_like_header, split_rows};
use crate::network::NeuralNetwork;

/// Turns a delimited table into an untrained [`NeuralNetwork`].
///
/// ```no_run
/// # fn main() -> blendnet::Result<()> {
/// let mut builder = blendnet::TableBuilder::from_csv("1,1,1,0\n3,3,3,1\n")?;
/// builder.header(false);
/// builder.inputs.range(0, 3)?;
/// builder.outputs.pick(&[3])?;
/// let network = builder.build()?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    rows: Vec<Vec<String>>,
    has_header: bool,
    pub inputs: ColumnPicker,
    pub outputs: ColumnPicker,
}

impl TableBuilder {
    /// Splits `text` into rows. The first row is treated as a header unless
    /// `header(false)` is called.
    pub fn from_csv(text: &str) -> Result<TableBuilder> {
        TableBuilder::from_rows(split_rows(text))
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<TableBuilder> {
        let num_columns = match rows.first() {
            Some(first) => first.len(),
            None => return Err(Error::EmptyDataset { context: "no input rows".into() }),
        };
        Ok(TableBuilder {
            rows,
            has_header: true,
            inputs: ColumnPicker::new(num_columns),
            outputs: ColumnPicker::new(num_columns),
        })
    }

    pub fn header(&mut self, enabled: bool) -> &mut Self {
        self.has_header = enabled;
        self
    }

    /// Treats the first row as a header iff any of its cells is non-numeric.
    pub fn detect_header(&mut self) -> &mut Self {
        self.has_header = self.rows.first().is_some_and(|r| looks_like_header(r));
        self
    }

    pub fn num_columns(&self) -> usize {
        self.inputs.num_columns()
    }

    pub fn build(&self) -> Result<NeuralNetwork> {
        let input_cols = self.inputs.values();
        let output_cols = self.outputs.values();
        let num_columns = self.num_columns();

        let (header, body) = if self.has_header {
            (self.rows.first(), &self.rows[1..])
        } else {
            (None, &self.rows[..])
        };

        let offset = usize::from(self.has_header);
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != num_columns {
                return Err(Error::SchemaMismatch { row: i, expected: num_columns, got: row.len() });
            }
        }
        if body.is_empty() {
            return Err(Error::EmptyDataset { context: "table has no data rows".into() });
        }
        debug!(
            rows = body.len(),
            first_data_row = offset,
            inputs = ?input_cols,
            outputs = ?output_cols,
            "building network from table"
        );

        let pick = |row: &[String], cols: &[usize]| -> Vec<String> {
            cols.iter().map(|&c| row[c].clone()).collect()
        };
        let input_rows = body.iter().map(|r| pick(r, &input_cols)).collect();
        let output_rows = body.iter().map(|r| pick(r, &output_cols)).collect();
        let input_header = header.map(|h| pick(h, &input_cols));
        let output_header = header.map(|h| pick(h, &output_cols));

        NeuralNetwork::new(
            Dataset::from_rows(input_rows, input_header.as_deref())?,
            Dataset::from_rows(output_rows, output_header.as_deref())?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    const TABLE: &str = "a,b,c,label\n1,1,1,no\n3,3,3,yes\n";

    #[test]
    fn builds_with_header_labels() {
        let mut b = TableBuilder::from_csv(TABLE).unwrap();
        b.inputs.range(0, 3).unwrap();
        b.outputs.pick(&[3]).unwrap();
        let nn = b.build().unwrap();
        assert_eq!(nn.dimension(), 3);
        assert_eq!(nn.inputs().len(), 2);
        assert_eq!(nn.inputs().schema().fields()[2].label, "c");
        let target = &nn.outputs().schema().fields()[0];
        assert_eq!(target.label, "label");
        assert_eq!(target.field_type, FieldType::Categorical);
        assert_eq!(nn.outputs().vocabulary(0).unwrap(), &["no", "yes"]);
    }

    #[test]
    fn headerless_tables_keep_every_row() {
        let mut b = TableBuilder::from_csv("1,1,1,0\n3,3,3,1\n").unwrap();
        b.header(false);
        b.inputs.range(0, 3).unwrap();
        b.outputs.pick(&[3]).unwrap();
        let nn = b.build().unwrap();
        assert_eq!(nn.inputs().len(), 2);
        assert_eq!(nn.inputs().schema().fields()[0].label, "A1");
    }

    #[test]
    fn header_detection() {
        let mut b = TableBuilder::from_csv(TABLE).unwrap();
        b.header(false).detect_header();
        b.inputs.pick(&[0]).unwrap();
        b.outputs.pick(&[3]).unwrap();
        assert_eq!(b.build().unwrap().inputs().len(), 2);
    }

    #[test]
    fn ragged_and_empty_tables_fail() {
        let mut ragged = TableBuilder::from_csv("1,2\n3\n").unwrap();
        ragged.header(false);
        ragged.inputs.pick(&[0]).unwrap();
        ragged.outputs.pick(&[1]).unwrap();
        assert!(matches!(ragged.build(), Err(Error::SchemaMismatch { row: 1, .. })));

        assert!(matches!(TableBuilder::from_csv("\n\n"), Err(Error::EmptyDataset { .. })));
        let mut header_only = TableBuilder::from_csv("a,b\n").unwrap();
        header_only.inputs.pick(&[0]).unwrap();
        header_only.outputs.pick(&[1]).unwrap();
        assert!(matches!(header_only.build(), Err(Error::EmptyDataset { .. })));
    }
}
