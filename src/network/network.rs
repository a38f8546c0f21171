use crate::data::Dataset;
use crate::error::{Error, Result};

/// An untrained network: encoded input columns paired row-for-row with the
/// output columns.
///
/// The hidden layer has exactly one unit per input column, so the input
/// width is the network's dimension. Only the first output column is used
/// as the training target.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    inputs: Dataset,
    outputs: Dataset,
}

impl NeuralNetwork {
    pub fn new(inputs: Dataset, outputs: Dataset) -> Result<NeuralNetwork> {
        if inputs.len() != outputs.len() {
            return Err(Error::DimensionMismatch {
                context: "input/output row count".into(),
                expected: inputs.len(),
                got: outputs.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyDataset { context: "network has no training rows".into() });
        }
        if inputs.width() == 0 {
            return Err(Error::DimensionMismatch {
                context: "input columns".into(),
                expected: 1,
                got: 0,
            });
        }
        if outputs.width() == 0 {
            return Err(Error::DimensionMismatch {
                context: "output columns".into(),
                expected: 1,
                got: 0,
            });
        }
        Ok(NeuralNetwork { inputs, outputs })
    }

    pub fn dimension(&self) -> usize {
        self.inputs.width()
    }

    pub fn inputs(&self) -> &Dataset {
        &self.inputs
    }

    pub fn outputs(&self) -> &Dataset {
        &self.outputs
    }

    /// Encodes every training row and the first output column.
    pub(crate) fn encode(&self) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
        let inputs = (0..self.inputs.len())
            .map(|row| self.inputs.encode_row(row))
            .collect::<Result<Vec<_>>>()?;
        let targets = self.outputs.encode_column(0)?;
        Ok((inputs, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(data: &[&[&str]]) -> Dataset {
        let rows = data.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect();
        Dataset::from_rows(rows, None).unwrap()
    }

    #[test]
    fn row_counts_must_agree() {
        let err = NeuralNetwork::new(ds(&[&["1", "2"], &["3", "4"]]), ds(&[&["0"]])).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn dimension_is_input_width() {
        let nn = NeuralNetwork::new(ds(&[&["1", "a", "2"]]), ds(&[&["yes"]])).unwrap();
        assert_eq!(nn.dimension(), 3);
        let (x, y) = nn.encode().unwrap();
        assert_eq!(x, vec![vec![1.0, 0.0, 2.0]]);
        assert_eq!(y, vec![0.0]);
    }

    #[test]
    fn only_first_output_column_is_a_target() {
        let nn = NeuralNetwork::new(ds(&[&["1"], &["2"]]), ds(&[&["0.25", "x"], &["0.75", "y"]])).unwrap();
        assert_eq!(nn.encode().unwrap().1, vec![0.25, 0.75]);
    }
}
