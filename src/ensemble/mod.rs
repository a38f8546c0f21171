//! Combining independently trained networks.
//!
//! Two strategies are offered:
//! - [`merge_parameters`] averages two trained parameter sets element-wise
//!   (post-training blending);
//! - [`pool`] concatenates the training data of two networks so a single
//!   network can be retrained on both (pre-training pooling).
//!
//! Output blending without touching parameters lives on
//! [`Predictor::combine_with`](crate::network::Predictor::combine_with).

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::{NeuralNetwork, Predictor, TrainedParameters};
use crate::train::TrainedNetwork;

/// Element-wise mean of two equally sized parameter sets.
pub fn merge_parameters(a: &TrainedParameters, b: &TrainedParameters) -> Result<TrainedParameters> {
    a.merge(b)
}

/// Merges the parameters of two trained networks and binds a predictor to
/// the result.
pub fn merged_predictor(a: &TrainedNetwork, b: &TrainedNetwork) -> Result<Predictor> {
    let merged = merge_parameters(a.parameters(), b.parameters())?;
    debug!(dimension = merged.dimension(), "merged trained parameters");
    Ok(Predictor::from_parameters(Arc::new(merged)))
}

/// A new untrained network holding `a`'s rows followed by `b`'s.
///
/// Both networks must have the same dimension, and their input and output
/// schemas must agree positionally.
pub fn pool(a: &NeuralNetwork, b: &NeuralNetwork) -> Result<NeuralNetwork> {
    if a.dimension() != b.dimension() {
        return Err(Error::DimensionMismatch {
            context: "pooled network dimension".into(),
            expected: a.dimension(),
            got: b.dimension(),
        });
    }
    let inputs = a.inputs().extend(b.inputs())?;
    let outputs = a.outputs().extend(b.outputs())?;
    NeuralNetwork::new(inputs, outputs)
}
