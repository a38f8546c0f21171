use std::sync::Arc;

use crate::error::{Error, Result};
use crate::network::params::TrainedParameters;

/// Immutable callable mapping an encoded input vector to a scalar.
///
/// Cloning is cheap and a `Predictor` is `Send + Sync`, so it can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct Predictor {
    inner: Arc<Inner>,
    dimension: usize,
}

#[derive(Debug)]
enum Inner {
    Network(Arc<TrainedParameters>),
    Blend { base: Predictor, other: Predictor, weight: f64 },
}

impl Predictor {
    pub fn from_parameters(params: Arc<TrainedParameters>) -> Predictor {
        let dimension = params.dimension();
        Predictor { inner: Arc::new(Inner::Network(params)), dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                context: "predictor input".into(),
                expected: self.dimension,
                got: input.len(),
            });
        }
        Ok(self.eval(input))
    }

    fn eval(&self, input: &[f64]) -> f64 {
        match self.inner.as_ref() {
            Inner::Network(params) => params.forward(input).output,
            Inner::Blend { base, other, weight } => {
                let a = base.eval(input);
                let b = other.eval(input);
                a * (1.0 - weight) + b * weight
            }
        }
    }

    /// Blends this predictor with `other`: `self·(1 − weight) + other·weight`.
    ///
    /// Only the open interval (0, 1) is accepted; 0 and 1 are rejected.
    /// The weight is not symmetric: `a.combine_with(b, w)` equals
    /// `b.combine_with(a, 1 − w)`, not `b.combine_with(a, w)`.
    pub fn combine_with(&self, other: &Predictor, weight: f64) -> Result<Predictor> {
        if !(weight > 0.0 && weight < 1.0) {
            return Err(Error::InvalidWeight(weight));
        }
        if other.dimension != self.dimension {
            return Err(Error::DimensionMismatch {
                context: "predictor combination".into(),
                expected: self.dimension,
                got: other.dimension,
            });
        }
        Ok(Predictor {
            inner: Arc::new(Inner::Blend { base: self.clone(), other: other.clone(), weight }),
            dimension: self.dimension,
        })
    }
}

impl From<TrainedParameters> for Predictor {
    fn from(params: TrainedParameters) -> Self {
        Predictor::from_parameters(Arc::new(params))
    }
}
