use rand::Rng;

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::error::{Error, Result};
use crate::loss::QuadraticLoss;
use crate::math::matrix::Matrix;

/// Half-width of the uniform interval weights and hidden biases start from.
pub const INIT_HALF_WIDTH: f64 = 0.5;

/// Learned state of one single-hidden-layer network of dimension `d`.
///
/// - `input_weights[j][i]`: input `j` to hidden unit `i` (d×d)
/// - `hidden_weights[i]`:   hidden unit `i` to the output
/// - `hidden_bias[i]`:      bias of hidden unit `i`
/// - `output_bias`:         bias of the output unit
///
/// Only the training loop mutates parameters; everything handed out
/// afterwards is frozen behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedParameters {
    input_weights: Matrix,
    hidden_weights: Vec<f64>,
    hidden_bias: Vec<f64>,
    output_bias: f64,
}

/// Activations of one forward pass, kept for backprop.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    pub hidden: Vec<f64>,
    pub output: f64,
}

/// Loss gradients for one sample, all taken from the same forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub input_weights: Matrix,
    pub hidden_weights: Vec<f64>,
    pub hidden_bias: Vec<f64>,
    pub output_bias: f64,
}

impl TrainedParameters {
    /// Fresh parameters: weights and hidden biases uniform in (−0.5, 0.5),
    /// output bias zero.
    pub fn random<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> TrainedParameters {
        let hidden_bias = (0..dimension)
            .map(|_| rng.gen::<f64>() * 2.0 * INIT_HALF_WIDTH - INIT_HALF_WIDTH)
            .collect();
        let hidden_weights = (0..dimension)
            .map(|_| rng.gen::<f64>() * 2.0 * INIT_HALF_WIDTH - INIT_HALF_WIDTH)
            .collect();
        let input_weights = Matrix::uniform(dimension, dimension, INIT_HALF_WIDTH, rng);
        TrainedParameters { input_weights, hidden_weights, hidden_bias, output_bias: 0.0 }
    }

    /// Assembles parameters from explicit parts, checking every shape against
    /// the length of `hidden_weights`.
    pub fn from_parts(
        input_weights: Matrix,
        hidden_weights: Vec<f64>,
        hidden_bias: Vec<f64>,
        output_bias: f64,
    ) -> Result<TrainedParameters> {
        let d = hidden_weights.len();
        let shape_error = |context: &str, got: usize| Error::DimensionMismatch {
            context: context.into(),
            expected: d,
            got,
        };
        if hidden_bias.len() != d {
            return Err(shape_error("hidden bias length", hidden_bias.len()));
        }
        if input_weights.rows != d || input_weights.data.len() != d {
            return Err(shape_error("input weight rows", input_weights.data.len()));
        }
        if let Some(row) = input_weights.data.iter().find(|r| r.len() != d) {
            return Err(shape_error("input weight columns", row.len()));
        }
        Ok(TrainedParameters { input_weights, hidden_weights, hidden_bias, output_bias })
    }

    pub fn dimension(&self) -> usize {
        self.hidden_weights.len()
    }

    pub fn input_weights(&self) -> &Matrix {
        &self.input_weights
    }

    pub fn hidden_weights(&self) -> &[f64] {
        &self.hidden_weights
    }

    pub fn hidden_bias(&self) -> &[f64] {
        &self.hidden_bias
    }

    pub fn output_bias(&self) -> f64 {
        self.output_bias
    }

    /// Forward pass keeping the hidden activations for backprop.
    ///
    /// # Panics
    /// Panics if `input` is shorter than `dimension()`; use `predict` for a
    /// checked call.
    pub fn forward(&self, input: &[f64]) -> Activations {
        let d = self.dimension();
        let hidden: Vec<f64> = (0..d)
            .map(|i| {
                let sum: f64 = (0..d).map(|j| input[j] * self.input_weights.data[j][i]).sum();
                sigmoid(sum + self.hidden_bias[i])
            })
            .collect();
        let out: f64 = hidden.iter().zip(&self.hidden_weights).map(|(h, v)| h * v).sum();
        Activations { hidden, output: sigmoid(out + self.output_bias) }
    }

    /// Network output for one encoded input vector; always in (0, 1) for
    /// finite inputs of moderate magnitude.
    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        self.check_input(input)?;
        Ok(self.forward(input).output)
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.dimension() {
            return Err(Error::DimensionMismatch {
                context: "predictor input".into(),
                expected: self.dimension(),
                got: input.len(),
            });
        }
        Ok(())
    }

    /// Backpropagates the quadratic error of one sample.
    ///
    /// The hidden deltas use the current (pre-update) hidden weights, so all
    /// gradients come from the same snapshot.
    pub fn compute_gradients(&self, input: &[f64], act: &Activations, target: f64) -> Gradients {
        let d = self.dimension();
        let out_delta = QuadraticLoss::derivative(act.output, target) * sigmoid_derivative(act.output);

        let hidden_weights = act.hidden.iter().map(|h| out_delta * h).collect();
        let hidden_delta: Vec<f64> = (0..d)
            .map(|i| sigmoid_derivative(act.hidden[i]) * self.hidden_weights[i] * out_delta)
            .collect();

        let mut input_weights = Matrix::zeros(d, d);
        for j in 0..d {
            for i in 0..d {
                input_weights.data[j][i] = hidden_delta[i] * input[j];
            }
        }

        Gradients {
            input_weights,
            hidden_weights,
            hidden_bias: hidden_delta,
            output_bias: out_delta,
        }
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &Gradients, lr: f64) {
        let d = self.dimension();
        for i in 0..d {
            self.hidden_weights[i] -= lr * grads.hidden_weights[i];
            self.hidden_bias[i] -= lr * grads.hidden_bias[i];
            for j in 0..d {
                self.input_weights.data[j][i] -= lr * grads.input_weights.data[j][i];
            }
        }
        self.output_bias -= lr * grads.output_bias;
    }

    /// Element-wise mean of two same-shaped parameter sets. Neither input is
    /// modified.
    pub fn merge(&self, other: &TrainedParameters) -> Result<TrainedParameters> {
        if self.dimension() != other.dimension() {
            return Err(Error::DimensionMismatch {
                context: "parameter merge".into(),
                expected: self.dimension(),
                got: other.dimension(),
            });
        }
        let mean = |a: &[f64], b: &[f64]| -> Vec<f64> {
            a.iter().zip(b).map(|(x, y)| (x + y) * 0.5).collect()
        };
        Ok(TrainedParameters {
            input_weights: (&self.input_weights + &other.input_weights).map(|x| x * 0.5),
            hidden_weights: mean(&self.hidden_weights, &other.hidden_weights),
            hidden_bias: mean(&self.hidden_bias, &other.hidden_bias),
            output_bias: (self.output_bias + other.output_bias) * 0.5,
        })
    }
}
