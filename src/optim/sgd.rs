use crate::network::params::{Gradients, TrainedParameters};

/// Plain online gradient descent with a constant learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one weight update given pre-computed gradients.
    pub fn step(&self, params: &mut TrainedParameters, grads: &Gradients) {
        params.apply_gradients(grads, self.learning_rate);
    }
}
