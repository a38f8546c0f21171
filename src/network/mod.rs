pub mod network;
pub mod params;
pub mod predictor;

pub use network::NeuralNetwork;
pub use params::{Activations, Gradients, TrainedParameters};
pub use predictor::Predictor;
