pub mod error;
pub mod schema;
pub mod data;
pub mod math;
pub mod activation;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod ensemble;
pub mod ingest;

// Convenience re-exports
pub use error::{Error, Result};
pub use schema::{classify, Field, FieldType, Schema};
pub use data::{Dataset, Decoded};
pub use math::matrix::Matrix;
pub use network::{NeuralNetwork, Predictor, TrainedParameters};
pub use optim::sgd::Sgd;
pub use train::{train_all, train_network, EpochStats, TrainConfig, TrainParams, TrainedNetwork};
pub use ensemble::{merge_parameters, merged_predictor, pool};
pub use ingest::{ColumnPicker, TableBuilder};
