pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::{train_all, train_network, train_network_with_rng, TrainedNetwork};
pub use epoch_stats::EpochStats;
pub use train_config::{TrainConfig, TrainParams, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE};
pub use loop_fn::train_loop;
