use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::train::epoch_stats::EpochStats;

pub const DEFAULT_EPOCHS: usize = 1000;
pub const DEFAULT_LEARNING_RATE: f64 = 0.05;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`       : full passes over the training rows; always run to the end
/// - `learning_rate`: constant step size
/// - `seed`         : seeds weight initialization; `None` draws from entropy
/// - `progress_tx`  : optional channel sender; one `EpochStats` is sent per
///                  completed epoch
/// - `stop_flag`    : optional atomic flag checked at every epoch boundary;
///                  when set the run is abandoned with `Error::Cancelled`
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: Option<u64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no seed, progress channel or stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Random source for weight initialization.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE)
    }
}

/// File-backed training hyperparameters. Omitted fields take the defaults.
///
/// ```json
/// { "epochs": 2000, "learning_rate": 0.05, "seed": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainParams {
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: Option<u64>,
}

impl Default for TrainParams {
    fn default() -> Self {
        TrainParams { epochs: DEFAULT_EPOCHS, learning_rate: DEFAULT_LEARNING_RATE, seed: None }
    }
}

impl TrainParams {
    pub fn from_json_str(json: &str) -> Result<TrainParams> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Deserializes parameters from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainParams> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))
    }

    /// Validates and converts into a runtime config.
    pub fn into_config(self) -> Result<TrainConfig> {
        let config = TrainConfig {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            seed: self.seed,
            progress_tx: None,
            stop_flag: None,
        };
        config.validate()?;
        Ok(config)
    }
}
