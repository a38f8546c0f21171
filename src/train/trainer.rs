use std::sync::Arc;
use std::thread;

use rand::Rng;
use tracing::info;

use crate::data::{Dataset, Decoded};
use crate::error::{Error, Result};
use crate::network::{NeuralNetwork, Predictor, TrainedParameters};
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// Outcome of one training run.
#[derive(Debug, Clone)]
pub struct TrainedNetwork {
    parameters: Arc<TrainedParameters>,
    predictor: Predictor,
    history: Vec<EpochStats>,
    outputs: Dataset,
}

impl TrainedNetwork {
    pub fn parameters(&self) -> &Arc<TrainedParameters> {
        &self.parameters
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        self.predictor.predict(input)
    }

    pub fn history(&self) -> &[EpochStats] {
        &self.history
    }

    pub fn first_error(&self) -> Option<f64> {
        self.history.first().map(|s| s.quadratic_error)
    }

    pub fn final_error(&self) -> Option<f64> {
        self.history.last().map(|s| s.quadratic_error)
    }

    /// Output columns the network was trained against.
    pub fn outputs(&self) -> &Dataset {
        &self.outputs
    }

    /// Maps a prediction back into the target column's value space.
    pub fn decode_prediction(&self, value: f64) -> Result<Decoded<'_>> {
        self.outputs.decode(0, value)
    }
}

/// Trains `network` with a random source derived from `config.seed`.
pub fn train_network(network: &NeuralNetwork, config: &TrainConfig) -> Result<TrainedNetwork> {
    train_network_with_rng(network, config, &mut config.rng())
}

/// Trains `network` drawing its initial weights from `rng`.
pub fn train_network_with_rng<R: Rng + ?Sized>(
    network: &NeuralNetwork,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainedNetwork> {
    let (inputs, targets) = network.encode()?;
    let (params, history) = train_loop(&inputs, &targets, config, rng)?;
    let parameters = Arc::new(params);
    Ok(TrainedNetwork {
        predictor: Predictor::from_parameters(Arc::clone(&parameters)),
        parameters,
        history,
        outputs: network.outputs().clone(),
    })
}

/// Trains every network on its own thread and waits for all of them.
///
/// Runs share nothing mutable. When `config.seed` is set, run `i` is seeded
/// with `seed + i`. The first failing run's error is returned.
pub fn train_all(networks: &[NeuralNetwork], config: &TrainConfig) -> Result<Vec<TrainedNetwork>> {
    info!(runs = networks.len(), "launching independent trainings");

    thread::scope(|scope| {
        let handles: Vec<_> = networks.iter()
            .enumerate()
            .map(|(i, network)| {
                let mut run_config = config.clone();
                run_config.seed = config.seed.map(|s| s.wrapping_add(i as u64));
                scope.spawn(move || train_network(network, &run_config))
            })
            .collect();

        handles.into_iter()
            .map(|h| h.join().map_err(|_| Error::InvalidConfig("training thread panicked".into()))?)
            .collect()
    })
}

impl NeuralNetwork {
    pub fn train(&self, config: &TrainConfig) -> Result<TrainedNetwork> {
        train_network(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(rows: &[[&str; 4]]) -> NeuralNetwork {
        let inputs = rows.iter().map(|r| r[..3].iter().map(|s| s.to_string()).collect()).collect();
        let outputs = rows.iter().map(|r| vec![r[3].to_string()]).collect();
        NeuralNetwork::new(
            Dataset::from_rows(inputs, None).unwrap(),
            Dataset::from_rows(outputs, None).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn trained_network_predicts_in_unit_interval() {
        let nn = toy(&[["1", "1", "1", "0"], ["3", "3", "3", "1"]]);
        let trained = nn.train(&TrainConfig::new(50, 0.05).with_seed(5)).unwrap();
        let p = trained.predict(&[2.0, 2.0, 2.0]).unwrap();
        assert!(p > 0.0 && p < 1.0);
        assert_eq!(trained.history().len(), 50);
        assert_eq!(trained.parameters().dimension(), 3);
    }

    #[test]
    fn bad_tokens_abort_before_training() {
        let nn = toy(&[["1", "1", "1", "0"], ["3", "x", "3", "1"]]);
        let err = nn.train(&TrainConfig::new(5, 0.05)).unwrap_err();
        assert!(matches!(err, Error::NumericParseError { row: 1, col: 1, .. }));
    }

    #[test]
    fn train_all_matches_sequential_seeded_runs() {
        let a = toy(&[["1", "1", "1", "0"], ["3", "3", "3", "1"]]);
        let b = toy(&[["2", "1", "1", "0"], ["3", "2", "3", "1"]]);
        let config = TrainConfig::new(20, 0.05).with_seed(100);

        let parallel = train_all(&[a.clone(), b.clone()], &config).unwrap();
        let seq_a = a.train(&config).unwrap();
        let seq_b = b.train(&config.clone().with_seed(101)).unwrap();

        assert_eq!(parallel.len(), 2);
        assert_eq!(parallel[0].parameters(), seq_a.parameters());
        assert_eq!(parallel[1].parameters(), seq_b.parameters());
    }

    #[test]
    fn train_all_propagates_failures() {
        let good = toy(&[["1", "1", "1", "0"]]);
        let bad = toy(&[["1", "1", "1", "0"], ["1", "q", "1", "1"]]);
        assert!(train_all(&[good, bad], &TrainConfig::new(3, 0.05)).is_err());
    }
}
