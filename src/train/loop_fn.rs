use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::loss::QuadraticLoss;
use crate::network::params::TrainedParameters;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains a fresh single-hidden-layer network on already-encoded rows and
/// returns the final parameters plus one `EpochStats` per epoch.
///
/// # Arguments
/// - `inputs` : encoded rows; every row must have the same length `d`
/// - `targets`: one target per row
/// - `config` : epochs, learning rate, optional progress channel and stop flag
/// - `rng`    : random source for the initial weights
///
/// Rows are visited in order every epoch (no shuffling) and each row
/// triggers one update. The epoch count is fixed; there is no early stopping.
///
/// # Errors
/// - `EmptyDataset` when no rows are supplied
/// - `DimensionMismatch` when row and target counts differ or a row's width
///   differs from the first row's
/// - `NumericParseError` when an encoded value is not finite
/// - `Cancelled` when `config.stop_flag` is raised at an epoch boundary
#[instrument(skip_all, fields(rows = inputs.len(), epochs = config.epochs))]
pub fn train_loop<R: Rng + ?Sized>(
    inputs: &[Vec<f64>],
    targets: &[f64],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<(TrainedParameters, Vec<EpochStats>)> {
    config.validate()?;
    let dimension = check_shapes(inputs, targets)?;

    let optimizer = Sgd::new(config.learning_rate);
    let mut params = TrainedParameters::random(dimension, rng);
    let mut history = Vec::with_capacity(config.epochs);
    let mut progress_open = config.progress_tx.is_some();

    info!(dimension, "training started");

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                info!(completed_epochs = epoch - 1, "training cancelled");
                return Err(Error::Cancelled { completed_epochs: epoch - 1 });
            }
        }

        let t_start = Instant::now();
        let quadratic_error = run_one_epoch(&mut params, inputs, targets, &optimizer);
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            quadratic_error,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(epoch, quadratic_error, "epoch finished");

        if progress_open {
            if let Some(ref tx) = config.progress_tx {
                if tx.send(stats.clone()).is_err() {
                    warn!(epoch, "progress receiver dropped; continuing without progress reports");
                    progress_open = false;
                }
            }
        }

        history.push(stats);
    }

    let final_error = history.last().map_or(0.0, |s| s.quadratic_error);
    info!(final_error, "training finished");

    Ok((params, history))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Validates the encoded matrix and returns its width.
fn check_shapes(inputs: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if inputs.len() != targets.len() {
        return Err(Error::DimensionMismatch {
            context: "input/output row count".into(),
            expected: inputs.len(),
            got: targets.len(),
        });
    }
    let dimension = match inputs.first() {
        Some(row) => row.len(),
        None => return Err(Error::EmptyDataset { context: "no training rows".into() }),
    };
    if dimension == 0 {
        return Err(Error::DimensionMismatch { context: "input columns".into(), expected: 1, got: 0 });
    }

    for (row, x) in inputs.iter().enumerate() {
        if x.len() != dimension {
            return Err(Error::DimensionMismatch {
                context: format!("width of training row {row}"),
                expected: dimension,
                got: x.len(),
            });
        }
        if let Some(col) = x.iter().position(|v| !v.is_finite()) {
            return Err(Error::NumericParseError { row, col, token: x[col].to_string() });
        }
    }
    if let Some(row) = targets.iter().position(|v| !v.is_finite()) {
        return Err(Error::NumericParseError { row, col: 0, token: targets[row].to_string() });
    }

    Ok(dimension)
}

/// One online pass over every row in order. Returns ½ Σ (target − output)².
fn run_one_epoch(
    params: &mut TrainedParameters,
    inputs: &[Vec<f64>],
    targets: &[f64],
    optimizer: &Sgd,
) -> f64 {
    let mut total_error = 0.0;

    for (input, &target) in inputs.iter().zip(targets) {
        let act = params.forward(input);
        total_error += QuadraticLoss::loss(act.output, target);

        let grads = params.compute_gradients(input, &act, target);
        optimizer.step(params, &grads);
    }

    total_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::{atomic::AtomicBool, mpsc, Arc};

    fn toy() -> (Vec<Vec<f64>>, Vec<f64>) {
        (
            vec![vec![1.0, 1.0, 1.0], vec![3.0, 3.0, 3.0], vec![1.0, 2.0, 1.0], vec![3.0, 2.0, 3.0]],
            vec![0.0, 1.0, 0.0, 1.0],
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn row_counts_must_match() {
        let inputs = vec![vec![1.0, 2.0]; 10];
        let targets = vec![0.0; 11];
        let err = train_loop(&inputs, &targets, &TrainConfig::new(1, 0.05), &mut rng()).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 10, got: 11, .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = train_loop(&[], &[], &TrainConfig::default(), &mut rng()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset { .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let inputs = vec![vec![1.0, 2.0], vec![1.0]];
        let err = train_loop(&inputs, &[0.0, 1.0], &TrainConfig::new(1, 0.05), &mut rng()).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn non_finite_values_are_surfaced() {
        let inputs = vec![vec![1.0, f64::NAN]];
        let err = train_loop(&inputs, &[0.0], &TrainConfig::new(1, 0.05), &mut rng()).unwrap_err();
        assert!(matches!(err, Error::NumericParseError { row: 0, col: 1, .. }));
    }

    #[test]
    fn runs_every_epoch_and_reports_each() {
        let (x, y) = toy();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(25, 0.05).with_progress(tx);
        let (params, history) = train_loop(&x, &y, &config, &mut rng()).unwrap();
        drop(config);
        assert_eq!(params.dimension(), 3);
        assert_eq!(history.len(), 25);
        assert_eq!(history.last().unwrap().epoch, 25);
        let received: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(received, history);
    }

    #[test]
    fn dropped_receiver_does_not_stop_training() {
        let (x, y) = toy();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = TrainConfig::new(5, 0.05).with_progress(tx);
        let (_, history) = train_loop(&x, &y, &config, &mut rng()).unwrap();
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn stop_flag_cancels_without_result() {
        let (x, y) = toy();
        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig::new(5, 0.05).with_stop_flag(flag);
        let err = train_loop(&x, &y, &config, &mut rng()).unwrap_err();
        assert_eq!(err, Error::Cancelled { completed_epochs: 0 });
    }

    #[test]
    fn same_seed_same_parameters() {
        let (x, y) = toy();
        let config = TrainConfig::new(10, 0.05);
        let (a, _) = train_loop(&x, &y, &config, &mut rng()).unwrap();
        let (b, _) = train_loop(&x, &y, &config, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn error_decreases_on_separable_data() {
        let (x, y) = toy();
        for seed in [1, 7, 42] {
            let (_, history) =
                train_loop(&x, &y, &TrainConfig::default(), &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(history.len(), 1000);
            let first = history.first().unwrap().quadratic_error;
            let last = history.last().unwrap().quadratic_error;
            assert!(last <= first, "seed {seed}: {last} > {first}");
        }
    }
}
