use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use blendnet::{train_all, EpochStats, Predictor, TableBuilder, TrainParams};
use clap::Parser;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;

/// Train one network per CSV file, then blend their predictions.
#[derive(Parser)]
#[command(name = "blendnet", version)]
struct Cli {
    /// CSV file; repeat to train several networks concurrently
    #[arg(short, long = "data", value_name = "PATH", required = true)]
    data: Vec<PathBuf>,
    /// Input columns, comma-separated (e.g. 0,1,2)
    #[arg(short, long, value_delimiter = ',', required = true)]
    inputs: Vec<usize>,
    /// Target column
    #[arg(short, long)]
    output: usize,
    /// The first row is data, not a header
    #[arg(long)]
    no_header: bool,
    /// JSON file with epochs / learning_rate / seed
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(short, long)]
    epochs: Option<usize>,
    #[arg(long)]
    learning_rate: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Weight of each later network when blending, in (0, 1)
    #[arg(short, long, default_value_t = 0.5)]
    weight: f64,
    /// Encoded input to predict, comma-separated
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    predict: Vec<f64>,
    /// Print one JSON line per finished epoch
    #[arg(long)]
    progress: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn install_logger(verbose: bool) -> Result<(), SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    install_logger(cli.verbose)?;

    let mut params = match &cli.config {
        Some(path) => TrainParams::load_json(path)?,
        None => TrainParams::default(),
    };
    if let Some(epochs) = cli.epochs {
        params.epochs = epochs;
    }
    if let Some(lr) = cli.learning_rate {
        params.learning_rate = lr;
    }
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }
    let mut config = params.into_config()?;

    let mut networks = Vec::with_capacity(cli.data.len());
    for path in &cli.data {
        let text = std::fs::read_to_string(path)?;
        let mut builder = TableBuilder::from_csv(&text)?;
        builder.header(!cli.no_header);
        builder.inputs.pick(&cli.inputs)?;
        builder.outputs.pick(&[cli.output])?;
        networks.push(builder.build()?);
    }

    let printer = if cli.progress {
        let (tx, rx) = mpsc::channel::<EpochStats>();
        config.progress_tx = Some(tx);
        Some(thread::spawn(move || {
            for stats in rx {
                if let Ok(line) = serde_json::to_string(&stats) {
                    println!("{line}");
                }
            }
        }))
    } else {
        None
    };

    let result = train_all(&networks, &config);
    drop(config);
    if let Some(handle) = printer {
        let _ = handle.join();
    }
    let trained = result?;

    for (path, t) in cli.data.iter().zip(&trained) {
        println!(
            "{}: first error {:.6}, final error {:.6}",
            path.display(),
            t.first_error().unwrap_or_default(),
            t.final_error().unwrap_or_default()
        );
    }

    if cli.predict.is_empty() {
        return Ok(());
    }
    let x = &cli.predict;
    let decoder = &trained[0];

    for (path, t) in cli.data.iter().zip(&trained) {
        let v = t.predict(x)?;
        println!("{}: {v:.6} -> {}", path.display(), t.decode_prediction(v)?);
    }

    if trained.len() > 1 {
        let blended = trained[1..].iter().try_fold(decoder.predictor().clone(), |acc, t| {
            acc.combine_with(t.predictor(), cli.weight)
        })?;
        let v = blended.predict(x)?;
        println!("blended: {v:.6} -> {}", decoder.decode_prediction(v)?);

        let merged = trained[1..].iter().try_fold((**decoder.parameters()).clone(), |acc, t| {
            acc.merge(t.parameters())
        })?;
        let v = Predictor::from(merged).predict(x)?;
        println!("merged parameters: {v:.6} -> {}", decoder.decode_prediction(v)?);
    }

    Ok(())
}
