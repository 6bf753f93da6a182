//! FRP Predictor - Fire Radiative Power prediction pipeline
//!
//! Train on a historical CSV, then serve predictions in batch or for a
//! single manually entered record:
//!
//! ```bash
//! cargo run -- train --data incendios.csv --artifacts artifacts
//! cargo run -- predict --input new_fires.csv --output predictions.csv
//! cargo run -- manual --temperature-c 32 --land-use urban --threshold 120
//! cargo run -- categories
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use frp_predictor::data::{load_table, save_predictions};
use frp_predictor::{
    Artifacts, LinearRegression, Predictor, Preprocessor, RegressionMetrics, StandardScaler,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "frp_predictor")]
#[command(about = "Fire Radiative Power (FRP) prediction pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model on a historical fire dataset and persist artifacts
    Train {
        /// Path to the training CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Directory for the persisted artifacts
        #[arg(short, long, default_value = "artifacts")]
        artifacts: PathBuf,

        /// Held-out fraction for the evaluation report
        #[arg(short, long, default_value = "0.2", value_parser = parse_test_size)]
        test_size: f64,

        /// Shuffle seed for the train/test split
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Batch prediction over a CSV of raw records
    Predict {
        /// Input CSV; columns may be any subset or superset of the schema
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (input columns + predicted_frp + intensity_label);
        /// printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding the persisted artifacts
        #[arg(short, long, default_value = "artifacts")]
        artifacts: PathBuf,

        /// FRP threshold; scores at or above it are classified High
        #[arg(short, long, default_value = "100.0", value_parser = parse_threshold)]
        threshold: f64,
    },

    /// Predict a single manually entered record
    Manual {
        /// Temperature in degrees Celsius
        #[arg(long, default_value = "30.0")]
        temperature_c: f64,

        /// Relative humidity percentage
        #[arg(long, default_value = "40.0")]
        humidity_pct: f64,

        /// Wind speed in km/h
        #[arg(long, default_value = "15.0")]
        wind_speed_kmh: f64,

        /// Hour of day (0-23)
        #[arg(long, default_value = "14")]
        hour: u32,

        /// Detection confidence (0-1)
        #[arg(long, default_value = "0.9")]
        confidence: f64,

        /// 1 if a fire has already been detected, 0 otherwise
        #[arg(long, default_value = "0")]
        fire_detected: u8,

        /// Land-use category; omit for none
        #[arg(long)]
        land_use: Option<String>,

        /// Directory holding the persisted artifacts
        #[arg(short, long, default_value = "artifacts")]
        artifacts: PathBuf,

        /// FRP threshold; scores at or above it are classified High
        #[arg(short, long, default_value = "100.0", value_parser = parse_threshold)]
        threshold: f64,
    },

    /// List the land-use categories the trained schema supports
    Categories {
        /// Directory holding the persisted artifacts
        #[arg(short, long, default_value = "artifacts")]
        artifacts: PathBuf,
    },
}

/// Held-out fraction; 1.0 would leave nothing to train on
fn parse_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("test size must be within [0, 1), got {}", value))
    }
}

/// The intensity threshold is a non-negative FRP value
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("threshold must be a non-negative FRP value, got {}", value))
    }
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            artifacts,
            test_size,
            seed,
        } => {
            info!("loading training data from {:?}", data);
            let table = load_table(&data).context("failed to ingest the training CSV")?;
            info!(
                "loaded {} rows with {} columns",
                table.n_rows(),
                table.n_columns()
            );

            let (dataset, schema) = Preprocessor::default()
                .run(&table)
                .context("preprocessing failed")?;
            info!(
                "cleaned dataset: {} samples, {} features",
                dataset.n_samples(),
                dataset.n_features()
            );

            let (train, test) = dataset.train_test_split(test_size, seed);
            info!("train: {}, test: {}", train.n_samples(), test.n_samples());

            let scaler = StandardScaler::fit(&train.x).context("scaler fit failed")?;
            let x_train = scaler.transform(&train.x)?;
            let model = LinearRegression::fit(&x_train, &train.y).context("model fit failed")?;

            if test.n_samples() > 0 {
                let x_test = scaler.transform(&test.x)?;
                let predictions = model.predict(&x_test)?;
                let metrics = RegressionMetrics::calculate(&test.y, &predictions);
                println!("\n{}", metrics.report());
            } else {
                warn!("test split is empty; skipping the evaluation report");
            }

            Artifacts {
                schema,
                scaler,
                model,
            }
            .save(&artifacts)
            .context("failed to persist artifacts")?;
            println!("Artifacts saved to {:?}", artifacts);
        }

        Commands::Predict {
            input,
            output,
            artifacts,
            threshold,
        } => {
            // Artifact load failures are fatal: no fallback prediction exists.
            let predictor =
                Predictor::load(&artifacts).context("artifacts unavailable; cannot serve")?;

            let table = match load_table(&input) {
                Ok(table) => table,
                Err(err) => {
                    // Malformed batch input is a per-request failure, not a crash.
                    warn!("batch rejected: {}", err);
                    anyhow::bail!("batch input could not be ingested: {}", err);
                }
            };
            info!(
                "scoring {} rows against a threshold of {:.2} FRP",
                table.n_rows(),
                threshold
            );

            let outcome = predictor.predict_table(&table, threshold)?;
            info!(
                "high intensity: {}, low intensity: {}",
                outcome.high_count(),
                outcome.low_count()
            );

            let labels: Vec<String> = outcome.labels.iter().map(|l| l.to_string()).collect();
            match output {
                Some(path) => {
                    save_predictions(&table, &outcome.scores, &labels, &path)
                        .context("failed to write the prediction CSV")?;
                    println!("Predictions written to {:?}", path);
                }
                None => {
                    println!("\n{:>12}  {:>6}", "predicted_frp", "label");
                    for (score, label) in outcome.scores.iter().zip(&labels) {
                        println!("{:>12.4}  {:>6}", score, label);
                    }
                }
            }
        }

        Commands::Manual {
            temperature_c,
            humidity_pct,
            wind_speed_kmh,
            hour,
            confidence,
            fire_detected,
            land_use,
            artifacts,
            threshold,
        } => {
            let predictor =
                Predictor::load(&artifacts).context("artifacts unavailable; cannot serve")?;

            let mut record = HashMap::from([
                ("temperature_c".to_string(), temperature_c),
                ("humidity_pct".to_string(), humidity_pct),
                ("wind_speed_kmh".to_string(), wind_speed_kmh),
                ("hour".to_string(), hour as f64),
                ("confidence".to_string(), confidence),
                ("fire_detected".to_string(), fire_detected as f64),
            ]);

            if let Some(category) = &land_use {
                if !predictor.apply_category(&mut record, "land_use", category) {
                    warn!(
                        "land use '{}' is not in the trained schema; indicators stay zero",
                        category
                    );
                }
            }

            let aligned = predictor.align_record(&record);
            println!("\nData sent to the model (schema order):");
            for (name, value) in predictor.schema().columns().iter().zip(aligned.iter()) {
                println!("  {:24} {:>10.4}", name, value);
            }

            let prediction = predictor.predict_record(&record, threshold)?;

            println!("\nPrediction Result");
            println!("=================");
            match prediction.label {
                frp_predictor::Intensity::High => {
                    println!("HIGH INTENSITY PREDICTED (FRP: {:.2})", prediction.score)
                }
                frp_predictor::Intensity::Low => {
                    println!("Low intensity predicted (FRP: {:.2})", prediction.score)
                }
            }
            println!("Threshold: {:.2} FRP", threshold);
        }

        Commands::Categories { artifacts } => {
            let predictor =
                Predictor::load(&artifacts).context("artifacts unavailable; cannot serve")?;

            let categories = predictor.categories("land_use");
            if categories.is_empty() {
                println!("The trained schema has no land-use indicator columns.");
            } else {
                println!("Land-use categories in the trained schema:");
                for category in categories {
                    println!("  {}", category);
                }
                println!("(the reference category is encoded as all-zero indicators)");
            }
        }
    }

    Ok(())
}
