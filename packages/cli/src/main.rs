#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the dengue watch toolchain.
//!
//! ```text
//! dengue_watch_cli serve
//! dengue_watch_cli predict <population> <temperature> <humidity>
//! dengue_watch_cli validate [--records] [--json]
//! dengue_watch_cli fleet [--temperature T --humidity H]
//! dengue_watch_cli import-historical <csv>
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dengue_watch_config::AppConfig;
use dengue_watch_database::{db, import, queries};
use dengue_watch_prediction::{predict, predict_fleet, regions_from_history, validate};
use dengue_watch_prediction_models::WeatherReading;
use dengue_watch_server_models::validate_input;
use dengue_watch_weather::{ForecastSource as _, OpenMeteoClient, current_reading};

#[derive(Parser)]
#[command(
    name = "dengue_watch_cli",
    about = "Dengue surveillance dashboard toolchain"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Predict dengue cases for one set of inputs
    Predict {
        /// Barangay population
        population: f64,
        /// Temperature in °C
        temperature: f64,
        /// Relative humidity in %
        humidity: f64,
    },
    /// Backtest the model against the imported historical records
    Validate {
        /// Print one line per historical record
        #[arg(long)]
        records: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank every barangay by predicted cases under one weather reading
    Fleet {
        /// Temperature in °C (fetched from the forecast when omitted)
        #[arg(long, requires = "humidity")]
        temperature: Option<f64>,
        /// Relative humidity in % (fetched from the forecast when omitted)
        #[arg(long, requires = "temperature")]
        humidity: Option<f64>,
    },
    /// Import historical observations from a CSV file
    ImportHistorical {
        /// CSV with columns barangay,year,population,temperature,humidity,
        /// dengue_cases and an optional cases_per_1000
        path: PathBuf,
    },
}

async fn forecast_reading(
    config: &AppConfig,
) -> Result<WeatherReading, Box<dyn std::error::Error>> {
    let client = OpenMeteoClient::new(
        config.weather.base_url.clone(),
        config.weather.latitude,
        config.weather.longitude,
        Duration::from_secs(config.weather.timeout_secs),
    )?;

    let days = match client.forecast().await {
        Ok(days) => days,
        Err(e) => {
            log::warn!("Weather forecast unavailable, using defaults: {e}");
            Vec::new()
        }
    };

    Ok(current_reading(&days))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Serve => {
            // The server uses actix-web's runtime, so it runs in a
            // blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(dengue_watch_server::run_server(config))
            })
            .await??;
        }
        Commands::Predict {
            population,
            temperature,
            humidity,
        } => {
            let input = validate_input(population, temperature, humidity)?;
            let result = predict(input);
            let c = result.contributions;

            println!("Predicted cases:    {:.2}", result.predicted_cases);
            println!("Risk tier:          {}", result.risk_tier);
            println!("Recommendation:     {}", result.risk_tier.recommendation());
            println!();
            println!("Population effect:  {:+.2}", c.population_effect);
            println!("Temperature effect: {:+.2}", c.temperature_effect);
            println!("Humidity effect:    {:+.2}", c.humidity_effect);
            println!("Base constant:      {:+.6}", c.base_constant);
        }
        Commands::Validate { records, json } => {
            let db = db::open(&config.database.path).await?;
            let history = queries::list_historical_observations(db.as_ref()).await?;
            let report = validate(&history);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let s = &report.summary;
            let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
            println!("Samples:             {}", s.sample_count);
            println!("Mean error:          {:.2}", s.mean_error);
            println!("Mean absolute error: {:.2}", s.mean_absolute_error);
            println!("R²:                  {}", fmt(s.r_squared));
            println!("Accuracy (%):        {}", fmt(s.accuracy_percentage));

            if records {
                println!();
                println!(
                    "{:<24} {:<6} {:>8} {:>10} {:>8} {:>9}",
                    "BARANGAY", "YEAR", "ACTUAL", "PREDICTED", "ERROR", "ERROR %"
                );
                println!("{}", "-".repeat(70));
                for r in &report.records {
                    println!(
                        "{:<24} {:<6} {:>8.0} {:>10.2} {:>+8.2} {:>+9.2}",
                        r.barangay,
                        r.year,
                        r.actual_cases,
                        r.predicted_cases,
                        r.error,
                        r.percent_error
                    );
                }
            }
        }
        Commands::Fleet {
            temperature,
            humidity,
        } => {
            let reading = match (temperature, humidity) {
                (Some(temperature), Some(humidity)) => WeatherReading {
                    temperature,
                    humidity,
                },
                _ => forecast_reading(&config).await?,
            };
            validate_input(0.0, reading.temperature, reading.humidity)?;

            let db = db::open(&config.database.path).await?;
            let history = queries::list_historical_observations(db.as_ref()).await?;
            let names = queries::list_barangay_names(db.as_ref()).await?;
            let fleet = predict_fleet(&regions_from_history(&names, &history), reading);

            println!(
                "Weather: {:.1}°C, {:.1}% humidity\n",
                reading.temperature, reading.humidity
            );
            println!(
                "{:<24} {:>11} {:>10}  RISK",
                "BARANGAY", "POPULATION", "PREDICTED"
            );
            println!("{}", "-".repeat(60));
            for entry in &fleet {
                let marker = if entry.population_estimated { "*" } else { " " };
                println!(
                    "{:<24} {:>10}{marker} {:>10.2}  {}",
                    entry.barangay,
                    entry.population,
                    entry.prediction.predicted_cases,
                    entry.prediction.risk_tier
                );
            }
            if fleet.iter().any(|e| e.population_estimated) {
                println!("\n* no historical population; default estimate used");
            }
        }
        Commands::ImportHistorical { path } => {
            let db = db::open(&config.database.path).await?;
            let summary = import::import_historical_csv(db.as_ref(), &path).await?;

            println!(
                "Imported {} row(s) from {} ({} derived cases-per-1000 value(s))",
                summary.rows_read,
                path.display(),
                summary.derived_rates
            );
        }
    }

    Ok(())
}
