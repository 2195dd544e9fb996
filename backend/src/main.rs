//! Tally CLI - count matching rows of a CSV dataset
//!
//! ```bash
//! tally serve --data dogs.csv --port 8888     # Start HTTP server
//! tally count --data dogs.csv name=Rex        # One-off count, same JSON as /count
//! tally columns --data dogs.csv               # List dataset columns
//! ```

use clap::{Parser, Subcommand};
use tally::{evaluate, start_server, CountOutcome, CountResponse, Dataset, DatasetConfig};
use tally::{ServerConfig, UnknownFieldsResponse};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Count rows of a CSV dataset matching column=value constraints", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve GET /count
    Serve(ServerConfig),

    /// Count matching rows once and print the JSON result
    Count {
        #[command(flatten)]
        dataset: DatasetConfig,

        /// Constraints as column=value
        #[arg(value_parser = parse_constraint)]
        constraints: Vec<(String, String)>,
    },

    /// Print the dataset's column names
    Columns {
        #[command(flatten)]
        dataset: DatasetConfig,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(config) => cmd_serve(config).await,
        Commands::Count {
            dataset,
            constraints,
        } => cmd_count(&dataset, constraints),
        Commands::Columns { dataset } => cmd_columns(&dataset),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

type CmdResult = Result<i32, Box<dyn std::error::Error>>;

fn load(config: &DatasetConfig) -> Result<Dataset, tally::DatasetError> {
    tracing::info!("Loading dataset from {}", config.data_path.display());
    Dataset::load_with_delimiter(&config.data_path, config.delimiter)
}

async fn cmd_serve(config: ServerConfig) -> CmdResult {
    let dataset = load(&config.dataset)?;
    start_server(&config, dataset).await?;
    Ok(0)
}

fn cmd_count(config: &DatasetConfig, constraints: Vec<(String, String)>) -> CmdResult {
    let dataset = load(config)?;

    match evaluate(constraints, &dataset) {
        CountOutcome::Count(count) => {
            println!("{}", serde_json::to_string(&CountResponse { count })?);
            Ok(0)
        }
        CountOutcome::UnknownFields(unknown_fields) => {
            println!(
                "{}",
                serde_json::to_string(&UnknownFieldsResponse { unknown_fields })?
            );
            Ok(1)
        }
    }
}

fn cmd_columns(config: &DatasetConfig) -> CmdResult {
    let dataset = load(config)?;
    for column in dataset.columns() {
        println!("{}", column);
    }
    Ok(0)
}

fn parse_constraint(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected column=value, got '{}'", raw))
}
