use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Debug, Parser)]
#[command(name = "starheat-cli")]
#[command(about = "Collects and fuses public-web attention signals for a roster of entities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect the search-interest time series for the roster.
    Trends {
        /// Output CSV path.
        #[arg(long, default_value = "interest_series.csv")]
        output: PathBuf,
    },
    /// Resolve social profiles and follower counts for the roster.
    Social {
        /// Output CSV path.
        #[arg(long, default_value = "social_profiles.csv")]
        output: PathBuf,
    },
    /// Decompose the interest series into performance and black-red heat.
    Heat {
        /// Input time-series CSV.
        #[arg(long, default_value = "interest_series.csv")]
        input: PathBuf,
        /// Output CSV path.
        #[arg(long, default_value = "heat_decomposed.csv")]
        output: PathBuf,
        /// Ratio cache file (defaults to the configured path).
        #[arg(long)]
        cache: Option<PathBuf>,
        /// Cap on new (entity, period) pairs resolved this run.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = starheat_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Commands::Trends { output } => commands::run_trends(&config, &output).await,
        Commands::Social { output } => commands::run_social(&config, &output).await,
        Commands::Heat {
            input,
            output,
            cache,
            limit,
        } => commands::run_heat(&config, &input, &output, cache.as_deref(), limit).await,
    }
}
