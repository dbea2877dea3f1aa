//! fp-cli - Issue FirstPromoter API calls from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List promoters, second page
//! fp-cli get promoters --query page=2 --query per_page=20
//!
//! # Fetch one referral
//! fp-cli get referrals/123
//!
//! # Accept pending promoters
//! fp-cli post promoters/accept --data '{"ids":[17,23]}'
//!
//! # Update a promoter campaign
//! fp-cli put promoter_campaigns/7 --data '{"ref_token":"summer"}'
//! ```
//!
//! Credentials come from `FP_API_KEY` and `FP_ACCOUNT_ID` (a `.env` file is
//! honored). The JSON result is printed to stdout; logs go to stderr with
//! verbosity controlled by `RUST_LOG` (default `info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use firstpromoter_client::{FirstPromoterClient, FirstPromoterConfig};

mod commands;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(author, version, about = "FirstPromoter API command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a GET request to an API endpoint
    Get {
        /// Endpoint path relative to the API base (e.g. "promoters")
        endpoint: String,

        /// Query parameter as key=value (repeatable, order preserved)
        #[arg(short, long, value_name = "KEY=VALUE")]
        query: Vec<String>,
    },
    /// Issue a POST request with an optional JSON body
    Post {
        /// Endpoint path relative to the API base
        endpoint: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Issue a PUT request with an optional JSON body
    Put {
        /// Endpoint path relative to the API base
        endpoint: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Issue a DELETE request
    Delete {
        /// Endpoint path relative to the API base
        endpoint: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = FirstPromoterConfig::from_env();
    if let Some(var) = config.missing_credential() {
        tracing::warn!("{var} not set - API calls will fail");
    }

    let client = FirstPromoterClient::new(config);

    match cli.command {
        Commands::Get { endpoint, query } => {
            commands::call::get(&client, &endpoint, &query).await?;
        }
        Commands::Post { endpoint, data } => {
            commands::call::post(&client, &endpoint, data.as_deref()).await?;
        }
        Commands::Put { endpoint, data } => {
            commands::call::put(&client, &endpoint, data.as_deref()).await?;
        }
        Commands::Delete { endpoint } => {
            commands::call::delete(&client, &endpoint).await?;
        }
    }

    Ok(())
}
