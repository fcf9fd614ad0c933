//! `stationdesk` -- operator CLI for the station console.
//!
//! Drives the station editor against the console API from a terminal.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                     | Description                      |
//! |------------------------|----------|-----------------------------|----------------------------------|
//! | `STATION_API_URL`      | no       | `http://localhost:8080/api` | Console API base URL             |
//! | `STATION_API_TOKEN`    | no       | --                          | Bearer token for every request   |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                        | Per-request timeout              |
//! | `MAX_IMAGE_BYTES`      | no       | `5242880`                   | Largest accepted image file      |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stationdesk_core::types::DbId;

mod commands;

#[derive(Parser)]
#[command(name = "stationdesk", about = "Inspect, check and submit station forms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a station and print its normalized form as payload JSON.
    Show { id: DbId },
    /// Normalize a station record file and print its validation errors.
    Check { record: PathBuf },
    /// Submit a station record file, creating or updating the station.
    Submit {
        record: PathBuf,
        /// Update this station instead of creating a new one.
        #[arg(long)]
        id: Option<DbId>,
        /// Local image file to attach. May be repeated.
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stationdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Show { id } => commands::show(id).await,
        Command::Check { record } => commands::check(&record).await,
        Command::Submit { record, id, images } => commands::submit(&record, id, &images).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
