use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use tripstore::TripStore;
use tripstore::cli::Cli;
use tripstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn format_created(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let db_path = cli.db.unwrap_or(config.db_path);

    info!("tripstore starting");

    match cli.command {
        tripstore::cli::Command::List => {
            let store = TripStore::open(&db_path)?;
            let trips = store.list()?;
            if trips.is_empty() {
                println!("No trips found");
            } else {
                for trip in trips {
                    let marker = if trip.saved { "★" } else { " " };
                    println!(
                        "{} {}  {}  {}  {}",
                        marker.yellow(),
                        trip.id.cyan(),
                        format_created(trip.created_at).dimmed(),
                        trip.trip_name,
                        trip.destinations.dimmed(),
                    );
                }
            }
        }
        tripstore::cli::Command::Show { id, pretty } => {
            let store = TripStore::open(&db_path)?;
            let record = store
                .get(&id)?
                .ok_or_else(|| eyre::eyre!("Trip not found: {}", id))?;
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&record.trip_json)
                    .context("Stored trip JSON is not valid JSON")?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", record.trip_json);
            }
        }
        tripstore::cli::Command::Delete { id } => {
            let store = TripStore::open(&db_path)?;
            if store.delete(&id)? {
                println!("{} Deleted trip: {}", "✓".green(), id);
            } else {
                println!("Trip not found: {}", id);
            }
        }
        tripstore::cli::Command::Stats => {
            let store = TripStore::open(&db_path)?;
            let stats = store.stats()?;
            println!("Database: {}", db_path.display().to_string().cyan());
            println!("  Trips: {}", stats.trip_count);
            println!("  Saved: {}", stats.saved_count);
        }
    }

    Ok(())
}
