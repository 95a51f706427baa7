//! CLI argument parsing for tripstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tripstore")]
#[command(author, version, about = "SQLite-backed trip storage for wayplan", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the trips database (overrides config)
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored trips, newest first
    List,

    /// Print a trip's itinerary JSON
    Show {
        /// Trip ID to display
        #[arg(required = true)]
        id: String,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Delete a trip
    Delete {
        /// Trip ID to delete
        #[arg(required = true)]
        id: String,
    },

    /// Show store statistics
    Stats,
}
