//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::itinerary::{BudgetTier, DietOption, Interest, TravelerType};
use crate::trips::TripSort;

/// wayplan - LLM travel itinerary planner
#[derive(Parser)]
#[command(
    name = "wp",
    about = "Generate, enrich, and browse multi-day travel itineraries",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new trip itinerary
    Plan {
        /// Destination cities (one or more)
        #[arg(value_name = "DESTINATION", required = true, num_args = 1..)]
        destinations: Vec<String>,

        /// Trip length in days
        #[arg(short, long, default_value = "3")]
        days: u32,

        /// Budget tier (budget, mid-range, luxury)
        #[arg(short, long, default_value = "mid-range")]
        budget: BudgetTier,

        /// Traveler type (solo, couple, family, friends)
        #[arg(short, long, default_value = "solo")]
        travelers: TravelerType,

        /// Pace from 0.0 (relaxed) to 1.0 (packed)
        #[arg(short, long, default_value = "0.5")]
        pace: f32,

        /// Interest tag (repeat for several)
        #[arg(short, long = "interest", value_name = "INTEREST")]
        interests: Vec<Interest>,

        /// Dietary requirement (repeat for several)
        #[arg(long = "diet", value_name = "DIET")]
        diet: Vec<DietOption>,

        /// Skip coordinate and image enrichment
        #[arg(long)]
        no_enrich: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List stored trips
    Trips {
        /// Sort order (newest, oldest, name)
        #[arg(short, long, default_value = "newest")]
        sort: TripSort,

        /// Filter by trip name or destination
        #[arg(short, long)]
        query: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a stored trip's itinerary
    Show {
        /// Trip ID
        id: String,

        /// Show a single day only
        #[arg(short, long)]
        day: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print map markers for a stored trip
    Map {
        /// Trip ID
        id: String,

        /// Markers for a single day only
        #[arg(short, long)]
        day: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Look up city suggestions for a query
    Cities {
        /// Search text, e.g. "lisb"
        query: String,
    },

    /// Re-run enrichment on a stored trip
    Enrich {
        /// Trip ID
        id: String,
    },

    /// Mark a trip as saved
    Save {
        /// Trip ID
        id: String,
    },

    /// Clear the saved flag on a trip
    Unsave {
        /// Trip ID
        id: String,
    },

    /// Delete a stored trip
    Delete {
        /// Trip ID
        id: String,
    },
}

/// Output format for listing and show commands
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Invalid format: {} (expected text, json, or table)", s)),
        }
    }
}
