//! wayplan - LLM travel itinerary planner
//!
//! CLI entry point for generating, enriching, and browsing trips.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use wayplan::cli::{Cli, Command, OutputFormat};
use wayplan::config::{Config, LoggingConfig};
use wayplan::enrich::Enricher;
use wayplan::itinerary::{Activity, Trip, TripRequest};
use wayplan::llm::create_client;
use wayplan::places::{GeocodeClient, ImageClient};
use wayplan::prompts::PromptLoader;
use wayplan::state::StateManager;
use wayplan::trips::{TripRepository, TripSort};

fn setup_logging(cli_log_level: Option<&str>, logging: &LoggingConfig) -> Result<()> {
    if let Some(dir) = logging.file.parent() {
        fs::create_dir_all(dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > INFO
    let level_str = cli_log_level.unwrap_or(&logging.level);
    let level = match level_str.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        other => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&logging.file).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    setup_logging(cli.log_level.as_deref(), &config.logging).context("Failed to setup logging")?;

    info!("wayplan loaded config: model={}", config.llm.model);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            destinations,
            days,
            budget,
            travelers,
            pace,
            interests,
            diet,
            no_enrich,
            format,
        } => {
            debug!(?destinations, days, "main: matched Plan command");
            let pace = if (0.0..=1.0).contains(&pace) {
                pace
            } else {
                eprintln!("Warning: pace {} out of range, clamping to 0.0..1.0", pace);
                pace.clamp(0.0, 1.0)
            };
            let request = TripRequest {
                destinations,
                budget,
                travelers,
                days,
                pace,
                diet,
                interests,
            };
            cmd_plan(&config, request, no_enrich, format).await
        }
        Command::Trips { sort, query, format } => {
            debug!(%sort, ?query, "main: matched Trips command");
            cmd_trips(&config, sort, query.as_deref(), format).await
        }
        Command::Show { id, day, format } => {
            debug!(%id, ?day, "main: matched Show command");
            cmd_show(&config, &id, day, format).await
        }
        Command::Map { id, day, format } => {
            debug!(%id, ?day, "main: matched Map command");
            cmd_map(&config, &id, day, format).await
        }
        Command::Cities { query } => {
            debug!(%query, "main: matched Cities command");
            cmd_cities(&config, &query).await
        }
        Command::Enrich { id } => {
            debug!(%id, "main: matched Enrich command");
            cmd_enrich(&config, &id).await
        }
        Command::Save { id } => {
            debug!(%id, "main: matched Save command");
            cmd_set_saved(&config, &id, true).await
        }
        Command::Unsave { id } => {
            debug!(%id, "main: matched Unsave command");
            cmd_set_saved(&config, &id, false).await
        }
        Command::Delete { id } => {
            debug!(%id, "main: matched Delete command");
            cmd_delete(&config, &id).await
        }
    }
}

/// Build the repository without generation support
fn build_repository(config: &Config) -> Result<TripRepository> {
    debug!("build_repository: called");
    let state = StateManager::spawn(&config.storage.db_path)?;
    let geocode = Arc::new(GeocodeClient::from_config(&config.places)?);
    let images = Arc::new(ImageClient::from_config(&config.places)?);
    let enricher = Enricher::new(geocode, images);
    let prompts = PromptLoader::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    Ok(TripRepository::new(state, enricher, prompts))
}

/// Generate a new trip
async fn cmd_plan(config: &Config, request: TripRequest, no_enrich: bool, format: OutputFormat) -> Result<()> {
    debug!(destinations = ?request.destinations, days = request.days, no_enrich, "cmd_plan: called");
    // Resolve the API key early for a clear error before any network work
    config
        .llm
        .get_api_key()
        .context("LLM API key not found. Check api-key-env or api-key-file in your config.")?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let repo = build_repository(config)?.with_llm(llm, config.llm.max_tokens);

    println!("Planning {} days in {}...", request.days, request.destinations.join(", "));

    let trip = repo.generate(&request, !no_enrich).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trip)?),
        OutputFormat::Text | OutputFormat::Table => {
            println!();
            println!("{} {} ({} days)", "✓".green(), trip.trip_name.bold(), trip.days.len());
            println!("  id: {}", trip.id.cyan());
            for day in &trip.days {
                if day.narrative.is_empty() {
                    println!("  Day {} - {}", day.day_number, day.city);
                } else {
                    println!("  Day {} - {}: {}", day.day_number, day.city, day.narrative);
                }
            }
            println!();
            println!("Full itinerary: wp show {}", trip.id);
        }
    }

    Ok(())
}

/// List stored trips
async fn cmd_trips(config: &Config, sort: TripSort, query: Option<&str>, format: OutputFormat) -> Result<()> {
    debug!(%sort, ?query, ?format, "cmd_trips: called");
    let repo = build_repository(config)?;
    let trips = repo.list(sort, query).await?;

    if trips.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Text | OutputFormat::Table => println!("No trips found"),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trips)?),
        OutputFormat::Table => {
            println!(
                "{:<38} {:<26} {:<22} {:>4}  {:<16} {}",
                "ID", "NAME", "DESTINATIONS", "DAYS", "CREATED", "SAVED"
            );
            for trip in &trips {
                println!(
                    "{:<38} {:<26} {:<22} {:>4}  {:<16} {}",
                    trip.id,
                    truncate(&trip.trip_name, 24),
                    truncate(&trip.destinations, 20),
                    trip.days,
                    format_created(trip.created_at),
                    if trip.saved { "★" } else { "" }
                );
            }
        }
        OutputFormat::Text => {
            for trip in &trips {
                let marker = if trip.saved { "★" } else { " " };
                println!(
                    "{} {}  {}  {}  {}",
                    marker.yellow(),
                    trip.id.cyan(),
                    format_created(trip.created_at).dimmed(),
                    trip.trip_name,
                    format!("{}, {} days", trip.destinations, trip.days).dimmed(),
                );
            }
        }
    }

    Ok(())
}

/// Show a stored trip's itinerary
async fn cmd_show(config: &Config, id: &str, day_filter: Option<u32>, format: OutputFormat) -> Result<()> {
    debug!(%id, ?day_filter, ?format, "cmd_show: called");
    let repo = build_repository(config)?;
    let mut trip = repo.get(id).await?;

    if let Some(wanted) = day_filter {
        trip.days.retain(|day| day.day_number == wanted);
        if trip.days.is_empty() {
            return Err(eyre::eyre!("Trip {} has no day {}", id, wanted));
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trip)?),
        OutputFormat::Text | OutputFormat::Table => print_trip(&trip),
    }

    Ok(())
}

/// Print map markers for a stored trip
async fn cmd_map(config: &Config, id: &str, day_filter: Option<u32>, format: OutputFormat) -> Result<()> {
    debug!(%id, ?day_filter, ?format, "cmd_map: called");
    let repo = build_repository(config)?;
    let markers = repo.markers(id, day_filter).await?;

    if markers.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Text | OutputFormat::Table => {
                let scope = day_filter.map(|d| format!(" on day {}", d)).unwrap_or_default();
                println!("No located activities{}", scope);
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&markers)?),
        OutputFormat::Table => {
            println!("{:>3}  {:<6} {:>10} {:>11}  {}", "DAY", "ICON", "LAT", "LNG", "LABEL");
            for marker in &markers {
                println!(
                    "{:>3}  {:<6} {:>10.5} {:>11.5}  {}",
                    marker.day,
                    marker.icon.to_string(),
                    marker.lat,
                    marker.lng,
                    marker.label
                );
            }
        }
        OutputFormat::Text => {
            for marker in &markers {
                println!(
                    "day {}  {}  ({:.5}, {:.5})  {}",
                    marker.day,
                    marker.icon,
                    marker.lat,
                    marker.lng,
                    marker.label.bold()
                );
            }
        }
    }

    Ok(())
}

/// Look up city suggestions
async fn cmd_cities(config: &Config, query: &str) -> Result<()> {
    debug!(%query, "cmd_cities: called");
    let geocode = GeocodeClient::from_config(&config.places)?;
    let suggestions = geocode.search_cities(query).await?;

    if suggestions.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    for suggestion in suggestions {
        println!("{}", suggestion.label());
    }

    Ok(())
}

/// Re-run enrichment on a stored trip
async fn cmd_enrich(config: &Config, id: &str) -> Result<()> {
    debug!(%id, "cmd_enrich: called");
    let repo = build_repository(config)?;
    let (trip, outcome) = repo.re_enrich(id).await?;

    println!(
        "{} Enriched {}: {} coordinates and {} images filled, {} lookups failed",
        "✓".green(),
        trip.trip_name.bold(),
        outcome.coords_resolved,
        outcome.images_resolved,
        outcome.lookups_failed
    );

    Ok(())
}

/// Set or clear the saved flag
async fn cmd_set_saved(config: &Config, id: &str, saved: bool) -> Result<()> {
    debug!(%id, saved, "cmd_set_saved: called");
    let repo = build_repository(config)?;

    if saved {
        repo.save(id).await?;
        println!("{} Saved trip: {}", "✓".green(), id.cyan());
    } else {
        repo.unsave(id).await?;
        println!("{} Unsaved trip: {}", "✓".green(), id.cyan());
    }

    Ok(())
}

/// Delete a stored trip
async fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    debug!(%id, "cmd_delete: called");
    let repo = build_repository(config)?;
    repo.delete(id).await?;
    println!("{} Deleted trip: {}", "✓".green(), id.cyan());

    Ok(())
}

/// Render a trip as an indented timeline
fn print_trip(trip: &Trip) {
    println!("{} ({})", trip.trip_name.bold(), trip.destination_label());
    for day in &trip.days {
        println!();
        println!("{}", format!("Day {} - {}", day.day_number, day.city).cyan());
        if !day.narrative.is_empty() {
            println!("  {}", day.narrative.italic());
        }
        for section in &day.sections {
            println!("  {}", section.time_of_day.bold());
            for activity in &section.activities {
                print_activity(activity);
            }
        }
    }
}

fn print_activity(activity: &Activity) {
    let heading = activity
        .place_name
        .as_deref()
        .or(activity.title.as_deref())
        .unwrap_or("(unnamed)");

    let mut line = String::from("    ");
    if let Some(time) = &activity.time {
        line.push_str(&format!("{}  ", time));
    }
    line.push_str(&format!("{} [{}]", heading, activity.kind));
    if let Some(duration) = &activity.estimated_duration {
        line.push_str(&format!(" ({})", duration));
    }
    println!("{}", line);

    if let Some(description) = &activity.description {
        println!("          {}", description.dimmed());
    }
    if let Some(tip) = &activity.insider_tip {
        println!("          {} {}", "tip:".yellow(), tip.dimmed());
    }
    if let Some(options) = &activity.options {
        for option in options {
            let pick = if option.recommended { ">" } else { "-" };
            let mut opt_line = format!("          {} {}", pick, option.name);
            if let Some(price) = &option.price_level {
                opt_line.push_str(&format!(" {}", price));
            }
            if let Some(tag) = &option.tag {
                opt_line.push_str(&format!(" ({})", tag));
            }
            println!("{}", opt_line);
        }
    }
}

fn format_created(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
