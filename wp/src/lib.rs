//! wayplan - LLM travel itinerary planner
//!
//! wayplan turns a short trip request into a full day-by-day itinerary: a
//! remote LLM drafts the plan as JSON, a tolerant decoder turns the reply
//! into a typed itinerary tree, and an enrichment pass fills in missing
//! coordinates (Photon) and images (Wikipedia) before the trip is persisted
//! to SQLite.
//!
//! # Core Concepts
//!
//! - **Tolerant decode**: model replies are messy; extraction trims to the
//!   outermost JSON and unknown keys are ignored
//! - **Fill, never overwrite**: enrichment only resolves fields the model
//!   left empty
//! - **Lookups fan out**: days enrich concurrently, per-activity lookups run
//!   in parallel, and a failed lookup never fails the trip
//! - **State behind an actor**: the SQLite store is owned by one task; the
//!   async side talks to it over channels
//!
//! # Modules
//!
//! - [`itinerary`] - Trip domain model, reply extraction, map markers
//! - [`llm`] - LLM client trait and OpenRouter implementation
//! - [`places`] - Photon geocoding and Wikipedia image lookups
//! - [`enrich`] - Concurrent itinerary enrichment
//! - [`trips`] - Trip repository orchestrating the full lifecycle
//! - [`state`] - Store actor wrapping tripstore
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod enrich;
pub mod itinerary;
pub mod llm;
pub mod places;
pub mod prompts;
pub mod state;
pub mod trips;

// Re-export commonly used types
pub use config::{Config, LlmConfig, PlacesConfig};
pub use enrich::{EnrichOutcome, Enricher};
pub use itinerary::{
    Activity, ActivityKind, ActivityOption, BudgetTier, Coordinates, Day, DietOption, Interest, MapMarker, MarkerIcon,
    Section, TravelerType, Trip, TripRequest, extract_json, map_markers, trip_from_reply,
};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenRouterClient, create_client};
pub use places::{CitySuggestion, GeocodeClient, ImageClient, PlacesError};
pub use prompts::{PromptContext, PromptLoader};
pub use state::{StateCommand, StateError, StateManager, StateResponse};
pub use trips::{TripRepository, TripSort, TripSummary};
