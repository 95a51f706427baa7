//! Trip repository
//!
//! Orchestrates the full trip lifecycle: prompt rendering, LLM completion,
//! reply decoding, enrichment, and persistence. Commands that only browse
//! stored trips construct the repository without an LLM client; `generate`
//! is the one operation that requires one.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::{debug, info, warn};
use tripstore::TripRecord;
use uuid::Uuid;

use crate::enrich::{EnrichOutcome, Enricher};
use crate::itinerary::{MapMarker, Trip, TripRequest, map_markers, trip_from_reply};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::PromptLoader;
use crate::state::StateManager;

/// System prompt for itinerary generation
const SYSTEM_PROMPT: &str = "You are a travel planning assistant. You design realistic \
day-by-day itineraries and always reply with a single JSON object, never markdown.";

/// Sort order for trip listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripSort {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Alphabetical by trip name
    Name,
}

impl FromStr for TripSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(TripSort::Newest),
            "oldest" => Ok(TripSort::Oldest),
            "name" => Ok(TripSort::Name),
            _ => Err(format!("Invalid sort order: {} (expected newest, oldest, or name)", s)),
        }
    }
}

impl fmt::Display for TripSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripSort::Newest => write!(f, "newest"),
            TripSort::Oldest => write!(f, "oldest"),
            TripSort::Name => write!(f, "name"),
        }
    }
}

/// One row of a trip listing
///
/// Built from the stored record plus a decode of the itinerary blob, so
/// listings can show day counts without callers re-decoding.
#[derive(Debug, Clone, Serialize)]
pub struct TripSummary {
    pub id: String,
    pub trip_name: String,
    pub destinations: String,
    pub days: usize,
    pub created_at: i64,
    pub saved: bool,
}

/// Repository over generated and stored trips
pub struct TripRepository {
    llm: Option<Arc<dyn LlmClient>>,
    state: StateManager,
    enricher: Enricher,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl TripRepository {
    /// Create a repository without generation support
    pub fn new(state: StateManager, enricher: Enricher, prompts: PromptLoader) -> Self {
        Self {
            llm: None,
            state,
            enricher,
            prompts,
            max_tokens: 0,
        }
    }

    /// Attach an LLM client, enabling `generate`
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        self.llm = Some(llm);
        self.max_tokens = max_tokens;
        self
    }

    /// Generate a new trip from a request
    ///
    /// Renders the itinerary prompt, asks the model for a JSON itinerary,
    /// decodes it, assigns a fresh id, optionally enriches, persists, and
    /// returns the finished trip.
    pub async fn generate(&self, request: &TripRequest, enrich: bool) -> Result<Trip> {
        debug!(destinations = ?request.destinations, days = request.days, enrich, "generate: called");
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| eyre!("No LLM client configured; generation is unavailable"))?;

        let prompt = self.prompts.itinerary_prompt(request)?;
        debug!(prompt_len = prompt.len(), "generate: prompt rendered");

        let completion = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            json_mode: true,
        };

        let response = llm.complete(completion).await?;
        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generate: completion received"
        );

        let reply = response.content.as_deref().unwrap_or_default();
        let mut trip = trip_from_reply(reply).context("Model reply did not contain a decodable itinerary")?;

        // The model never supplies the id
        trip.id = Uuid::now_v7().to_string();
        if trip.destinations.is_empty() {
            trip.destinations = request.destinations.clone();
        }

        if enrich {
            let (enriched, outcome) = self.enricher.enrich(trip).await;
            debug!(?outcome, "generate: enrichment finished");
            trip = enriched;
        }

        self.persist(&trip, false, None).await?;
        info!(trip_id = %trip.id, trip_name = %trip.trip_name, "generate: trip stored");
        Ok(trip)
    }

    /// Load a trip by id, decoding the stored blob
    pub async fn get(&self, id: &str) -> Result<Trip> {
        debug!(%id, "get: called");
        let record = self.state.get_trip_required(id).await?;
        decode_record(&record)
    }

    /// List stored trips as summaries, sorted and optionally filtered
    ///
    /// The filter matches trip name or destinations, case-insensitive.
    /// Records whose blob no longer decodes are skipped with a warning.
    pub async fn list(&self, sort: TripSort, query: Option<&str>) -> Result<Vec<TripSummary>> {
        debug!(%sort, ?query, "list: called");
        let records = self.state.list_trips().await?;

        let needle = query.map(|q| q.to_lowercase());
        let mut summaries: Vec<TripSummary> = records
            .into_iter()
            .filter(|record| match &needle {
                Some(q) => {
                    record.trip_name.to_lowercase().contains(q) || record.destinations.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter_map(|record| match decode_record(&record) {
                Ok(trip) => Some(TripSummary {
                    id: record.id,
                    trip_name: record.trip_name,
                    destinations: record.destinations,
                    days: trip.days.len(),
                    created_at: record.created_at,
                    saved: record.saved,
                }),
                Err(e) => {
                    warn!(trip_id = %record.id, error = %e, "list: skipping trip with undecodable blob");
                    None
                }
            })
            .collect();

        match sort {
            TripSort::Newest => summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            TripSort::Oldest => summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            TripSort::Name => summaries.sort_by(|a, b| a.trip_name.to_lowercase().cmp(&b.trip_name.to_lowercase())),
        }

        Ok(summaries)
    }

    /// Delete a stored trip
    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!(%id, "delete: called");
        self.state.delete_trip(id).await?;
        Ok(())
    }

    /// Mark a trip as saved
    pub async fn save(&self, id: &str) -> Result<()> {
        debug!(%id, "save: called");
        self.state.set_saved(id, true).await?;
        Ok(())
    }

    /// Clear the saved flag on a trip
    pub async fn unsave(&self, id: &str) -> Result<()> {
        debug!(%id, "unsave: called");
        self.state.set_saved(id, false).await?;
        Ok(())
    }

    /// Re-run enrichment on a stored trip to fill remaining gaps
    ///
    /// Only coordinates and image URLs change; id, timestamps, and the saved
    /// flag are preserved.
    pub async fn re_enrich(&self, id: &str) -> Result<(Trip, EnrichOutcome)> {
        debug!(%id, "re_enrich: called");
        let record = self.state.get_trip_required(id).await?;
        let trip = decode_record(&record)?;

        let (enriched, outcome) = self.enricher.enrich(trip).await;
        self.persist(&enriched, record.saved, Some(record.created_at)).await?;

        info!(trip_id = %id, ?outcome, "re_enrich: trip updated");
        Ok((enriched, outcome))
    }

    /// Map markers for a stored trip, optionally limited to one day
    pub async fn markers(&self, id: &str, day_filter: Option<u32>) -> Result<Vec<MapMarker>> {
        debug!(%id, ?day_filter, "markers: called");
        let trip = self.get(id).await?;
        Ok(map_markers(&trip, day_filter))
    }

    /// Serialize and store a trip, preserving metadata when updating
    async fn persist(&self, trip: &Trip, saved: bool, created_at: Option<i64>) -> Result<()> {
        let trip_json = serde_json::to_string(trip).context("Failed to serialize trip")?;
        let mut record = TripRecord::new(&trip.id, &trip.trip_name, trip.destination_label(), trip_json);
        record.saved = saved;
        if let Some(ts) = created_at {
            record.created_at = ts;
        }
        self.state.put_trip(record).await?;
        Ok(())
    }
}

/// Decode the stored itinerary blob on a record
fn decode_record(record: &TripRecord) -> Result<Trip> {
    serde_json::from_str(&record.trip_json)
        .with_context(|| format!("Failed to decode stored trip {}", record.id))
}
