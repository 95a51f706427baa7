//! Itinerary enrichment
//!
//! Fills in what the model cannot know: real coordinates and image URLs.

mod enricher;

pub use enricher::{EnrichOutcome, Enricher};
