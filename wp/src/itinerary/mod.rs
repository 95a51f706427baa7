//! Itinerary domain model
//!
//! Types for trip requests and generated trips, tolerant decoding of model
//! replies, and map marker extraction.

mod extract;
mod markers;
mod model;

pub use extract::{ExtractError, decode_trip, extract_json, trip_from_reply};
pub use markers::{MapMarker, MarkerIcon, map_markers};
pub use model::{
    Activity, ActivityKind, ActivityOption, BudgetTier, Coordinates, Day, DietOption, Interest, Section, TravelerType,
    Trip, TripRequest,
};
