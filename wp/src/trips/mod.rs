//! Trip lifecycle orchestration
//!
//! The repository ties prompt rendering, completion, enrichment, and the
//! state actor together behind one API.

mod repository;

pub use repository::{TripRepository, TripSort, TripSummary};
