//! TripStore - SQLite-backed trip persistence
//!
//! One table, one row per trip. The itinerary itself is stored as an opaque
//! JSON blob; the remaining columns exist so listings and sorting never have
//! to parse blobs.
//!
//! # Schema
//!
//! ```text
//! trips
//! ├── id            TEXT PRIMARY KEY
//! ├── trip_name     TEXT
//! ├── destinations  TEXT      -- display string, ", "-joined
//! ├── created_at    INTEGER   -- unix millis
//! ├── saved         INTEGER   -- user bookmark flag
//! └── trip_json     TEXT      -- serialized itinerary tree
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tripstore::{TripRecord, TripStore};
//!
//! let store = TripStore::open("trips.db")?;
//! store.put(&TripRecord::new("0192...", "Tokyo Adventure", "Tokyo", json))?;
//! let all = store.list()?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{StoreStats, TripId, TripRecord, TripStore};

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;
