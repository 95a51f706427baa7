//! Core TripStore implementation

use eyre::{Context, Result, eyre};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::SCHEMA_VERSION;

/// Unique identifier for a stored trip
pub type TripId = String;

/// A single row in the trips table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique trip ID
    pub id: TripId,
    /// Display name of the trip
    pub trip_name: String,
    /// Destinations as a display string (", "-joined)
    pub destinations: String,
    /// Creation timestamp (unix ms)
    pub created_at: i64,
    /// User bookmark flag
    pub saved: bool,
    /// Serialized itinerary tree
    pub trip_json: String,
}

impl TripRecord {
    /// Build a record stamped with the current time
    pub fn new(
        id: impl Into<String>,
        trip_name: impl Into<String>,
        destinations: impl Into<String>,
        trip_json: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            trip_name: trip_name.into(),
            destinations: destinations.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
            saved: false,
            trip_json: trip_json.into(),
        }
    }
}

/// Summary counters for the stats command
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Total trips stored
    pub trip_count: u64,
    /// Trips with the saved flag set
    pub saved_count: u64,
}

/// The trip store, a thin wrapper over one SQLite connection
pub struct TripStore {
    conn: Connection,
}

impl TripStore {
    /// Open or create a trip store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let conn = Connection::open(path).context(format!("Failed to open database: {}", path.display()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        // journal_mode returns the new mode as a row, so query_row it
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

        let store = Self { conn };
        store.init_schema()?;
        debug!(path = %path.display(), "Opened trip store");
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let version: i32 = self.conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version > SCHEMA_VERSION {
            return Err(eyre!(
                "Database schema version {} is newer than supported version {}",
                version,
                SCHEMA_VERSION
            ));
        }

        if version < SCHEMA_VERSION {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS trips (
                    id           TEXT PRIMARY KEY,
                    trip_name    TEXT NOT NULL,
                    destinations TEXT NOT NULL,
                    created_at   INTEGER NOT NULL,
                    saved        INTEGER NOT NULL DEFAULT 0,
                    trip_json    TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_trips_created_at ON trips(created_at);",
            )?;
            self.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            info!(version = SCHEMA_VERSION, "Initialized trips schema");
        }

        Ok(())
    }

    /// Insert or replace a trip (save and update share this path)
    pub fn put(&self, record: &TripRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO trips (id, trip_name, destinations, created_at, saved, trip_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.trip_name,
                    record.destinations,
                    record.created_at,
                    record.saved,
                    record.trip_json,
                ],
            )
            .context(format!("Failed to store trip: {}", record.id))?;
        debug!(id = %record.id, "Stored trip");
        Ok(())
    }

    /// Fetch one trip by ID
    pub fn get(&self, id: &str) -> Result<Option<TripRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, trip_name, destinations, created_at, saved, trip_json
                 FROM trips WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All trips, newest first
    pub fn list(&self) -> Result<Vec<TripRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, trip_name, destinations, created_at, saved, trip_json
             FROM trips ORDER BY created_at DESC",
        )?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Delete a trip; returns whether a row was removed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM trips WHERE id = ?1", params![id])?;
        if rows > 0 {
            info!(id, "Deleted trip");
        }
        Ok(rows > 0)
    }

    /// Flip the saved flag; returns whether the trip exists
    pub fn set_saved(&self, id: &str, saved: bool) -> Result<bool> {
        let rows = self
            .conn
            .execute("UPDATE trips SET saved = ?1 WHERE id = ?2", params![saved, id])?;
        Ok(rows > 0)
    }

    /// Number of trips stored
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counters for the stats command
    pub fn stats(&self) -> Result<StoreStats> {
        let trip_count = self.count()?;
        let saved_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trips WHERE saved = 1", [], |row| row.get(0))?;
        Ok(StoreStats {
            trip_count,
            saved_count: saved_count as u64,
        })
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<TripRecord> {
    Ok(TripRecord {
        id: row.get(0)?,
        trip_name: row.get(1)?,
        destinations: row.get(2)?,
        created_at: row.get(3)?,
        saved: row.get(4)?,
        trip_json: row.get(5)?,
    })
}
