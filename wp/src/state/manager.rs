//! StateManager actor
//!
//! Owns the TripStore and serializes all access to it through a command
//! channel. Clones of the handle are cheap and safe to share across tasks;
//! the SQLite connection itself never leaves the actor.

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{debug, info};
use tripstore::{StoreStats, TripRecord, TripStore};

use crate::state::messages::{StateCommand, StateError, StateResponse};

/// Handle to the state actor
///
/// All methods send a command and await the reply. Dropping every handle
/// closes the channel and stops the actor.
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor backed by the store at `db_path`
    pub fn spawn(db_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(db_path = %db_path.as_ref().display(), "spawn: called");
        let store = TripStore::open(db_path.as_ref())?;

        let (tx, rx) = mpsc::channel(256);

        // Spawn the actor task
        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");
        Ok(Self { tx })
    }

    /// Store a trip record, returning its id
    pub async fn put_trip(&self, record: TripRecord) -> StateResponse<String> {
        debug!(trip_id = %record.id, trip_name = %record.trip_name, "put_trip: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::PutTrip {
                record,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Get a trip record by id
    pub async fn get_trip(&self, id: &str) -> StateResponse<Option<TripRecord>> {
        debug!(%id, "get_trip: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::GetTrip {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Get a trip record by id, returning an error if not found
    pub async fn get_trip_required(&self, id: &str) -> Result<TripRecord, StateError> {
        debug!(%id, "get_trip_required: called");
        self.get_trip(id)
            .await?
            .ok_or_else(|| StateError::NotFound(format!("Trip {}", id)))
    }

    /// List all trip records, newest first
    pub async fn list_trips(&self) -> StateResponse<Vec<TripRecord>> {
        debug!("list_trips: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::ListTrips { reply: reply_tx })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Delete a trip record by id
    pub async fn delete_trip(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_trip: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::DeleteTrip {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Set or clear the saved flag on a trip
    pub async fn set_saved(&self, id: &str, saved: bool) -> StateResponse<()> {
        debug!(%id, saved, "set_saved: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::SetSaved {
                id: id.to_string(),
                saved,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Get store-wide counters
    pub async fn stats(&self) -> StateResponse<StoreStats> {
        debug!("stats: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(StateCommand::Stats { reply: reply_tx })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Stop the actor
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

/// The actor loop that owns the TripStore and processes commands
async fn actor_loop(store: TripStore, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::PutTrip { record, reply } => {
                debug!(trip_id = %record.id, "actor_loop: PutTrip command");
                let result = store
                    .put(&record)
                    .map(|_| record.id.clone())
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::GetTrip { id, reply } => {
                debug!(%id, "actor_loop: GetTrip command");
                let result = store.get(&id).map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::ListTrips { reply } => {
                debug!("actor_loop: ListTrips command");
                let result = store.list().map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::DeleteTrip { id, reply } => {
                debug!(%id, "actor_loop: DeleteTrip command");
                let result = match store.delete(&id) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(StateError::NotFound(format!("Trip {}", id))),
                    Err(e) => Err(StateError::StoreError(e.to_string())),
                };
                let _ = reply.send(result);
            }

            StateCommand::SetSaved { id, saved, reply } => {
                debug!(%id, saved, "actor_loop: SetSaved command");
                let result = match store.set_saved(&id, saved) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(StateError::NotFound(format!("Trip {}", id))),
                    Err(e) => Err(StateError::StoreError(e.to_string())),
                };
                let _ = reply.send(result);
            }

            StateCommand::Stats { reply } => {
                debug!("actor_loop: Stats command");
                let result = store.stats().map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: &str, name: &str) -> TripRecord {
        TripRecord::new(id, name, "Lisbon", r#"{"tripName":"x"}"#)
    }

    #[tokio::test]
    async fn test_state_manager_put_and_get() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path().join("trips.db")).unwrap();

        let id = manager.put_trip(record("trip-1", "Lisbon Weekend")).await.unwrap();
        assert_eq!(id, "trip-1");

        let retrieved = manager.get_trip("trip-1").await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().trip_name, "Lisbon Weekend");

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_get_nonexistent() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path().join("trips.db")).unwrap();

        let result = manager.get_trip("nonexistent").await.unwrap();
        assert!(result.is_none());

        let err = manager.get_trip_required("nonexistent").await.unwrap_err();
        assert!(matches!(err, StateError::NotFound(_)));

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_list() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path().join("trips.db")).unwrap();

        manager.put_trip(record("trip-1", "First")).await.unwrap();
        manager.put_trip(record("trip-2", "Second")).await.unwrap();

        let trips = manager.list_trips().await.unwrap();
        assert_eq!(trips.len(), 2);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_delete() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path().join("trips.db")).unwrap();

        manager.put_trip(record("trip-1", "Doomed")).await.unwrap();
        manager.delete_trip("trip-1").await.unwrap();

        assert!(manager.get_trip("trip-1").await.unwrap().is_none());

        let err = manager.delete_trip("trip-1").await.unwrap_err();
        assert!(matches!(err, StateError::NotFound(_)));

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_set_saved() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path().join("trips.db")).unwrap();

        manager.put_trip(record("trip-1", "Keeper")).await.unwrap();
        manager.set_saved("trip-1", true).await.unwrap();

        let retrieved = manager.get_trip("trip-1").await.unwrap().unwrap();
        assert!(retrieved.saved);

        let stats = manager.stats().await.unwrap();
        assert_eq!(stats.trip_count, 1);
        assert_eq!(stats.saved_count, 1);

        manager.shutdown().await.unwrap();
    }
}
