//! State manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;
use tripstore::{StoreStats, TripRecord};

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    PutTrip {
        record: TripRecord,
        reply: oneshot::Sender<StateResponse<String>>,
    },
    GetTrip {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<TripRecord>>>,
    },
    ListTrips {
        reply: oneshot::Sender<StateResponse<Vec<TripRecord>>>,
    },
    DeleteTrip {
        id: String,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    SetSaved {
        id: String,
        saved: bool,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    Stats {
        reply: oneshot::Sender<StateResponse<StoreStats>>,
    },

    // Shutdown
    Shutdown,
}
