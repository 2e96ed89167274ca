//! # Mock Spawners
//!
//! Test doubles for [`SessionSpawner`] so admission logic can be exercised
//! without real timers.
//!
//! - [`FailingSpawner`] refuses every session, driving the rollback path.
//! - [`RecordingSpawner`] keeps sessions instead of running them. Calling
//!   [`join_all`](SessionSpawner::join_all) releases them all at once, as if
//!   every party finished its meal at that instant.
//!
//! # Example
//! ```ignore
//! let spawner = RecordingSpawner::new();
//! let controller = AdmissionController::new(ledger.clone(), spawner.clone());
//! controller.admit(arrival);
//! assert_eq!(spawner.sessions().len(), 1);
//! spawner.join_all().await; // tables and cutlery come back
//! ```

use super::{Session, SessionSpawner, SpawnError};
use crate::ledger::SharedLedger;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Fails every spawn with the given error.
#[derive(Debug, Clone)]
pub struct FailingSpawner {
    error: SpawnError,
}

impl FailingSpawner {
    pub fn new(error: SpawnError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl SessionSpawner for FailingSpawner {
    fn spawn(&self, _session: Session, _ledger: SharedLedger) -> Result<(), SpawnError> {
        Err(self.error.clone())
    }

    async fn join_all(&self) -> usize {
        0
    }
}

/// Records sessions and releases them on [`join_all`](SessionSpawner::join_all).
#[derive(Debug, Clone, Default)]
pub struct RecordingSpawner {
    pending: Arc<Mutex<Vec<(Session, SharedLedger)>>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions spawned and not yet released.
    pub fn sessions(&self) -> Vec<Session> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(session, _)| *session)
            .collect()
    }
}

#[async_trait]
impl SessionSpawner for RecordingSpawner {
    fn spawn(&self, session: Session, ledger: SharedLedger) -> Result<(), SpawnError> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).push((session, ledger));
        Ok(())
    }

    async fn join_all(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        let released = pending.len();
        for (session, ledger) in pending {
            ledger.transact(|ledger| session.release(ledger));
        }
        released
    }
}
