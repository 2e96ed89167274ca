//! # Dining Sessions
//!
//! A [`Session`] is one seated party. It carries only what it needs to give its
//! resources back: the [`Reservation`] (table class, menu, group size) and how
//! long the party stays.
//!
//! ## Lifecycle
//!
//! 1. The admission controller reserves a table, food and clean cutlery.
//! 2. It hands the session to a [`SessionSpawner`], which runs it as its own task.
//! 3. The session sleeps for its hold duration with no lock held.
//! 4. In one transaction it frees the table, returns its cutlery dirty and
//!    counts the guests as served.
//!
//! A session already dining when shutdown starts still runs to completion.
//! [`SessionSpawner::join_all`] waits for every one of them.

mod error;
pub mod mock;

pub use error::*;

use crate::admission::Reservation;
use crate::ledger::{Ledger, SharedLedger};
use crate::model::Channel;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// A seated party waiting to finish its meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub reservation: Reservation,
    pub hold: Duration,
}

impl Session {
    pub fn new(reservation: Reservation, hold: Duration) -> Self {
        Self { reservation, hold }
    }

    /// Eats, then releases the reservation.
    pub async fn run(self, ledger: SharedLedger) {
        let Reservation { group_size, table, menu } = self.reservation;
        debug!(group_size, %table, %menu, hold_ms = self.hold.as_millis() as u64, "Seated");

        tokio::time::sleep(self.hold).await;

        ledger.transact(|ledger| self.release(ledger));
        debug!(group_size, %table, "Left");
    }

    /// Frees the table, returns the cutlery dirty and counts the guests served.
    pub fn release(&self, ledger: &mut Ledger) {
        let Reservation { group_size, table, menu } = self.reservation;
        ledger.free_table(table);
        for &utensil in menu.utensils() {
            ledger.return_dirty(utensil, group_size);
        }
        ledger.stats_mut().served.add(Channel::DineIn, u64::from(group_size));
    }
}

/// Starts sessions and waits for them at shutdown.
///
/// This is the seam where session creation can fail. The production
/// implementation is [`TokioSpawner`]; [`mock`] has test doubles.
#[async_trait]
pub trait SessionSpawner: Send + Sync + 'static {
    /// Starts `session` as an independent unit of execution.
    fn spawn(&self, session: Session, ledger: SharedLedger) -> Result<(), SpawnError>;

    /// Waits for every session started so far. Returns how many were awaited.
    async fn join_all(&self) -> usize;
}

/// Runs each session as a Tokio task tracked in a [`JoinSet`].
#[derive(Debug, Clone, Default)]
pub struct TokioSpawner {
    sessions: Arc<Mutex<JoinSet<()>>>,
    max_active: Option<usize>,
}

impl TokioSpawner {
    /// A spawner that refuses new sessions once `max_active` are dining.
    pub fn new(max_active: Option<usize>) -> Self {
        Self {
            sessions: Arc::default(),
            max_active,
        }
    }

    /// Sessions started and not yet reaped.
    pub fn active(&self) -> usize {
        let mut sessions = self.sessions();
        reap_finished(&mut sessions);
        sessions.len()
    }

    fn sessions(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionSpawner for TokioSpawner {
    fn spawn(&self, session: Session, ledger: SharedLedger) -> Result<(), SpawnError> {
        let runtime = Handle::try_current().map_err(|_| SpawnError::NoRuntime)?;
        let mut sessions = self.sessions();
        reap_finished(&mut sessions);
        if let Some(limit) = self.max_active {
            if sessions.len() >= limit {
                return Err(SpawnError::AtCapacity { limit });
            }
        }
        sessions.spawn_on(session.run(ledger), &runtime);
        Ok(())
    }

    async fn join_all(&self) -> usize {
        let mut joined = 0;
        loop {
            // Take the set out so the lock is not held across `.await`.
            let mut pending = std::mem::take(&mut *self.sessions());
            if pending.is_empty() {
                return joined;
            }
            while let Some(result) = pending.join_next().await {
                log_failure(result);
                joined += 1;
            }
        }
    }
}

fn reap_finished(sessions: &mut JoinSet<()>) {
    while let Some(result) = sessions.try_join_next() {
        log_failure(result);
    }
}

fn log_failure(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Session task failed");
    }
}
