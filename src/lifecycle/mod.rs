//! # Lifecycle
//!
//! Starting, stopping and observing a run.
//!
//! - [`Restaurant`] wires the shared ledger into every role, spawns them, and
//!   joins them on shutdown.
//! - [`RunFlag`] is the cooperative stop signal every loop checks.
//! - [`tracing`] sets up the subscriber and documents what each role logs.
//!
//! ## Shutdown Order
//!
//! 1. The run flag drops. No new arrivals are produced and no new delivery or
//!    wash starts.
//! 2. The arrival generator waits for every dining session it started.
//! 3. The coordinator joins the supplier, dishwasher, arrivals and dashboard.
//! 4. Only then is the ledger snapshotted for the report.

mod restaurant;
mod run_flag;
pub mod tracing;

pub use restaurant::Restaurant;
pub use run_flag::RunFlag;
pub use self::tracing::setup_tracing;
