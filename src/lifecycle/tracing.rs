//! # Observability & Tracing
//!
//! Every role logs through `tracing` with structured fields. The `role` field
//! (`supplier`, `dishwasher`, `arrivals`) tells the loops apart, so the module
//! path is hidden from the output.
//!
//! ## What Gets Traced
//!
//! - **Role lifecycle** (`info`): start, stop, and final counters
//! - **Dashboard** (`info`): one snapshot line per interval
//! - **Admissions** (`debug`): every seating, takeout and rejection with its reason
//! - **Sessions** (`debug`): seated and left
//! - **Deliveries and washes** (`debug`)
//! - **Rolled-back seatings** (`warn`) and panicked tasks (`error`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and dashboard only
//! RUST_LOG=info cargo run
//!
//! # Every admission decision
//! RUST_LOG=debug cargo run
//!
//! # Only the admission controller
//! RUST_LOG=restaurant_sim::admission=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a busy minute looks like:
//!
//! ```text
//! INFO Started role="supplier" mode=smart delivery_ms=4000
//! DEBUG Seated party group_size=2 table=2-seat menu=main course
//! DEBUG Rejected party group_size=5 channel=dine-in reason="no cutlery"
//! DEBUG Served takeout group_size=1 meal=MeatAndBread
//! DEBUG Washed role="dishwasher" utensil=fork
//! INFO tables 2:3/4 4:1/3 6:0/2 | stock vegetable 22/30 ... served=14 rejected=3 washed=6
//! ```

/// Initializes the tracing subscriber.
///
/// Filtering comes from `RUST_LOG`; output uses the compact formatter without
/// targets. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
