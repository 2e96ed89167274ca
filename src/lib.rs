//! # Restaurant Simulation
//!
//! > **Shared-resource concurrency, one restaurant at a time.**
//!
//! A concurrent simulation of a restaurant. Customer parties arrive over time and
//! either dine in (a table, food and clean cutlery for the whole group) or buy a
//! takeout meal. A supplier restocks the pantry, a dishwasher cleans cutlery and
//! a dashboard reports state while everything runs. At the end a report
//! summarises traffic, consumption and kitchen work.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One Ledger, Many Roles
//!
//! Every mutable pool (tables, pantry, cutlery, statistics) lives in a single
//! [`Ledger`](ledger::Ledger) behind one lock. Every role changes it through
//! short, synchronous transactions that never await:
//! - **No partial reservations**: a dine-in party gets all of its table, food
//!   and cutlery or none of it.
//! - **No overcommit**: two concurrent admissions can never both take the last
//!   unit of anything.
//! - **Consistent snapshots**: the dashboard and the final report read the
//!   ledger in one acquisition.
//!
//! ### Cooperative Shutdown
//!
//! A [`RunFlag`](lifecycle::RunFlag) is checked at the top of every loop. A
//! delivery in transit, a wash in progress or a party mid-meal always finishes
//! before its role exits.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The State ([`model`], [`config`], [`ledger`])
//! - **Role**: the vocabulary (tables, food, cutlery, menus), the read-only
//!   configuration, and the shared ledger with its statistics.
//! - **Key items**: [`Config`](config::Config), [`Ledger`](ledger::Ledger),
//!   [`SharedLedger`](ledger::SharedLedger).
//!
//! ### 2. The Front of House ([`admission`], [`session`], [`arrivals`])
//! - **Role**: decide each arrival, run each seated party as its own task, and
//!   generate the arrival stream.
//! - **Key items**: [`AdmissionController`](admission::AdmissionController),
//!   [`SessionSpawner`](session::SessionSpawner), [`ArrivalGenerator`](arrivals::ArrivalGenerator).
//!
//! ### 3. The Back of House ([`supplier`], [`dishwasher`])
//! - **Role**: the periodic restocking and cleaning loops.
//! - **Key items**: [`Supplier`](supplier::Supplier), [`Dishwasher`](dishwasher::Dishwasher).
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`dashboard`], [`report`])
//! - **Role**: start and stop every role, watch them run, and summarise the
//!   final state.
//! - **Key items**: [`Restaurant`](lifecycle::Restaurant), [`Report`](report::Report).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Thirty seconds with the smart supplier and a fixed seed
//! RUST_LOG=info cargo run -- --supplier-mode smart --duration 30 --seed 7
//!
//! # Load a TOML configuration, print the report as JSON
//! cargo run -- --config restaurant.toml --json
//! ```
//!
//! See the [`lifecycle::tracing`] module for what each log level shows.
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod admission;
pub mod arrivals;
pub mod config;
pub mod dashboard;
pub mod dishwasher;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod session;
pub mod supplier;
