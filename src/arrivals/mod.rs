//! # Arrival Generator
//!
//! A timer-driven loop that produces one party at a time and hands it to the
//! [`AdmissionController`]. All randomness lives here: the gap between
//! arrivals, the group size, takeout vs. dine-in, the menu and how long a
//! seated party stays. The controller and the sessions it spawns are
//! deterministic given an [`Arrival`].
//!
//! When the run flag drops the generator stops producing arrivals and waits for
//! every session it started before returning, so joining this task also joins
//! all dining parties.

use crate::admission::{Admission, AdmissionController, Arrival, Order};
use crate::config::CustomerConfig;
use crate::lifecycle::RunFlag;
use crate::model::Menu;
use crate::session::SessionSpawner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::info;

/// Draws the next party.
pub fn draw_arrival<R: Rng>(rng: &mut R, customers: &CustomerConfig) -> Arrival {
    let group_size = rng.gen_range(customers.group_sizes());
    let takeout = rng.gen_ratio(u32::from(customers.takeout_percent), 100);
    let order = if takeout {
        Order::Takeout
    } else {
        let menu = if rng.gen_bool(0.5) { Menu::Soup } else { Menu::MainCourse };
        let hold = Duration::from_millis(rng.gen_range(customers.dining_ms()));
        Order::DineIn { menu, hold }
    };
    Arrival { group_size, order }
}

/// Counts kept by the generator for its own shutdown log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalTally {
    pub arrivals: u64,
    pub seated: u64,
    pub taken_away: u64,
    pub rejected: u64,
}

impl ArrivalTally {
    fn record(&mut self, admission: &Admission) {
        self.arrivals += 1;
        match admission {
            Admission::Seated(_) => self.seated += 1,
            Admission::TakenAway(_) => self.taken_away += 1,
            Admission::Rejected { .. } => self.rejected += 1,
        }
    }
}

/// The customer-arrival role.
pub struct ArrivalGenerator<S> {
    controller: AdmissionController<S>,
    run_flag: RunFlag,
    customers: CustomerConfig,
    rng: StdRng,
}

impl<S: SessionSpawner> ArrivalGenerator<S> {
    /// `seed` makes the arrival stream reproducible; `None` uses OS entropy.
    pub fn new(
        controller: AdmissionController<S>,
        run_flag: RunFlag,
        customers: CustomerConfig,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            controller,
            run_flag,
            customers,
            rng,
        }
    }

    /// Admits arrivals until the run flag drops, then waits for every session.
    pub async fn run(mut self) -> ArrivalTally {
        info!(
            role = "arrivals",
            group_min = self.customers.group_min,
            group_max = self.customers.group_max,
            takeout_percent = self.customers.takeout_percent,
            "Started"
        );

        let mut tally = ArrivalTally::default();
        while self.run_flag.is_running() {
            let gap = self.rng.gen_range(self.customers.arrival_gap_ms());
            tokio::time::sleep(Duration::from_millis(gap)).await;

            let arrival = draw_arrival(&mut self.rng, &self.customers);
            let admission = self.controller.admit(arrival);
            tally.record(&admission);
        }

        info!(role = "arrivals", "Waiting for seated parties");
        let joined = self.controller.finish().await;
        info!(
            role = "arrivals",
            arrivals = tally.arrivals,
            seated = tally.seated,
            taken_away = tally.taken_away,
            rejected = tally.rejected,
            sessions_joined = joined,
            "Stopped"
        );
        tally
    }
}
