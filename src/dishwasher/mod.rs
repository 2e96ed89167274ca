//! # Dishwasher
//!
//! Washes one dirty utensil per cycle: the first kind with anything dirty, in
//! the order fork, knife, spoon. Never a batch; a cycle with nothing dirty does
//! nothing.

use crate::ledger::{Ledger, SharedLedger};
use crate::lifecycle::RunFlag;
use crate::model::Utensil;
use std::time::Duration;
use tracing::{debug, info};

/// Washes a single utensil, if any is dirty.
pub fn wash_one(ledger: &mut Ledger) -> Option<Utensil> {
    let utensil = Utensil::ALL.into_iter().find(|&utensil| ledger.wash(utensil))?;
    ledger.stats_mut().washed += 1;
    Some(utensil)
}

/// The dishwasher role.
#[derive(Debug)]
pub struct Dishwasher {
    ledger: SharedLedger,
    run_flag: RunFlag,
    wash_time: Duration,
}

impl Dishwasher {
    pub fn new(ledger: SharedLedger, run_flag: RunFlag, wash_time: Duration) -> Self {
        Self {
            ledger,
            run_flag,
            wash_time,
        }
    }

    pub async fn run(self) {
        info!(role = "dishwasher", wash_ms = self.wash_time.as_millis() as u64, "Started");

        let mut washed = 0u64;
        while self.run_flag.is_running() {
            tokio::time::sleep(self.wash_time).await;
            if let Some(utensil) = self.ledger.transact(wash_one) {
                washed += 1;
                debug!(role = "dishwasher", %utensil, "Washed");
            }
        }

        info!(role = "dishwasher", washed, "Stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ledger::Capacity;

    fn soiled(forks: u32, knives: u32, spoons: u32) -> Ledger {
        let mut ledger = Ledger::new(Capacity::from(&Config::default()));
        for (utensil, amount) in [(Utensil::Fork, forks), (Utensil::Knife, knives), (Utensil::Spoon, spoons)] {
            ledger.take_clean(utensil, amount);
            ledger.return_dirty(utensil, amount);
        }
        ledger
    }

    #[test]
    fn test_washes_in_priority_order() {
        let mut ledger = soiled(1, 1, 1);
        assert_eq!(wash_one(&mut ledger), Some(Utensil::Fork));
        assert_eq!(wash_one(&mut ledger), Some(Utensil::Knife));
        assert_eq!(wash_one(&mut ledger), Some(Utensil::Spoon));
        assert_eq!(wash_one(&mut ledger), None);
        assert_eq!(ledger.stats().washed, 3);
    }

    #[test]
    fn test_one_item_per_cycle() {
        let mut ledger = soiled(0, 4, 0);
        wash_one(&mut ledger);
        assert_eq!(ledger.dirty(Utensil::Knife), 3);
        assert_eq!(ledger.stats().washed, 1);
    }

    #[test]
    fn test_nothing_dirty_is_noop() {
        let mut ledger = soiled(0, 0, 0);
        let before = ledger.clone();
        assert_eq!(wash_one(&mut ledger), None);
        assert_eq!(ledger, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dishwasher_loop() {
        let ledger = SharedLedger::new(soiled(2, 0, 1));
        let run_flag = RunFlag::new();
        let handle = tokio::spawn(Dishwasher::new(ledger.clone(), run_flag.clone(), Duration::from_millis(100)).run());

        tokio::time::sleep(Duration::from_millis(250)).await;
        let midway = ledger.snapshot();
        assert_eq!(midway.dirty(Utensil::Fork), 0);
        assert_eq!(midway.dirty(Utensil::Spoon), 1);

        run_flag.stop();
        handle.await.expect("dishwasher task");
        let after = ledger.snapshot();
        assert_eq!(after.dirty(Utensil::Spoon), 0);
        assert_eq!(after.stats().washed, 3);
    }
}
