//! # Dashboard
//!
//! A read-only observer. Every interval it takes a consistent snapshot of the
//! ledger (one lock acquisition), reads the supplier's advisory progress, and
//! logs a one-line summary. It never mutates anything.

use crate::ledger::{Ledger, SharedLedger};
use crate::lifecycle::RunFlag;
use crate::model::{Food, TableClass, Utensil};
use crate::supplier::DeliveryProgress;
use std::fmt::Write;
use std::time::Duration;
use tracing::info;

/// Renders a snapshot as `tables 2:1/4 ... | stock vegetable 12/30 ... | cutlery fork 9/2/1 ...`.
///
/// Cutlery columns are clean / in use / dirty.
pub fn render(ledger: &Ledger, progress: u8) -> String {
    let capacity = ledger.capacity();
    let mut line = String::from("tables");
    for class in TableClass::ALL {
        let _ = write!(
            line,
            " {}:{}/{}",
            class.seats(),
            ledger.tables_in_use(class),
            capacity.tables(class)
        );
    }
    line.push_str(" | stock");
    for food in Food::ALL {
        let _ = write!(line, " {food} {}/{}", ledger.stock(food), capacity.food(food));
    }
    line.push_str(" | cutlery");
    for utensil in Utensil::ALL {
        let _ = write!(
            line,
            " {utensil} {}/{}/{}",
            ledger.clean(utensil),
            ledger.in_use(utensil),
            ledger.dirty(utensil)
        );
    }
    let _ = write!(line, " | delivery {progress}%");
    line
}

/// The dashboard role.
#[derive(Debug)]
pub struct Dashboard {
    ledger: SharedLedger,
    progress: DeliveryProgress,
    run_flag: RunFlag,
    interval: Duration,
}

impl Dashboard {
    pub fn new(ledger: SharedLedger, progress: DeliveryProgress, run_flag: RunFlag, interval: Duration) -> Self {
        Self {
            ledger,
            progress,
            run_flag,
            interval,
        }
    }

    pub async fn run(self) {
        while self.run_flag.is_running() {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.run_flag.stopped() => break,
            }
            let snapshot = self.ledger.snapshot();
            let stats = snapshot.stats();
            info!(
                served = stats.served.total(),
                rejected = stats.rejected.total(),
                washed = stats.washed,
                "{}",
                render(&snapshot, self.progress.get())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ledger::Capacity;

    #[test]
    fn test_render_shows_every_pool() {
        let mut config = Config::default();
        config.tables.two_seat = 1;
        let mut ledger = Ledger::new(Capacity::from(&config));
        ledger.take_table(TableClass::TwoSeat);
        ledger.take_clean(Utensil::Spoon, 2);
        ledger.return_dirty(Utensil::Spoon, 1);

        let line = render(&ledger, 40);
        assert!(line.starts_with("tables 2:1/1 4:0/3 6:0/2"));
        assert!(line.contains("disposable 10/10"));
        assert!(line.contains("spoon 10/1/1"));
        assert!(line.ends_with("delivery 40%"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_exits_promptly_on_stop() {
        let ledger = SharedLedger::new(Ledger::new(Capacity::from(&Config::default())));
        let run_flag = RunFlag::new();
        let dashboard = Dashboard::new(ledger, DeliveryProgress::new(), run_flag.clone(), Duration::from_secs(3600));
        let handle = tokio::spawn(dashboard.run());

        run_flag.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("dashboard stopped without waiting for its interval")
            .expect("dashboard task");
    }
}
