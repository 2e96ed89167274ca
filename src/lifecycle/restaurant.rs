use crate::admission::AdmissionController;
use crate::arrivals::ArrivalGenerator;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::dishwasher::Dishwasher;
use crate::error::SimError;
use crate::ledger::{Capacity, Ledger, SharedLedger};
use crate::lifecycle::RunFlag;
use crate::session::TokioSpawner;
use crate::supplier::{DeliveryProgress, Supplier};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The coordinator: owns the shared state and every long-lived role.
///
/// `Restaurant` is responsible for:
/// - **Wiring**: building the ledger from the configuration and handing each
///   role its clone of the ledger, run flag and delivery progress
/// - **Lifecycle**: starting the roles, stopping them, and joining them
/// - **Reporting**: taking the final ledger snapshot once nothing else can
///   touch it
///
/// # Roles
///
/// - **Supplier**: periodic restocking, publishes delivery progress
/// - **Dishwasher**: turns dirty cutlery clean one piece at a time
/// - **Arrivals**: generates parties and admits them; joins its dining
///   sessions on the way out
/// - **Dashboard** (optional): logs a snapshot every interval
///
/// # Example
///
/// ```ignore
/// let restaurant = Restaurant::start(&Config::default())?;
/// tokio::time::sleep(Duration::from_secs(30)).await;
/// let ledger = restaurant.shutdown().await?;
/// println!("{}", Report::from(&ledger));
/// ```
pub struct Restaurant {
    ledger: SharedLedger,
    run_flag: RunFlag,
    progress: DeliveryProgress,

    /// Role tasks, named for error reporting.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Restaurant {
    /// Validates `config`, builds a full ledger and starts every role.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| SimError::NoRuntime)?;

        let ledger = SharedLedger::new(Ledger::new(Capacity::from(config)));
        let run_flag = RunFlag::new();
        let progress = DeliveryProgress::new();

        info!(
            supplier = %config.supplier.mode,
            max_active_sessions = ?config.max_active_sessions,
            seed = ?config.seed,
            "Opening restaurant"
        );

        // =====================================================================
        // Background roles
        // =====================================================================

        let supplier = Supplier::new(
            ledger.clone(),
            run_flag.clone(),
            progress.clone(),
            config.supplier.clone(),
        );
        let dishwasher = Dishwasher::new(ledger.clone(), run_flag.clone(), config.dishwasher.wash());

        let mut handles = vec![
            ("supplier", runtime.spawn(supplier.run())),
            ("dishwasher", runtime.spawn(dishwasher.run())),
        ];

        // =====================================================================
        // Customers
        // =====================================================================

        let controller = AdmissionController::new(ledger.clone(), TokioSpawner::new(config.max_active_sessions));
        let arrivals = ArrivalGenerator::new(controller, run_flag.clone(), config.customers.clone(), config.seed);
        handles.push((
            "arrivals",
            runtime.spawn(async move {
                arrivals.run().await;
            }),
        ));

        if let Some(interval_ms) = config.dashboard_interval_ms {
            let dashboard = Dashboard::new(
                ledger.clone(),
                progress.clone(),
                run_flag.clone(),
                Duration::from_millis(interval_ms),
            );
            handles.push(("dashboard", runtime.spawn(dashboard.run())));
        }

        Ok(Self {
            ledger,
            run_flag,
            progress,
            handles,
        })
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn run_flag(&self) -> &RunFlag {
        &self.run_flag
    }

    pub fn progress(&self) -> &DeliveryProgress {
        &self.progress
    }

    /// Stops every role, waits for all of them, and returns the final ledger.
    ///
    /// Every handle is joined even if one fails; the first failure is
    /// returned. The snapshot is taken after the last join, so no session or
    /// role can still be mutating it.
    pub async fn shutdown(self) -> Result<Ledger, SimError> {
        info!("Closing restaurant...");
        self.run_flag.stop();

        let mut first_failure = None;
        for (role, handle) in self.handles {
            if let Err(source) = handle.await {
                error!(role, error = %source, "Role task failed");
                first_failure.get_or_insert(SimError::RoleFailed { role, source });
            }
        }
        if let Some(failure) = first_failure {
            return Err(failure);
        }

        let ledger = self.ledger.snapshot();
        info!(
            served = ledger.stats().served.total(),
            rejected = ledger.stats().rejected.total(),
            "Restaurant closed"
        );
        Ok(ledger)
    }

    /// Runs until Ctrl-C, or until `limit` elapses when one is given, then
    /// shuts down.
    pub async fn run_until_stopped(self, limit: Option<Duration>) -> Result<Ledger, SimError> {
        let deadline = async {
            match limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(SimError::Signal)?;
                info!("Stop requested");
            }
            _ = deadline => info!("Run duration elapsed"),
        }
        self.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.customers.arrival_min_ms = 10;
        config.customers.arrival_max_ms = 20;
        config.customers.dining_min_ms = 50;
        config.customers.dining_max_ms = 100;
        config.supplier.delivery_ms = 200;
        config.supplier.steps = 4;
        config.dishwasher.wash_ms = 5;
        config.dashboard_interval_ms = Some(100);
        config.seed = Some(7);
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_shutdown() {
        let restaurant = Restaurant::start(&quick_config()).expect("start");
        tokio::time::sleep(Duration::from_secs(2)).await;

        let ledger = restaurant.shutdown().await.expect("shutdown");
        assert!(ledger.is_consistent());
        assert!(ledger.stats().orders.total() > 0);
        // every seated party has left
        for class in crate::model::TableClass::ALL {
            assert_eq!(ledger.tables_in_use(class), 0);
        }
        for utensil in crate::model::Utensil::ALL {
            assert_eq!(ledger.in_use(utensil), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_stopped_honours_limit() {
        let restaurant = Restaurant::start(&quick_config()).expect("start");
        let ledger = restaurant
            .run_until_stopped(Some(Duration::from_secs(1)))
            .await
            .expect("run");
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let result = Restaurant::start(&quick_config());
        assert!(matches!(result, Err(SimError::NoRuntime)));
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut config = quick_config();
        config.customers.group_max = 9;
        assert!(matches!(Restaurant::start(&config), Err(SimError::Config(_))));
    }
}
