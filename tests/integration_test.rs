use restaurant_sim::config::{Config, SupplierMode};
use restaurant_sim::ledger::Ledger;
use restaurant_sim::lifecycle::Restaurant;
use restaurant_sim::model::{Food, TableClass, Utensil};
use restaurant_sim::report::Report;
use std::time::Duration;

fn busy_config(mode: SupplierMode) -> Config {
    let mut config = Config::default();
    config.customers.arrival_min_ms = 20;
    config.customers.arrival_max_ms = 60;
    config.customers.dining_min_ms = 200;
    config.customers.dining_max_ms = 600;
    config.supplier.mode = mode;
    config.supplier.delivery_ms = 500;
    config.supplier.steps = 5;
    config.dishwasher.wash_ms = 10;
    config.dashboard_interval_ms = Some(250);
    config.seed = Some(2024);
    config
}

async fn run_for(config: &Config, duration: Duration) -> Ledger {
    let restaurant = Restaurant::start(config).expect("start restaurant");
    tokio::time::sleep(duration).await;
    restaurant.shutdown().await.expect("clean shutdown")
}

fn assert_settled(config: &Config, ledger: &Ledger) {
    assert!(ledger.is_consistent());
    for class in TableClass::ALL {
        assert_eq!(ledger.tables_in_use(class), 0, "{class} table still taken");
    }
    for utensil in Utensil::ALL {
        assert_eq!(ledger.in_use(utensil), 0, "{utensil} still on a table");
        assert_eq!(
            ledger.clean(utensil) + ledger.dirty(utensil),
            config.cutlery.capacity(utensil)
        );
    }
}

fn assert_food_conserved(config: &Config, ledger: &Ledger) {
    let stats = ledger.stats();
    for food in Food::ALL {
        let initial = u64::from(config.pantry.capacity(food));
        let remaining = u64::from(ledger.stock(food));
        assert_eq!(
            initial + stats.delivered(food),
            remaining + stats.consumed(food).total(),
            "{food} not conserved"
        );
    }
    // one disposable set per takeout guest
    assert_eq!(stats.consumed(Food::Disposable).takeout, stats.served.takeout);
}

/// Full end-to-end run with every role.
#[tokio::test(start_paused = true)]
async fn test_full_run_settles_and_conserves() {
    for mode in [SupplierMode::Fixed, SupplierMode::Smart] {
        let config = busy_config(mode);
        let ledger = run_for(&config, Duration::from_secs(20)).await;

        assert_settled(&config, &ledger);
        assert_food_conserved(&config, &ledger);

        let stats = ledger.stats();
        assert!(stats.orders.total() > 0);
        assert!(stats.washed > 0);
        assert!(Food::ALL.iter().any(|&food| stats.delivered(food) > 0));
        assert_eq!(stats.spawn_failures, 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_session_limit_keeps_conservation() {
    let mut config = busy_config(SupplierMode::Smart);
    config.max_active_sessions = Some(2);
    let ledger = run_for(&config, Duration::from_secs(20)).await;

    assert_settled(&config, &ledger);
    assert_food_conserved(&config, &ledger);
    assert!(ledger.stats().spawn_failures > 0);
    assert!(ledger.stats().rejected.dine_in >= ledger.stats().spawn_failures);
}

#[tokio::test(start_paused = true)]
async fn test_report_matches_ledger() {
    let config = busy_config(SupplierMode::Smart);
    let ledger = run_for(&config, Duration::from_secs(5)).await;
    let report = Report::from(&ledger);

    assert_eq!(report.traffic.total.orders, ledger.stats().orders.total());
    assert_eq!(report.washed, ledger.stats().washed);
    for row in &report.consumption {
        assert_eq!(row.remaining, ledger.stock(row.food));
        assert_eq!(row.delivered, ledger.stats().delivered(row.food));
    }
    assert!(report.to_string().contains("FINAL SIMULATION REPORT"));
}
