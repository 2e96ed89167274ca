//! # Supplier
//!
//! Restocks the four consumable pools once per delivery.
//!
//! A delivery is split into `steps` sleeps. After each one the supplier
//! publishes how far along it is through [`DeliveryProgress`], a relaxed atomic
//! that the dashboard reads without taking the ledger lock. Stale or torn reads
//! of it are harmless; nothing decides anything from it.
//!
//! When the delivery arrives the supplier takes the lock once and applies its
//! [`SupplierMode`] to every pool:
//!
//! | Mode    | Units ordered                        | After restock                       |
//! |---------|--------------------------------------|-------------------------------------|
//! | `Fixed` | `max(1, capacity / 2)`               | -                                   |
//! | `Smart` | the shortfall seen at the last visit | shortfall = `capacity - new stock`  |
//!
//! Either way the pool is capped at capacity, and a full pool receives nothing.

use crate::config::{SupplierConfig, SupplierMode};
use crate::ledger::{Ledger, SharedLedger};
use crate::lifecycle::RunFlag;
use crate::model::Food;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Percentage (0-100) of the current delivery already travelled.
#[derive(Debug, Clone, Default)]
pub struct DeliveryProgress(Arc<AtomicU8>);

impl DeliveryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, percent: u8) {
        self.0.store(percent, Ordering::Relaxed);
    }
}

/// Units the policy orders for one pool.
pub fn order_size(mode: SupplierMode, capacity: u32, shortfall: u32) -> u32 {
    match mode {
        SupplierMode::Fixed => (capacity / 2).max(1),
        SupplierMode::Smart => shortfall,
    }
}

/// Applies one delivery to every pool. Returns the total number of units added.
pub fn restock(ledger: &mut Ledger, mode: SupplierMode) -> u32 {
    let mut total = 0;
    for food in Food::ALL {
        let capacity = ledger.capacity().food(food);
        let ordered = order_size(mode, capacity, ledger.shortfall(food));
        let added = ledger.add_food(food, ordered);
        ledger.stats_mut().record_delivery(food, u64::from(added));
        if mode == SupplierMode::Smart {
            ledger.set_shortfall(food, capacity - ledger.stock(food));
        }
        total += added;
    }
    total
}

/// The supplier role.
#[derive(Debug)]
pub struct Supplier {
    ledger: SharedLedger,
    run_flag: RunFlag,
    progress: DeliveryProgress,
    config: SupplierConfig,
}

impl Supplier {
    pub fn new(ledger: SharedLedger, run_flag: RunFlag, progress: DeliveryProgress, config: SupplierConfig) -> Self {
        Self {
            ledger,
            run_flag,
            progress,
            config,
        }
    }

    /// Delivers until the run flag drops.
    pub async fn run(self) {
        let mode = self.config.mode;
        info!(role = "supplier", %mode, delivery_ms = self.config.delivery_ms, "Started");

        let mut deliveries = 0u64;
        while self.run_flag.is_running() {
            self.travel().await;
            let added = self.ledger.transact(|ledger| {
                let added = restock(ledger, mode);
                self.progress.set(0);
                added
            });
            deliveries += 1;
            debug!(role = "supplier", deliveries, added, "Delivered");
        }

        info!(role = "supplier", deliveries, "Stopped");
    }

    async fn travel(&self) {
        let steps = self.config.steps.max(1);
        let step_delay = self.config.step_delay();
        for step in 0..=steps {
            if !self.run_flag.is_running() {
                break;
            }
            tokio::time::sleep(step_delay).await;
            // step <= steps, so the percentage fits in a u8
            self.progress.set((step * 100 / steps) as u8);
        }
    }
}
