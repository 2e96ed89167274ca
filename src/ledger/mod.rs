//! # Resource Ledger
//!
//! The single piece of shared mutable state in the simulation: free tables per
//! class, food stocks, clean and dirty cutlery, the supplier's shortfall
//! estimates and the run [`Statistics`].
//!
//! ## Locking Discipline
//!
//! There is exactly one lock. [`SharedLedger::transact`] hands a closure
//! exclusive access to the whole [`Ledger`] and releases the lock when the
//! closure returns. Closures are synchronous, so no transaction can hold the
//! lock across an `.await`. Every check-and-mutate sequence (admission,
//! release, restock, wash) runs inside one `transact` call.
//!
//! ## Invariants
//!
//! - `0 <= free_tables(c) <= capacity(c)` for every table class
//! - `0 <= stock(f) <= capacity(f)` for every food pool
//! - `clean(u) + dirty(u) <= capacity(u)` for every utensil; the gap is held by
//!   dining parties ([`Ledger::in_use`])
//!
//! Mutators below never check sufficiency themselves. Callers check first and
//! mutate in the same transaction; [`Ledger::is_consistent`] verifies the
//! result in debug builds and in tests.

mod stats;

pub use stats::*;

use crate::config::Config;
use crate::model::{Food, TableClass, Utensil};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum size of every pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    tables: [u32; 3],
    pantry: [u32; 4],
    cutlery: [u32; 3],
}

impl Capacity {
    pub fn tables(&self, class: TableClass) -> u32 {
        self.tables[class.index()]
    }

    pub fn food(&self, food: Food) -> u32 {
        self.pantry[food.index()]
    }

    pub fn utensil(&self, utensil: Utensil) -> u32 {
        self.cutlery[utensil.index()]
    }
}

impl From<&Config> for Capacity {
    fn from(config: &Config) -> Self {
        Self {
            tables: TableClass::ALL.map(|class| config.tables.count(class)),
            pantry: Food::ALL.map(|food| config.pantry.capacity(food)),
            cutlery: Utensil::ALL.map(|utensil| config.cutlery.capacity(utensil)),
        }
    }
}

/// Resource pools and statistics.
///
/// Cloning a `Ledger` is how snapshots are taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    capacity: Capacity,
    free_tables: [u32; 3],
    stock: [u32; 4],
    clean: [u32; 3],
    dirty: [u32; 3],
    shortfall: [u32; 4],
    stats: Statistics,
}

impl Ledger {
    /// A ledger with every table free, every pool full and all cutlery clean.
    ///
    /// The supplier's shortfall estimate starts at half of each pool.
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            free_tables: capacity.tables,
            stock: capacity.pantry,
            clean: capacity.cutlery,
            dirty: [0; 3],
            shortfall: capacity.pantry.map(|max| max / 2),
            stats: Statistics::default(),
        }
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn free_tables(&self, class: TableClass) -> u32 {
        self.free_tables[class.index()]
    }

    pub fn tables_in_use(&self, class: TableClass) -> u32 {
        self.capacity.tables(class) - self.free_tables(class)
    }

    pub fn stock(&self, food: Food) -> u32 {
        self.stock[food.index()]
    }

    pub fn clean(&self, utensil: Utensil) -> u32 {
        self.clean[utensil.index()]
    }

    pub fn dirty(&self, utensil: Utensil) -> u32 {
        self.dirty[utensil.index()]
    }

    /// Utensils currently on a table.
    pub fn in_use(&self, utensil: Utensil) -> u32 {
        self.capacity.utensil(utensil) - self.clean(utensil) - self.dirty(utensil)
    }

    /// Units the smart supplier will order at its next delivery.
    pub fn shortfall(&self, food: Food) -> u32 {
        self.shortfall[food.index()]
    }

    /// Whether every pool is within its bounds.
    pub fn is_consistent(&self) -> bool {
        let tables = TableClass::ALL
            .iter()
            .all(|&class| self.free_tables(class) <= self.capacity.tables(class));
        let pantry = Food::ALL
            .iter()
            .all(|&food| self.stock(food) <= self.capacity.food(food));
        let cutlery = Utensil::ALL.iter().all(|&utensil| {
            self.clean(utensil) + self.dirty(utensil) <= self.capacity.utensil(utensil)
        });
        tables && pantry && cutlery
    }

    pub(crate) fn stats_mut(&mut self) -> &mut Statistics {
        &mut self.stats
    }

    pub(crate) fn take_table(&mut self, class: TableClass) {
        let free = &mut self.free_tables[class.index()];
        debug_assert!(*free > 0, "no free {class} table");
        *free = free.saturating_sub(1);
    }

    pub(crate) fn free_table(&mut self, class: TableClass) {
        let max = self.capacity.tables(class);
        let free = &mut self.free_tables[class.index()];
        debug_assert!(*free < max, "{class} table freed twice");
        *free = (*free + 1).min(max);
    }

    pub(crate) fn take_food(&mut self, food: Food, amount: u32) {
        let stock = &mut self.stock[food.index()];
        debug_assert!(*stock >= amount, "{food} overdrawn");
        *stock = stock.saturating_sub(amount);
    }

    /// Adds up to `amount` units, capped at capacity. Returns what was added.
    pub(crate) fn add_food(&mut self, food: Food, amount: u32) -> u32 {
        let max = self.capacity.food(food);
        let stock = &mut self.stock[food.index()];
        let added = amount.min(max.saturating_sub(*stock));
        *stock += added;
        added
    }

    pub(crate) fn set_shortfall(&mut self, food: Food, amount: u32) {
        self.shortfall[food.index()] = amount;
    }

    pub(crate) fn take_clean(&mut self, utensil: Utensil, amount: u32) {
        let clean = &mut self.clean[utensil.index()];
        debug_assert!(*clean >= amount, "{utensil} overdrawn");
        *clean = clean.saturating_sub(amount);
    }

    /// Puts held utensils back unused.
    pub(crate) fn return_clean(&mut self, utensil: Utensil, amount: u32) {
        self.clean[utensil.index()] += amount;
    }

    /// Puts held utensils back dirty.
    pub(crate) fn return_dirty(&mut self, utensil: Utensil, amount: u32) {
        self.dirty[utensil.index()] += amount;
    }

    /// Moves one utensil from dirty to clean. Returns `false` if none was dirty.
    pub(crate) fn wash(&mut self, utensil: Utensil) -> bool {
        let i = utensil.index();
        if self.dirty[i] == 0 {
            return false;
        }
        self.dirty[i] -= 1;
        self.clean[i] += 1;
        true
    }
}

/// Shared handle to the one [`Ledger`] of a run.
///
/// Cheap to clone; every role holds its own handle.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn transact<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut ledger = self.lock();
        let result = f(&mut ledger);
        debug_assert!(ledger.is_consistent(), "ledger invariant broken: {:?}", *ledger);
        result
    }

    /// A consistent copy of the current state.
    pub fn snapshot(&self) -> Ledger {
        self.lock().clone()
    }

    // Transactions validate before they mutate, so a panic inside one cannot
    // leave a half-applied change behind; the poisoned state is still usable.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::new(Capacity::from(&Config::default()))
    }

    #[test]
    fn test_new_ledger_is_full() {
        let ledger = ledger();
        for class in TableClass::ALL {
            assert_eq!(ledger.free_tables(class), ledger.capacity().tables(class));
            assert_eq!(ledger.tables_in_use(class), 0);
        }
        for food in Food::ALL {
            assert_eq!(ledger.stock(food), ledger.capacity().food(food));
            assert_eq!(ledger.shortfall(food), ledger.capacity().food(food) / 2);
        }
        for utensil in Utensil::ALL {
            assert_eq!(ledger.clean(utensil), ledger.capacity().utensil(utensil));
            assert_eq!(ledger.dirty(utensil), 0);
            assert_eq!(ledger.in_use(utensil), 0);
        }
        assert_eq!(ledger.stats(), &Statistics::default());
    }

    #[test]
    fn test_in_use_is_the_gap() {
        let mut ledger = ledger();
        ledger.take_clean(Utensil::Fork, 3);
        assert_eq!(ledger.in_use(Utensil::Fork), 3);

        ledger.return_dirty(Utensil::Fork, 2);
        assert_eq!(ledger.in_use(Utensil::Fork), 1);
        assert_eq!(ledger.dirty(Utensil::Fork), 2);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_add_food_caps_at_capacity() {
        let mut ledger = ledger();
        ledger.take_food(Food::Meat, 5);
        assert_eq!(ledger.add_food(Food::Meat, 100), 5);
        assert_eq!(ledger.stock(Food::Meat), ledger.capacity().food(Food::Meat));
        assert_eq!(ledger.add_food(Food::Meat, 1), 0);
    }

    #[test]
    fn test_wash_moves_one_unit() {
        let mut ledger = ledger();
        assert!(!ledger.wash(Utensil::Spoon));

        ledger.take_clean(Utensil::Spoon, 2);
        ledger.return_dirty(Utensil::Spoon, 2);
        assert!(ledger.wash(Utensil::Spoon));
        assert_eq!(ledger.dirty(Utensil::Spoon), 1);
        assert_eq!(ledger.clean(Utensil::Spoon), ledger.capacity().utensil(Utensil::Spoon) - 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedLedger::new(ledger());
        let before = shared.snapshot();
        shared.transact(|ledger| ledger.take_table(TableClass::SixSeat));
        assert_eq!(before.tables_in_use(TableClass::SixSeat), 0);
        assert_eq!(shared.snapshot().tables_in_use(TableClass::SixSeat), 1);
    }
}
