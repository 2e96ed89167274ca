//! # Admission Control
//!
//! Decides, for every arriving party, whether it can be served, and reserves
//! what it needs in the same transaction that made the decision.
//!
//! ## Takeout
//!
//! Needs `group_size` disposable sets, `group_size` meat and `group_size` of
//! either bread or vegetable, bread preferred. Everything is debited at once
//! and the party is served on the spot. No session, no table.
//!
//! ## Dine-in
//!
//! 1. **Table**: the exact class for the group, or the next larger class with a
//!    free table. A group is never seated at a smaller table.
//! 2. **Meal**: the menu drawn for the party ([`Menu::Soup`] or
//!    [`Menu::MainCourse`]) must have enough food and clean cutlery for every
//!    guest.
//! 3. **Reserve**: table, food and cutlery are debited together, or nothing is.
//! 4. **Seat**: a [`Session`] is spawned. If that fails the reservation is
//!    rolled back and the party counts as rejected.
//!
//! All four steps run in one [`SharedLedger::transact`] call, so two arrivals
//! can never both see the last table or the last fork, and a rollback never
//! races a restock. Spawning does not suspend; the session only touches the
//! ledger after its hold, from its own task.
//!
//! Orders and consumption are only counted once the session is spawned, which
//! keeps every statistic monotonic even when a seating is rolled back.
//!
//! Rejections are ordinary outcomes: they bump a counter and are logged at
//! `debug`.

use crate::ledger::{Ledger, SharedLedger};
use crate::model::{Channel, Menu, TableClass, TakeoutMeal};
use crate::session::{Session, SessionSpawner};
use std::time::Duration;
use tracing::{debug, warn};

/// One arriving party, with every random draw already made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub group_size: u32,
    pub order: Order,
}

/// What the party wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Takeout,
    DineIn { menu: Menu, hold: Duration },
}

impl Order {
    pub fn channel(&self) -> Channel {
        match self {
            Order::Takeout => Channel::Takeout,
            Order::DineIn { .. } => Channel::DineIn,
        }
    }
}

/// Resources held by a seated party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub group_size: u32,
    pub table: TableClass,
    pub menu: Menu,
}

/// Why a party was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No free table of a fitting class.
    NoTable,
    /// Not enough food for the drawn menu.
    NoFood,
    /// Not enough clean cutlery for the drawn menu.
    NoCutlery,
    /// Takeout could not be packed: disposables, meat, or both sides missing.
    NoTakeout,
    /// Resources were available but the session could not be started.
    SpawnFailed,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoTable => "no table",
            Rejection::NoFood => "no food",
            Rejection::NoCutlery => "no cutlery",
            Rejection::NoTakeout => "takeout unavailable",
            Rejection::SpawnFailed => "session spawn failed",
        }
    }
}

/// Outcome of one admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Seated(Reservation),
    TakenAway(TakeoutMeal),
    Rejected { channel: Channel, reason: Rejection },
}

// =============================================================================
// Transactions (run with the ledger lock held)
// =============================================================================

/// The table a group would get right now, if any.
pub fn select_table(ledger: &Ledger, group_size: u32) -> Option<TableClass> {
    TableClass::candidates(group_size).find(|&class| ledger.free_tables(class) > 0)
}

/// Serves a takeout party or counts it as rejected.
pub fn serve_takeout(ledger: &mut Ledger, group_size: u32) -> Result<TakeoutMeal, Rejection> {
    let meal = TakeoutMeal::PREFERENCE.into_iter().find(|meal| {
        meal.foods()
            .iter()
            .all(|&food| ledger.stock(food) >= group_size)
    });
    let Some(meal) = meal else {
        ledger.stats_mut().rejected.add(Channel::Takeout, 1);
        return Err(Rejection::NoTakeout);
    };

    for &food in meal.foods() {
        ledger.take_food(food, group_size);
        ledger
            .stats_mut()
            .record_consumption(food, Channel::Takeout, u64::from(group_size));
    }
    let stats = ledger.stats_mut();
    stats.orders.add(Channel::Takeout, 1);
    stats.served.add(Channel::Takeout, u64::from(group_size));
    Ok(meal)
}

/// Reserves a table, food and clean cutlery for a dine-in party, all or nothing.
///
/// On failure the party is counted as rejected and nothing is debited.
pub fn reserve_table(ledger: &mut Ledger, group_size: u32, menu: Menu) -> Result<Reservation, Rejection> {
    let check = check_dine_in(ledger, group_size, menu);
    let table = match check {
        Ok(table) => table,
        Err(reason) => {
            ledger.stats_mut().rejected.add(Channel::DineIn, 1);
            return Err(reason);
        }
    };

    ledger.take_table(table);
    for &food in menu.foods() {
        ledger.take_food(food, group_size);
    }
    for &utensil in menu.utensils() {
        ledger.take_clean(utensil, group_size);
    }
    Ok(Reservation { group_size, table, menu })
}

fn check_dine_in(ledger: &Ledger, group_size: u32, menu: Menu) -> Result<TableClass, Rejection> {
    let table = select_table(ledger, group_size).ok_or(Rejection::NoTable)?;
    if !menu.foods().iter().all(|&food| ledger.stock(food) >= group_size) {
        return Err(Rejection::NoFood);
    }
    if !menu.utensils().iter().all(|&utensil| ledger.clean(utensil) >= group_size) {
        return Err(Rejection::NoCutlery);
    }
    Ok(table)
}

/// Counts a seated party's order and the food it consumed.
pub fn commit_reservation(ledger: &mut Ledger, reservation: &Reservation) {
    let amount = u64::from(reservation.group_size);
    let stats = ledger.stats_mut();
    stats.orders.add(Channel::DineIn, 1);
    for &food in reservation.menu.foods() {
        stats.record_consumption(food, Channel::DineIn, amount);
    }
}

/// Gives back everything [`reserve_table`] took and counts the party as rejected.
pub fn rollback_reservation(ledger: &mut Ledger, reservation: &Reservation) {
    let Reservation { group_size, table, menu } = *reservation;
    ledger.free_table(table);
    for &food in menu.foods() {
        ledger.add_food(food, group_size);
    }
    for &utensil in menu.utensils() {
        ledger.return_clean(utensil, group_size);
    }
    let stats = ledger.stats_mut();
    stats.rejected.add(Channel::DineIn, 1);
    stats.spawn_failures += 1;
}

// =============================================================================
// Controller
// =============================================================================

/// Admits arrivals against the shared ledger and starts their sessions.
///
/// `admit` takes `&self`; several tasks may admit concurrently through one
/// controller (wrap it in an `Arc`) and the ledger lock keeps them consistent.
#[derive(Debug, Clone)]
pub struct AdmissionController<S> {
    ledger: SharedLedger,
    spawner: S,
}

impl<S: SessionSpawner> AdmissionController<S> {
    pub fn new(ledger: SharedLedger, spawner: S) -> Self {
        Self { ledger, spawner }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Decides and applies the outcome for one arrival.
    pub fn admit(&self, arrival: Arrival) -> Admission {
        let Arrival { group_size, order } = arrival;
        let admission = match order {
            Order::Takeout => match self.ledger.transact(|ledger| serve_takeout(ledger, group_size)) {
                Ok(meal) => Admission::TakenAway(meal),
                Err(reason) => Admission::Rejected {
                    channel: Channel::Takeout,
                    reason,
                },
            },
            Order::DineIn { menu, hold } => self.seat(group_size, menu, hold),
        };

        match admission {
            Admission::Seated(reservation) => {
                debug!(group_size, table = %reservation.table, menu = %reservation.menu, "Seated party")
            }
            Admission::TakenAway(meal) => debug!(group_size, ?meal, "Served takeout"),
            Admission::Rejected { channel, reason } => {
                debug!(group_size, %channel, reason = reason.as_str(), "Rejected party")
            }
        }
        admission
    }

    fn seat(&self, group_size: u32, menu: Menu, hold: Duration) -> Admission {
        let seated = self.ledger.transact(|ledger| {
            let reservation = reserve_table(ledger, group_size, menu)?;
            let session = Session::new(reservation, hold);
            match self.spawner.spawn(session, self.ledger.clone()) {
                Ok(()) => {
                    commit_reservation(ledger, &reservation);
                    Ok(reservation)
                }
                Err(e) => {
                    warn!(group_size, table = %reservation.table, error = %e, "Session spawn failed, rolling back");
                    rollback_reservation(ledger, &reservation);
                    Err(Rejection::SpawnFailed)
                }
            }
        });
        match seated {
            Ok(reservation) => Admission::Seated(reservation),
            Err(reason) => Admission::Rejected {
                channel: Channel::DineIn,
                reason,
            },
        }
    }

    /// Waits for every session this controller started.
    pub async fn finish(&self) -> usize {
        self.spawner.join_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ledger::Capacity;
    use crate::model::{Food, Utensil};
    use crate::session::mock::{FailingSpawner, RecordingSpawner};
    use crate::session::SpawnError;

    fn ledger_with(configure: impl FnOnce(&mut Config)) -> Ledger {
        let mut config = Config::default();
        configure(&mut config);
        Ledger::new(Capacity::from(&config))
    }

    fn dine_in(group_size: u32, menu: Menu) -> Arrival {
        Arrival {
            group_size,
            order: Order::DineIn {
                menu,
                hold: Duration::from_millis(10),
            },
        }
    }

    #[test]
    fn test_exact_table_preferred() {
        let ledger = ledger_with(|_| {});
        assert_eq!(select_table(&ledger, 1), Some(TableClass::TwoSeat));
        assert_eq!(select_table(&ledger, 2), Some(TableClass::TwoSeat));
        assert_eq!(select_table(&ledger, 3), Some(TableClass::FourSeat));
        assert_eq!(select_table(&ledger, 5), Some(TableClass::SixSeat));
    }

    #[test]
    fn test_pair_falls_back_to_four_before_six() {
        let mut ledger = ledger_with(|config| {
            config.tables.two_seat = 1;
            config.tables.four_seat = 1;
            config.tables.six_seat = 1;
        });
        ledger.take_table(TableClass::TwoSeat);
        assert_eq!(select_table(&ledger, 2), Some(TableClass::FourSeat));

        ledger.take_table(TableClass::FourSeat);
        assert_eq!(select_table(&ledger, 2), Some(TableClass::SixSeat));
    }

    #[test]
    fn test_large_group_never_downgraded() {
        let mut ledger = ledger_with(|config| {
            config.tables.six_seat = 1;
        });
        ledger.take_table(TableClass::SixSeat);
        assert_eq!(select_table(&ledger, 5), None);
        assert_eq!(select_table(&ledger, 7), None);
    }

    #[test]
    fn test_takeout_prefers_bread() {
        let mut ledger = ledger_with(|_| {});
        assert_eq!(serve_takeout(&mut ledger, 2), Ok(TakeoutMeal::MeatAndBread));
        let max = *ledger.capacity();
        assert_eq!(ledger.stock(Food::Bread), max.food(Food::Bread) - 2);
        assert_eq!(ledger.stock(Food::Vegetable), max.food(Food::Vegetable));
        assert_eq!(ledger.stock(Food::Disposable), max.food(Food::Disposable) - 2);
        assert_eq!(ledger.stats().served.takeout, 2);
        assert_eq!(ledger.stats().orders.takeout, 1);
        assert_eq!(ledger.stats().consumed(Food::Meat).takeout, 2);
    }

    #[test]
    fn test_takeout_falls_back_to_vegetable() {
        let mut ledger = ledger_with(|config| config.pantry.bread = 1);
        assert_eq!(serve_takeout(&mut ledger, 2), Ok(TakeoutMeal::MeatAndVegetable));
        assert_eq!(ledger.stock(Food::Bread), 1);
        assert_eq!(ledger.stats().consumed(Food::Vegetable).takeout, 2);
    }

    #[test]
    fn test_takeout_without_disposables_rejected() {
        let mut ledger = ledger_with(|config| config.pantry.disposable = 0);
        let before = ledger.clone();
        for size in 1..=6 {
            assert_eq!(serve_takeout(&mut ledger, size), Err(Rejection::NoTakeout));
        }
        assert_eq!(ledger.stats().rejected.takeout, 6);
        for food in Food::ALL {
            assert_eq!(ledger.stock(food), before.stock(food));
        }
    }

    #[test]
    fn test_dine_in_is_all_or_nothing() {
        let mut ledger = ledger_with(|config| config.cutlery.knives = 1);
        let before = ledger.clone();

        assert_eq!(reserve_table(&mut ledger, 2, Menu::MainCourse), Err(Rejection::NoCutlery));
        assert_eq!(ledger.free_tables(TableClass::TwoSeat), before.free_tables(TableClass::TwoSeat));
        assert_eq!(ledger.stock(Food::Meat), before.stock(Food::Meat));
        assert_eq!(ledger.clean(Utensil::Fork), before.clean(Utensil::Fork));
        assert_eq!(ledger.stats().rejected.dine_in, 1);
    }

    #[test]
    fn test_dine_in_without_table_rejected() {
        let mut ledger = ledger_with(|config| {
            config.tables.four_seat = 0;
            config.tables.six_seat = 0;
        });
        assert_eq!(reserve_table(&mut ledger, 3, Menu::Soup), Err(Rejection::NoTable));
    }

    #[test]
    fn test_soup_debits_spoons_and_bread() {
        let mut ledger = ledger_with(|_| {});
        let reservation = reserve_table(&mut ledger, 4, Menu::Soup).expect("seat");
        assert_eq!(reservation.table, TableClass::FourSeat);
        assert_eq!(ledger.in_use(Utensil::Spoon), 4);
        assert_eq!(ledger.in_use(Utensil::Fork), 0);
        let max = *ledger.capacity();
        assert_eq!(ledger.stock(Food::Bread), max.food(Food::Bread) - 4);
        assert_eq!(ledger.stock(Food::Meat), max.food(Food::Meat));
    }

    #[tokio::test]
    async fn test_controller_counts_order_after_spawn() {
        let ledger = SharedLedger::new(ledger_with(|_| {}));
        let spawner = RecordingSpawner::new();
        let controller = AdmissionController::new(ledger.clone(), spawner.clone());

        let admission = controller.admit(dine_in(2, Menu::MainCourse));
        assert!(matches!(admission, Admission::Seated(_)));
        assert_eq!(spawner.sessions().len(), 1);

        let seated = ledger.snapshot();
        assert_eq!(seated.stats().orders.dine_in, 1);
        assert_eq!(seated.stats().served.dine_in, 0);
        assert_eq!(seated.stats().consumed(Food::Vegetable).dine_in, 2);

        assert_eq!(controller.finish().await, 1);
        let done = ledger.snapshot();
        assert_eq!(done.stats().served.dine_in, 2);
        assert_eq!(done.dirty(Utensil::Fork), 2);
        assert_eq!(done.tables_in_use(TableClass::TwoSeat), 0);
    }

    #[tokio::test]
    async fn test_spawn_failure_rolls_back() {
        let ledger = SharedLedger::new(ledger_with(|_| {}));
        let before = ledger.snapshot();
        let controller = AdmissionController::new(
            ledger.clone(),
            FailingSpawner::new(SpawnError::AtCapacity { limit: 0 }),
        );

        let admission = controller.admit(dine_in(3, Menu::Soup));
        assert_eq!(
            admission,
            Admission::Rejected {
                channel: Channel::DineIn,
                reason: Rejection::SpawnFailed
            }
        );

        let after = ledger.snapshot();
        for class in TableClass::ALL {
            assert_eq!(after.free_tables(class), before.free_tables(class));
        }
        for food in Food::ALL {
            assert_eq!(after.stock(food), before.stock(food));
            assert_eq!(after.stats().consumed(food).dine_in, 0);
        }
        for utensil in Utensil::ALL {
            assert_eq!(after.clean(utensil), before.clean(utensil));
        }
        assert_eq!(after.stats().orders.dine_in, 0);
        assert_eq!(after.stats().rejected.dine_in, 1);
        assert_eq!(after.stats().spawn_failures, 1);
    }
}
