//! Run statistics, mutated under the same lock as the resource pools.

use crate::model::{Channel, Food};
use serde::Serialize;

/// A counter split by service channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerChannel {
    pub dine_in: u64,
    pub takeout: u64,
}

impl PerChannel {
    pub fn get(&self, channel: Channel) -> u64 {
        match channel {
            Channel::DineIn => self.dine_in,
            Channel::Takeout => self.takeout,
        }
    }

    pub fn add(&mut self, channel: Channel, amount: u64) {
        match channel {
            Channel::DineIn => self.dine_in += amount,
            Channel::Takeout => self.takeout += amount,
        }
    }

    pub fn total(&self) -> u64 {
        self.dine_in + self.takeout
    }
}

/// Monotonic counters describing what happened during the run.
///
/// Every counter only ever grows. A dine-in reservation whose session could not
/// be spawned never reaches `orders` or `consumed`; it is counted in `rejected`
/// and `spawn_failures` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Accepted orders (parties).
    pub orders: PerChannel,
    /// People served. Dine-in guests count when they leave the table.
    pub served: PerChannel,
    /// Rejected parties.
    pub rejected: PerChannel,
    consumed: [PerChannel; 4],
    delivered: [u64; 4],
    /// Utensils washed by the dishwasher.
    pub washed: u64,
    /// Seatings rolled back because their session could not be started.
    pub spawn_failures: u64,
}

impl Statistics {
    /// Units of `food` debited by accepted orders.
    pub fn consumed(&self, food: Food) -> PerChannel {
        self.consumed[food.index()]
    }

    /// Units of `food` added by the supplier, after capping at capacity.
    pub fn delivered(&self, food: Food) -> u64 {
        self.delivered[food.index()]
    }

    pub(crate) fn record_consumption(&mut self, food: Food, channel: Channel, amount: u64) {
        self.consumed[food.index()].add(channel, amount);
    }

    pub(crate) fn record_delivery(&mut self, food: Food, amount: u64) {
        self.delivered[food.index()] += amount;
    }
}
