//! # Final Report
//!
//! Built once from the ledger snapshot taken after every role has been joined.
//! [`Report`] renders as three plain-text tables (traffic, food consumption,
//! kitchen) and serialises to JSON for machine consumption.

use crate::ledger::{Ledger, PerChannel, Statistics};
use crate::model::Food;
use serde::Serialize;
use std::fmt;

/// Orders, people and rejections for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficRow {
    pub orders: u64,
    pub people: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Traffic {
    pub dine_in: TrafficRow,
    pub takeout: TrafficRow,
    pub total: TrafficRow,
}

/// Units of one pool eaten (or packed) per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionRow {
    pub food: Food,
    /// `None` for pools dine-in never uses.
    pub dine_in: Option<u64>,
    pub takeout: u64,
    pub total: u64,
    pub delivered: u64,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub traffic: Traffic,
    pub consumption: Vec<ConsumptionRow>,
    pub washed: u64,
    pub spawn_failures: u64,
}

impl From<&Ledger> for Report {
    fn from(ledger: &Ledger) -> Self {
        let stats = ledger.stats();
        let traffic = Traffic {
            dine_in: traffic_row(stats, |c| c.dine_in),
            takeout: traffic_row(stats, |c| c.takeout),
            total: traffic_row(stats, PerChannel::total),
        };

        let consumption = Food::ALL
            .into_iter()
            .map(|food| {
                let consumed = stats.consumed(food);
                ConsumptionRow {
                    food,
                    dine_in: (food != Food::Disposable).then_some(consumed.dine_in),
                    takeout: consumed.takeout,
                    total: consumed.total(),
                    delivered: stats.delivered(food),
                    remaining: ledger.stock(food),
                }
            })
            .collect();

        Self {
            traffic,
            consumption,
            washed: stats.washed,
            spawn_failures: stats.spawn_failures,
        }
    }
}

fn traffic_row(stats: &Statistics, pick: fn(&PerChannel) -> u64) -> TrafficRow {
    TrafficRow {
        orders: pick(&stats.orders),
        people: pick(&stats.served),
        rejected: pick(&stats.rejected),
    }
}

const RULE: &str = "-----------------------------------------------------------";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===========================================================")?;
        writeln!(f, "                   FINAL SIMULATION REPORT")?;
        writeln!(f, "===========================================================")?;
        writeln!(f)?;

        writeln!(f, "1. TRAFFIC AND ORDERS")?;
        writeln!(f, "{:<12} | {:>8} | {:>8} | {:>8}", "Channel", "Orders", "People", "Rejected")?;
        writeln!(f, "{RULE}")?;
        for (label, row) in [("dine-in", &self.traffic.dine_in), ("takeout", &self.traffic.takeout)] {
            writeln!(f, "{:<12} | {:>8} | {:>8} | {:>8}", label, row.orders, row.people, row.rejected)?;
        }
        writeln!(f, "{RULE}")?;
        let total = &self.traffic.total;
        writeln!(f, "{:<12} | {:>8} | {:>8} | {:>8}", "total", total.orders, total.people, total.rejected)?;
        writeln!(f)?;

        writeln!(f, "2. FOOD CONSUMPTION")?;
        writeln!(
            f,
            "{:<12} | {:>8} | {:>8} | {:>8} | {:>9} | {:>9}",
            "Item", "Dine-in", "Takeout", "Total", "Delivered", "Remaining"
        )?;
        writeln!(f, "{RULE}")?;
        for row in &self.consumption {
            let dine_in = row.dine_in.map_or_else(|| "-".to_string(), |n| n.to_string());
            writeln!(
                f,
                "{:<12} | {:>8} | {:>8} | {:>8} | {:>9} | {:>9}",
                row.food.name(),
                dine_in,
                row.takeout,
                row.total,
                row.delivered,
                row.remaining
            )?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f)?;

        writeln!(f, "3. KITCHEN")?;
        writeln!(f, "  utensils washed        : {}", self.washed)?;
        if self.spawn_failures > 0 {
            writeln!(f, "  seatings rolled back   : {}", self.spawn_failures)?;
        }
        write!(f, "===========================================================")
    }
}
