//! # Simulation Configuration
//!
//! The [`Config`] record sizes every pool and every timing parameter. It is read
//! once at startup, validated, and never mutated afterwards.
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! seed = 7
//!
//! [tables]
//! two_seat = 2
//!
//! [supplier]
//! mode = "smart"
//! delivery_ms = 2000
//! ```

mod error;

pub use error::*;

use crate::model::{Food, TableClass, Utensil};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

/// Restocking policy applied by the supplier at the end of every delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SupplierMode {
    /// Add half of each pool's capacity (at least one unit).
    #[default]
    Fixed,
    /// Add exactly the shortfall observed at the previous delivery.
    Smart,
}

impl std::fmt::Display for SupplierMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplierMode::Fixed => f.write_str("fixed"),
            SupplierMode::Smart => f.write_str("smart"),
        }
    }
}

/// Number of tables per capacity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub two_seat: u32,
    pub four_seat: u32,
    pub six_seat: u32,
}

impl TableConfig {
    pub fn count(&self, class: TableClass) -> u32 {
        match class {
            TableClass::TwoSeat => self.two_seat,
            TableClass::FourSeat => self.four_seat,
            TableClass::SixSeat => self.six_seat,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            two_seat: 4,
            four_seat: 3,
            six_seat: 2,
        }
    }
}

/// Capacity of each consumable pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PantryConfig {
    pub vegetable: u32,
    pub meat: u32,
    pub bread: u32,
    pub disposable: u32,
}

impl PantryConfig {
    pub fn capacity(&self, food: Food) -> u32 {
        match food {
            Food::Vegetable => self.vegetable,
            Food::Meat => self.meat,
            Food::Bread => self.bread,
            Food::Disposable => self.disposable,
        }
    }
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            vegetable: 30,
            meat: 30,
            bread: 30,
            disposable: 10,
        }
    }
}

/// Number of metal utensils of each kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CutleryConfig {
    pub forks: u32,
    pub knives: u32,
    pub spoons: u32,
}

impl CutleryConfig {
    pub fn capacity(&self, utensil: Utensil) -> u32 {
        match utensil {
            Utensil::Fork => self.forks,
            Utensil::Knife => self.knives,
            Utensil::Spoon => self.spoons,
        }
    }
}

impl Default for CutleryConfig {
    fn default() -> Self {
        Self {
            forks: 12,
            knives: 12,
            spoons: 12,
        }
    }
}

/// Arrival stream and dining behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerConfig {
    pub group_min: u32,
    pub group_max: u32,
    /// Chance (0-100) that an arrival orders takeout.
    pub takeout_percent: u8,
    pub arrival_min_ms: u64,
    pub arrival_max_ms: u64,
    pub dining_min_ms: u64,
    pub dining_max_ms: u64,
}

impl CustomerConfig {
    pub fn group_sizes(&self) -> RangeInclusive<u32> {
        self.group_min..=self.group_max
    }

    pub fn arrival_gap_ms(&self) -> RangeInclusive<u64> {
        self.arrival_min_ms..=self.arrival_max_ms
    }

    pub fn dining_ms(&self) -> RangeInclusive<u64> {
        self.dining_min_ms..=self.dining_max_ms
    }
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            group_min: 1,
            group_max: 6,
            takeout_percent: 30,
            arrival_min_ms: 500,
            arrival_max_ms: 1500,
            dining_min_ms: 2000,
            dining_max_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplierConfig {
    pub mode: SupplierMode,
    /// Length of one delivery, from departure to restock.
    pub delivery_ms: u64,
    /// Progress updates published per delivery.
    pub steps: u32,
}

impl SupplierConfig {
    pub fn delivery(&self) -> Duration {
        Duration::from_millis(self.delivery_ms)
    }

    /// Sleep between two progress updates.
    pub fn step_delay(&self) -> Duration {
        self.delivery() / self.steps.max(1)
    }
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            mode: SupplierMode::Fixed,
            delivery_ms: 4000,
            steps: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DishwasherConfig {
    /// Time to wash a single utensil.
    pub wash_ms: u64,
}

impl DishwasherConfig {
    pub fn wash(&self) -> Duration {
        Duration::from_millis(self.wash_ms)
    }
}

impl Default for DishwasherConfig {
    fn default() -> Self {
        Self { wash_ms: 300 }
    }
}

/// The complete, read-only configuration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tables: TableConfig,
    pub pantry: PantryConfig,
    pub cutlery: CutleryConfig,
    pub customers: CustomerConfig,
    pub supplier: SupplierConfig,
    pub dishwasher: DishwasherConfig,
    /// Upper bound on concurrently dining parties. Seating beyond it fails to
    /// spawn a session and the reservation is rolled back.
    pub max_active_sessions: Option<usize>,
    /// How often the dashboard logs a snapshot. `None` disables it.
    pub dashboard_interval_ms: Option<u64>,
    /// Seed for the arrival generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: TableConfig::default(),
            pantry: PantryConfig::default(),
            cutlery: CutleryConfig::default(),
            customers: CustomerConfig::default(),
            supplier: SupplierConfig::default(),
            dishwasher: DishwasherConfig::default(),
            max_active_sessions: None,
            dashboard_interval_ms: Some(1000),
            seed: None,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let customers = &self.customers;
        if customers.group_min == 0
            || customers.group_min > customers.group_max
            || customers.group_max > TableClass::MAX_GROUP
        {
            return Err(ConfigError::GroupSize {
                min: customers.group_min,
                max: customers.group_max,
            });
        }
        if customers.takeout_percent > 100 {
            return Err(ConfigError::TakeoutChance(customers.takeout_percent));
        }
        check_range("customers.arrival", customers.arrival_min_ms, customers.arrival_max_ms)?;
        check_range("customers.dining", customers.dining_min_ms, customers.dining_max_ms)?;
        if customers.arrival_max_ms == 0 {
            return Err(ConfigError::Zero("customers.arrival_max_ms"));
        }
        if self.supplier.delivery_ms == 0 {
            return Err(ConfigError::Zero("supplier.delivery_ms"));
        }
        if self.supplier.steps == 0 {
            return Err(ConfigError::Zero("supplier.steps"));
        }
        if self.dishwasher.wash_ms == 0 {
            return Err(ConfigError::Zero("dishwasher.wash_ms"));
        }
        if self.dashboard_interval_ms == Some(0) {
            return Err(ConfigError::Zero("dashboard_interval_ms"));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}
