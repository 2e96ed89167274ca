//! Pure data types shared by every role: table classes, pooled foods, utensils,
//! menus and service channels.
//!
//! These types carry no state of their own. The [`Ledger`](crate::ledger::Ledger)
//! indexes its counters by them, and the admission and session logic reads the
//! per-menu requirements from here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capacity class of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableClass {
    TwoSeat,
    FourSeat,
    SixSeat,
}

impl TableClass {
    /// All classes, smallest first. Table fallback walks this order.
    pub const ALL: [TableClass; 3] = [TableClass::TwoSeat, TableClass::FourSeat, TableClass::SixSeat];

    /// Seats at a table of this class.
    pub const fn seats(self) -> u32 {
        match self {
            TableClass::TwoSeat => 2,
            TableClass::FourSeat => 4,
            TableClass::SixSeat => 6,
        }
    }

    /// Largest group any table can hold.
    pub const MAX_GROUP: u32 = 6;

    /// Classes a group of `group_size` may sit at, exact fit first, then larger.
    ///
    /// Never yields a class smaller than the group.
    pub fn candidates(group_size: u32) -> impl Iterator<Item = TableClass> {
        Self::ALL.into_iter().filter(move |class| class.seats() >= group_size)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-seat", self.seats())
    }
}

/// A consumable pool restocked by the supplier.
///
/// `Disposable` counts disposable cutlery sets; it is only used by takeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Food {
    Vegetable,
    Meat,
    Bread,
    Disposable,
}

impl Food {
    pub const ALL: [Food; 4] = [Food::Vegetable, Food::Meat, Food::Bread, Food::Disposable];

    pub const fn name(self) -> &'static str {
        match self {
            Food::Vegetable => "vegetable",
            Food::Meat => "meat",
            Food::Bread => "bread",
            Food::Disposable => "disposable",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reusable metal cutlery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Utensil {
    Fork,
    Knife,
    Spoon,
}

impl Utensil {
    /// All kinds, in the order the dishwasher picks them up.
    pub const ALL: [Utensil; 3] = [Utensil::Fork, Utensil::Knife, Utensil::Spoon];

    pub const fn name(self) -> &'static str {
        match self {
            Utensil::Fork => "fork",
            Utensil::Knife => "knife",
            Utensil::Spoon => "spoon",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Utensil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dine-in menu. Each guest in the party eats one portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    Soup,
    MainCourse,
}

impl Menu {
    /// Food debited per guest.
    pub const fn foods(self) -> &'static [Food] {
        match self {
            Menu::Soup => &[Food::Vegetable, Food::Bread],
            Menu::MainCourse => &[Food::Meat, Food::Vegetable],
        }
    }

    /// Clean utensils held per guest for the length of the meal.
    pub const fn utensils(self) -> &'static [Utensil] {
        match self {
            Menu::Soup => &[Utensil::Spoon],
            Menu::MainCourse => &[Utensil::Fork, Utensil::Knife],
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Menu::Soup => f.write_str("soup"),
            Menu::MainCourse => f.write_str("main course"),
        }
    }
}

/// Takeout meal. The bread variant is preferred when both are possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeoutMeal {
    MeatAndBread,
    MeatAndVegetable,
}

impl TakeoutMeal {
    /// Variants in order of preference.
    pub const PREFERENCE: [TakeoutMeal; 2] = [TakeoutMeal::MeatAndBread, TakeoutMeal::MeatAndVegetable];

    /// Pools debited per guest, disposable cutlery included.
    pub const fn foods(self) -> &'static [Food] {
        match self {
            TakeoutMeal::MeatAndBread => &[Food::Disposable, Food::Meat, Food::Bread],
            TakeoutMeal::MeatAndVegetable => &[Food::Disposable, Food::Meat, Food::Vegetable],
        }
    }
}

/// How a party is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    DineIn,
    Takeout,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::DineIn => f.write_str("dine-in"),
            Channel::Takeout => f.write_str("takeout"),
        }
    }
}
