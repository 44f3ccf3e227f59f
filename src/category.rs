use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimationError;

/// What was logged. Decides which default and which keyword rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Dish,
    Drink,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Dish, Category::Drink];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dish => "dish",
            Category::Drink => "drink",
        }
    }

    /// User-facing label, as shown in the journal.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Dish => "Plat",
            Category::Drink => "Boisson",
        }
    }

    /// Name given to an entry submitted without one.
    pub fn unnamed_label(&self) -> String {
        format!("{} sans nom", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EstimationError;

    // accepts the journal's french labels as well
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dish" | "plat" => Ok(Category::Dish),
            "drink" | "boisson" => Ok(Category::Drink),
            _ => Err(EstimationError::UnknownCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = EstimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
