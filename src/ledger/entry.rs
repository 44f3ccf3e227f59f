use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::category::Category;

/// Opaque handle to a stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub key: String,
    pub content_type: String,
}

/// Where an entry's calories per portion came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EstimationMode {
    Manual,
    AutoMatched { keyword: String },
    AutoDefault,
}

/// Submission accepted by [`Ledger::append`](super::Ledger::append).
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: Date,
    pub category: Category,
    pub name: Option<String>,
    pub quantity: u32,
    /// User-supplied calories per portion; `None` or `Some(0)` asks for an estimate.
    pub calories: Option<u32>,
    pub image: ImageReference,
}

/// One logged dish or drink. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: Uuid,
    created_at: OffsetDateTime,
    date: Date,
    category: Category,
    name: String,
    quantity: u32,
    calories_per_portion: u32,
    estimation: EstimationMode,
    image: ImageReference,
}

impl Entry {
    pub(super) fn new(
        date: Date,
        category: Category,
        name: String,
        quantity: u32,
        calories_per_portion: u32,
        estimation: EstimationMode,
        image: ImageReference,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            date,
            category,
            name,
            quantity,
            calories_per_portion,
            estimation,
            image,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn calories_per_portion(&self) -> u32 {
        self.calories_per_portion
    }

    /// Always `calories_per_portion * quantity`.
    pub fn total_calories(&self) -> u64 {
        u64::from(self.calories_per_portion) * u64::from(self.quantity)
    }

    pub fn estimation(&self) -> &EstimationMode {
        &self.estimation
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }
}
