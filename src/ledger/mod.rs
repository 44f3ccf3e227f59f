//! Append-only journal of entries and the per-day totals derived from it.

mod entry;

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;
use tracing::info;
use uuid::Uuid;

pub use entry::{Entry, EstimationMode, ImageReference, NewEntry};

use crate::error::LedgerError;
use crate::estimation::Estimator;

/// Calories eaten on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: Date,
    pub total_calories: u64,
}

/// Session journal. Entries are only ever appended; there is no edit or
/// delete path.
#[derive(Debug, Default)]
pub struct Ledger {
    estimator: Estimator,
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator,
            entries: Vec::new(),
        }
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Resolves calories per portion and records the entry.
    ///
    /// A positive user value wins and is tagged `Manual`. Otherwise the
    /// estimator decides, tagged `AutoMatched` or `AutoDefault`.
    pub fn append(&mut self, new: NewEntry) -> Result<Entry, LedgerError> {
        if new.quantity < 1 {
            return Err(LedgerError::InvalidQuantity(new.quantity));
        }

        // The placeholder label is for display only and never reaches the estimator.
        let typed = new.name.as_deref().map(str::trim).unwrap_or_default();

        let (calories_per_portion, estimation) = match new.calories {
            Some(c) if c > 0 => (c, EstimationMode::Manual),
            _ => {
                let estimate = self.estimator.estimate(new.category, typed)?;
                let mode = match estimate.matched_keyword {
                    Some(keyword) => EstimationMode::AutoMatched { keyword },
                    None => EstimationMode::AutoDefault,
                };
                (estimate.calories, mode)
            }
        };

        let name = if typed.is_empty() {
            new.category.unnamed_label()
        } else {
            typed.to_string()
        };

        let entry = Entry::new(
            new.date,
            new.category,
            name,
            new.quantity,
            calories_per_portion,
            estimation,
            new.image,
        );
        info!(
            entry_id = %entry.id(),
            date = %entry.date(),
            category = %entry.category(),
            total_calories = entry.total_calories(),
            "entry appended"
        );
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of total calories for `date`; 0 when nothing was logged that day.
    pub fn total_for_date(&self, date: Date) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.date() == date)
            .map(Entry::total_calories)
            .sum()
    }

    /// Per-day totals, oldest day first. Recomputed on every call.
    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        let mut by_day: BTreeMap<Date, u64> = BTreeMap::new();
        for e in &self.entries {
            *by_day.entry(e.date()).or_default() += e.total_calories();
        }
        by_day
            .into_iter()
            .map(|(date, total_calories)| DailyTotal {
                date,
                total_calories,
            })
            .collect()
    }

    /// Entries, most recent submission first.
    pub fn history(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::category::Category;
    use crate::estimation::{CalorieTable, CategoryRules, KeywordRule};

    fn photo() -> ImageReference {
        ImageReference {
            key: "photos/test.jpg".into(),
            content_type: "image/jpeg".into(),
        }
    }

    fn submission(
        date: Date,
        category: Category,
        name: &str,
        quantity: u32,
        calories: Option<u32>,
    ) -> NewEntry {
        NewEntry {
            date,
            category,
            name: Some(name.to_string()),
            quantity,
            calories,
            image: photo(),
        }
    }

    #[test]
    fn manual_calories_take_precedence() {
        let mut ledger = Ledger::default();
        let e = ledger
            .append(submission(
                date!(2024 - 01 - 01),
                Category::Dish,
                "Pizza au fromage",
                2,
                Some(999),
            ))
            .unwrap();
        assert_eq!(e.calories_per_portion(), 999);
        assert_eq!(e.estimation(), &EstimationMode::Manual);
        assert_eq!(e.total_calories(), 1998);
    }

    #[test]
    fn zero_calories_falls_back_to_estimate() {
        let mut ledger = Ledger::default();
        let e = ledger
            .append(submission(
                date!(2024 - 01 - 01),
                Category::Dish,
                "Salade niçoise",
                1,
                Some(0),
            ))
            .unwrap();
        assert_eq!(e.calories_per_portion(), 250);
        assert_eq!(
            e.estimation(),
            &EstimationMode::AutoMatched {
                keyword: "salade".into()
            }
        );
    }

    #[test]
    fn unmatched_name_uses_default() {
        let mut ledger = Ledger::default();
        let e = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Drink, "xyz", 3, None))
            .unwrap();
        assert_eq!(e.calories_per_portion(), 120);
        assert_eq!(e.estimation(), &EstimationMode::AutoDefault);
        assert_eq!(e.total_calories(), 360);
    }

    #[test]
    fn blank_name_gets_category_label() {
        let mut ledger = Ledger::default();
        let e = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Drink, "   ", 1, None))
            .unwrap();
        assert_eq!(e.name(), "Boisson sans nom");

        let mut unnamed = submission(date!(2024 - 01 - 01), Category::Dish, "", 1, None);
        unnamed.name = None;
        let e = ledger.append(unnamed).unwrap();
        assert_eq!(e.name(), "Plat sans nom");
        assert_eq!(e.calories_per_portion(), 550);
    }

    #[test]
    fn unnamed_entry_is_not_matched_against_its_label() {
        let table = CalorieTable::new(BTreeMap::from([
            (
                Category::Dish,
                CategoryRules {
                    default_calories: 500,
                    rules: vec![KeywordRule::new(["plat"], 900)],
                },
            ),
            (
                Category::Drink,
                CategoryRules {
                    default_calories: 100,
                    rules: vec![KeywordRule::new(["boisson"], 300)],
                },
            ),
        ]))
        .unwrap();
        let mut ledger = Ledger::new(Estimator::new(table));

        let mut unnamed = submission(date!(2024 - 01 - 01), Category::Dish, "", 1, None);
        unnamed.name = None;
        let e = ledger.append(unnamed).unwrap();
        assert_eq!(e.name(), "Plat sans nom");
        assert_eq!(e.calories_per_portion(), 500);
        assert_eq!(e.estimation(), &EstimationMode::AutoDefault);

        let e = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Drink, "  ", 1, None))
            .unwrap();
        assert_eq!(e.name(), "Boisson sans nom");
        assert_eq!(e.calories_per_portion(), 100);
        assert_eq!(e.estimation(), &EstimationMode::AutoDefault);

        let e = ledger
            .append(submission(
                date!(2024 - 01 - 01),
                Category::Dish,
                "Plat du jour",
                1,
                None,
            ))
            .unwrap();
        assert_eq!(e.calories_per_portion(), 900);
    }

    #[test]
    fn name_is_trimmed() {
        let mut ledger = Ledger::default();
        let e = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Dish, "  Soupe  ", 1, None))
            .unwrap();
        assert_eq!(e.name(), "Soupe");
    }

    #[test]
    fn zero_quantity_is_rejected_and_not_stored() {
        let mut ledger = Ledger::default();
        let err = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Dish, "Soupe", 0, None))
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidQuantity(0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn aggregates_totals_by_day() {
        let mut ledger = Ledger::default();
        for (d, kcal) in [
            (date!(2024 - 01 - 02), 200),
            (date!(2024 - 01 - 01), 500),
            (date!(2024 - 01 - 01), 300),
        ] {
            ledger
                .append(submission(d, Category::Dish, "plat", 1, Some(kcal)))
                .unwrap();
        }

        assert_eq!(
            ledger.daily_totals(),
            vec![
                DailyTotal {
                    date: date!(2024 - 01 - 01),
                    total_calories: 800
                },
                DailyTotal {
                    date: date!(2024 - 01 - 02),
                    total_calories: 200
                },
            ]
        );
        assert_eq!(ledger.total_for_date(date!(2024 - 01 - 01)), 800);
        assert_eq!(ledger.total_for_date(date!(2024 - 01 - 03)), 0);
    }

    #[test]
    fn totals_account_for_quantity() {
        let mut ledger = Ledger::default();
        ledger
            .append(submission(date!(2024 - 03 - 10), Category::Drink, "Jus", 3, Some(110)))
            .unwrap();
        assert_eq!(ledger.total_for_date(date!(2024 - 03 - 10)), 330);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut ledger = Ledger::default();
        let a = ledger
            .append(submission(date!(2024 - 01 - 05), Category::Dish, "A", 1, None))
            .unwrap();
        let b = ledger
            .append(submission(date!(2024 - 01 - 01), Category::Dish, "B", 1, None))
            .unwrap();

        let ids: Vec<Uuid> = ledger.history().map(Entry::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
        assert_eq!(ledger.get(a.id()), Some(&a));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn empty_ledger_has_no_totals() {
        let ledger = Ledger::default();
        assert!(ledger.daily_totals().is_empty());
        assert_eq!(ledger.history().count(), 0);
    }
}
