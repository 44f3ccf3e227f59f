use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::normalize::normalize;
use super::rules::CalorieTable;
use crate::category::Category;
use crate::error::EstimationError;

/// A rule that fired, with the keyword that made it fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub calories: u32,
}

/// Outcome of an estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub calories: u32,
    /// Keyword of the first matching rule; `None` when the category default was used.
    pub matched_keyword: Option<String>,
    /// Every matching rule, in rule order.
    pub matches: Vec<KeywordMatch>,
}

/// Keyword-based calorie estimator over a [`CalorieTable`].
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    table: CalorieTable,
}

impl Estimator {
    pub fn new(table: CalorieTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CalorieTable {
        &self.table
    }

    /// Estimates calories per portion for `name`.
    ///
    /// All rules of the category whose keywords appear in the normalized name
    /// contribute to the estimate, which is their mean rounded half to even.
    /// The reported keyword comes from the first rule that matched.
    pub fn estimate(&self, category: Category, name: &str) -> Result<Estimate, EstimationError> {
        let rules = self
            .table
            .get(category)
            .ok_or_else(|| EstimationError::UnknownCategory(category.to_string()))?;

        let normalized = normalize(name);
        let matches: Vec<KeywordMatch> = rules
            .rules
            .iter()
            .filter_map(|rule| {
                rule.first_match(&normalized).map(|keyword| KeywordMatch {
                    keyword: keyword.to_string(),
                    calories: rule.calories,
                })
            })
            .collect();

        let values: Vec<u32> = matches.iter().map(|m| m.calories).collect();
        let estimate = match mean_half_even(&values) {
            Some(calories) => Estimate {
                calories,
                matched_keyword: matches.first().map(|m| m.keyword.clone()),
                matches,
            },
            None => Estimate {
                calories: rules.default_calories,
                matched_keyword: None,
                matches,
            },
        };

        debug!(
            %category,
            name = %normalized,
            calories = estimate.calories,
            keyword = ?estimate.matched_keyword,
            "calorie estimate"
        );
        Ok(estimate)
    }
}

/// Integer mean, ties rounded to the even neighbour. `None` for an empty slice.
fn mean_half_even(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as u64;
    let sum: u64 = values.iter().copied().map(u64::from).sum();
    let (quotient, remainder) = (sum / n, sum % n);
    let rounded = match (remainder * 2).cmp(&n) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient % 2 == 0 => quotient,
        Ordering::Equal => quotient + 1,
    };
    // a mean never exceeds the largest input
    Some(u32::try_from(rounded).unwrap_or(u32::MAX))
}
