use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize::normalize;
use crate::category::Category;
use crate::error::ConfigError;

/// Keywords that, when found in an entry name, suggest a calorie value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub calories: u32,
}

impl KeywordRule {
    pub fn new<I, S>(keywords: I, calories: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            calories,
        }
    }

    /// First keyword (in declared order) contained in `normalized_name`.
    pub fn first_match(&self, normalized_name: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|k| normalized_name.contains(k))
    }
}

/// Default value and ordered rules for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub default_calories: u32,
    #[serde(default)]
    pub rules: Vec<KeywordRule>,
}

/// Calorie configuration for every category.
///
/// Keywords are stored normalized, so a table written with accents
/// ("pâtes") matches the same names as one written without.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Category, CategoryRules>",
    into = "BTreeMap<Category, CategoryRules>"
)]
pub struct CalorieTable {
    categories: BTreeMap<Category, CategoryRules>,
}

impl CalorieTable {
    /// Validates and normalizes a table. Every category must be present.
    pub fn new(categories: BTreeMap<Category, CategoryRules>) -> Result<Self, ConfigError> {
        let mut checked = BTreeMap::new();
        for category in Category::ALL {
            let mut entry = categories
                .get(&category)
                .cloned()
                .ok_or(ConfigError::MissingCategory(category))?;
            if entry.default_calories == 0 {
                return Err(ConfigError::ZeroDefault(category));
            }
            for (index, rule) in entry.rules.iter_mut().enumerate() {
                if rule.keywords.is_empty() {
                    return Err(ConfigError::EmptyRule { category, index });
                }
                if rule.calories == 0 {
                    return Err(ConfigError::ZeroCalories { category, index });
                }
                for keyword in rule.keywords.iter_mut() {
                    *keyword = normalize(keyword.trim());
                    if keyword.is_empty() {
                        return Err(ConfigError::EmptyKeyword { category, index });
                    }
                }
            }
            checked.insert(category, entry);
        }
        Ok(Self {
            categories: checked,
        })
    }

    pub fn get(&self, category: Category) -> Option<&CategoryRules> {
        self.categories.get(&category)
    }

    pub fn default_calories(&self, category: Category) -> Option<u32> {
        self.get(category).map(|c| c.default_calories)
    }

    /// Replaces the fallback value of one category.
    pub fn set_default(&mut self, category: Category, calories: u32) -> Result<(), ConfigError> {
        if calories == 0 {
            return Err(ConfigError::ZeroDefault(category));
        }
        let entry = self
            .categories
            .get_mut(&category)
            .ok_or(ConfigError::MissingCategory(category))?;
        entry.default_calories = calories;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryRules)> {
        self.categories.iter().map(|(c, r)| (*c, r))
    }
}

impl TryFrom<BTreeMap<Category, CategoryRules>> for CalorieTable {
    type Error = ConfigError;

    fn try_from(value: BTreeMap<Category, CategoryRules>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CalorieTable> for BTreeMap<Category, CategoryRules> {
    fn from(table: CalorieTable) -> Self {
        table.categories
    }
}

impl Default for CalorieTable {
    /// Built-in french table. Order matters: the first matching rule names the estimate.
    fn default() -> Self {
        let dish = CategoryRules {
            default_calories: 550,
            rules: vec![
                KeywordRule::new(["salade", "soupe", "legume", "crudite", "veloute"], 250),
                KeywordRule::new(["pizza"], 850),
                KeywordRule::new(["burger", "hamburger", "frites"], 750),
                KeywordRule::new(["pates", "spaghetti", "lasagne", "risotto", "nouilles"], 650),
                KeywordRule::new(["fromage", "raclette", "fondue", "tartiflette"], 700),
                KeywordRule::new(["steak", "boeuf", "entrecote", "porc"], 600),
                KeywordRule::new(["poulet", "poisson", "saumon", "thon"], 450),
                KeywordRule::new(["sandwich", "wrap", "kebab", "tacos"], 600),
                KeywordRule::new(["gateau", "tarte", "dessert", "creme", "crepe"], 400),
                KeywordRule::new(["fruit", "pomme", "banane", "yaourt"], 120),
            ],
        };
        let drink = CategoryRules {
            default_calories: 120,
            rules: vec![
                KeywordRule::new(["eau", "the", "cafe", "infusion", "tisane"], 5),
                KeywordRule::new(["soda", "coca", "limonade"], 140),
                KeywordRule::new(["jus", "nectar"], 110),
                KeywordRule::new(["biere"], 150),
                KeywordRule::new(["vin", "champagne", "cidre"], 125),
                KeywordRule::new(["milkshake", "chocolat chaud"], 350),
                KeywordRule::new(["lait", "smoothie"], 180),
                KeywordRule::new(["cocktail", "mojito", "spritz"], 220),
            ],
        };
        Self {
            categories: BTreeMap::from([(Category::Dish, dish), (Category::Drink, drink)]),
        }
    }
}
