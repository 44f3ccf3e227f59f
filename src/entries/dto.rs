use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::category::Category;
use crate::ledger::{Entry, EstimationMode};

/// Parses `YYYY-MM-DD`.
pub(crate) fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub date: Date,
    pub category: Category,
    pub name: String,
    pub quantity: u32,
    pub calories_per_portion: u32,
    pub total_calories: u64,
    pub estimation: EstimationMode,
    pub photo_url: String,
}

impl From<&Entry> for EntryResponse {
    fn from(e: &Entry) -> Self {
        Self {
            id: e.id(),
            created_at: e.created_at(),
            date: e.date(),
            category: e.category(),
            name: e.name().to_string(),
            quantity: e.quantity(),
            calories_per_portion: e.calories_per_portion(),
            total_calories: e.total_calories(),
            estimation: e.estimation().clone(),
            photo_url: format!("/api/v1/entries/{}/photo", e.id()),
        }
    }
}

/// Submission fields shared by the multipart and base64 endpoints.
#[derive(Debug, Clone)]
pub struct EntryFields {
    /// Defaults to today when absent.
    pub date: Option<Date>,
    pub category: Category,
    pub name: Option<String>,
    pub quantity: u32,
    pub calories: Option<u32>,
}

/// Text parts of a multipart submission, as received.
#[derive(Debug, Default)]
pub struct MultipartFields {
    pub date: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub calories: Option<String>,
}

impl MultipartFields {
    /// Records a text part; unknown parts are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "date" => &mut self.date,
            "category" | "type" => &mut self.category,
            "name" => &mut self.name,
            "quantity" => &mut self.quantity,
            "calories" => &mut self.calories,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn parse(self) -> Result<EntryFields, String> {
        let date = non_blank(self.date)
            .map(|d| parse_date(&d).map_err(|_| format!("invalid date {d:?}, expected YYYY-MM-DD")))
            .transpose()?;
        let category = non_blank(self.category)
            .ok_or_else(|| "category is required".to_string())?
            .parse::<Category>()
            .map_err(|e| e.to_string())?;
        let quantity = match non_blank(self.quantity) {
            Some(q) => q
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid quantity {q:?}"))?,
            None => default_quantity(),
        };
        let calories = non_blank(self.calories)
            .map(|c| c.trim().parse::<u32>().map_err(|_| format!("invalid calories {c:?}")))
            .transpose()?;
        Ok(EntryFields {
            date,
            category,
            name: self.name,
            quantity,
            calories,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /entries/base64 body. `image_b64` may be a bare payload or a
/// `data:<type>;base64,<payload>` URL.
#[derive(Debug, Deserialize)]
pub struct CreateEntryBase64 {
    #[serde(default)]
    pub date: Option<Date>,
    pub category: Category,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub image_b64: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl CreateEntryBase64 {
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            date: self.date,
            category: self.category,
            name: self.name.clone(),
            quantity: self.quantity,
            calories: self.calories,
        }
    }
}

/// Splits a data URL into its content type and payload. Plain payloads pass through.
pub(crate) fn split_data_url(raw: &str) -> (Option<&str>, &str) {
    match raw.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((meta, payload)) => {
            let content_type = meta.strip_suffix(";base64").unwrap_or(meta);
            ((!content_type.is_empty()).then_some(content_type), payload)
        }
        None => (None, raw),
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

fn default_quantity() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-01-02").unwrap(), date!(2024 - 01 - 02));
        assert!(parse_date("02/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn multipart_fields_parse() {
        let mut f = MultipartFields::default();
        f.set("date", "2024-05-01".into());
        f.set("type", "Boisson".into());
        f.set("name", "Jus d'orange".into());
        f.set("quantity", "2".into());
        f.set("calories", "".into());
        f.set("ignored", "x".into());
        let fields = f.parse().unwrap();
        assert_eq!(fields.date, Some(date!(2024 - 05 - 01)));
        assert_eq!(fields.category, Category::Drink);
        assert_eq!(fields.quantity, 2);
        assert_eq!(fields.calories, None);
    }

    #[test]
    fn multipart_fields_report_problems() {
        let missing = MultipartFields::default().parse().unwrap_err();
        assert_eq!(missing, "category is required");

        let mut f = MultipartFields::default();
        f.set("category", "dish".into());
        f.set("quantity", "-1".into());
        assert!(f.parse().unwrap_err().contains("invalid quantity"));

        let mut f = MultipartFields::default();
        f.set("category", "snack".into());
        assert!(f.parse().unwrap_err().contains("unknown category"));
    }

    #[test]
    fn quantity_defaults_to_one() {
        let mut f = MultipartFields::default();
        f.set("category", "plat".into());
        assert_eq!(f.parse().unwrap().quantity, 1);
    }

    #[test]
    fn data_urls_are_split() {
        assert_eq!(
            split_data_url("data:image/png;base64,AAAA"),
            (Some("image/png"), "AAAA")
        );
        assert_eq!(split_data_url("AAAA"), (None, "AAAA"));
    }

    #[test]
    fn base64_body_deserializes() {
        let json = serde_json::json!({
            "category": "boisson",
            "quantity": 3,
            "date": "2024-01-01"
        });
        let body: CreateEntryBase64 = serde_json::from_value(json).unwrap();
        assert_eq!(body.category, Category::Drink);
        assert_eq!(body.date, Some(date!(2024 - 01 - 01)));
        assert!(body.image_b64.is_none());
    }
}
