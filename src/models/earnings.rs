use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EarningsError;
use crate::models::registry::{EarningEntry, Platform, Registry};
use crate::services::rollups::Rollups;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub id: String,
    pub name: String,
    pub earnings: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformsResponse {
    pub total_earnings: Decimal,
    pub platforms: Vec<PlatformSummary>,
}

impl TryFrom<&Registry> for PlatformsResponse {
    type Error = EarningsError;

    fn try_from(registry: &Registry) -> Result<Self, Self::Error> {
        Ok(Self {
            total_earnings: registry.total_earnings()?,
            platforms: registry
                .platforms
                .iter()
                .map(|p| PlatformSummary {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    earnings: p.earnings,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetailResponse {
    pub id: String,
    pub name: String,
    pub earnings: Decimal,
    pub as_of: NaiveDate,
    pub rollups: Rollups,
    pub earning_entries: Vec<EarningEntry>,
}

impl PlatformDetailResponse {
    pub fn new(platform: &Platform, as_of: NaiveDate, rollups: Rollups) -> Self {
        Self {
            id: platform.id.clone(),
            name: platform.name.clone(),
            earnings: platform.earnings,
            as_of,
            rollups,
            earning_entries: platform.earning_entries.clone(),
        }
    }
}

/// `amount` is whatever the user typed; a JSON number is accepted as well
#[derive(Debug, Clone, Deserialize)]
pub struct AddEarningRequest {
    #[serde(default)]
    pub amount: serde_json::Value,
    pub date: Option<String>, // YYYY-MM-DD, defaults to today
}

impl AddEarningRequest {
    pub fn amount_text(&self) -> String {
        match &self.amount {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetailQuery {
    pub as_of: Option<String>, // YYYY-MM-DD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_text_forms() {
        let text: AddEarningRequest = serde_json::from_str(r#"{"amount":"250"}"#).unwrap();
        let number: AddEarningRequest = serde_json::from_str(r#"{"amount":12.5}"#).unwrap();
        let missing: AddEarningRequest = serde_json::from_str(r#"{}"#).unwrap();
        let boolean: AddEarningRequest = serde_json::from_str(r#"{"amount":true}"#).unwrap();

        assert_eq!(text.amount_text(), "250");
        assert_eq!(number.amount_text(), "12.5");
        assert_eq!(missing.amount_text(), "");
        assert_eq!(boolean.amount_text(), "");
        assert!(text.date.is_none());
    }
}
