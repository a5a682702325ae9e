//! Persisted earnings registry
//!
//! The whole registry is stored as one JSON document:
//! `{"version": 1, "platforms": [{"id", "name", "earnings", "earningEntries"}]}`.
//! Older installs wrote a bare array of platforms with no version tag; those
//! are still readable and are rewritten in the versioned shape on next save.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EarningsError, Result, INVALID_AMOUNT};
use crate::models::catalog::PlatformCatalogEntry;

pub const REGISTRY_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningEntry {
    pub id: String,
    #[serde(with = "entry_date")]
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    /// Cached sum of `earning_entries`; only changed through `push_entry`
    pub earnings: Decimal,
    #[serde(default)]
    pub earning_entries: Vec<EarningEntry>,
}

impl Platform {
    pub fn from_catalog(entry: &PlatformCatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            earnings: Decimal::ZERO,
            earning_entries: Vec::new(),
        }
    }

    /// `None` when the ledger sum does not fit in a Decimal
    pub fn ledger_total(&self) -> Option<Decimal> {
        checked_sum(self.earning_entries.iter().map(|e| e.amount))
    }

    /// Append to the ledger and recompute the cached total from scratch.
    ///
    /// Leaves the platform untouched if the new total would overflow.
    pub fn push_entry(&mut self, entry: EarningEntry) -> Result<()> {
        let total = self
            .ledger_total()
            .and_then(|sum| sum.checked_add(entry.amount))
            .ok_or_else(|| EarningsError::Validation(INVALID_AMOUNT.to_string()))?;

        self.earning_entries.push(entry);
        self.earnings = total;
        Ok(())
    }

    pub fn last_entry_id(&self) -> Option<&str> {
        self.earning_entries.last().map(|e| e.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub version: u32,
    pub platforms: Vec<Platform>,
}

impl Registry {
    pub fn from_catalog<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a PlatformCatalogEntry>,
    {
        Self {
            version: REGISTRY_VERSION,
            platforms: entries.into_iter().map(Platform::from_catalog).collect(),
        }
    }

    pub fn platform(&self, id: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: &str) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    /// Grand total across every tracked platform
    pub fn total_earnings(&self) -> Result<Decimal> {
        checked_sum(self.platforms.iter().map(|p| p.earnings))
            .ok_or_else(|| EarningsError::Overflow("registry total".to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored document, accepting the legacy unversioned array form.
    ///
    /// Documents tagged with a newer version than this build understands are
    /// rejected rather than guessed at.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        match value {
            serde_json::Value::Array(_) => {
                let platforms: Vec<Platform> = serde_json::from_value(value)?;
                tracing::debug!(
                    platforms = platforms.len(),
                    "Read legacy unversioned registry document"
                );
                Ok(Self {
                    version: REGISTRY_VERSION,
                    platforms,
                })
            }
            serde_json::Value::Object(ref fields) => {
                if let Some(found) = fields.get("version").and_then(|v| v.as_u64()) {
                    if found > REGISTRY_VERSION as u64 {
                        return Err(EarningsError::UnsupportedVersion {
                            found: u32::try_from(found).unwrap_or(u32::MAX),
                            supported: REGISTRY_VERSION,
                        });
                    }
                }
                Ok(serde_json::from_value(value)?)
            }
            other => Err(EarningsError::Malformed(serde::de::Error::custom(format!(
                "expected registry object or platform array, found {}",
                json_kind(&other)
            )))),
        }
    }
}

/// Sum without panicking on overflow
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Entry dates are written as `YYYY-MM-DD`.
///
/// Legacy documents carry locale-formatted dates (`10/14/2026`, or
/// `14/10/2026` on day-first locales); month-first is tried before day-first.
mod entry_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    const LEGACY_FORMATS: [&str; 2] = ["%m/%d/%Y", "%d/%m/%Y"];

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(ISO).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();

        if let Ok(date) = NaiveDate::parse_from_str(raw, ISO) {
            return Ok(date);
        }
        LEGACY_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid entry date '{}'", raw)))
    }
}
