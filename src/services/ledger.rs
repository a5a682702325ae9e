//! Appending earnings to a platform ledger

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{EarningsError, Result, INVALID_AMOUNT};
use crate::models::registry::{EarningEntry, Platform, Registry};
use crate::services::registry::save_registry;
use crate::services::store::Store;

/// Parse user-entered amount text into a non-negative decimal
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EarningsError::Validation(INVALID_AMOUNT.to_string()));
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| EarningsError::Validation(INVALID_AMOUNT.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EarningsError::Validation(INVALID_AMOUNT.to_string()));
    }

    Ok(amount.normalize())
}

/// Creation-time id in epoch milliseconds, bumped past the ledger's last id
/// so ids stay unique and increasing within one ledger
pub fn next_entry_id(platform: &Platform, now: DateTime<Utc>) -> Result<String> {
    let candidate = now.timestamp_millis();
    let last = platform
        .last_entry_id()
        .and_then(|id| id.parse::<i64>().ok());

    match last {
        Some(last) if candidate <= last => last
            .checked_add(1)
            .map(|next| next.to_string())
            .ok_or_else(|| EarningsError::Overflow(format!("entry id after {}", last))),
        _ => Ok(candidate.to_string()),
    }
}

/// Append one entry to the platform with `platform_id`, returning the new
/// registry. Pure: the caller decides whether to persist.
pub fn append_entry(
    mut registry: Registry,
    platform_id: &str,
    amount: Decimal,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Registry> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EarningsError::Validation(INVALID_AMOUNT.to_string()));
    }

    let platform = registry
        .platform_mut(platform_id)
        .ok_or_else(|| EarningsError::LookupMiss(platform_id.to_string()))?;

    let entry = EarningEntry {
        id: next_entry_id(platform, now)?,
        date,
        amount,
    };
    platform.push_entry(entry)?;

    // The home view sums every platform, so that total must fit too
    registry
        .total_earnings()
        .map_err(|_| EarningsError::Validation(INVALID_AMOUNT.to_string()))?;

    Ok(registry)
}

/// Validate `amount_input`, append it to the platform's ledger and write the
/// whole registry back.
///
/// Validation failures and unknown platforms return before any store write.
pub async fn append_earning(
    store: &dyn Store,
    key: &str,
    registry: Registry,
    platform_id: &str,
    amount_input: &str,
    date: NaiveDate,
) -> Result<Registry> {
    let amount = parse_amount(amount_input)?;
    let registry = append_entry(registry, platform_id, amount, date, Utc::now())?;

    save_registry(store, key, &registry).await?;

    if let Some(platform) = registry.platform(platform_id) {
        tracing::info!(
            platform_id = %platform_id,
            platform = %platform.name,
            amount = %amount,
            date = %date,
            earnings = %platform.earnings,
            entries = platform.earning_entries.len(),
            "Recorded earning"
        );
    }

    Ok(registry)
}
