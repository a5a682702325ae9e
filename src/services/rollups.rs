use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EarningsError, Result};
use crate::models::registry::{checked_sum, EarningEntry};

pub const WEEKLY_WINDOW_DAYS: i64 = 7;
/// Fixed trailing window, not the calendar month
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rollups {
    pub weekly: Decimal,
    pub monthly: Decimal,
    pub total: Decimal,
}

/// Sum a ledger into weekly, monthly and all-time totals as of `as_of`.
///
/// A windowed rollup covers `[as_of - N days, as_of]`, both ends inclusive.
/// Entries dated after `as_of` count toward `total` only. When the window
/// start falls before the earliest representable date it has no lower bound.
pub fn compute_rollups(entries: &[EarningEntry], as_of: NaiveDate) -> Result<Rollups> {
    Ok(Rollups {
        weekly: window_sum(entries, as_of, WEEKLY_WINDOW_DAYS)?,
        monthly: window_sum(entries, as_of, MONTHLY_WINDOW_DAYS)?,
        total: checked_sum(entries.iter().map(|e| e.amount))
            .ok_or_else(|| EarningsError::Overflow("ledger total".to_string()))?,
    })
}

fn window_sum(entries: &[EarningEntry], as_of: NaiveDate, days: i64) -> Result<Decimal> {
    let start = as_of.checked_sub_signed(Duration::days(days));

    checked_sum(
        entries
            .iter()
            .filter(|e| start.is_none_or(|start| e.date >= start) && e.date <= as_of)
            .map(|e| e.amount),
    )
    .ok_or_else(|| EarningsError::Overflow(format!("{}-day rollup", days)))
}
