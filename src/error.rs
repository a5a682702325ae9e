use thiserror::Error;

#[derive(Error, Debug)]
pub enum EarningsError {
    /// User input failed a precondition; nothing was changed.
    #[error("{0}")]
    Validation(String),

    #[error("Platform not found: {0}")]
    LookupMiss(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Stored registry is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported registry version {found} (max supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A stored ledger sums past what a Decimal can hold
    #[error("Earnings total overflows: {0}")]
    Overflow(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sea_orm::DbErr> for EarningsError {
    fn from(e: sea_orm::DbErr) -> Self {
        EarningsError::StoreUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EarningsError>;

pub const INVALID_AMOUNT: &str = "Please enter a valid amount.";
pub const EMPTY_SELECTION: &str = "Please select at least one platform to proceed.";
