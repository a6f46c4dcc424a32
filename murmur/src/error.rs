use thiserror::Error;

#[derive(Error, Debug)]
pub enum MurmurError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("Extraction rate limit exceeded, retry after {retry_after:?} seconds")]
    ExtractionRateLimit { retry_after: Option<u64> },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Transaction failed.")]
    TransferFailed,

    #[error("Trade failed.")]
    TradeFailed,

    #[error("Settlement timed out after {elapsed_secs} seconds")]
    SettlementTimeout { elapsed_secs: u64 },

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, MurmurError>;
