use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("expiration date {expiration} precedes effective date {effective}")]
    InvalidDateRange {
        effective: jiff::civil::Date,
        expiration: jiff::civil::Date,
    },

    #[error("unsafe storage key segment: {0:?}")]
    UnsafeKeySegment(String),
}
