use std::error::Error;

/// Error taxonomy for the storefront backend.
///
/// `Persistence` is fatal to the operation that hit it; `Delivery` never is
/// outside the force-notify route, where the caller asked for the delivery
/// result explicitly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("persistence failure: {0}")]
    Persistence(#[source] Box<dyn Error + Send + Sync>),

    #[error("delivery failure: {0}")]
    Delivery(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        StoreError::Delivery(message.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record"),
            other => StoreError::Persistence(Box::new(other)),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Persistence(Box::new(err))
    }
}
