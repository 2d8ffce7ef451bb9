use thiserror::Error;

/// Failure taxonomy of the booking engine and store. The HTTP layer maps
/// each variant onto a status code (400 / 409 / 404 / 500).
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("failed to access availability data: {0}")]
    Persistence(#[from] std::io::Error),
}

impl BookingError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}
