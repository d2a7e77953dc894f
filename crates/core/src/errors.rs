use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    /// The requested slot was taken by someone else after it was derived.
    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Backend error: {0}")]
    Backend(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Whether the caller can recover by re-fetching and re-deriving slots.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BookingError::Conflict(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
