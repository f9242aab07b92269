use thiserror::Error;

/// Error type shared by every scan unit
///
/// Each task in a pool returns `AppResult`; the error is logged and audited
/// at the level that observed it and never crosses that pool.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Task panicked: {0}")]
    TaskPanicked(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                AppError::NotFound("Record not found in database".to_string())
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::DatabaseError(format!("Database pool error: {}", err))
    }
}

/// Transport failures only; Graph error bodies go through `ApiError`.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::UpstreamUnavailable("Graph API request timed out".to_string())
        } else if err.is_connect() {
            AppError::UpstreamUnavailable(format!("Failed to connect to Graph API: {}", err))
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => AppError::RateLimitError("Too many requests".to_string()),
                401 | 403 => AppError::Unauthorized(format!("Graph API rejected request: {}", status)),
                _ => AppError::ApiError(format!("HTTP {}: {}", status, err)),
            }
        } else {
            AppError::ApiError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::ValidationError(format!("Invalid date/time: {}", err))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::ValidationError(format!("Invalid number: {}", err))
    }
}

/// Spawned scan tasks and blocking repository work surface panics as a
/// `JoinError`.
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::TaskPanicked(panic_message(err.into_panic()))
        } else {
            AppError::InternalError("Task was cancelled before completion".to_string())
        }
    }
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl AppError {
    /// True for errors raised because the scan run ran out of time or was stopped.
    pub fn is_deadline(&self) -> bool {
        matches!(self, AppError::DeadlineExceeded(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_str_and_string() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("kaboom".to_string())), "kaboom");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic payload");
    }

    #[test]
    fn test_parse_errors_are_validation_errors() {
        let err = chrono::DateTime::parse_from_str("nope", "%Y").unwrap_err();
        assert!(matches!(AppError::from(err), AppError::ValidationError(_)));

        let err = "ten".parse::<u32>().unwrap_err();
        assert!(matches!(AppError::from(err), AppError::ValidationError(_)));
    }

    #[test]
    fn test_diesel_not_found_maps_to_not_found() {
        let err = AppError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!err.is_deadline());
    }

    #[tokio::test]
    async fn test_join_error_from_panic() {
        let handle = tokio::spawn(async { panic!("exploded") });
        let err: AppError = handle.await.unwrap_err().into();
        match err {
            AppError::TaskPanicked(msg) => assert_eq!(msg, "exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
