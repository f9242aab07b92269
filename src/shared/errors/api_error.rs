use super::app_error::AppError;
use serde::Deserialize;
use thiserror::Error;

/// Errors reported by the Graph API in a failed response body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rate limit exceeded (code {code}): {message}")]
    RateLimit { code: i64, message: String },

    #[error("Access token rejected (code {code}): {message}")]
    AuthenticationFailed { code: i64, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid API response: {message}")]
    InvalidResponse { message: String },

    #[error("API error: status {status}, body: {body}")]
    Status { status: u16, body: String },
}

/// `{"error": {...}}` envelope returned by the Graph API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

// Graph API throttling codes
const RATE_LIMIT_CODES: [i64; 5] = [4, 17, 32, 613, 80001];
const AUTH_CODES: [i64; 3] = [102, 190, 463];

impl ApiError {
    /// Classify a failed response from its status code and raw body.
    pub fn from_response(status: u16, path: &str, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

        if let Some(envelope) = parsed {
            let code = envelope.error.code.unwrap_or_default();
            let message = envelope.error.message;
            if RATE_LIMIT_CODES.contains(&code) {
                return ApiError::RateLimit { code, message };
            }
            if AUTH_CODES.contains(&code) {
                return ApiError::AuthenticationFailed { code, message };
            }
        }

        match status {
            404 => ApiError::NotFound {
                resource: path.to_string(),
            },
            429 => ApiError::RateLimit {
                code: 429,
                message: body.to_string(),
            },
            _ => ApiError::Status {
                status,
                body: body.to_string(),
            },
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RateLimit { .. } => AppError::RateLimitError(err.to_string()),
            ApiError::AuthenticationFailed { .. } => AppError::Unauthorized(err.to_string()),
            ApiError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ApiError::InvalidResponse { .. } => AppError::SerializationError(err.to_string()),
            ApiError::Status { .. } => AppError::ApiError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_token_is_authentication_failure() {
        let body = r#"{"error":{"message":"Error validating access token","type":"OAuthException","code":190}}"#;
        let err = ApiError::from_response(400, "123/feed", body);
        assert!(matches!(err, ApiError::AuthenticationFailed { code: 190, .. }));
        assert!(matches!(AppError::from(err), AppError::Unauthorized(_)));
    }

    #[test]
    fn test_throttling_code_is_rate_limit() {
        let body = r#"{"error":{"message":"Application request limit reached","code":4}}"#;
        let err = ApiError::from_response(400, "123/feed", body);
        assert!(matches!(AppError::from(err), AppError::RateLimitError(_)));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = ApiError::from_response(500, "123/feed", "<html>oops</html>");
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let err = ApiError::from_response(404, "999", "");
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
