//! WAF binding error types

use crate::codes;
use guardflow_gate::ApiError;
use thiserror::Error;

/// WAF binding errors
#[derive(Error, Debug)]
pub enum WafError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("service error {code}: {message}")]
    Service { code: String, message: String },

    #[error("response missing change token")]
    MissingToken,
}

pub type Result<T> = std::result::Result<T, WafError>;

/// Tagged-error construction happens here, at the collaborator boundary.
/// Service errors keep their extracted code; transport failures get the
/// synthetic retryable `RequestError` code; anything else is a decode problem
/// and terminal.
impl From<WafError> for ApiError {
    fn from(err: WafError) -> Self {
        match err {
            WafError::Service { code, message } => ApiError::new(code, message),
            WafError::Http(inner) => ApiError::new(codes::REQUEST_ERROR, inner.to_string()),
            other => ApiError::new("SerializationError", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_keeps_its_code() {
        let err = WafError::Service {
            code: codes::STALE_DATA.to_string(),
            message: "change in flight".to_string(),
        };

        let api = ApiError::from(err);
        assert_eq!(api.code(), codes::STALE_DATA);
        assert_eq!(api.message(), "change in flight");
    }

    #[test]
    fn test_missing_token_is_terminal() {
        let api = ApiError::from(WafError::MissingToken);

        assert_eq!(api.code(), "SerializationError");
    }
}
