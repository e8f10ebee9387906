use thiserror::Error;

/// How a failure is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network or validation failure: timed notification
    Notice,
    /// Credentials rejected: alert, session left as is
    Authentication,
    /// Role not allowed: go to the unauthorized view
    Authorization,
}

/// Failure of a backend call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication failed: {0}")]
    Unauthenticated(String),

    #[error("access denied: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("not signed in")]
    NoSession,
}

impl ApiError {
    /// Build an error from a non-2xx response.
    ///
    /// The backend reports failures as `{"message": "..."}` or as plain text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .unwrap_or_else(|| body.trim().to_string());
        let message = if message.is_empty() {
            format!("HTTP {status}")
        } else {
            message
        };

        match status {
            401 => Self::Unauthenticated(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            400..=499 => Self::Rejected { status, message },
            _ => Self::Server { status, message },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated(_) | Self::NoSession => ErrorCategory::Authentication,
            Self::Forbidden(_) => ErrorCategory::Authorization,
            _ => ErrorCategory::Notice,
        }
    }

    /// Whether a token check failing with this error means the token is dead
    pub fn invalidates_session(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::Forbidden(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16(), "")
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Client-side form validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(String),

    #[error("{0} must be a number")]
    NotANumber(String),

    #[error("{0} must be a date (YYYY-MM-DD)")]
    NotADate(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("reset token is missing or invalid")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ApiError::from_status(401, ""), ApiError::Unauthenticated(_)));
        assert!(matches!(ApiError::from_status(403, ""), ApiError::Forbidden(_)));
        assert!(matches!(ApiError::from_status(404, ""), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from_status(422, ""),
            ApiError::Rejected { status: 422, .. }
        ));
        assert!(matches!(
            ApiError::from_status(502, ""),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_message_extraction() {
        let err = ApiError::from_status(400, r#"{"message": "Email already used"}"#);
        assert_eq!(err.to_string(), "Email already used");

        let err = ApiError::from_status(400, "Invalid verification code\n");
        assert_eq!(err.to_string(), "Invalid verification code");

        let err = ApiError::from_status(400, "");
        assert_eq!(err.to_string(), "HTTP 400");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ApiError::from_status(401, "").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::from_status(403, "").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(ApiError::Timeout.category(), ErrorCategory::Notice);
        assert_eq!(
            ApiError::from_status(500, "").category(),
            ErrorCategory::Notice
        );
        assert!(!ApiError::Network("refused".into()).invalidates_session());
    }
}
