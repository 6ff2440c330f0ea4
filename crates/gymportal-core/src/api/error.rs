use serde_json::Value;
use thiserror::Error;

/// Message used when an error payload carries no `message` of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Message attached to every 401.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired or invalid";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired or invalid")]
    Unauthorized,

    #[error("{message} (status {status})")]
    Status {
        status: u16,
        message: String,
        response: Value,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),
}

/// Maximum length for error response bodies in log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build the structured error for a non-2xx response.
    ///
    /// The body is parsed as a JSON error payload; anything unparseable
    /// becomes an empty object. 401 is reported as [`ApiError::Unauthorized`].
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        let response: Value =
            serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        ApiError::Status {
            status: status.as_u16(),
            message,
            response,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text suitable for a toast: the server's own message when it sent one,
    /// otherwise the page's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Status { message, .. } if message != DEFAULT_ERROR_MESSAGE => {
                message.clone()
            }
            ApiError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_from_status_uses_payload_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Email already registered","field":"email"}"#,
        );
        match err {
            ApiError::Status {
                status,
                message,
                response,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email already registered");
                assert_eq!(response["field"], json!("email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_unparseable_body_falls_back_to_empty_object() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        match err {
            ApiError::Status {
                status,
                message,
                response,
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, DEFAULT_ERROR_MESSAGE);
                assert_eq!(response, json!({}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_401_is_unauthorized() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::from_status(StatusCode::CONFLICT, r#"{"message":"Already renewed"}"#);
        assert_eq!(err.user_message("Could not renew"), "Already renewed");

        let err = ApiError::from_status(StatusCode::CONFLICT, "");
        assert_eq!(err.user_message("Could not renew"), "Could not renew");
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);

        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }
}
