use serde::Deserialize;

/// HTTP status the response interceptor treats as an expired or missing credential.
pub const UNAUTHORIZED: u16 = 401;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or request execution error from `reqwest` (including timeouts).
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Success payload could not be decoded into the requested type.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid client configuration or per-call options.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of the failed exchange, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether this failure is a `401 Unauthorized` response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(UNAUTHORIZED)
    }

    /// Parses the structured error body, if the server sent one.
    ///
    /// Recognizes JSON objects carrying at least a string `message` field.
    pub fn api_error(&self) -> Option<ApiErrorResponse> {
        match self {
            Self::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Structured error payload returned by many JSON APIs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Failure reported by a [`KeyValueStore`](crate::KeyValueStore) backend.
///
/// Never surfaced by [`TokenStore`](crate::TokenStore); it is logged and the
/// operation is treated as a no-op.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The host provides no persistent storage in this context.
    #[error("persistent storage is unavailable")]
    Unavailable,
    /// The backend rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn unauthorized_is_detected_from_http_status() {
        let err = ApiError::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        let other = ApiError::Http {
            status: 500,
            body: String::new(),
        };
        assert!(!other.is_unauthorized());
    }

    #[test]
    fn api_error_parses_structured_body() {
        let err = ApiError::Http {
            status: 400,
            body: r#"{"message":"Bad Request","code":"E_INPUT","details":{"field":"name"}}"#
                .to_owned(),
        };
        let parsed = err.api_error().expect("body must parse");
        assert_eq!(parsed.message, "Bad Request");
        assert_eq!(parsed.code.as_deref(), Some("E_INPUT"));
        assert!(parsed.details.is_some());
    }

    #[test]
    fn api_error_rejects_body_without_message() {
        let err = ApiError::Http {
            status: 500,
            body: r#"{"error":"boom"}"#.to_owned(),
        };
        assert!(err.api_error().is_none());
        assert!(ApiError::Decode("x".to_owned()).api_error().is_none());
    }
}
