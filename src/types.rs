use std::time::Duration;

use reqwest::{header::HeaderMap, Method};
use serde::de::DeserializeOwned;

use crate::{ApiError, Result};

/// Everything needed to perform one HTTP attempt.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Fully resolved request URL.
    pub url: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

/// Full transport response: status, headers and raw body.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx envelope into [`ApiError::Http`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decodes the payload; an empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let decoded = if self.body.trim().is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_str(&self.body)
        };
        decoded.map_err(|err| {
            ApiError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                self.body
            ))
        })
    }
}
