//! `bearer-http` is an async HTTP client facade for JSON APIs.
//!
//! [`ApiClient`] wraps a transport with two interceptors:
//! - the stored bearer token is attached to every request
//! - a `401 Unauthorized` clears the token and redirects to the login page
//!
//! [`retry()`] adds exponential backoff around any call, including client
//! calls, and [`ApiRequest`] exposes a call as `{ data, loading, error }`.

mod client;
mod error;
mod interceptor;
mod navigation;
mod options;
mod query;
mod request_state;
mod retry;
mod storage;
mod transport;
mod types;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserNavigator, BrowserStorage};
pub use client::{resolve_url, ApiClient};
pub use error::{ApiError, ApiErrorResponse, StorageError, UNAUTHORIZED};
pub use interceptor::{intercept_request, intercept_response, UnauthorizedHandler};
pub use navigation::{Navigator, DEFAULT_LOGIN_PATH};
pub use options::{ClientConfig, RequestOptions, RetryOptions, DEFAULT_TIMEOUT_MS};
pub use query::build_query_string;
pub use request_state::{ApiRequest, RequestState};
pub use retry::{backoff_delay, retry, retry_with};
pub use storage::{KeyValueStore, MemoryStore, TokenStore, AUTH_TOKEN_KEY};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Envelope, RequestDescriptor};

pub type Result<T> = std::result::Result<T, ApiError>;
