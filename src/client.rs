use std::{fmt, sync::Arc, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    interceptor::{intercept_request, intercept_response, UnauthorizedHandler},
    ApiError, ClientConfig, KeyValueStore, Navigator, RequestDescriptor, RequestOptions,
    ReqwestTransport, Result, TokenStore, Transport, DEFAULT_TIMEOUT_MS,
};

/// Joins a resource path onto a base URL.
///
/// Example: `("https://api.example.com/", "/users")` → `"https://api.example.com/users"`.
/// Absolute URLs are returned unchanged.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_owned();
    }
    if path.is_empty() {
        return base_url.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// `scheme://...` or protocol-relative `//...`; a scheme starts with a letter.
fn is_absolute_url(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    match path.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Zero means "use the default", never "time out immediately".
fn timeout_or(timeout_ms: u64, fallback: Duration) -> Duration {
    if timeout_ms == 0 {
        fallback
    } else {
        Duration::from_millis(timeout_ms)
    }
}

#[derive(Clone)]
/// HTTP client that injects the bearer credential and reacts to `401`s.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
    default_headers: HeaderMap,
    unauthorized: UnauthorizedHandler,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_headers", &self.default_headers)
            .field("unauthorized", &self.unauthorized)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client without token persistence or navigation.
    ///
    /// Use [`ApiClient::with_token_persistence`] to let the client remember
    /// a credential and [`ApiClient::with_navigator`] to redirect on `401`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bearer_http::{ApiClient, ClientConfig};
    ///
    /// let client = ApiClient::new(ClientConfig::new("https://api.example.com"))
    ///     .expect("valid config");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().to_owned();
        if base_url.is_empty() {
            return Err(ApiError::Config("base URL must not be empty".to_owned()));
        }
        url::Url::parse(&base_url)
            .map_err(|err| ApiError::Config(format!("invalid base URL '{base_url}': {err}")))?;

        let mut default_headers = HeaderMap::new();
        apply_headers(&mut default_headers, &config.headers)?;

        Ok(Self {
            transport: Arc::new(ReqwestTransport::new()),
            base_url,
            timeout: timeout_or(
                config.timeout_ms,
                Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ),
            default_headers,
            unauthorized: UnauthorizedHandler::new(TokenStore::detached()),
        })
    }

    /// Creates a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`]. **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().map_err(ApiError::Config)?;
        Self::new(config)
    }

    /// Persists the credential in `store` under [`AUTH_TOKEN_KEY`](crate::AUTH_TOKEN_KEY).
    pub fn with_token_persistence(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.unauthorized = self.unauthorized.with_tokens(TokenStore::new(store));
        self
    }

    /// Redirects through `navigator` after a `401` response.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.unauthorized = self.unauthorized.with_navigator(navigator);
        self
    }

    /// Sets the redirect destination used after a `401` response.
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.unauthorized = self.unauthorized.with_login_path(login_path);
        self
    }

    /// Replaces the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &TokenStore {
        self.unauthorized.tokens()
    }

    pub fn set_auth_token(&self, token: &str) {
        self.token_store().set(token);
    }

    pub fn clear_auth_token(&self) {
        self.token_store().clear();
    }

    /// Fetches a resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, opts: Option<RequestOptions>) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, None, opts).await
    }

    /// Creates a resource.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>, opts: Option<RequestOptions>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, body, opts).await
    }

    /// Replaces a resource.
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>, opts: Option<RequestOptions>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, body, opts).await
    }

    /// Partially updates a resource.
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>, opts: Option<RequestOptions>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, path, body, opts).await
    }

    /// Deletes a resource.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, opts: Option<RequestOptions>) -> Result<T> {
        self.send::<T, ()>(Method::DELETE, path, None, opts).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let descriptor = self.build_descriptor(method, path, body, opts.unwrap_or_default())?;
        let descriptor = intercept_request(descriptor, self.token_store());

        let outcome = self
            .transport
            .execute(descriptor)
            .await
            .and_then(|envelope| envelope.error_for_status());
        let envelope = intercept_response(outcome, &self.unauthorized)?;

        envelope.json()
    }

    fn build_descriptor<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOptions,
    ) -> Result<RequestDescriptor>
    where
        B: Serialize + ?Sized,
    {
        let mut headers = self.default_headers.clone();
        apply_headers(&mut headers, &opts.headers)?;

        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| ApiError::Config(format!("request body is not valid JSON: {err}")))?;

        Ok(RequestDescriptor {
            method,
            url: resolve_url(&self.base_url, path),
            body,
            headers,
            query: opts.query,
            timeout: opts
                .timeout_ms
                .map_or(self.timeout, |timeout_ms| timeout_or(timeout_ms, self.timeout)),
        })
    }
}

fn apply_headers<'a, I>(target: &mut HeaderMap, headers: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::Config(format!("invalid header name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::Config(format!("invalid value for header '{name}'")))?;
        target.insert(name, value);
    }
    Ok(())
}
