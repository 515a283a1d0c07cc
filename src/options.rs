use std::collections::BTreeMap;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client-level configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Base URL that relative resource paths are resolved against.
    pub base_url: String,
    /// Per-request timeout in milliseconds, enforced by the transport.
    pub timeout_ms: u64,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Reads configuration from environment variables.
    ///
    /// Reads:
    /// - `API_BASE_URL` — required base URL
    /// - `API_TIMEOUT_MS` — optional timeout in milliseconds
    ///
    /// **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var("API_BASE_URL")
            .map_err(|_| "missing API_BASE_URL environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("API_BASE_URL is set but empty".to_owned());
        }

        let mut config = Self::new(base_url.trim());
        if let Ok(raw) = std::env::var("API_TIMEOUT_MS") {
            config.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| format!("API_TIMEOUT_MS must be an integer, got '{raw}'"))?;
        }
        Ok(config)
    }
}

/// Per-call transport options layered over the client defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestOptions {
    /// Extra headers; a name already set on the client is overridden.
    pub headers: BTreeMap<String, String>,
    /// Query parameters appended to the request URL.
    pub query: Vec<(String, String)>,
    /// Overrides the client timeout for this call.
    pub timeout_ms: Option<u64>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Configures [`retry_with`](crate::retry_with).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryOptions {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub base_delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
        }
    }
}
