//! Request and response interceptors applied around every transport call.
//!
//! Both are free functions over explicit state so they can be exercised
//! without a client or a network.

use std::{fmt, sync::Arc};

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::{Envelope, Navigator, RequestDescriptor, Result, TokenStore, DEFAULT_LOGIN_PATH};

/// Adds `Authorization: Bearer <token>` when the store holds a token.
///
/// Without a token the descriptor is returned untouched. An empty token or
/// one that is not a valid header value is treated as absent.
pub fn intercept_request(mut descriptor: RequestDescriptor, tokens: &TokenStore) -> RequestDescriptor {
    let Some(token) = tokens.get().filter(|token| !token.is_empty()) else {
        return descriptor;
    };

    match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            descriptor.headers.insert(AUTHORIZATION, value);
        }
        Err(_) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("stored auth token is not a valid header value; sending without it");
        }
    }
    descriptor
}

/// Side effects performed when the server answers `401 Unauthorized`.
#[derive(Clone)]
pub struct UnauthorizedHandler {
    tokens: TokenStore,
    navigator: Option<Arc<dyn Navigator>>,
    login_path: String,
}

impl fmt::Debug for UnauthorizedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnauthorizedHandler")
            .field("tokens", &self.tokens)
            .field("navigator", &self.navigator.is_some())
            .field("login_path", &self.login_path)
            .finish()
    }
}

impl UnauthorizedHandler {
    pub fn new(tokens: TokenStore) -> Self {
        Self {
            tokens,
            navigator: None,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn with_tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Clears the credential and sends the user to the login page.
    pub fn handle(&self) {
        self.tokens.clear();
        match &self.navigator {
            Some(navigator) => {
                #[cfg(feature = "tracing")]
                tracing::info!(destination = %self.login_path, "unauthorized; redirecting to login");
                navigator.redirect(&self.login_path);
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    destination = %self.login_path,
                    "unauthorized; auth token cleared, no navigator to redirect with"
                );
            }
        }
    }
}

/// Reacts once to the outcome of an exchange.
///
/// Successes pass through. A `401` runs [`UnauthorizedHandler::handle`] and
/// the original error is still returned; every other failure is returned
/// as-is with no side effects.
pub fn intercept_response(outcome: Result<Envelope>, handler: &UnauthorizedHandler) -> Result<Envelope> {
    if let Err(err) = &outcome {
        if err.is_unauthorized() {
            handler.handle();
        }
    }
    outcome
}
