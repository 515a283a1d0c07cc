//! Observable `{ data, loading, error }` state around one repeatable request,
//! for binding a client call to a UI layer.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex},
};

use crate::{ApiError, Result};

/// Snapshot of an [`ApiRequest`].
#[derive(Debug)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<Arc<ApiError>>,
}

impl<T> RequestState<T> {
    fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    fn loading() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T: Clone> Clone for RequestState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}

/// Wraps an async request function and tracks the state of its last run.
///
/// Starts idle; every [`ApiRequest::refetch`] moves to loading and then to
/// either `data` or `error`. Clones share the same state.
pub struct ApiRequest<T, F> {
    request_fn: Arc<F>,
    state: Arc<Mutex<RequestState<T>>>,
}

impl<T, F> Clone for ApiRequest<T, F> {
    fn clone(&self) -> Self {
        Self {
            request_fn: Arc::clone(&self.request_fn),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, F> fmt::Debug for ApiRequest<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ApiRequest")
            .field("loading", &state.loading)
            .field("has_data", &state.data.is_some())
            .field("error", &state.error)
            .finish()
    }
}

impl<T, F, Fut> ApiRequest<T, F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    pub fn new(request_fn: F) -> Self {
        Self {
            request_fn: Arc::new(request_fn),
            state: Arc::new(Mutex::new(RequestState::idle())),
        }
    }

    /// Runs the request again and records its outcome.
    pub async fn refetch(&self) {
        self.replace(RequestState::loading());

        let next = match (self.request_fn)().await {
            Ok(data) => RequestState {
                data: Some(data),
                loading: false,
                error: None,
            },
            Err(err) => RequestState {
                data: None,
                loading: false,
                error: Some(Arc::new(err)),
            },
        };
        self.replace(next);
    }
}

impl<T, F> ApiRequest<T, F> {
    pub fn state(&self) -> RequestState<T>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    fn replace(&self, next: RequestState<T>) {
        *self.lock() = next;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RequestState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
