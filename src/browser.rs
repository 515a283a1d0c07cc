//! Browser capabilities for `wasm32` builds.
//!
//! Everything is looked up on `globalThis` at call time, so the same build
//! also runs in workers and edge runtimes that lack `localStorage` or
//! `location`; there the store reports [`StorageError::Unavailable`] and the
//! navigator does nothing.

use std::time::Duration;

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{KeyValueStore, Navigator, StorageError};

// Larger setTimeout delays overflow and fire immediately.
const MAX_TIMEOUT_MS: u128 = i32::MAX as u128;

fn global_property(name: &str) -> Option<JsValue> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(name)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    Reflect::apply(&method, target, &array)
}

fn backend_error(err: JsValue) -> StorageError {
    StorageError::Backend(
        err.as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

/// [`KeyValueStore`] over `globalThis.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    /// Whether the current context exposes `localStorage`.
    pub fn is_available() -> bool {
        global_property("localStorage").is_some()
    }

    fn storage(&self) -> Result<JsValue, StorageError> {
        global_property("localStorage").ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage()?;
        let value = call_method(&storage, "getItem", &[&JsValue::from_str(key)])
            .map_err(backend_error)?;
        Ok(value.as_string())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage()?;
        call_method(
            &storage,
            "setItem",
            &[&JsValue::from_str(key), &JsValue::from_str(value)],
        )
        .map(drop)
        .map_err(backend_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let storage = self.storage()?;
        call_method(&storage, "removeItem", &[&JsValue::from_str(key)])
            .map(drop)
            .map_err(backend_error)
    }
}

/// [`Navigator`] that assigns `globalThis.location.href`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for BrowserNavigator {
    fn redirect(&self, destination: &str) {
        let Some(location) = global_property("location") else {
            #[cfg(feature = "tracing")]
            tracing::debug!(destination, "no location object; skipping redirect");
            return;
        };
        if Reflect::set(
            &location,
            &JsValue::from_str("href"),
            &JsValue::from_str(destination),
        )
        .is_err()
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(destination, "failed to assign location.href");
        }
    }
}

/// Resolves after `delay` using `setTimeout`; resolves at once without a timer.
pub(crate) async fn sleep(delay: Duration) {
    let millis = delay.as_millis().min(MAX_TIMEOUT_MS) as f64;
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = global_property("setTimeout")
            .and_then(|value| value.dyn_into::<Function>().ok())
            .map(|set_timeout| set_timeout.call2(&JsValue::UNDEFINED, &resolve, &JsValue::from_f64(millis)));
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}
