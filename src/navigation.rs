/// Where unauthorized users are sent unless the client is told otherwise.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Client-side navigation capability used after a `401` response.
///
/// Only interactive front-ends have one; see
/// [`BrowserNavigator`](crate::BrowserNavigator) for `wasm32` builds.
pub trait Navigator: Send + Sync {
    fn redirect(&self, destination: &str);
}
