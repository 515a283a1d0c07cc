use async_trait::async_trait;

use crate::{ApiError, Envelope, RequestDescriptor, Result};

/// Performs one HTTP exchange.
///
/// Implementations return an [`Envelope`] for every status the server
/// answers with; only failures to get an answer at all become errors.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RequestDescriptor) -> Result<Envelope>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<Envelope> {
        #[cfg(feature = "tracing")]
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        // On WASM, reqwest uses AbortController for the timeout.
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        // `json` sets `Content-Type: application/json` unless the caller already did.
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(ApiError::Transport)?;

        Ok(Envelope {
            status,
            headers,
            body,
        })
    }
}
