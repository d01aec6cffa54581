//! Shared request/decode path for JSON endpoints.

use log::warn;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::RequestBuilder;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Sends `request` and decodes a 2xx body as `T`.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let url = request.url().to_string();

    let response = request.send().await.map_err(|e| {
        warn!("GET {url} failed: {e}");
        ApiError::Transport {
            url: url.clone(),
            message: e.message,
        }
    })?;

    if !response.is_success() {
        warn!("GET {url} returned status {}", response.status);
        return Err(ApiError::Status {
            url,
            status: response.status,
        });
    }

    response.json().map_err(|e| ApiError::Decode {
        url,
        message: e.to_string(),
    })
}
