//! Asset proxy — forwards `/<remote>/assets/*` to the remote's origin.
//!
//! Lets a browser on the consumer's origin fetch remote bundles without
//! cross-origin requests. Status and content type pass through unchanged.
//! Only paths that stay under the remote's `assets/` are forwarded.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::state::ConsumerState;

/// `GET /{remote}/assets/{*path}`
pub async fn proxy_asset(State(state): State<ConsumerState>, Path((remote, path)): Path<(String, String)>) -> Response {
    let Some(config) = state.remotes.get(&remote) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(url) = config.asset_url(&path) else {
        debug!(remote = %remote, path = %path, "asset proxy: path escapes assets");
        return StatusCode::NOT_FOUND.into_response();
    };

    let upstream = match state.http.get(url.clone()).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, url = %url, "asset proxy: remote unreachable");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let body = match upstream.bytes().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, url = %url, "asset proxy: failed reading remote body");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}
