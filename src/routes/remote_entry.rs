//! Federation routes — the remote entry manifest and exposed bundles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};

use crate::services::manifest::RemoteManifest;
use crate::state::HostState;

/// `GET /<name>/remoteEntry.json`
pub async fn remote_entry(State(state): State<HostState>) -> Json<RemoteManifest> {
    Json(state.exposes.manifest())
}

/// `GET /<name>/assets/{file}`
pub async fn asset(State(state): State<HostState>, Path(file): Path<String>) -> Response {
    match state.exposes.asset(&file) {
        Some(module) => ([(CONTENT_TYPE, module.content_type)], module.body).into_response(),
        None => {
            tracing::debug!(file = %file, "unknown asset requested");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
