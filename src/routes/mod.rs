//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two routers, one per app. The host (app-1) serves its login form under
//! `/<name>/` and publishes federated modules under `/<name>/remoteEntry.json`
//! and `/<name>/assets/*` with permissive CORS so other origins can load
//! them. The consumer (app-2) serves the counter page and proxies remote
//! assets onto its own origin.

pub mod counter;
pub mod login;
pub mod proxy;
pub mod remote_entry;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::{ConsumerState, HostState};

/// app-1: login form plus exposed modules.
pub fn host_app(state: HostState) -> Router {
    let base = format!("/{}", state.exposes.name());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let federation = Router::new()
        .route(&format!("{base}/remoteEntry.json"), get(remote_entry::remote_entry))
        .route(&format!("{base}/assets/{{file}}"), get(remote_entry::asset))
        .layer(cors);

    Router::new()
        .route(&base, get(login::login_page).post(login::login))
        .route(&format!("{base}/"), get(login::login_page).post(login::login))
        .route("/healthz", get(healthz))
        .merge(federation)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// app-2: counter page and remote asset proxy.
pub fn consumer_app(state: ConsumerState) -> Router {
    Router::new()
        .route("/counter", get(counter::counter_page))
        .route("/{remote}/assets/{*path}", get(proxy::proxy_asset))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
