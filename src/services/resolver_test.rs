use axum::Router;
use axum::routing::get;
use tokio::time::{Duration, timeout};

use super::*;
use crate::routes::host_app;
use crate::services::exposes::ExposedModules;
use crate::services::manifest::{COMPONENT_ABI, SharedDependency, default_shared};
use crate::services::users::UserDirectory;
use crate::state::HostState;
use crate::state::test_helpers::{closed_addr, spawn_router};

async fn spawn_host(exposes: ExposedModules) -> String {
    let state = HostState::new(UserDirectory::seeded(), exposes);
    let addr = spawn_router(host_app(state)).await;
    format!("http://{addr}")
}

fn resolver_for(name: &str, origin: &str) -> HttpResolver {
    let remote = RemoteConfig::new(name, origin, "default").unwrap();
    HttpResolver::new([remote], default_shared(), ResolverTimeouts::default()).unwrap()
}

async fn resolve(resolver: &HttpResolver, module_id: &str) -> Resolution {
    timeout(Duration::from_secs(5), resolve_component(resolver, module_id))
        .await
        .expect("resolution should settle within the bound")
}

// =============================================================================
// success
// =============================================================================

#[tokio::test]
async fn resolves_counter_from_live_host() {
    let origin = spawn_host(ExposedModules::with_counter("app-1")).await;
    let resolver = resolver_for("app-1", &origin);

    let component = resolve(&resolver, "app-1/counter").await.unwrap();
    assert_eq!(component.module.to_string(), "app-1/counter");
    assert_eq!(component.url, format!("{origin}/app-1/assets/counter.html"));
    assert!(component.content_type.starts_with("text/html"));
    assert!(component.body.contains("Count:"));
}

#[tokio::test]
async fn each_resolution_refetches() {
    let origin = spawn_host(ExposedModules::with_counter("app-1")).await;
    let resolver = resolver_for("app-1", &origin);

    let first = resolve(&resolver, "app-1/counter").await.unwrap();
    let second = resolve(&resolver, "app-1/counter").await.unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// failures
// =============================================================================

#[tokio::test]
async fn unreachable_origin_fails_with_unreachable() {
    let down = closed_addr().await;
    let resolver = resolver_for("app-1", &format!("http://{down}"));

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    match err {
        ResolveError::Unreachable { url, .. } => {
            assert_eq!(url, format!("http://{down}/app-1/remoteEntry.json"));
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn unexposed_module_is_missing() {
    let origin = spawn_host(ExposedModules::with_counter("app-1")).await;
    let resolver = resolver_for("app-1", &origin);

    let err = resolve(&resolver, "app-1/button").await.unwrap_err();
    assert_eq!(err, ResolveError::ModuleMissing { module: "app-1/button".into() });
}

#[tokio::test]
async fn unknown_remote_fails_before_any_fetch() {
    let resolver = resolver_for("app-1", "http://127.0.0.1:1");
    let err = resolve(&resolver, "app-2/counter").await.unwrap_err();
    assert_eq!(err, ResolveError::UnknownRemote("app-2".into()));
}

#[tokio::test]
async fn malformed_module_id_is_rejected() {
    let resolver = resolver_for("app-1", "http://127.0.0.1:1");
    let err = resolve(&resolver, "counter").await.unwrap_err();
    assert_eq!(err, ResolveError::InvalidModuleId("counter".into()));
}

#[tokio::test]
async fn incompatible_shared_abi_is_rejected() {
    let mut shared = default_shared();
    shared.insert(COMPONENT_ABI.into(), SharedDependency::singleton("2.0.0"));
    let origin = spawn_host(ExposedModules::with_counter("app-1").with_shared(shared)).await;
    let resolver = resolver_for("app-1", &origin);

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    assert!(matches!(err, ResolveError::IncompatibleShared { ref name, .. } if name == COMPONENT_ABI));
}

#[tokio::test]
async fn missing_remote_entry_is_bad_status() {
    // Host publishes as "shop", consumer asks for "app-1" on the same origin.
    let origin = spawn_host(ExposedModules::with_counter("shop")).await;
    let resolver = resolver_for("app-1", &origin);

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    assert!(matches!(err, ResolveError::BadStatus { status: 404, .. }));
}

#[tokio::test]
async fn non_json_remote_entry_is_invalid_manifest() {
    let app = Router::new().route("/app-1/remoteEntry.json", get(|| async { "export default {}" }));
    let addr = spawn_router(app).await;
    let resolver = resolver_for("app-1", &format!("http://{addr}"));

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    assert!(matches!(err, ResolveError::InvalidManifest { .. }));
}

#[tokio::test]
async fn manifest_name_mismatch_is_invalid_manifest() {
    let app = Router::new().route(
        "/app-1/remoteEntry.json",
        get(|| async { axum::Json(ExposedModules::with_counter("impostor").manifest()) }),
    );
    let addr = spawn_router(app).await;
    let resolver = resolver_for("app-1", &format!("http://{addr}"));

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    match err {
        ResolveError::InvalidManifest { reason, .. } => assert!(reason.contains("impostor")),
        other => panic!("expected InvalidManifest, got {other:?}"),
    }
}

#[tokio::test]
async fn bundle_server_error_is_retryable_bad_status() {
    let app = Router::new()
        .route(
            "/app-1/remoteEntry.json",
            get(|| async { axum::Json(ExposedModules::with_counter("app-1").manifest()) }),
        )
        .route(
            "/app-1/assets/counter.html",
            get(|| async { axum::http::StatusCode::SERVICE_UNAVAILABLE }),
        );
    let addr = spawn_router(app).await;
    let resolver = resolver_for("app-1", &format!("http://{addr}"));

    let err = resolve(&resolver, "app-1/counter").await.unwrap_err();
    assert!(matches!(err, ResolveError::BadStatus { status: 503, .. }));
    assert!(err.retryable());
}
