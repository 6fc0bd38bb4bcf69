use super::*;
use crate::services::federation::ModuleId;
use tokio::sync::Notify;
use tokio::time::{Duration, timeout};

struct StaticResolver {
    outcome: Resolution,
}

#[async_trait::async_trait]
impl ComponentResolver for StaticResolver {
    async fn resolve(&self, _module: &ModuleId) -> Resolution {
        self.outcome.clone()
    }
}

/// Holds every resolution until `release` is notified.
struct GatedResolver {
    release: Arc<Notify>,
}

#[async_trait::async_trait]
impl ComponentResolver for GatedResolver {
    async fn resolve(&self, module: &ModuleId) -> Resolution {
        self.release.notified().await;
        Ok(component(module))
    }
}

struct PanickingResolver;

#[async_trait::async_trait]
impl ComponentResolver for PanickingResolver {
    async fn resolve(&self, _module: &ModuleId) -> Resolution {
        panic!("resolver blew up");
    }
}

fn component(module: &ModuleId) -> RemoteComponent {
    RemoteComponent {
        module: module.clone(),
        url: "http://remote/app-1/assets/counter.html".into(),
        content_type: "text/html".into(),
        body: "<p>Count: 0</p>".into(),
    }
}

async fn settle(mount: ComponentMount) -> Resolution {
    timeout(Duration::from_secs(2), mount.settled())
        .await
        .expect("mount should settle")
}

// =============================================================================
// state transitions
// =============================================================================

#[tokio::test]
async fn mount_starts_pending_until_resolver_finishes() {
    let release = Arc::new(Notify::new());
    let mount = ComponentMount::spawn(Arc::new(GatedResolver { release: release.clone() }), "app-1/counter");

    assert!(mount.state().is_pending());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(mount.state().is_pending());

    release.notify_one();
    let resolved = settle(mount).await.unwrap();
    assert_eq!(resolved.module.to_string(), "app-1/counter");
}

#[tokio::test]
async fn mount_resolves_to_component() {
    let module = ModuleId::parse("app-1/counter").unwrap();
    let resolver = Arc::new(StaticResolver { outcome: Ok(component(&module)) });
    let mount = ComponentMount::spawn(resolver, "app-1/counter");
    assert_eq!(mount.module_id(), "app-1/counter");

    let resolved = settle(mount).await.unwrap();
    assert_eq!(resolved, component(&module));
}

#[tokio::test]
async fn mount_failure_is_propagated_unchanged() {
    let err = ResolveError::Unreachable { url: "http://127.0.0.1:9/app-1/remoteEntry.json".into(), reason: "refused".into() };
    let resolver = Arc::new(StaticResolver { outcome: Err(err.clone()) });
    let mount = ComponentMount::spawn(resolver, "app-1/counter");

    assert_eq!(settle(mount).await, Err(err));
}

#[tokio::test]
async fn invalid_module_id_fails_without_calling_resolver() {
    let release = Arc::new(Notify::new());
    // Never released: a call into this resolver would hang the test.
    let mount = ComponentMount::spawn(Arc::new(GatedResolver { release }), "not-a-module");

    assert_eq!(settle(mount).await, Err(ResolveError::InvalidModuleId("not-a-module".into())));
}

#[tokio::test]
async fn settled_state_is_terminal() {
    let module = ModuleId::parse("app-1/counter").unwrap();
    let resolver = Arc::new(StaticResolver { outcome: Ok(component(&module)) });
    let mount = ComponentMount::spawn(resolver, "app-1/counter");

    let mut rx = mount.rx.clone();
    rx.wait_for(LoadState::is_settled).await.unwrap();
    for _ in 0..3 {
        tokio::task::yield_now().await;
        assert!(matches!(mount.state(), LoadState::Resolved(_)));
    }
}

#[tokio::test]
async fn panicking_resolver_reports_aborted() {
    let mount = ComponentMount::spawn(Arc::new(PanickingResolver), "app-1/counter");
    assert_eq!(settle(mount).await, Err(ResolveError::Aborted { module: "app-1/counter".into() }));
}

#[tokio::test]
async fn each_mount_gets_its_own_id() {
    let module = ModuleId::parse("app-1/counter").unwrap();
    let resolver: Arc<dyn ComponentResolver> = Arc::new(StaticResolver { outcome: Ok(component(&module)) });
    let a = ComponentMount::spawn(resolver.clone(), "app-1/counter");
    let b = ComponentMount::spawn(resolver, "app-1/counter");
    assert_ne!(a.id(), b.id());
}

// =============================================================================
// LoadState
// =============================================================================

#[test]
fn load_state_outcome_matches_variant() {
    assert!(LoadState::Pending.outcome().is_none());

    let err = ResolveError::ModuleMissing { module: "app-1/nope".into() };
    assert_eq!(LoadState::Failed(err.clone()).outcome(), Some(Err(err.clone())));
    assert_eq!(LoadState::from(Err(err.clone())), LoadState::Failed(err));
}
