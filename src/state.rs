//! Shared application state.
//!
//! DESIGN
//! ======
//! Each app gets its own state type, injected into Axum handlers via the
//! `State` extractor. Everything inside is immutable after startup and
//! `Arc`-wrapped, so cloning per request is cheap and no locks are needed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ConsumerConfig;
use crate::config::RemoteConfig;
use crate::services::exposes::ExposedModules;
use crate::services::resolver::{ComponentResolver, HttpResolver};
use crate::services::users::UserDirectory;

// =============================================================================
// HOST (app-1)
// =============================================================================

#[derive(Clone)]
pub struct HostState {
    pub users: Arc<UserDirectory>,
    pub exposes: Arc<ExposedModules>,
}

impl HostState {
    #[must_use]
    pub fn new(users: UserDirectory, exposes: ExposedModules) -> Self {
        Self { users: Arc::new(users), exposes: Arc::new(exposes) }
    }
}

// =============================================================================
// CONSUMER (app-2)
// =============================================================================

#[derive(Clone)]
pub struct ConsumerState {
    pub resolver: Arc<dyn ComponentResolver>,
    /// Module id mounted on the counter page.
    pub module: String,
    /// Remotes reachable through the asset proxy, by name.
    pub remotes: Arc<HashMap<String, RemoteConfig>>,
    pub http: reqwest::Client,
}

impl ConsumerState {
    #[must_use]
    pub fn new(
        resolver: Arc<dyn ComponentResolver>,
        module: impl Into<String>,
        remotes: impl IntoIterator<Item = RemoteConfig>,
        http: reqwest::Client,
    ) -> Self {
        let remotes = remotes.into_iter().map(|r| (r.name.clone(), r)).collect();
        Self { resolver, module: module.into(), remotes: Arc::new(remotes), http }
    }

    /// Wire the production HTTP resolver from validated config.
    ///
    /// # Errors
    ///
    /// Returns the HTTP client build error.
    pub fn from_config(config: &ConsumerConfig) -> Result<Self, reqwest::Error> {
        let resolver = HttpResolver::new([config.remote.clone()], config.shared.clone(), config.timeouts)?;
        let http = resolver.http().clone();
        Ok(Self::new(Arc::new(resolver), config.module.to_string(), [config.remote.clone()], http))
    }
}
