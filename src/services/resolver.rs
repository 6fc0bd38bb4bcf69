//! Remote component resolver — fetch a module from a federated origin.
//!
//! DESIGN
//! ======
//! `ComponentResolver` is the seam between page handlers and the network.
//! `HttpResolver` is the production implementation: it reads the remote's
//! manifest, checks shared dependencies, then fetches the exposed bundle.
//! Tests swap in mocks through the trait.
//!
//! There is no retry and no cache. The resolver adds no timeout of its own;
//! the HTTP client's request and connect timeouts bound each fetch.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::{error, info};

use super::federation::{ModuleId, RemoteComponent, Resolution, ResolveError};
use super::manifest::{RemoteManifest, SharedScope};
use crate::config::{RemoteConfig, ResolverTimeouts};
use crate::error::ErrorCode;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait ComponentResolver: Send + Sync {
    /// Fetch and return the component a module id points at.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the origin is unreachable, the module
    /// is missing, or a shared dependency is incompatible.
    async fn resolve(&self, module: &ModuleId) -> Resolution;
}

/// Parse `module_id`, resolve it, and log the outcome.
///
/// The error is handed back exactly as the resolver produced it.
pub async fn resolve_component(resolver: &dyn ComponentResolver, module_id: &str) -> Resolution {
    let result = match ModuleId::parse(module_id) {
        Ok(module) => resolver.resolve(&module).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(component) => {
            info!(module = %component.module, url = %component.url, bytes = component.body.len(), "remote module loaded");
        }
        Err(e) => {
            error!(
                module = module_id,
                code = e.error_code(),
                retryable = e.retryable(),
                error = %e,
                "failed to load remote module"
            );
        }
    }
    result
}

// =============================================================================
// HTTP RESOLVER
// =============================================================================

pub struct HttpResolver {
    http: reqwest::Client,
    remotes: HashMap<String, RemoteConfig>,
    shared: SharedScope,
}

impl HttpResolver {
    /// Build a resolver over a fixed set of remotes.
    ///
    /// # Errors
    ///
    /// Returns the client build error if TLS or the connector cannot be set up.
    pub fn new(
        remotes: impl IntoIterator<Item = RemoteConfig>,
        shared: SharedScope,
        timeouts: ResolverTimeouts,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        let remotes = remotes.into_iter().map(|r| (r.name.clone(), r)).collect();
        Ok(Self { http, remotes, shared })
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn fetch_manifest(&self, remote: &RemoteConfig) -> Result<RemoteManifest, ResolveError> {
        let url = &remote.entry_url;
        let (_, text) = self.fetch_text(url).await?;
        let manifest: RemoteManifest = serde_json::from_str(&text)
            .map_err(|e| ResolveError::InvalidManifest { url: url.to_string(), reason: e.to_string() })?;

        if manifest.name != remote.name {
            return Err(ResolveError::InvalidManifest {
                url: url.to_string(),
                reason: format!("manifest names {:?}, expected {:?}", manifest.name, remote.name),
            });
        }
        Ok(manifest)
    }

    async fn fetch_text(&self, url: &Url) -> Result<(String, String), ResolveError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ResolveError::Unreachable { url: url.to_string(), reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::BadStatus { url: url.to_string(), status: status.as_u16() });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::Unreachable { url: url.to_string(), reason: e.to_string() })?;
        Ok((content_type, body))
    }
}

#[async_trait::async_trait]
impl ComponentResolver for HttpResolver {
    async fn resolve(&self, module: &ModuleId) -> Resolution {
        let remote = self
            .remotes
            .get(module.remote())
            .ok_or_else(|| ResolveError::UnknownRemote(module.remote().to_owned()))?;

        let manifest = self.fetch_manifest(remote).await?;
        manifest.check_shared(&remote.share_scope, &self.shared)?;

        let path = manifest
            .exposed_path(&module.expose_key())
            .ok_or_else(|| ResolveError::ModuleMissing { module: module.to_string() })?;
        let url = remote.entry_url.join(path).map_err(|e| ResolveError::InvalidManifest {
            url: remote.entry_url.to_string(),
            reason: format!("bad bundle path {path:?}: {e}"),
        })?;

        let (content_type, body) = self.fetch_text(&url).await?;
        Ok(RemoteComponent { module: module.clone(), url: url.to_string(), content_type, body })
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
