//! Remote entry manifest and shared-dependency negotiation.
//!
//! DESIGN
//! ======
//! The host publishes one manifest per federated app at
//! `/<name>/remoteEntry.json`. It maps exposed keys (`./counter`) to bundle
//! paths relative to the manifest URL and lists the dependencies the bundles
//! expect to share with their consumer.
//!
//! A consumer accepts a manifest when the share scopes agree and every
//! singleton dependency both sides declare is caret-compatible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::federation::ResolveError;

/// Share scope used when none is configured.
pub const DEFAULT_SHARE_SCOPE: &str = "default";

/// Bundle format both apps agree on. Bump the major on breaking changes.
pub const COMPONENT_ABI: &str = "component-abi";
pub const COMPONENT_ABI_VERSION: &str = "1.0.0";

// =============================================================================
// MANIFEST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedDependency {
    pub version: String,
    #[serde(default)]
    pub singleton: bool,
}

impl SharedDependency {
    #[must_use]
    pub fn singleton(version: impl Into<String>) -> Self {
        Self { version: version.into(), singleton: true }
    }
}

/// Name → dependency. Ordered so manifests serialize deterministically.
pub type SharedScope = BTreeMap<String, SharedDependency>;

/// The default shared scope: just the component ABI.
#[must_use]
pub fn default_shared() -> SharedScope {
    let mut shared = SharedScope::new();
    shared.insert(COMPONENT_ABI.to_owned(), SharedDependency::singleton(COMPONENT_ABI_VERSION));
    shared
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteManifest {
    pub name: String,
    #[serde(default = "default_share_scope")]
    pub share_scope: String,
    /// `./<expose>` → bundle path relative to the manifest URL.
    #[serde(default)]
    pub exposes: BTreeMap<String, String>,
    #[serde(default)]
    pub shared: SharedScope,
}

fn default_share_scope() -> String {
    DEFAULT_SHARE_SCOPE.to_owned()
}

impl RemoteManifest {
    /// Bundle path for an exposed key, if the remote exposes it.
    #[must_use]
    pub fn exposed_path(&self, expose_key: &str) -> Option<&str> {
        self.exposes.get(expose_key).map(String::as_str)
    }

    /// Check this manifest against the consumer's share scope.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ShareScopeMismatch`] when scope names differ and
    /// [`ResolveError::IncompatibleShared`] for the first singleton both sides
    /// declare with incompatible versions.
    pub fn check_shared(&self, scope_name: &str, local: &SharedScope) -> Result<(), ResolveError> {
        if self.share_scope != scope_name {
            return Err(ResolveError::ShareScopeMismatch {
                remote: self.share_scope.clone(),
                local: scope_name.to_owned(),
            });
        }

        for (name, remote_dep) in &self.shared {
            let Some(local_dep) = local.get(name) else {
                continue;
            };
            if !(remote_dep.singleton || local_dep.singleton) {
                continue;
            }
            if !versions_compatible(&remote_dep.version, &local_dep.version) {
                return Err(ResolveError::IncompatibleShared {
                    name: name.clone(),
                    remote_version: remote_dep.version.clone(),
                    local_version: local_dep.version.clone(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// VERSIONS
// =============================================================================

/// Caret compatibility: same major, and same minor while major is 0.
/// Unparseable versions never match.
#[must_use]
pub fn versions_compatible(a: &str, b: &str) -> bool {
    match (parse_version(a), parse_version(b)) {
        (Some((0, a_minor)), Some((0, b_minor))) => a_minor == b_minor,
        (Some((a_major, _)), Some((b_major, _))) => a_major == b_major,
        _ => false,
    }
}

/// Parse `major.minor[.patch][-pre]`, tolerating a leading `^`, `~` or `v`.
fn parse_version(raw: &str) -> Option<(u64, u64)> {
    let core = raw.trim().trim_start_matches(['^', '~', 'v']);
    let core = core.split(['-', '+']).next()?;
    let mut parts = core.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
