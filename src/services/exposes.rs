//! Exposed modules — what the host publishes for other apps to load.
//!
//! DESIGN
//! ======
//! Each exposed module is a bundle served under `/<name>/assets/<file>` and
//! listed in the manifest under its `./<expose>` key. Bundles are static
//! strings compiled into the binary.

use std::collections::BTreeMap;

use super::manifest::{DEFAULT_SHARE_SCOPE, RemoteManifest, SharedScope, default_shared};

/// Counter component: two controls and a readout, starting at zero.
pub const COUNTER_BUNDLE: &str = r#"<div data-component="counter" data-count="0">
  <button type="button" data-action="increment">Increment</button>
  <button type="button" data-action="decrement">Decrement</button>
  <p>Count: <span data-role="count">0</span></p>
</div>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedModule {
    /// Exposed key without the `./` prefix, e.g. `counter`.
    pub expose: String,
    /// File name under `assets/`.
    pub file: String,
    pub content_type: &'static str,
    pub body: &'static str,
}

/// Registry of modules one federated app exposes.
#[derive(Debug, Clone)]
pub struct ExposedModules {
    name: String,
    share_scope: String,
    shared: SharedScope,
    modules: Vec<ExposedModule>,
}

impl ExposedModules {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            share_scope: DEFAULT_SHARE_SCOPE.to_owned(),
            shared: default_shared(),
            modules: Vec::new(),
        }
    }

    /// The host's standard set: just the counter.
    #[must_use]
    pub fn with_counter(name: impl Into<String>) -> Self {
        Self::new(name).expose(ExposedModule {
            expose: "counter".into(),
            file: "counter.html".into(),
            content_type: "text/html; charset=utf-8",
            body: COUNTER_BUNDLE,
        })
    }

    #[must_use]
    pub fn expose(mut self, module: ExposedModule) -> Self {
        self.modules.retain(|m| m.expose != module.expose);
        self.modules.push(module);
        self
    }

    #[must_use]
    pub fn with_shared(mut self, shared: SharedScope) -> Self {
        self.shared = shared;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a bundle by its asset file name.
    #[must_use]
    pub fn asset(&self, file: &str) -> Option<&ExposedModule> {
        self.modules.iter().find(|m| m.file == file)
    }

    /// Build the manifest published at `/<name>/remoteEntry.json`.
    #[must_use]
    pub fn manifest(&self) -> RemoteManifest {
        let exposes: BTreeMap<String, String> = self
            .modules
            .iter()
            .map(|m| (format!("./{}", m.expose), format!("assets/{}", m.file)))
            .collect();
        RemoteManifest {
            name: self.name.clone(),
            share_scope: self.share_scope.clone(),
            exposes,
            shared: self.shared.clone(),
        }
    }
}
