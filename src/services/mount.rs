//! Component mount — one in-flight resolution and its observable state.
//!
//! DESIGN
//! ======
//! A mount starts in `Pending` and moves exactly once to `Resolved` or
//! `Failed`. The resolution runs on its own task and publishes through a
//! watch channel, so a page can render a placeholder from `state()` while
//! another part of the request awaits `settled()`.
//!
//! No retry, no cancellation: dropping the mount leaves the task to finish
//! and its result is discarded.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use super::federation::{RemoteComponent, Resolution, ResolveError};
use super::resolver::{ComponentResolver, resolve_component};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Resolved(RemoteComponent),
    Failed(ResolveError),
}

impl LoadState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Terminal outcome, or `None` while pending.
    #[must_use]
    pub fn outcome(&self) -> Option<Resolution> {
        match self {
            Self::Pending => None,
            Self::Resolved(component) => Some(Ok(component.clone())),
            Self::Failed(e) => Some(Err(e.clone())),
        }
    }
}

impl From<Resolution> for LoadState {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Ok(component) => Self::Resolved(component),
            Err(e) => Self::Failed(e),
        }
    }
}

pub struct ComponentMount {
    id: Uuid,
    module_id: String,
    rx: watch::Receiver<LoadState>,
}

impl ComponentMount {
    /// Start resolving `module_id` on the current runtime.
    pub fn spawn(resolver: Arc<dyn ComponentResolver>, module_id: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        let module_id = module_id.into();
        let (tx, rx) = watch::channel(LoadState::Pending);

        let task_module = module_id.clone();
        tokio::spawn(
            async move {
                let outcome = resolve_component(resolver.as_ref(), &task_module).await;
                // Receivers may be gone already; the outcome is logged either way.
                let _ = tx.send(LoadState::from(outcome));
            }
            .instrument(info_span!("component_mount", mount = %id)),
        );

        debug!(mount = %id, module = %module_id, "component mount started");
        Self { id, module_id, rx }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.rx.borrow().clone()
    }

    /// Wait for the terminal state.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error unchanged, or [`ResolveError::Aborted`] if
    /// the task ended without publishing an outcome.
    pub async fn settled(mut self) -> Resolution {
        let outcome = self
            .rx
            .wait_for(LoadState::is_settled)
            .await
            .ok()
            .and_then(|state| state.outcome());
        outcome.unwrap_or_else(|| Err(ResolveError::Aborted { module: self.module_id.clone() }))
    }
}

#[cfg(test)]
#[path = "mount_test.rs"]
mod tests;
