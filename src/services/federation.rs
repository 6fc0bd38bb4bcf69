//! Federation types — module identifiers, resolved components, errors.
//!
//! DESIGN
//! ======
//! A module is addressed as `<remote>/<expose>`, e.g. `app-1/counter`. The
//! remote half names an origin the consumer knows about; the expose half maps
//! to a `./<expose>` key in that origin's remote entry manifest.
//!
//! Resolution returns an explicit `Result` instead of throwing. Errors carry
//! owned strings so a failed outcome can be cloned into watch channels and
//! handed to every observer unchanged.

use std::fmt;

use serde::Serialize;

use crate::error::ErrorCode;

// =============================================================================
// MODULE ID
// =============================================================================

/// Parsed `<remote>/<expose>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleId {
    remote: String,
    expose: String,
}

impl ModuleId {
    /// Parse `remote/expose`. Both halves must be non-empty; the expose half
    /// may itself contain slashes (`app-1/widgets/counter`). Only ASCII
    /// letters, digits and `-_.@/` are accepted, so an id is safe to embed in
    /// URLs and markup as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidModuleId`] for a missing separator, an
    /// empty half, or any other character.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let trimmed = raw.trim();
        if !trimmed.chars().all(is_module_char) {
            return Err(ResolveError::InvalidModuleId(raw.to_owned()));
        }
        let Some((remote, expose)) = trimmed.split_once('/') else {
            return Err(ResolveError::InvalidModuleId(raw.to_owned()));
        };
        let expose = expose.trim_start_matches("./");
        if remote.is_empty() || expose.is_empty() {
            return Err(ResolveError::InvalidModuleId(raw.to_owned()));
        }
        Ok(Self { remote: remote.to_owned(), expose: expose.to_owned() })
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.expose
    }

    /// Key used in a manifest's `exposes` table: `./counter`.
    #[must_use]
    pub fn expose_key(&self) -> String {
        format!("./{}", self.expose)
    }
}

fn is_module_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/')
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.expose)
    }
}

// =============================================================================
// REMOTE COMPONENT
// =============================================================================

/// A renderable unit fetched from a remote origin. Not cached anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComponent {
    pub module: ModuleId,
    /// Absolute URL the bundle was fetched from.
    pub url: String,
    pub content_type: String,
    pub body: String,
}

/// Terminal outcome of one resolution.
pub type Resolution = Result<RemoteComponent, ResolveError>;

// =============================================================================
// ERROR
// =============================================================================

/// Why a remote module could not be fetched or instantiated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid module id: {0:?}")]
    InvalidModuleId(String),

    #[error("unknown remote: {0}")]
    UnknownRemote(String),

    #[error("remote unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("remote returned status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error("invalid remote entry from {url}: {reason}")]
    InvalidManifest { url: String, reason: String },

    #[error("module {module} not exposed by remote")]
    ModuleMissing { module: String },

    #[error("incompatible shared dependency {name}: remote {remote_version}, local {local_version}")]
    IncompatibleShared { name: String, remote_version: String, local_version: String },

    #[error("share scope mismatch: remote {remote}, local {local}")]
    ShareScopeMismatch { remote: String, local: String },

    /// The resolution task ended before producing an outcome.
    #[error("resolution of {module} aborted")]
    Aborted { module: String },
}

impl ErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidModuleId(_) => "E_INVALID_MODULE_ID",
            Self::UnknownRemote(_) => "E_UNKNOWN_REMOTE",
            Self::Unreachable { .. } => "E_REMOTE_UNREACHABLE",
            Self::BadStatus { .. } => "E_REMOTE_STATUS",
            Self::InvalidManifest { .. } => "E_INVALID_MANIFEST",
            Self::ModuleMissing { .. } => "E_MODULE_MISSING",
            Self::IncompatibleShared { .. } => "E_INCOMPATIBLE_SHARED",
            Self::ShareScopeMismatch { .. } => "E_SHARE_SCOPE_MISMATCH",
            Self::Aborted { .. } => "E_RESOLUTION_ABORTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::BadStatus { status: 429 | 500..=599, .. })
    }
}

#[cfg(test)]
#[path = "federation_test.rs"]
mod tests;
