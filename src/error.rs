//! Error codes shared by the login and resolver error types.
//!
//! DESIGN
//! ======
//! Each domain error carries a grepable `E_*` code and a retryable hint.
//! Nothing in this crate retries on its own; the flag is informational for
//! callers and appears in logs and JSON error bodies.

/// Grepable error code plus retryable hint.
pub trait ErrorCode {
    /// Stable upper-snake identifier, e.g. `E_MODULE_MISSING`.
    fn error_code(&self) -> &'static str;

    /// Whether a caller could reasonably try the same request again.
    fn retryable(&self) -> bool {
        false
    }
}
