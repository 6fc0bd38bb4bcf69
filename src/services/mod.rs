//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `users` backs the host's login form. `exposes` and `manifest` describe
//! what the host publishes. `federation`, `resolver` and `mount` are the
//! consumer's side: parse a module id, fetch it from a remote origin, and
//! track the in-flight resolution. Route handlers stay focused on HTTP.

pub mod exposes;
pub mod federation;
pub mod manifest;
pub mod mount;
pub mod resolver;
pub mod users;
