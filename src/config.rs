//! Command line and environment configuration.
//!
//! DESIGN
//! ======
//! `clap` parses one subcommand per app (`host` for app-1, `consumer` for
//! app-2). Every flag falls back to an environment variable, and `main` loads
//! `.env` first, so deployments can stay flag-free. Raw arguments are then
//! validated into typed configs that the rest of the crate consumes.

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::services::federation::ModuleId;
use crate::services::manifest::{DEFAULT_SHARE_SCOPE, SharedScope, default_shared};

pub const DEFAULT_HOST_PORT: u16 = 57146;
pub const DEFAULT_CONSUMER_PORT: u16 = 3000;
pub const DEFAULT_REMOTE_NAME: &str = "app-1";
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:57146";
pub const DEFAULT_COUNTER_MODULE: &str = "app-1/counter";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {addr}: {reason}")]
    InvalidBindAddress { addr: String, reason: String },
    #[error("invalid federation name {0:?}: must be non-empty without slashes")]
    InvalidName(String),
    #[error("invalid remote url {url}: {reason}")]
    InvalidRemoteUrl { url: String, reason: String },
    #[error("invalid module id: {0}")]
    InvalidModule(String),
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "federated-apps", about = "Login host and federated component consumer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run app-1: login form plus exposed components.
    Host(HostArgs),
    /// Run app-2: page that loads a component from a remote host.
    Consumer(ConsumerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_HOST_PORT)]
    pub port: u16,

    /// Federation name; also the base path the app is served under.
    #[arg(long, env = "FEDERATION_NAME", default_value = DEFAULT_REMOTE_NAME)]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ConsumerArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_CONSUMER_PORT)]
    pub port: u16,

    #[arg(long, env = "REMOTE_NAME", default_value = DEFAULT_REMOTE_NAME)]
    pub remote_name: String,

    /// Origin of the remote host, without the federation base path.
    #[arg(long, env = "APP_1_URL", default_value = DEFAULT_REMOTE_URL)]
    pub remote_url: String,

    #[arg(long, env = "SHARE_SCOPE", default_value = DEFAULT_SHARE_SCOPE)]
    pub share_scope: String,

    /// Module mounted on the counter page.
    #[arg(long, env = "COUNTER_MODULE", default_value = DEFAULT_COUNTER_MODULE)]
    pub module: String,

    #[arg(long, env = "RESOLVE_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "RESOLVE_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,
}

// =============================================================================
// TYPED CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub addr: SocketAddr,
    pub name: String,
}

impl TryFrom<HostArgs> for HostConfig {
    type Error = ConfigError;

    fn try_from(args: HostArgs) -> Result<Self, Self::Error> {
        Ok(Self { addr: parse_addr(&args.bind, args.port)?, name: validate_name(&args.name)? })
    }
}

/// A remote the consumer may load modules from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub name: String,
    /// Origin with any trailing slash removed.
    pub base_url: String,
    pub share_scope: String,
    /// `<base>/<name>/remoteEntry.json`
    pub entry_url: reqwest::Url,
}

impl RemoteConfig {
    /// Build a remote, validating the name and normalizing the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid name or a base URL that is not
    /// absolute `http`/`https`.
    pub fn new(name: &str, base_url: &str, share_scope: &str) -> Result<Self, ConfigError> {
        let name = validate_name(name)?;
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| ConfigError::InvalidRemoteUrl { url: base_url.to_owned(), reason: e.to_string() })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRemoteUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        let entry = format!("{trimmed}/{name}/remoteEntry.json");
        let entry_url = reqwest::Url::parse(&entry)
            .map_err(|e| ConfigError::InvalidRemoteUrl { url: entry.clone(), reason: e.to_string() })?;
        Ok(Self { name, base_url: trimmed.to_owned(), share_scope: share_scope.to_owned(), entry_url })
    }

    /// `<base>/<name>/assets/<path>`, or `None` when `path` could leave
    /// `assets/` (dot or empty segments, query and fragment markers,
    /// backslashes). Segments are percent-encoded as they are pushed.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> Option<reqwest::Url> {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let unsafe_segment =
            |s: &&str| s.is_empty() || matches!(*s, "." | "..") || s.contains(['?', '#', '\\']);
        if segments.iter().any(unsafe_segment) {
            return None;
        }

        let mut url = self.entry_url.clone();
        url.path_segments_mut().ok()?.pop().push("assets").extend(segments);
        Some(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ResolverTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub addr: SocketAddr,
    pub remote: RemoteConfig,
    pub module: ModuleId,
    pub shared: SharedScope,
    pub timeouts: ResolverTimeouts,
}

impl TryFrom<ConsumerArgs> for ConsumerConfig {
    type Error = ConfigError;

    fn try_from(args: ConsumerArgs) -> Result<Self, Self::Error> {
        let addr = parse_addr(&args.bind, args.port)?;
        let remote = RemoteConfig::new(&args.remote_name, &args.remote_url, &args.share_scope)?;
        let module = ModuleId::parse(&args.module).map_err(|e| ConfigError::InvalidModule(e.to_string()))?;
        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout { field: "request_timeout_secs" });
        }
        if args.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout { field: "connect_timeout_secs" });
        }
        let timeouts =
            ResolverTimeouts { request_secs: args.request_timeout_secs, connect_secs: args.connect_timeout_secs };
        Ok(Self { addr, remote, module, shared: default_shared(), timeouts })
    }
}

fn parse_addr(bind: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let ip: std::net::IpAddr = bind
        .trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
            addr: bind.to_owned(),
            reason: e.to_string(),
        })?;
    Ok(SocketAddr::new(ip, port))
}

fn validate_name(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim();
    if name.is_empty() || name.contains('/') {
        return Err(ConfigError::InvalidName(raw.to_owned()));
    }
    Ok(name.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
