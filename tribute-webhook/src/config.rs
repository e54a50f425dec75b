//! Configuration module for environment variable parsing.
//!
//! The configuration is read once at startup and shared by reference; nothing
//! here is mutated after construction.

use std::collections::BTreeMap;
use std::env;
use std::fmt;

use tracing::warn;

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3041;

/// Path served by the `TRIBUTE_API_KEY` secret.
pub const DEFAULT_WEBHOOK_PATH: &str = "/wh";

/// Prefix for per-path secret variables, e.g. `TRIBUTE_SECRET__shop__orders`.
pub const SECRET_VAR_PREFIX: &str = "TRIBUTE_SECRET__";

/// Shared webhook secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Webhook secrets keyed by normalized endpoint path
    secrets: BTreeMap<String, Secret>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build configuration from arbitrary key/value pairs.
    ///
    /// Secret precedence, later wins: `TRIBUTE_API_KEY`, then
    /// `TRIBUTE_SECRET_MAP`, then `TRIBUTE_SECRET__*` variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let port = vars
            .get("PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mut secrets = BTreeMap::new();

        if let Some(key) = vars.get("TRIBUTE_API_KEY") {
            insert_secret(&mut secrets, DEFAULT_WEBHOOK_PATH, key);
        }

        if let Some(raw) = vars.get("TRIBUTE_SECRET_MAP") {
            for (path, secret) in parse_secret_map(raw) {
                insert_secret(&mut secrets, &path, &secret);
            }
        }

        for (name, value) in &vars {
            if let Some(path) = path_from_var_name(name) {
                insert_secret(&mut secrets, &path, value);
            }
        }

        Config { port, secrets }
    }

    /// Add or replace the secret for an endpoint.
    pub fn with_secret(mut self, path: &str, secret: impl Into<String>) -> Self {
        self.secrets
            .insert(normalize_webhook_path(path), Secret::new(secret));
        self
    }

    /// Secret configured for `path`, matched after normalization.
    pub fn secret_for(&self, path: &str) -> Option<&Secret> {
        self.secrets.get(&normalize_webhook_path(path))
    }

    /// Configured endpoint paths in sorted order.
    pub fn known_paths(&self) -> Vec<String> {
        self.secrets.keys().cloned().collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            secrets: BTreeMap::new(),
        }
    }
}

/// Canonical form of a webhook path.
///
/// Drops any query string, collapses repeated slashes, ensures a leading
/// slash and removes a trailing one (the root stays `/`).
pub fn normalize_webhook_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn insert_secret(secrets: &mut BTreeMap<String, Secret>, path: &str, secret: &str) {
    let path = normalize_webhook_path(path);
    if secret.is_empty() {
        warn!(path = %path, "config_empty_secret_skipped");
        return;
    }
    secrets.insert(path, Secret::new(secret));
}

/// Parse `TRIBUTE_SECRET_MAP`, a JSON object of path to secret.
fn parse_secret_map(raw: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<BTreeMap<String, String>>(raw) {
        Ok(map) => map.into_iter().collect(),
        Err(e) => {
            warn!(env_var = "TRIBUTE_SECRET_MAP", error = %e, "Invalid secret map, ignoring");
            Vec::new()
        }
    }
}

/// `TRIBUTE_SECRET__shop__orders` maps to `/shop/orders`.
fn path_from_var_name(name: &str) -> Option<String> {
    let rest = name.strip_prefix(SECRET_VAR_PREFIX)?;
    let segments: Vec<&str> = rest.split("__").filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        warn!(env_var = name, "Secret variable names no path, ignoring");
        return None;
    }
    Some(normalize_webhook_path(&segments.join("/")))
}
