//! Settings file and credential resolution.

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use prefixprune_core::{DEFAULT_QUERY_PAGE_SIZE, MAX_QUERY_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "prefixprune.toml";

/// Controller used when neither the flag nor the settings name one.
pub const DEFAULT_CONTROLLER: &str = "https://api.elcapitan.cloudgenix.com";

/// Environment variables consulted for the auth token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["X_AUTH_TOKEN", "AUTH_TOKEN"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Static auth token; wins over the token environment variables.
    pub auth_token: Option<String>,
    /// Controller base URL.
    pub controller: Option<String>,
    /// Bindings requested per query page.
    pub query_page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_token: None,
            controller: None,
            query_page_size: DEFAULT_QUERY_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn page_size(&self) -> u32 {
        self.query_page_size.clamp(1, MAX_QUERY_PAGE_SIZE)
    }

    /// Pick the controller: explicit flag, then settings, then the default.
    pub fn controller(&self, flag: Option<&str>) -> String {
        flag.or(self.controller.as_deref())
            .unwrap_or(DEFAULT_CONTROLLER)
            .to_string()
    }
}

pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

/// Load settings from `path` (optional) overlaid with `PREFIXPRUNE_*` variables.
///
/// A malformed file or environment value is an error, never a silent
/// fallback to defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut figment = Figment::new();

    if path.exists() {
        tracing::debug!(path = %path.display(), "Loading settings file");
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("PREFIXPRUNE_").only(&[
        "auth_token",
        "controller",
        "query_page_size",
    ]));

    // Every field has a default, so a missing file extracts cleanly and any
    // error here comes from a malformed file or PREFIXPRUNE_* value.
    figment
        .extract()
        .map_err(|err| anyhow::anyhow!(err).context("failed to load settings"))
}

/// Resolve the auth token: settings, then `X_AUTH_TOKEN`, then `AUTH_TOKEN`.
///
/// Empty values count as unset.
pub fn resolve_token<F>(settings: &Settings, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    settings
        .auth_token
        .clone()
        .into_iter()
        .chain(TOKEN_ENV_VARS.iter().filter_map(|key| env(key)))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}
