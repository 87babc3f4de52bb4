//! `keyshift.toml` configuration.
//!
//! Every section and key is optional.
//!
//! # Example
//!
//! ```toml
//! [diff]
//! equality = "content"        # or "identity"
//!
//! [removals]
//! excludes = ["security.oauth2", "spring.mobile"]
//!
//! [logging]
//! filter = "info"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use keyshift_core::EqualityPolicy;

/// Configuration file looked up in the working directory when `--config` is
/// not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "keyshift.toml";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct KeyshiftConfig {
    pub diff: DiffSettings,
    pub removals: RemovalSettings,
    pub logging: LoggingSettings,
}

/// `[diff]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DiffSettings {
    /// Policy deciding EQUALS vs MODIFY for matched properties.
    pub equality: EqualityPolicy,
}

/// `[removals]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RemovalSettings {
    /// Id prefixes never proposed as removal candidates.
    pub excludes: Vec<String>,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: "info".to_string(),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub(crate) fn read_config(path: &Path) -> Result<KeyshiftConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Load the explicit config file, or `keyshift.toml` when present, or the
/// defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<KeyshiftConfig, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                read_config(default)
            } else {
                Ok(KeyshiftConfig::default())
            }
        }
    }
}
