//! Built-in defaults and their overrides from hostgen.json.

use serde::{Deserialize, Serialize};

use crate::paths;
use crate::profile::ProfileKind;
use crate::utils::io;

/// Root configuration structure for hostgen.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostgenConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via hostgen.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub profile: ProfileKind,

    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Destination root for bundles; `~/hosts` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<String>,

    /// Login overriding the profile default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            profile: ProfileKind::default(),
            ssh_port: default_ssh_port(),
            output_root: None,
            username: None,
        }
    }
}

fn default_ssh_port() -> u16 {
    22
}

/// Load defaults, merging file config with built-in defaults.
/// If hostgen.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config_from_file().unwrap_or_default().defaults
}

fn load_config_from_file() -> crate::Result<HostgenConfig> {
    let path = paths::hostgen_json()?;

    if !path.exists() {
        return Err(crate::Error::internal_unexpected("hostgen.json not found"));
    }

    let content = io::read_file(&path, "read hostgen.json")?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::internal_json(e.to_string(), Some(path.display().to_string())))
}
