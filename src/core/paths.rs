use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Caller's home directory.
pub fn home() -> Result<PathBuf> {
    let home = env::var("HOME").map_err(|_| {
        Error::internal_unexpected("HOME environment variable not set".to_string())
    })?;
    Ok(PathBuf::from(home))
}

/// Base hostgen config directory (~/.config/hostgen/)
pub fn hostgen() -> Result<PathBuf> {
    Ok(home()?.join(".config").join("hostgen"))
}

/// Global hostgen.json config file path
pub fn hostgen_json() -> Result<PathBuf> {
    Ok(hostgen()?.join("hostgen.json"))
}

/// Default destination root for generated bundles (~/hosts)
pub fn hosts_root() -> Result<PathBuf> {
    Ok(home()?.join("hosts"))
}

/// Directory the per-host SSH keys are expected in (~/.ssh)
pub fn ssh_dir() -> Result<PathBuf> {
    Ok(home()?.join(".ssh"))
}
