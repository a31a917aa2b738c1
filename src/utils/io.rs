//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content atomically with the final permission mode already applied.
///
/// Writes to a temp file next to the target, applies `mode` to the temp
/// file, then renames it into place. The target path therefore never exists
/// with looser permissions than requested, and a crash mid-write leaves the
/// previous content intact.
pub fn write_file_with_mode(path: &Path, content: &str, mode: u32, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    set_mode(&tmp_path, mode, operation)?;

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation))))?;

    Ok(())
}

/// Set permission bits on an existing path. No-op on platforms without
/// Unix-style modes.
pub fn set_mode(path: &Path, mode: u32, operation: &str) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    }

    #[cfg(not(unix))]
    let _ = (path, mode, operation);

    Ok(())
}
