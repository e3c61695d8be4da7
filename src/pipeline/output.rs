use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Replaces the file at `path` with `reply`.
///
/// The text goes to a sibling temporary file first and is renamed over the
/// target, so the target holds either the old content or the whole reply.
pub fn write_reply(path: &Path, reply: &str) -> Result<()> {
    let staging = staging_path(path);
    if let Err(e) = fs::write(&staging, reply.as_bytes()) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    info!("Wrote {} bytes to {}", reply.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
