//! I/O utility functions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary sibling path used while `path` is being written
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically using write-then-rename pattern.
///
/// A reader never sees a half-written ledger: the content goes to a
/// temporary sibling first and is renamed over the target.
///
/// # Example
/// ```ignore
/// atomic_write(Path::new("output_files/cash.txt"), &series)?;
/// ```
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = temp_path(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read a file that may legitimately be absent
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
