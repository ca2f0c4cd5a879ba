// Whole-file replacement
//
// The backing file is always rewritten in full. Data goes to a `.tmp`
// sibling first and is renamed over the target, so a reader never sees a
// half-written file.

use crate::{Result, StoreError};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Replace `path` with `data`, creating missing parent directories.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }

    let tmp = tmp_path(path);
    if let Err(e) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(&tmp, e));
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// `messages.json` -> `messages.json.tmp`
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}
