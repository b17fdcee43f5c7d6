//! Small filesystem helpers shared by the stores and the splicer.

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix of the sibling file used for atomic replacement.
const TMP_SUFFIX: &str = ".aipad-tmp";

/// Reads a UTF-8 file, returning `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`Error::IoFailure`] for any error other than "not found",
/// including invalid UTF-8.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io("reading", path, e)),
    }
}

/// Writes `bytes` to `path` by writing a sibling temp file and renaming it
/// over the destination.
///
/// Readers never observe a half-written file. The parent directory must
/// already exist. A symlinked destination is resolved first so the link
/// itself survives (`CLAUDE.md -> AGENTS.md` setups).
///
/// # Errors
///
/// Returns [`Error::IoFailure`] if the temp file cannot be written or the
/// rename fails. The temp file is removed on failure.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let resolved;
    let path = if fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) {
        resolved = fs::canonicalize(path).map_err(|e| Error::io("resolving link", path, e))?;
        resolved.as_path()
    } else {
        path
    };
    let tmp = tmp_path(path);

    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .map_err(|e| Error::io("writing", &tmp, e));

    let result =
        written.and_then(|()| fs::rename(&tmp, path).map_err(|e| Error::io("replacing", path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Creates `dir` and its parents if missing.
///
/// # Errors
///
/// Returns [`Error::IoFailure`] if creation fails.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io("creating directory", dir, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}
