use crate::consts::{APK_EXTENSION, FILENAME_VERSION_REGEX, LANGUAGE_REGEX};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// Lists the `*.apk` files directly inside `dir`, sorted by file name.
///
/// A missing directory is treated as empty.
pub fn list_apks(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "APK directory does not exist");
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).or_raise(|| ErrorKind::ListApks(dir.to_path_buf()))?;
    let mut apks = Vec::new();
    for entry in entries {
        let entry = entry.or_raise(|| ErrorKind::ListApks(dir.to_path_buf()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == APK_EXTENSION) {
            apks.push(path);
        }
    }
    apks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(apks)
}

/// The file name of `path` as a string, lossily converted.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// The language marker in names like `tachiyomi-vi.teamlanhlung-v1.4.26.apk`.
pub fn language_from_filename(name: &str) -> Option<&str> {
    LANGUAGE_REGEX.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// The `1.2.3` part of a `v1.2.3` marker in a file name.
pub fn version_from_filename(name: &str) -> Option<&str> {
    FILENAME_VERSION_REGEX.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Case-insensitive substring match of a rule against a file name.
pub(crate) fn name_matches(name: &str, pattern: &str) -> bool {
    name.to_lowercase().contains(&pattern.to_lowercase())
}
