use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve `entry_path` against `base`, rejecting anything that would land
/// outside of `base`.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = normalize_path(base.as_ref());

    // Reject absolute paths (zip-slip protection)
    if entry_path.has_root() || matches!(entry_path.components().next(), Some(Component::Prefix(_))) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved: entry_path.to_path_buf(),
        });
    }

    // Normalize after joining so `..` is measured against the real base
    let resolved = normalize_path(&base.join(entry_path));

    if !resolved.starts_with(&base) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Resolve `.` and `..` components lexically.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(Component::RootDir.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
