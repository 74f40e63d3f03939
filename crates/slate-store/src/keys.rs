//! On-disk entry naming.
//!
//! Keys are percent-encoded into file names so that separators and other
//! unsafe characters never leak into paths, and entries carry a fixed
//! extension so temp files and strays in the same directory are ignored.

use std::path::{Path, PathBuf};

/// Extension carried by every store entry file.
pub const ENTRY_EXTENSION: &str = "entry";

/// Encode `key` into its entry file name.
pub fn entry_file_name(key: &str) -> String {
    format!("{}.{ENTRY_EXTENSION}", urlencoding::encode(key))
}

/// Full path of the entry for `key` under `root`.
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    root.join(entry_file_name(key))
}

/// Recover the key an entry path was written under.
///
/// Returns `None` for paths that are not store entries: temp files, probe
/// files, directories, or names that fail to decode.
pub fn key_for_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    urlencoding::decode(stem).ok().map(|key| key.into_owned())
}
