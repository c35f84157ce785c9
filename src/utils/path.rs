//! Path helpers for working-copy names

use std::path::{Path, PathBuf};

/// `"{id}.{extension}"`, the name of staged and edited copies
pub fn canonical_file_name(id: u64, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        id.to_string()
    } else {
        format!("{}.{}", id, extension)
    }
}

/// Sibling path with `suffix` appended to the file name
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
