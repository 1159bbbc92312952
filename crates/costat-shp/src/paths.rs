//! Member-file path derivation.

use std::path::{Path, PathBuf};

/// Extensions of the member files making up one dataset.
const MEMBER_EXTENSIONS: &[&str] = &["shp", "shx", "dbf", "prj"];

/// Derive the path of the member file with extension `ext`.
///
/// When `path` already points at a member file its extension is replaced;
/// otherwise `path` is a dataset stem and the extension is appended, so a
/// stem containing dots (`covid.2020.04.15`) keeps its full name.
pub(crate) fn member_path(path: &Path, ext: &str) -> PathBuf {
    let is_member = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MEMBER_EXTENSIONS.iter().any(|m| e.eq_ignore_ascii_case(m)));
    if is_member {
        return path.with_extension(ext);
    }
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}
