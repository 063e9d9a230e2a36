//! Path and filter utilities

use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// `path`, or `.` when it is empty.
pub fn or_cur_dir(path: &Path) -> &Path {
    match path.as_os_str().is_empty() {
        true => Path::new("."),
        false => path,
    }
}

/// Absolute form of `path`, following symlinks when the path exists.
/// Never fails: nonexistent paths are made absolute against the working directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    let path = or_cur_dir(path);
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Path of `path` relative to `root`: resolved first, then by its absolute in-tree position
/// without following symlinks (a symlink inside `root` pointing elsewhere stays under `root`).
/// `None` when neither is under `root`.
pub fn relative_to_root(path: &Path, root: &Path) -> Option<PathBuf> {
    path_relative_to(&resolve_path(path), root).or_else(|| {
        std::path::absolute(or_cur_dir(path))
            .ok()
            .and_then(|abs| path_relative_to(&abs, root))
    })
}

/// Drop a leading `.` component so walking `.` yields `foo/a.py`, not `./foo/a.py`.
pub fn trim_cur_dir(path: PathBuf) -> PathBuf {
    let mut components = path.components();
    if components.next() == Some(Component::CurDir) && components.clone().next().is_some() {
        return components.as_path().to_path_buf();
    }
    path
}

/// True if the file name of `path` matches the include filter.
pub fn include_matches(include: &Regex, path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| include.is_match(name))
}
