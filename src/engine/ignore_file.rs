//! Effective ignore matcher for a project root: the root's ignore file, then caller excludes.

use log::debug;
use std::fs;
use std::path::Path;

use crate::engine::patterns::PatternSet;
use crate::error::{Error, Result};

/// Compile the ignore file `filename` found in `root`. A missing file gives an empty set.
/// `root` must be a directory.
pub fn compile_ignore_file(root: &Path, filename: &str) -> Result<PatternSet> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    let path = root.join(filename);
    if !path.is_file() {
        debug!("no {} in {}", filename, root.display());
        return Ok(PatternSet::empty());
    }
    let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let set = PatternSet::compile(text.lines())?;
    debug!("{}: {} patterns", path.display(), set.len());
    Ok(set)
}

/// Ignore-file patterns followed by `extra` (caller excludes get the final say).
pub fn resolve_ignore(root: &Path, filename: &str, extra: &[String]) -> Result<PatternSet> {
    let file = compile_ignore_file(root, filename)?;
    Ok(file + PatternSet::compile(extra)?)
}
