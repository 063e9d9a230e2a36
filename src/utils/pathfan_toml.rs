//! Load `.pathfan.toml` from a project root (CLI only). The library never reads it; library
//! callers pass everything through [`RunnerOpts`].

use serde::Deserialize;
use std::path::Path;

use crate::RunnerOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PathfanToml {
    #[serde(default)]
    pub(crate) settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    pub(crate) exclude: Option<Vec<String>>,
    include: Option<String>,
    root_markers: Option<Vec<String>>,
    concurrency: Option<usize>,
    strict: Option<bool>,
    follow_links: Option<bool>,
    sort: Option<bool>,
    pub(crate) verbose: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if missing or unreadable;
/// parse errors are logged and otherwise treated as missing.
pub(crate) fn load_pathfan_toml(dir: &Path) -> Option<PathfanToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    toml::from_str(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($settings:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $settings.$field.clone() {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &PathfanToml, opts: &mut RunnerOpts) {
    let settings = &file.settings;
    apply_file_opt!(settings, opts, include);
    apply_file_opt!(settings, opts, root_markers);
    apply_file_opt!(settings, opts, concurrency);
    apply_file_opt!(settings, opts, strict);
    apply_file_opt!(settings, opts, follow_links);
    apply_file_opt!(settings, opts, sort);
}
