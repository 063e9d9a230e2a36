//! Application configuration constants.
//! Defaults and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    worker_thread_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                worker_thread_prefix: format!("{pkg}-worker"),
            }
        })
    }

    /// Per-project config file read by the CLI from the project root.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Worker thread name for index `i`.
    pub fn worker_thread_name(&self, i: usize) -> String {
        format!("{}-{}", self.worker_thread_prefix, i)
    }
}

// ---- Walk defaults ----

/// Names marking a project root, checked in this order.
pub const DEFAULT_ROOT_MARKERS: &[&str] = &["pyproject.toml", ".git", ".hg"];

/// Ignore file read from the project root.
pub const DEFAULT_IGNORE_FILENAME: &str = ".gitignore";

/// Regex matched against file names discovered inside directories.
pub const DEFAULT_INCLUDE_PATTERN: &str = r".+\.pyi?$";

// ---- Worker threads ----

/// Worker count used when the caller asks for 0 (automatic).
pub fn default_concurrency() -> usize {
    rayon::current_num_threads()
}

/// Resolve a requested worker count: values < 1 mean automatic.
pub fn effective_concurrency(requested: usize) -> usize {
    match requested {
        0 => default_concurrency(),
        n => n,
    }
}
