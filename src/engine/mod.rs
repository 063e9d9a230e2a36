//! Engine module: root discovery, ignore patterns, path helpers, command surface

pub mod arg_parser;
pub mod cli;
pub mod ignore_file;
pub mod patterns;
pub mod root;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, DebugArgs, WalkArgs};
pub use cli::handle_run;
pub use ignore_file::{compile_ignore_file, resolve_ignore};
pub use patterns::{Pattern, PatternSet};
pub use root::{RootMarkers, find_root};
pub use tools::{
    include_matches, or_cur_dir, path_relative_to, relative_to_root, resolve_path, trim_cur_dir,
};
