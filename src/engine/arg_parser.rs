use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const PATH: &'static str = ".";
}

/// Find significant files under a path, honoring project roots and gitignore.
#[derive(Clone, Parser)]
#[command(name = "pathfan")]
#[command(about = "Find significant files under a path, honoring project roots and gitignore.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Print the resolved project root and ignore-pattern count for PATH.
    Debug(DebugArgs),
    /// Print every significant file found walking PATH, then what was excluded.
    Walk(WalkArgs),
}

#[derive(Clone, Args)]
pub struct DebugArgs {
    /// Path to inspect. Default: current directory.
    #[arg(value_name = "PATH", default_value = DefaultArgs::PATH)]
    pub path: PathBuf,

    /// Also list each ignore pattern.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

#[derive(Clone, Args)]
pub struct WalkArgs {
    /// Path to walk. Default: current directory.
    #[arg(value_name = "PATH", default_value = DefaultArgs::PATH)]
    pub path: PathBuf,

    /// Extra exclude patterns (gitignore syntax), applied after the ignore file: -e pattern1 pattern2
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Regex matched against file names found inside directories.
    #[arg(long, short = 'i')]
    pub include: Option<String>,

    /// Print paths in file-name order.
    #[arg(long, short = 's', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub sort: Option<bool>,

    /// Strict mode: stop at the first traversal error instead of skipping it.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Verbosity requested on the command line, if any.
    pub fn verbose(&self) -> Option<bool> {
        match &self.command {
            Commands::Debug(args) => args.verbose,
            Commands::Walk(args) => args.verbose,
        }
    }
}
