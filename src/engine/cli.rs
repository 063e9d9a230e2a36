//! CLI command handlers: `debug` prints the resolved root and patterns, `walk` prints discovered paths.

use anyhow::Result;
use colored::Colorize;
use log::debug;
use std::path::Path;

use crate::engine::arg_parser::{Cli, Commands, DebugArgs, WalkArgs};
use crate::engine::root::{RootMarkers, find_root};
use crate::pipeline::report_skipped_paths;
use crate::utils::pathfan_toml::{apply_file_to_opts, load_pathfan_toml};
use crate::utils::setup_logging;
use crate::{Runner, RunnerOpts};

/// Options after layering defaults, `.pathfan.toml` at the project root, then CLI flags.
struct Setup {
    opts: RunnerOpts,
    excludes: Vec<String>,
    verbose: bool,
}

fn load_setup(path: &Path, cli_verbose: Option<bool>) -> Setup {
    let mut opts = RunnerOpts::default();
    let mut excludes = Vec::new();
    let mut verbose = cli_verbose.unwrap_or(false);

    let root = find_root(path, &RootMarkers::default());
    if let Some(file) = load_pathfan_toml(&root) {
        debug!("loaded config from {}", root.display());
        apply_file_to_opts(&file, &mut opts);
        if let Some(file_excludes) = &file.settings.exclude {
            excludes.extend(file_excludes.iter().cloned());
        }
        if cli_verbose.is_none()
            && let Some(v) = file.settings.verbose
        {
            verbose = v;
        }
    }
    Setup {
        opts,
        excludes,
        verbose,
    }
}

/// Dispatch to the subcommand handler.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose().unwrap_or(false));
    match &cli.command {
        Commands::Debug(args) => handle_debug(args),
        Commands::Walk(args) => handle_walk(args),
    }
}

fn handle_debug(args: &DebugArgs) -> Result<()> {
    let setup = load_setup(&args.path, args.verbose);
    let runner = Runner::new(&setup.opts)?;

    let root = runner.project_root(&args.path);
    println!("root = {}", root.display());
    let ignore = runner.compile_ignore(&root)?;
    println!("ignore patterns = {}", ignore.len());
    if setup.verbose {
        for pattern in ignore.patterns() {
            println!("  {}", pattern.source());
        }
    }
    Ok(())
}

fn handle_walk(args: &WalkArgs) -> Result<()> {
    let Setup {
        mut opts,
        mut excludes,
        verbose,
    } = load_setup(&args.path, args.verbose);
    if let Some(include) = &args.include {
        opts.include = include.clone();
    }
    if let Some(sort) = args.sort {
        opts.sort = sort;
    }
    if let Some(strict) = args.strict {
        opts.strict = strict;
    }
    if let Some(follow_links) = args.follow_links {
        opts.follow_links = follow_links;
    }
    excludes.extend(args.exclude.iter().cloned());

    let runner = Runner::new(&opts)?;
    let mut walk = runner.walk(&args.path, &excludes)?;
    let mut found = 0_usize;
    for path in walk.by_ref() {
        println!("{}", path?.display());
        found += 1;
    }
    debug!("{} paths found", found);

    let excluded = walk.excluded();
    if !excluded.is_empty() {
        println!();
        for entry in &excluded {
            println!(
                "{} {}",
                entry.path.display().to_string().dimmed(),
                format!("excluded by {:?}", entry.pattern).dimmed()
            );
        }
    }
    report_skipped_paths(&walk.skipped(), verbose);
    Ok(())
}
