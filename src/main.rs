//! pathfan CLI: print a project's root and ignore patterns, or the significant files under a path.

use anyhow::Result;
use clap::Parser;
use pathfan::engine::arg_parser::Cli;
use pathfan::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
