use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Install the CLI logger: dependencies at `Warn`, this crate at `Info` (or `Debug` when
/// verbose). `RUST_LOG` is read first, so it can still widen either. Safe to call twice.
pub fn setup_logging(verbose: bool) {
    let level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error => format!(
                    "[{} {} {}] {}",
                    name.cyan(),
                    "ERROR".red(),
                    record.target().white(),
                    record.args()
                ),
                Level::Warn => format!(
                    "[{} {} {}] {}",
                    name.cyan(),
                    "WARN".yellow(),
                    record.target().white(),
                    record.args()
                ),
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name.cyan(), "debug".dimmed(), record.args())
                }
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
