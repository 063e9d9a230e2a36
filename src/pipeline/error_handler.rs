use log::warn;
use std::path::PathBuf;

/// Report traversal errors a non-strict walk skipped. Call after the walk is drained.
pub fn report_skipped_paths(skipped: &[(PathBuf, String)], verbose: bool) {
    if skipped.is_empty() {
        return;
    }
    warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped.len()
    );
    if verbose {
        for (p, msg) in skipped {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}
