//! Tracing subscriber setup.
//!
//! Logs go to stderr; stdout is reserved for the run summary.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
