// src/logging.rs
// =============================================================================
// Logging setup.
//
// Diagnostics go through `tracing` to stderr, so stdout stays clean for the
// summary table or --json output. RUST_LOG wins if it's set; otherwise -v
// flags pick the level:
//
//   (none) -> info   (one line per page, checkpoints, warnings)
//   -v     -> debug  (plus every rejected link and skipped page)
//   -vv    -> trace  (plus dependency internals)
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Keep HTTP client internals quiet unless asked for
    let default_filter = if verbosity >= 2 {
        level.to_string()
    } else {
        format!("{level},hyper=warn,reqwest=warn,html5ever=warn")
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: a second call (e.g. from tests) is a no-op instead of a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
