//! Diagnostic tracing for the editor.
//!
//! Events go to stderr and never mix with the JSON report, which
//! `io::report` writes to stdout or `--output` regardless of `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives used when `RUST_LOG` is unset: batch progress from this
/// crate, warnings only from dependencies such as reqwest.
pub const DEFAULT_DIRECTIVES: &str = "warn,bulkedit=info";

/// Install the stderr subscriber.
///
/// ```bash
/// RUST_LOG=bulkedit=debug bulkedit run recipe.toml
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
