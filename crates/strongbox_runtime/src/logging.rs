//! Log output for the `strongbox` binary.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "strongbox=info";

/// Directive used when `RUST_LOG` is unset and `--verbose` is given.
pub const VERBOSE_DIRECTIVE: &str = "strongbox=debug";

/// Builds the filter: `RUST_LOG` if set, else the default for `verbose`.
#[must_use]
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_DIRECTIVE
        } else {
            DEFAULT_DIRECTIVE
        })
    })
}

/// Installs a formatting subscriber writing to stderr.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(verbose: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
