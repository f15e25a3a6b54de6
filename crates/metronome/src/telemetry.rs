//! Log output setup for the command-line tool.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directives when `RUST_LOG` is unset.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,metronome=debug,metronome_rate_limit=debug,metronome_models=debug"
    } else {
        "warn,metronome_rate_limit=info"
    }
}

/// Initialize console logging to stderr.
///
/// `RUST_LOG` wins when set. Otherwise only warnings and pacing waits are
/// shown, or debug output for the workspace crates with `verbose`.
pub fn init_console_telemetry(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
