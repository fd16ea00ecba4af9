//! Tracing subscriber setup for binaries
//!
//! The library only emits `tracing` events. Binaries call [`init`] once to
//! install a formatter; `RUST_LOG` takes precedence, otherwise
//! `RF_DEBUG_MODE` selects `debug` over the default `info`.

/// Environment flag raising the default level to `debug`
pub const ENV_DEBUG_MODE: &str = "RF_DEBUG_MODE";

/// Default filter directive for the given debug flag
pub fn default_directive(debug_mode: bool) -> &'static str {
    if debug_mode {
        "rfoasis=debug,gul_to_bin=debug"
    } else {
        "rfoasis=info,gul_to_bin=info"
    }
}

/// Whether `RF_DEBUG_MODE` is set to a truthy value
pub fn debug_mode_enabled() -> bool {
    std::env::var(ENV_DEBUG_MODE)
        .ok()
        .and_then(|v| rfoasis_core::validation::parse_bool(&v))
        .unwrap_or(false)
}

/// Install the global subscriber, writing to stderr
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "cli")]
pub fn init() {
    use std::sync::Once;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(debug_mode_enabled())));

        // stdout may carry the binary stream
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
