//! Diagnostics for the `rotorkit` binary
//!
//! The library only emits `tracing` events; the binary installs a stderr
//! subscriber so ciphertext on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Overrides the `-v` count when set, e.g. `ROTORKIT_LOG=rotorkit=trace`
pub const LOG_ENV: &str = "ROTORKIT_LOG";

/// 0 → warn, 1 → info, 2 → debug, 3+ → trace
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(u8::MAX), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(0);
        init_logging(3);
    }
}
