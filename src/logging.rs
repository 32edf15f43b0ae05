//! Logging setup for the CLI.
//!
//! Logs go to stderr so stdout only carries the generation report.

use tracing_subscriber::EnvFilter;

/// Level implied by the number of `-v` flags.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Filter directive: a non-empty `RUST_LOG` value wins over `verbosity`.
pub fn filter_directive(rust_log: Option<&str>, verbosity: u8) -> String {
    match rust_log.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => format!("inventory_codes={}", level_for(verbosity)),
    }
}

/// Installs a fmt subscriber. A second install is ignored.
pub fn init_logging(verbosity: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(rust_log.as_deref(), verbosity);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(None, verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "debug");
    }

    #[test]
    fn test_rust_log_beats_verbosity() {
        assert_eq!(filter_directive(Some("trace"), 0), "trace");
        assert_eq!(filter_directive(Some("inventory_codes=error"), 2), "inventory_codes=error");
    }

    #[test]
    fn test_verbosity_used_without_rust_log() {
        assert_eq!(filter_directive(None, 0), "inventory_codes=warn");
        assert_eq!(filter_directive(Some("  "), 1), "inventory_codes=info");
        assert_eq!(filter_directive(None, 3), "inventory_codes=debug");
    }
}
