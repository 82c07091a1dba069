// Logging setup for the docwarden binary

use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for the given flags; `RUST_LOG` wins over all of them
pub fn filter_directive(verbose: bool, quiet: bool, configured: &str) -> String {
    if quiet {
        "error".to_string()
    } else if verbose {
        "docwarden=debug,info".to_string()
    } else {
        configured.to_string()
    }
}

/// Install the global `tracing` subscriber writing to stderr
pub fn init_logging(verbose: bool, quiet: bool, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet, configured)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_configured_level() {
        assert_eq!(filter_directive(false, true, "info"), "error");
        assert_eq!(filter_directive(true, false, "warn"), "docwarden=debug,info");
        assert_eq!(filter_directive(false, false, "info"), "info");
    }
}
