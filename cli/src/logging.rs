//! Tracing subscriber setup.
//!
//! Filter precedence: `--log-level`, then `CONCEPT_BREAKDOWN_LOG`, then
//! `RUST_LOG`, then `logging.level` from the config file.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "CONCEPT_BREAKDOWN_LOG";
const FALLBACK_LEVEL: &str = "warn";

fn build_filter(flag: Option<&str>, configured: &str) -> Result<EnvFilter, String> {
    if let Some(flag) = flag {
        return EnvFilter::try_new(flag).map_err(|e| format!("Invalid --log-level '{flag}': {e}"));
    }
    Ok(EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL)))
}

/// Installs the stderr fmt layer. A second call is a no-op.
pub fn init_tracing(flag: Option<&str>, configured: &str) -> Result<(), String> {
    let filter = build_filter(flag, configured)?;
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let filter = build_filter(Some("debug"), "error").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        let err = build_filter(Some("concept_breakdown=loud"), "warn").unwrap_err();
        assert!(err.contains("--log-level"), "{err}");
    }
}
