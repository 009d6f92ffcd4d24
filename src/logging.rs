//! Structured logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured filter is used, and a
//! malformed filter falls back to `info`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FALLBACK_FILTER: &str = "info";

fn build_filter(configured: &str) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(configured))
    .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber.
///
/// Returns `false` when one is already installed (e.g. the embedding
/// application set up its own), which is not an error.
pub fn init_logging(filter: &str) -> bool {
  tracing_subscriber::registry()
    .with(build_filter(filter))
    .with(tracing_subscriber::fmt::layer().with_target(true))
    .try_init()
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_second_init_is_harmless() {
    temp_env::with_var("RUST_LOG", None::<&str>, || {
      let _ = init_logging("debug");
      assert!(!init_logging("info"));
      tracing::info!("logging initialised");
    });
  }

  #[test]
  #[serial]
  fn test_configured_filter_used_without_rust_log() {
    temp_env::with_var("RUST_LOG", None::<&str>, || {
      assert_eq!(build_filter("warn").to_string(), "warn");
    });
  }

  #[test]
  #[serial]
  fn test_rust_log_takes_precedence() {
    temp_env::with_var("RUST_LOG", Some("error"), || {
      assert_eq!(build_filter("debug").to_string(), "error");
    });
  }
}
