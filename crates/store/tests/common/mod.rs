//! Shared setup for the store integration tests.

use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a fmt subscriber once per test binary so failing tests
/// carry the service logs. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .init();
    });
}
