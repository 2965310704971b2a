//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init_with(&ObservabilityConfig::from_env());
}

/// Subscriber configuration and installation.
pub mod tracing;

pub use self::tracing::{LogFormat, ObservabilityConfig, ObservabilityError, init_with};
