/// Shared Test Helpers for Cross-Crate Use
///
/// This module provides centralized test utilities used by the `storefront`
/// crate's unit and integration tests to avoid code duplication.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{BackendConfig, CommonConfig, Config, EmailConfig};

// Global counter for truly unique test identifiers across parallel tests
static GLOBAL_TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate globally unique test identifiers that won't conflict across parallel tests
///
/// # Arguments
/// * `prefix` - A string prefix to identify the test type (e.g., "ORDER", "TRK")
///
/// # Returns
/// A unique string in the format: "{prefix}-{timestamp}-{counter}"
pub fn generate_unique_id(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let counter = GLOBAL_TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", prefix, timestamp, counter)
}

/// Generate a unique customer email so parallel tests never share an identity.
pub fn generate_unique_email() -> String {
    let counter = GLOBAL_TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("customer-{}@example.com", counter)
}

/// A fully populated config suitable for tests that never touch the network
/// or a real database.
pub fn test_config() -> Config {
    Config {
        common: CommonConfig {
            project_name: "watchcraft-test".to_string(),
            database_url: "postgres://localhost/watchcraft_test".to_string(),
        },
        backend: BackendConfig {
            server_address: "127.0.0.1:0".to_string(),
            log_level: "debug".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
        },
        email: EmailConfig {
            send_timeout_ms: 250,
            ..EmailConfig::default()
        },
    }
}
