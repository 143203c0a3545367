pub mod config;

/// Common utilities shared across the storefront workspace
///
/// This crate provides shared functionality used by the storefront
/// backend and its tests, including:
///
/// - Configuration loading
/// - Test value generators and helpers

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_email, generate_unique_id, test_config};
