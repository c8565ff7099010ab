pub mod config;

/// Common utilities shared across the food ordering workspace
///
/// This crate provides functionality used by both the order service and the
/// order client:
///
/// - Environment driven configuration
/// - Shared test utilities, request builders and assertion macros

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, TestError, TestResult};
