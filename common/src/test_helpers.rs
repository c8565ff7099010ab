/// Shared Test Helpers for Cross-Crate Use
///
/// This module provides centralized test utilities used by the `orders`
/// crate's unit and integration tests to avoid code duplication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

// Global counter for unique test identifiers across parallel tests
static GLOBAL_TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate globally unique test identifiers that won't conflict across parallel tests
///
/// # Arguments
/// * `prefix` - A string prefix to identify the test type (e.g., "CREATE", "DELETE")
///
/// # Returns
/// A unique string in the format: "{prefix}-{timestamp}-{counter}"
pub fn generate_unique_id(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let counter = GLOBAL_TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", prefix, timestamp, counter)
}

// =============================================================================
// FIXTURES
// =============================================================================

/// Smallest byte sequence that starts and ends like a JPEG file.
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0xFF, 0xD9,
];

/// PNG signature followed by an empty IEND chunk.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

// =============================================================================
// UNIFIED TEST ERROR HANDLING
// =============================================================================

/// Unified error type for all test failures
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("Assertion failed: {message}")]
    AssertionFailure { message: String },

    #[error("Serialization error: {source}")]
    SerializationError { #[from] source: serde_json::Error },

    #[error("HTTP error: {source}")]
    HttpError { #[from] source: http::Error },

    #[error("IO error: {source}")]
    IoError { #[from] source: std::io::Error },

    #[error("Generic test error: {message}")]
    Generic { message: String },
}

impl TestError {
    /// Create an assertion failure error
    pub fn assertion_failure(message: impl Into<String>) -> Self {
        Self::AssertionFailure { message: message.into() }
    }

    /// Create a generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic { message: message.into() }
    }
}

/// Alias for the standard test result type
pub type TestResult<T = ()> = Result<T, TestError>;

/// Helper macro for test assertions that return TestError instead of panicking
#[macro_export]
macro_rules! test_assert {
    ($condition:expr) => {
        if !($condition) {
            return Err($crate::test_helpers::TestError::assertion_failure(
                format!("assertion failed: {}", stringify!($condition))
            ));
        }
    };
    ($condition:expr, $message:expr $(, $arg:expr)*) => {
        if !($condition) {
            return Err($crate::test_helpers::TestError::assertion_failure(
                format!($message $(, $arg)*)
            ));
        }
    };
}

/// Helper macro for test assertions with equality
#[macro_export]
macro_rules! test_assert_eq {
    ($left:expr, $right:expr) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    return Err($crate::test_helpers::TestError::assertion_failure(
                        format!("assertion failed: `(left == right)`\n  left: `{:?}`,\n right: `{:?}`",
                                left_val, right_val)
                    ));
                }
            }
        }
    };
    ($left:expr, $right:expr, $message:expr $(, $arg:expr)*) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    return Err($crate::test_helpers::TestError::assertion_failure(
                        format!($message $(, $arg)*)
                    ));
                }
            }
        }
    };
}

/// Utility functions for common test operations
pub mod test_utils {
    use super::*;

    /// Safe HTTP request builder that returns TestError
    pub fn build_request(method: &str, uri: &str, body: Option<String>) -> TestResult<http::Request<String>> {
        let mut builder = http::Request::builder()
            .uri(uri)
            .method(method);

        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        let request = builder
            .body(body.unwrap_or_default())
            .map_err(TestError::from)?;

        Ok(request)
    }

    /// Safe response status check
    pub fn check_status_code(actual: http::StatusCode, expected: http::StatusCode) -> TestResult<()> {
        if actual != expected {
            return Err(TestError::assertion_failure(
                format!("Status code mismatch: expected {}, got {}", expected, actual)
            ));
        }
        Ok(())
    }
}

/// Hand-rolled `multipart/form-data` bodies for router tests.
pub mod multipart {
    use super::*;

    enum Part {
        Text { name: String, value: String },
        File { name: String, file_name: String, content_type: String, bytes: Vec<u8> },
    }

    pub struct MultipartBuilder {
        boundary: String,
        parts: Vec<Part>,
    }

    impl Default for MultipartBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MultipartBuilder {
        pub fn new() -> Self {
            Self {
                boundary: generate_unique_id("boundary"),
                parts: Vec::new(),
            }
        }

        pub fn text(mut self, name: &str, value: &str) -> Self {
            self.parts.push(Part::Text {
                name: name.to_string(),
                value: value.to_string(),
            });
            self
        }

        pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
            self.parts.push(Part::File {
                name: name.to_string(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes: bytes.to_vec(),
            });
            self
        }

        pub fn content_type(&self) -> String {
            format!("multipart/form-data; boundary={}", self.boundary)
        }

        pub fn body(&self) -> Vec<u8> {
            let mut body = Vec::new();
            for part in &self.parts {
                body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
                match part {
                    Part::Text { name, value } => {
                        body.extend_from_slice(
                            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                        );
                        body.extend_from_slice(value.as_bytes());
                    }
                    Part::File { name, file_name, content_type, bytes } => {
                        body.extend_from_slice(
                            format!(
                                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                                 Content-Type: {content_type}\r\n\r\n"
                            )
                            .as_bytes(),
                        );
                        body.extend_from_slice(bytes);
                    }
                }
                body.extend_from_slice(b"\r\n");
            }
            body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
            body
        }

        /// Build a request carrying this form
        pub fn into_request(self, method: &str, uri: &str) -> TestResult<http::Request<Vec<u8>>> {
            let request = http::Request::builder()
                .uri(uri)
                .method(method)
                .header("Content-Type", self.content_type())
                .body(self.body())?;
            Ok(request)
        }
    }

}
