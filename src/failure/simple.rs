//! The plain failure kind.

use super::{FailureKind, ERROR_CODE};
use crate::Metadata;

/// A failure described by a code, a message and optional metadata.
///
/// # Example
///
/// ```
/// use tributary::failure::{Failure, SimpleFailure};
/// use tributary::Metadata;
///
/// let failure: Failure = SimpleFailure::with_code("Validation", "email is required")
///     .with_metadata(Metadata::new().with("field", "email"))
///     .into();
///
/// assert_eq!(failure.code(), "Validation");
/// assert!(failure.metadata().unwrap().contains_key("FIELD"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFailure {
    code: String,
    message: String,
    metadata: Option<Metadata>,
}

impl SimpleFailure {
    /// Create a failure with the default `"Error"` code.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(ERROR_CODE, message)
    }

    /// Create a failure with an explicit code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        SimpleFailure {
            code: code.into(),
            message: message.into(),
            metadata: None,
        }
    }

    /// Attach failure-scoped metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl FailureKind for SimpleFailure {
    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}
