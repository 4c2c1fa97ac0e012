//! Failures backed by native errors.

use std::error::Error as StdError;
use std::sync::Arc;

use super::{Failure, FailureKind, SharedError, EXCEPTION_CODE};
use crate::Metadata;

/// A failure wrapping exactly one native error.
///
/// The code is always `"Exception"`. The message defaults to the error's
/// `Display` output.
///
/// # Example
///
/// ```
/// use std::io;
/// use tributary::failure::{ExceptionalFailure, Failure};
///
/// let failure: Failure = ExceptionalFailure::new(io::Error::other("socket closed")).into();
/// assert_eq!(failure.code(), "Exception");
/// assert_eq!(failure.message(), "socket closed");
///
/// let exceptional = failure.downcast_ref::<ExceptionalFailure>().unwrap();
/// assert!(exceptional.downcast_ref::<io::Error>().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ExceptionalFailure {
    error: SharedError,
    message: String,
    metadata: Option<Metadata>,
}

impl ExceptionalFailure {
    /// Wrap `error`, using its `Display` output as the message.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_shared(Arc::new(error))
    }

    /// Wrap an already shared error.
    pub fn from_shared(error: SharedError) -> Self {
        let message = error.to_string();
        ExceptionalFailure {
            error,
            message,
            metadata: None,
        }
    }

    /// Wrap a boxed error, as produced by `?` on `Box<dyn Error>` results.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self::from_shared(Arc::from(error))
    }

    /// Override the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach failure-scoped metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The wrapped error.
    pub fn error(&self) -> &SharedError {
        &self.error
    }

    /// Downcast the wrapped error to `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }
}

impl FailureKind for ExceptionalFailure {
    fn code(&self) -> &str {
        EXCEPTION_CODE
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn exception(&self) -> Option<&SharedError> {
        Some(&self.error)
    }

    fn with_message(&self, message: String) -> Failure {
        self.clone().with_message(message).into()
    }
}
