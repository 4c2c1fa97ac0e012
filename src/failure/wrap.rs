//! Turning native errors into failures.

use std::error::Error as StdError;

use super::ExceptionalFailure;

/// Extension methods that wrap any native error as an [`ExceptionalFailure`].
///
/// # Example
///
/// ```
/// use std::io;
/// use tributary::failure::WrapError;
/// use tributary::Metadata;
///
/// let failure = io::Error::other("connection reset")
///     .wrap_and_prepend("loading profile")
///     .with_metadata(Metadata::new().with("user", 7));
///
/// assert_eq!(
///     tributary::failure::Failure::from(failure).message(),
///     "loading profile: connection reset"
/// );
/// ```
pub trait WrapError: StdError + Send + Sync + Sized + 'static {
    /// Wrap with the error's own message.
    fn wrap(self) -> ExceptionalFailure {
        ExceptionalFailure::new(self)
    }

    /// Wrap, replacing the message.
    fn wrap_with(self, message: impl Into<String>) -> ExceptionalFailure {
        ExceptionalFailure::new(self).with_message(message)
    }

    /// Wrap, prefixing the error's message with `context`.
    ///
    /// An empty context leaves the message as it is.
    fn wrap_and_prepend(self, context: &str) -> ExceptionalFailure {
        let message = self.to_string();
        self.wrap_and_prepend_with(context, message)
    }

    /// Wrap with `message` in place of the error's own, prefixed with `context`.
    ///
    /// ```
    /// use std::io;
    /// use tributary::failure::{FailureKind, WrapError};
    ///
    /// let failure = io::Error::other("eof").wrap_and_prepend_with("sync", "upload truncated");
    /// assert_eq!(failure.message(), "sync: upload truncated");
    /// ```
    fn wrap_and_prepend_with(self, context: &str, message: impl Into<String>) -> ExceptionalFailure {
        let message = message.into();
        let message = if context.is_empty() {
            message
        } else {
            format!("{}: {}", context, message)
        };
        ExceptionalFailure::new(self).with_message(message)
    }
}

impl<E> WrapError for E where E: StdError + Send + Sync + 'static {}
