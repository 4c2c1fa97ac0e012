//! Error values produced when a failure leaves the outcome channel.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// A shared native error, as held by an exceptional failure.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Canonical `std::error::Error` form of a [`Failure`](super::Failure).
///
/// Produced by [`Failure::to_error`](super::Failure::to_error),
/// [`Outcome::value_or_throw`](crate::Outcome::value_or_throw) and
/// [`Outcome::throw_if_failed`](crate::Outcome::throw_if_failed).
#[derive(Debug, Clone, Error)]
pub enum FailureError {
    /// A plain failure.
    #[error("{code}: {message}")]
    Failed {
        /// Category discriminator of the failure.
        code: String,
        /// Failure message.
        message: String,
    },

    /// Every member of an aggregate failure, in order.
    #[error("{message} ({} errors)", .errors.len())]
    Aggregate {
        /// Message of the aggregate.
        message: String,
        /// Converted members.
        errors: Vec<FailureError>,
    },

    /// The original error of an exceptional failure.
    #[error(transparent)]
    Exception(SharedError),
}

impl FailureError {
    /// The original native error, if this came from an exceptional failure.
    pub fn exception(&self) -> Option<&SharedError> {
        match self {
            FailureError::Exception(error) => Some(error),
            _ => None,
        }
    }

    /// Downcast the original native error to `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.exception().and_then(|error| error.downcast_ref::<E>())
    }
}

impl PartialEq for FailureError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                FailureError::Failed { code, message },
                FailureError::Failed {
                    code: other_code,
                    message: other_message,
                },
            ) => code == other_code && message == other_message,
            (
                FailureError::Aggregate { message, errors },
                FailureError::Aggregate {
                    message: other_message,
                    errors: other_errors,
                },
            ) => message == other_message && errors == other_errors,
            (FailureError::Exception(a), FailureError::Exception(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A panic caught at the [`Outcome::catch_panic`](crate::Outcome::catch_panic) boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("panicked: {message}")]
pub struct PanicError {
    /// The panic payload rendered as text.
    pub message: String,
}

impl PanicError {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        PanicError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("io went wrong")]
    struct IoLike;

    #[test]
    fn test_display() {
        let failed = FailureError::Failed {
            code: "Error".into(),
            message: "nope".into(),
        };
        assert_eq!(failed.to_string(), "Error: nope");

        let agg = FailureError::Aggregate {
            message: "two things".into(),
            errors: vec![failed.clone(), failed],
        };
        assert_eq!(agg.to_string(), "two things (2 errors)");
    }

    #[test]
    fn test_exception_is_transparent() {
        let err = FailureError::Exception(Arc::new(IoLike));
        assert_eq!(err.to_string(), "io went wrong");
        assert!(err.downcast_ref::<IoLike>().is_some());
    }

    #[test]
    fn test_exception_equality_is_identity() {
        let shared: SharedError = Arc::new(IoLike);
        let a = FailureError::Exception(Arc::clone(&shared));
        let b = FailureError::Exception(shared);
        let c = FailureError::Exception(Arc::new(IoLike));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = PanicError::from_payload(Box::new("static"));
        assert_eq!(from_str.message, "static");

        let from_string = PanicError::from_payload(Box::new(String::from("owned")));
        assert_eq!(from_string.message, "owned");

        let other = PanicError::from_payload(Box::new(42));
        assert_eq!(other.message, "non-string panic payload");
    }
}
