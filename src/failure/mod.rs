//! Failure taxonomy
//!
//! A failed [`Outcome`](crate::Outcome) holds exactly one [`Failure`]. A
//! `Failure` is a cheap, cloneable handle over some [`FailureKind`]:
//!
//! - [`SimpleFailure`] - a code, a message and optional metadata
//! - [`AggregateFailure`] - an ordered, non-empty list of failures, itself a failure
//! - [`ExceptionalFailure`] - wraps a native `std::error::Error`
//!
//! Applications add their own kinds by implementing [`FailureKind`] and can find
//! them again with [`Failure::downcast_ref`] or
//! [`Outcome::get_error`](crate::Outcome::get_error).
//!
//! # Examples
//!
//! ```
//! use tributary::failure::{AggregateFailure, Failure};
//!
//! let single = Failure::new("disk full");
//! assert_eq!(single.code(), "Error");
//! assert_eq!(single.message(), "disk full");
//!
//! let both = Failure::from(AggregateFailure::new(single, ["quota exceeded".into()]));
//! assert_eq!(both.errors().count(), 2);
//! ```

mod aggregate;
mod error;
mod exceptional;
mod simple;
mod wrap;

pub use aggregate::AggregateFailure;
pub use error::{FailureError, PanicError, SharedError};
pub use exceptional::ExceptionalFailure;
pub use simple::SimpleFailure;
pub use wrap::WrapError;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Metadata;

/// Discriminator used by [`SimpleFailure`] unless another code is given.
pub const ERROR_CODE: &str = "Error";
/// Discriminator of every [`ExceptionalFailure`].
pub const EXCEPTION_CODE: &str = "Exception";
/// Discriminator of every [`AggregateFailure`].
pub const AGGREGATE_CODE: &str = "Aggregate";

/// Behaviour shared by every kind of failure.
///
/// Implement this for application-specific failures:
///
/// ```
/// use tributary::failure::{Failure, FailureKind};
///
/// #[derive(Debug)]
/// struct NotFound {
///     message: String,
/// }
///
/// impl FailureKind for NotFound {
///     fn code(&self) -> &str {
///         "NotFound"
///     }
///
///     fn message(&self) -> &str {
///         &self.message
///     }
/// }
///
/// let failure = Failure::from(NotFound { message: "no user 7".into() });
/// assert_eq!(failure.code(), "NotFound");
/// assert!(failure.downcast_ref::<NotFound>().is_some());
/// ```
pub trait FailureKind: Any + fmt::Debug + Send + Sync {
    /// Category discriminator such as `"Error"` or `"Exception"`.
    fn code(&self) -> &str;

    /// Human readable description.
    fn message(&self) -> &str;

    /// Metadata scoped to the failure itself.
    fn metadata(&self) -> Option<&Metadata> {
        None
    }

    /// Directly contained failures. Empty for everything but aggregates.
    fn reasons(&self) -> &[Failure] {
        &[]
    }

    /// The native error backing this failure, if any.
    fn exception(&self) -> Option<&SharedError> {
        None
    }

    /// A copy of this failure carrying `message` instead of the current one.
    ///
    /// The default produces a [`SimpleFailure`] with the same code and metadata.
    fn with_message(&self, message: String) -> Failure {
        let simple = SimpleFailure::with_code(self.code(), message);
        match self.metadata() {
            Some(meta) => simple.with_metadata(meta.clone()).into(),
            None => simple.into(),
        }
    }
}

/// Shared handle to a failure of any kind.
///
/// Cloning is cheap; the underlying failure is immutable and reference counted.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<dyn FailureKind>,
}

impl Failure {
    /// A [`SimpleFailure`] with the default `"Error"` code.
    pub fn new(message: impl Into<String>) -> Self {
        SimpleFailure::new(message).into()
    }

    /// A [`SimpleFailure`] with an explicit code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        SimpleFailure::with_code(code, message).into()
    }

    /// Wrap a native error as an [`ExceptionalFailure`].
    pub fn exception<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ExceptionalFailure::new(error).into()
    }

    /// Combine failures in order into an [`AggregateFailure`].
    ///
    /// Returns `None` when `errors` is empty.
    pub fn aggregate(errors: impl IntoIterator<Item = Failure>) -> Option<Self> {
        AggregateFailure::from_vec(errors.into_iter().collect()).map(Into::into)
    }

    /// Category discriminator.
    pub fn code(&self) -> &str {
        self.inner.code()
    }

    /// Human readable description.
    pub fn message(&self) -> &str {
        self.inner.message()
    }

    /// Metadata scoped to this failure.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.inner.metadata()
    }

    /// The wrapped native error for exceptional failures.
    pub fn exception_ref(&self) -> Option<&SharedError> {
        self.inner.exception()
    }

    /// Borrow the underlying kind.
    pub fn kind(&self) -> &dyn FailureKind {
        &*self.inner
    }

    /// Returns true if the underlying kind is `K`.
    pub fn is<K: FailureKind>(&self) -> bool {
        self.downcast_ref::<K>().is_some()
    }

    /// Borrow the underlying kind as `K`.
    pub fn downcast_ref<K: FailureKind>(&self) -> Option<&K> {
        let any: &dyn Any = &*self.inner;
        any.downcast_ref::<K>()
    }

    /// Borrow as an aggregate if this is one.
    pub fn as_aggregate(&self) -> Option<&AggregateFailure> {
        self.downcast_ref::<AggregateFailure>()
    }

    /// Returns true if this failure is an [`AggregateFailure`].
    pub fn is_aggregate(&self) -> bool {
        self.is::<AggregateFailure>()
    }

    /// The reasons this failure stands for.
    ///
    /// An aggregate yields its direct members; any other failure yields itself.
    ///
    /// ```
    /// use tributary::failure::Failure;
    ///
    /// let one = Failure::new("a");
    /// assert_eq!(one.errors().count(), 1);
    ///
    /// let many = Failure::aggregate([Failure::new("a"), Failure::new("b")]).unwrap();
    /// let messages: Vec<_> = many.errors().map(|e| e.message()).collect();
    /// assert_eq!(messages, vec!["a", "b"]);
    /// ```
    pub fn errors(&self) -> impl Iterator<Item = &Failure> {
        let reasons = self.inner.reasons();
        let own = if reasons.is_empty() { Some(self) } else { None };
        own.into_iter().chain(reasons.iter())
    }

    /// Find the first failure of kind `K`.
    ///
    /// Checks this failure, then the direct members of an aggregate. Nested
    /// aggregates are not searched.
    pub fn find<K: FailureKind>(&self) -> Option<&K> {
        self.downcast_ref::<K>().or_else(|| {
            self.inner
                .reasons()
                .iter()
                .find_map(|member| member.downcast_ref::<K>())
        })
    }

    /// Same failure kind with `text` added after the message.
    pub fn append(&self, text: &str) -> Failure {
        if text.is_empty() {
            return self.clone();
        }
        self.inner.with_message(format!("{}{}", self.message(), text))
    }

    /// Same failure kind with `text` added before the message.
    pub fn prepend(&self, text: &str) -> Failure {
        if text.is_empty() {
            return self.clone();
        }
        self.inner.with_message(format!("{}{}", text, self.message()))
    }

    /// The canonical error value for this failure.
    ///
    /// Exceptional failures give back their original error, aggregates list
    /// every member, everything else becomes [`FailureError::Failed`].
    pub fn to_error(&self) -> FailureError {
        if let Some(error) = self.exception_ref() {
            return FailureError::Exception(Arc::clone(error));
        }
        let reasons = self.inner.reasons();
        if reasons.is_empty() {
            FailureError::Failed {
                code: self.code().to_string(),
                message: self.message().to_string(),
            }
        } else {
            FailureError::Aggregate {
                message: self.message().to_string(),
                errors: reasons.iter().map(Failure::to_error).collect(),
            }
        }
    }

    /// Returns true if both handles point at the same failure.
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: FailureKind> From<K> for Failure {
    fn from(kind: K) -> Self {
        Failure {
            inner: Arc::new(kind),
        }
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::new(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::new(message)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.exception_ref() {
            Some(error) => Some(&**error),
            None => None,
        }
    }
}

/// Failures are equal when they are the same handle, or share code, message
/// and (for aggregates) equal members.
impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || self.code() == other.code()
                && self.message() == other.message()
                && self.inner.reasons() == other.inner.reasons()
    }
}
