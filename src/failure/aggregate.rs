//! Ordered collections of failures.

use super::{Failure, FailureKind, AGGREGATE_CODE};
use crate::Metadata;

/// An ordered, non-empty list of failures that is itself a failure.
///
/// Member order is the order the producing combinator met the failures in:
/// encounter order for [`Outcome::combine`](crate::Outcome::combine),
/// original-then-rollback for [`Outcome::compensate`](crate::Outcome::compensate).
///
/// Members may themselves be aggregates. Lookups such as
/// [`Failure::find`] only inspect direct members.
///
/// # Example
///
/// ```
/// use tributary::failure::{AggregateFailure, Failure};
///
/// let agg = AggregateFailure::new(Failure::new("first"), [Failure::new("second")]);
/// assert_eq!(agg.len(), 2);
/// assert_eq!(agg.message(), "first; second");
/// assert_eq!(agg.head().message(), "first");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFailure {
    errors: Vec<Failure>,
    message: String,
    metadata: Option<Metadata>,
}

impl AggregateFailure {
    /// Create an aggregate from a first failure and any number of others.
    pub fn new(head: Failure, tail: impl IntoIterator<Item = Failure>) -> Self {
        let mut errors = vec![head];
        errors.extend(tail);
        Self::from_members(errors)
    }

    /// Create an aggregate from a `Vec`.
    ///
    /// Returns `None` if the vector is empty.
    pub fn from_vec(errors: Vec<Failure>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self::from_members(errors))
        }
    }

    // Callers guarantee `errors` is non-empty.
    fn from_members(errors: Vec<Failure>) -> Self {
        debug_assert!(!errors.is_empty());
        let message = errors
            .iter()
            .map(Failure::message)
            .collect::<Vec<_>>()
            .join("; ");
        AggregateFailure {
            errors,
            message,
            metadata: None,
        }
    }

    /// Replace the generated message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach failure-scoped metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The members, in order.
    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    /// The first member.
    pub fn head(&self) -> &Failure {
        // `new` always supplies a head and `from_vec` rejects an empty vector.
        &self.errors[0]
    }

    /// Number of direct members. Always at least 1.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The aggregate's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume and return the members.
    pub fn into_errors(self) -> Vec<Failure> {
        self.errors
    }
}

impl FailureKind for AggregateFailure {
    fn code(&self) -> &str {
        AGGREGATE_CODE
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn reasons(&self) -> &[Failure] {
        &self.errors
    }

    fn with_message(&self, message: String) -> Failure {
        self.clone().with_message(message).into()
    }
}

impl<'a> IntoIterator for &'a AggregateFailure {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
