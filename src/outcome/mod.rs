//! Success-or-failure outcomes with attached metadata
//!
//! [`Outcome<T>`] is the crate's result type. It is either a success holding a
//! `T` or a failure holding one [`Failure`], and in both states it carries a
//! [`Metadata`] bag. `Outcome<()>` (the default) is the value-less form.
//!
//! Every combinator consumes the outcome and returns a new one. Combinators
//! that derive a new outcome from an old one merge the old metadata underneath
//! whatever the new outcome attaches, unless [`MetadataPolicy::Discard`] is
//! requested.
//!
//! # Examples
//!
//! ```
//! use tributary::Outcome;
//!
//! fn parse(raw: &str) -> Outcome<i32> {
//!     raw.parse::<i32>()
//!         .map_err(|e| e.to_string())
//!         .into()
//! }
//!
//! let doubled = parse("21")
//!     .with_metadata("request", "r-1")
//!     .ensure(|n| *n > 0, |_| "must be positive")
//!     .map(|n| n * 2);
//!
//! assert_eq!(doubled.value(), Some(&42));
//! assert_eq!(doubled.metadata().get_as::<&str>("REQUEST"), Some(&"r-1"));
//!
//! let failed = parse("x").map(|n| n * 2);
//! assert!(failed.is_faulted());
//! ```
//!
//! # Inspecting state
//!
//! Use [`as_result`](Outcome::as_result) or [`fold`](Outcome::fold) to branch on
//! the state. [`error`](Outcome::error) returns `None` exactly when the outcome
//! succeeded, and [`value`](Outcome::value) returns `Some` exactly when it did.

mod asynchronous;
mod attempt;
mod combinators;
mod combine;
mod lookup;

pub(crate) use combine::Accumulator;

use std::collections::HashMap;
use std::fmt;

use crate::failure::{Failure, FailureError, FailureKind};
use crate::maybe::Maybe;
use crate::metadata::{Metadata, MetadataBuilder, MetadataValue};

/// How a combinator treats the metadata of the outcome it derives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataPolicy {
    /// Prior metadata is kept; entries attached by the new outcome win.
    #[default]
    Merge,
    /// Only the new outcome's metadata is kept.
    Discard,
}

/// Either a success value or a [`Failure`], plus side-channel [`Metadata`].
///
/// # Example
///
/// ```
/// use tributary::Outcome;
///
/// let ok: Outcome<i32> = Outcome::success(1);
/// let bad: Outcome<i32> = Outcome::failure("nope");
///
/// assert!(ok.is_success());
/// assert!(bad.is_faulted());
/// assert_eq!(bad.error().map(|e| e.message()), Some("nope"));
/// ```
#[derive(Clone)]
pub struct Outcome<T = ()> {
    state: Result<T, Failure>,
    metadata: Metadata,
}

impl Outcome<()> {
    /// A value-less success.
    #[inline]
    pub fn ok() -> Self {
        Outcome::success(())
    }
}

impl<T> Outcome<T> {
    // ========== Constructors ==========

    /// A successful outcome holding `value`.
    #[inline]
    pub fn success(value: T) -> Self {
        Outcome {
            state: Ok(value),
            metadata: Metadata::new(),
        }
    }

    /// A failed outcome.
    #[inline]
    pub fn failure(failure: impl Into<Failure>) -> Self {
        Outcome {
            state: Err(failure.into()),
            metadata: Metadata::new(),
        }
    }

    /// Build from a standard `Result`.
    pub fn from_result<E: Into<Failure>>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::success(value),
            Err(error) => Outcome::failure(error),
        }
    }

    /// `Some(v)` becomes a success, `None` a failure built from `failure`.
    pub fn from_maybe(maybe: Maybe<T>, failure: impl Into<Failure>) -> Self {
        maybe.to_outcome(failure)
    }

    pub(crate) fn from_parts(state: Result<T, Failure>, metadata: Metadata) -> Self {
        Outcome { state, metadata }
    }

    // ========== Predicates ==========

    /// Returns `true` on success.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.state.is_ok()
    }

    /// Returns `true` on failure.
    #[inline]
    pub fn is_faulted(&self) -> bool {
        !self.is_success()
    }

    // ========== Accessors ==========

    /// The success value, or `None` when faulted.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        self.state.as_ref().ok()
    }

    /// The failure, or `None` when successful.
    #[inline]
    pub fn error(&self) -> Option<&Failure> {
        self.state.as_ref().err()
    }

    /// The attached metadata. Empty unless something was attached.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Borrow the state as a standard `Result`.
    #[inline]
    pub fn as_result(&self) -> Result<&T, &Failure> {
        self.state.as_ref()
    }

    /// Convert to a standard `Result`, dropping metadata.
    #[inline]
    pub fn into_result(self) -> Result<T, Failure> {
        self.state
    }

    /// Split into state and metadata.
    #[inline]
    pub fn into_parts(self) -> (Result<T, Failure>, Metadata) {
        (self.state, self.metadata)
    }

    /// The success value, if any.
    #[inline]
    pub fn into_value(self) -> Option<T> {
        self.state.ok()
    }

    /// The failure, if any.
    #[inline]
    pub fn into_error(self) -> Option<Failure> {
        self.state.err()
    }

    /// Success becomes `Some`, failure becomes `None`.
    pub fn to_maybe(self) -> Maybe<T> {
        self.state.ok().into()
    }

    /// Exactly one branch runs.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let text = Outcome::success(3).fold(|n| n.to_string(), |e| e.message().to_string());
    /// assert_eq!(text, "3");
    /// ```
    pub fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Failure) -> R,
    ) -> R {
        match self.state {
            Ok(value) => on_success(value),
            Err(failure) => on_failure(failure),
        }
    }

    // ========== Metadata ==========

    /// A copy with one entry added or replaced.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl MetadataValue) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// A copy with every entry of a `HashMap` added.
    pub fn with_metadata_map<V: MetadataValue>(mut self, entries: HashMap<String, V>) -> Self {
        self.metadata.extend(entries);
        self
    }

    /// A copy with every pair added, in iteration order.
    pub fn with_metadata_entries<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: MetadataValue,
        I: IntoIterator<Item = (K, V)>,
    {
        self.metadata.extend(entries);
        self
    }

    /// A copy with `other` merged on top of the current metadata.
    pub fn merge_metadata(mut self, other: &Metadata) -> Self {
        self.metadata = self.metadata.merge(other);
        self
    }

    /// A copy whose metadata is rebuilt by `configure`, starting from the current entries.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::ok()
    ///     .with_metadata("a", 1)
    ///     .configure_metadata(|b| b.with("b", 2).without("a"));
    ///
    /// assert_eq!(outcome.metadata().keys().collect::<Vec<_>>(), vec!["b"]);
    /// ```
    pub fn configure_metadata(
        mut self,
        configure: impl FnOnce(MetadataBuilder) -> MetadataBuilder,
    ) -> Self {
        let builder = MetadataBuilder::from_metadata(std::mem::take(&mut self.metadata));
        self.metadata = configure(builder).build();
        self
    }

    /// A copy with no metadata.
    pub fn without_metadata(mut self) -> Self {
        self.metadata = Metadata::new();
        self
    }

    /// Replace this outcome's metadata with `prior` overridden by the current entries.
    pub(crate) fn inherit(mut self, prior: &Metadata, policy: MetadataPolicy) -> Self {
        if policy == MetadataPolicy::Merge {
            self.metadata = prior.merge(&self.metadata);
        }
        self
    }

    // ========== Conversions ==========

    /// Drop the value, keeping state and metadata.
    pub fn into_unit(self) -> Outcome<()> {
        Outcome {
            state: self.state.map(|_| ()),
            metadata: self.metadata,
        }
    }

    // ========== Unwrapping ==========

    /// The value, or `fallback` when faulted.
    pub fn value_or(self, fallback: T) -> T {
        self.state.unwrap_or(fallback)
    }

    /// The value, or `fallback(failure)` when faulted.
    pub fn value_or_else(self, fallback: impl FnOnce(Failure) -> T) -> T {
        self.state.unwrap_or_else(fallback)
    }

    /// The value, or `T::default()` when faulted.
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.state.unwrap_or_default()
    }

    /// The value, or the failure's canonical [`FailureError`].
    ///
    /// ```
    /// use tributary::failure::FailureError;
    /// use tributary::Outcome;
    ///
    /// let err = Outcome::<i32>::failure("broken").value_or_throw().unwrap_err();
    /// assert_eq!(err.to_string(), "Error: broken");
    /// ```
    pub fn value_or_throw(self) -> Result<T, FailureError> {
        self.state.map_err(|failure| failure.to_error())
    }

    /// The value, or the error built by `error`.
    pub fn value_or_throw_with<E>(self, error: impl FnOnce(Failure) -> E) -> Result<T, E> {
        self.state.map_err(error)
    }

    /// `Ok(self)` on success, the canonical [`FailureError`] otherwise.
    pub fn throw_if_failed(self) -> Result<Self, FailureError> {
        match &self.state {
            Ok(_) => Ok(self),
            Err(failure) => Err(failure.to_error()),
        }
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is faulted.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.state {
            Ok(value) => value,
            Err(failure) => panic!("called `Outcome::unwrap()` on a failure: {}", failure),
        }
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics with `msg` and the failure if the outcome is faulted.
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self.state {
            Ok(value) => value,
            Err(failure) => panic!("{}: {}", msg, failure),
        }
    }

    /// The failure.
    ///
    /// # Panics
    ///
    /// Panics if the outcome succeeded.
    #[track_caller]
    pub fn unwrap_err(self) -> Failure {
        match self.state {
            Ok(_) => panic!("called `Outcome::unwrap_err()` on a success"),
            Err(failure) => failure,
        }
    }
}

/// Types that can be turned into an [`Outcome`], used by
/// [`flatten`](Outcome::flatten).
pub trait IntoOutcome {
    /// Success type of the produced outcome.
    type Value;

    /// Perform the conversion.
    fn into_outcome(self) -> Outcome<Self::Value>;
}

impl<T> IntoOutcome for Outcome<T> {
    type Value = T;

    fn into_outcome(self) -> Outcome<T> {
        self
    }
}

impl<T, E: Into<Failure>> IntoOutcome for Result<T, E> {
    type Value = T;

    fn into_outcome(self) -> Outcome<T> {
        Outcome::from_result(self)
    }
}

impl<T> Default for Outcome<T>
where
    T: Default,
{
    fn default() -> Self {
        Outcome::success(T::default())
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Outcome::failure(failure)
    }
}

impl<T, K: FailureKind> From<K> for Outcome<T> {
    fn from(kind: K) -> Self {
        Outcome::failure(kind)
    }
}

impl<T, E: Into<Failure>> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        Outcome::from_result(result)
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = match &self.state {
            Ok(value) => {
                let mut out = f.debug_struct("Success");
                out.field("value", value);
                out
            }
            Err(failure) => {
                let mut out = f.debug_struct("Failure");
                out.field("error", failure);
                out
            }
        };
        if !self.metadata.is_empty() {
            out.field("metadata", &self.metadata);
        }
        out.finish()
    }
}

impl<T: PartialEq> PartialEq for Outcome<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.metadata == other.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::SimpleFailure;

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let ok = Outcome::success(1);
        assert!(ok.is_success());
        assert!(!ok.is_faulted());
        assert_eq!(ok.value(), Some(&1));
        assert!(ok.error().is_none());

        let bad = Outcome::<i32>::failure("x");
        assert!(bad.is_faulted());
        assert!(!bad.is_success());
        assert!(bad.value().is_none());
        assert_eq!(bad.error().map(Failure::message), Some("x"));
    }

    #[test]
    fn test_error_probe_is_none_on_success() {
        // `error()` answers "is there an error", not "did the probe succeed"
        assert!(Outcome::success(1).error().is_none());
        assert_eq!(
            Outcome::<i32>::failure("x").error().map(Failure::message),
            Some("x")
        );
    }

    #[test]
    fn test_metadata_defaults_to_empty() {
        assert!(Outcome::ok().metadata().is_empty());
        assert!(Outcome::<()>::failure("x").metadata().is_empty());
    }

    #[test]
    fn test_with_metadata_overloads() {
        let mut map = HashMap::new();
        map.insert("from_map".to_string(), 1);

        let outcome = Outcome::ok()
            .with_metadata("Single", "one")
            .with_metadata_map(map)
            .with_metadata_entries(vec![("pair", 2.5f64)])
            .merge_metadata(&Metadata::new().with("single", "override"))
            .configure_metadata(|b| b.with("built", true));

        let meta = outcome.metadata();
        assert_eq!(meta.len(), 4);
        assert_eq!(meta.get_as::<&str>("SINGLE"), Some(&"override"));
        assert_eq!(meta.get_as::<i32>("from_map"), Some(&1));
        assert_eq!(meta.get_as::<f64>("pair"), Some(&2.5));
        assert_eq!(meta.get_as::<bool>("built"), Some(&true));
    }

    #[test]
    fn test_with_metadata_returns_new_instance() {
        let original = Outcome::success(1).with_metadata("k", 1);
        let updated = original.clone().with_metadata("k", 2);

        assert_eq!(original.metadata().get_as::<i32>("k"), Some(&1));
        assert_eq!(updated.metadata().get_as::<i32>("k"), Some(&2));
    }

    #[test]
    fn test_into_unit_keeps_state_and_metadata() {
        let unit = Outcome::success(5).with_metadata("k", "v").into_unit();
        assert!(unit.is_success());
        assert_eq!(unit.metadata().get_as::<&str>("k"), Some(&"v"));

        let unit = Outcome::<i32>::failure("bad").into_unit();
        assert_eq!(unit.error().map(Failure::message), Some("bad"));
    }

    #[test]
    fn test_conversions() {
        let from_failure: Outcome<i32> = Failure::new("a").into();
        assert!(from_failure.is_faulted());

        let from_kind: Outcome<i32> = SimpleFailure::with_code("C", "b").into();
        assert_eq!(from_kind.error().map(Failure::code), Some("C"));

        let from_ok: Outcome<i32> = Ok::<_, String>(3).into();
        assert_eq!(from_ok.value(), Some(&3));

        let from_err: Outcome<i32> = Err::<i32, _>("c").into();
        assert_eq!(from_err.error().map(Failure::message), Some("c"));

        let back: Result<i32, Failure> = Outcome::success(4).into();
        assert_eq!(back, Ok(4));
    }

    #[test]
    fn test_fold_runs_one_branch() {
        assert_eq!(Outcome::success(2).fold(|v| v, |_| -1), 2);
        assert_eq!(Outcome::<i32>::failure("x").fold(|v| v, |_| -1), -1);
    }

    #[test]
    fn test_value_or_family() {
        assert_eq!(Outcome::success(1).value_or(0), 1);
        assert_eq!(Outcome::<i32>::failure("x").value_or(0), 0);
        assert_eq!(Outcome::<i32>::failure("x").value_or_default(), 0);
        assert_eq!(
            Outcome::<usize>::failure("four").value_or_else(|e| e.message().len()),
            4
        );
    }

    #[test]
    fn test_value_or_throw() {
        assert_eq!(Outcome::success(1).value_or_throw(), Ok(1));

        let err = Outcome::<i32>::failure(Failure::with_code("Timeout", "late"))
            .value_or_throw()
            .unwrap_err();
        assert_eq!(
            err,
            FailureError::Failed {
                code: "Timeout".into(),
                message: "late".into()
            }
        );

        let custom = Outcome::<i32>::failure("late").value_or_throw_with(|e| e.message().len());
        assert_eq!(custom, Err(4));
    }

    #[test]
    fn test_throw_if_failed() {
        assert!(Outcome::ok().throw_if_failed().is_ok());
        assert!(Outcome::<()>::failure("x").throw_if_failed().is_err());
    }

    #[test]
    #[should_panic(expected = "called `Outcome::unwrap()` on a failure: Error: boom")]
    fn test_unwrap_panics_on_failure() {
        Outcome::<i32>::failure("boom").unwrap();
    }

    #[test]
    fn test_equality_includes_metadata() {
        assert_eq!(Outcome::success(1), Outcome::success(1));
        assert_ne!(Outcome::success(1), Outcome::success(1).with_metadata("k", 1));
        assert_ne!(Outcome::success(1), Outcome::failure("x"));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Outcome::success(1)), "Success { value: 1 }");
        let with_meta = format!("{:?}", Outcome::success(1).with_metadata("k", 2));
        assert_eq!(with_meta, "Success { value: 1, metadata: {\"k\": 2} }");
    }

    #[test]
    fn test_to_maybe() {
        assert_eq!(Outcome::success(1).to_maybe(), Maybe::Some(1));
        assert_eq!(Outcome::<i32>::failure("x").to_maybe(), Maybe::None);
        assert!(Outcome::from_maybe(Maybe::<i32>::none(), "missing").is_faulted());
    }
}
