//! The synchronous combinator algebra.
//!
//! Every combinator here either passes the current failure through untouched
//! (same failure, same metadata) or replaces it by a fixed rule. Callbacks for
//! the branch that is not taken never run.

use super::{IntoOutcome, MetadataPolicy, Outcome};
use crate::failure::{AggregateFailure, Failure};

impl<T> Outcome<T> {
    /// Transform the success value.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::success(1).with_metadata("k", "v").map(|x| x + 1);
    /// assert_eq!(outcome.value(), Some(&2));
    /// assert_eq!(outcome.metadata().get_as::<&str>("k"), Some(&"v"));
    /// ```
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome::from_parts(self.state.map(f), self.metadata)
    }

    /// Transform the failure.
    #[inline]
    pub fn map_failure(self, f: impl FnOnce(Failure) -> Failure) -> Self {
        Outcome::from_parts(self.state.map_err(f), self.metadata)
    }

    /// Chain an operation that may fail, merging metadata.
    ///
    /// On success `f` runs and its outcome is returned with this outcome's
    /// metadata merged underneath. On failure `f` never runs.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::success(4)
    ///     .with_metadata("trace", "t-9")
    ///     .bind(|n| Outcome::success(n / 2).with_metadata("step", "halve"));
    ///
    /// assert_eq!(outcome.value(), Some(&2));
    /// assert!(outcome.metadata().contains_key("trace"));
    /// assert!(outcome.metadata().contains_key("step"));
    /// ```
    pub fn bind<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        self.bind_with(MetadataPolicy::Merge, f)
    }

    /// [`bind`](Self::bind) with an explicit [`MetadataPolicy`].
    pub fn bind_with<U>(
        self,
        policy: MetadataPolicy,
        f: impl FnOnce(T) -> Outcome<U>,
    ) -> Outcome<U> {
        match self.state {
            Ok(value) => f(value).inherit(&self.metadata, policy),
            Err(failure) => Outcome::from_parts(Err(failure), self.metadata),
        }
    }

    /// Run a side validation, keeping the original value.
    ///
    /// On success `f` inspects the value. If `f` fails that failure is returned;
    /// if it succeeds the original value is kept and `f`'s value is dropped.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let checked = Outcome::success("alice").then(|name| {
    ///     if name.is_empty() {
    ///         Outcome::failure("empty name")
    ///     } else {
    ///         Outcome::ok()
    ///     }
    /// });
    /// assert_eq!(checked.value(), Some(&"alice"));
    /// ```
    pub fn then<U>(self, f: impl FnOnce(&T) -> Outcome<U>) -> Self {
        self.then_with(MetadataPolicy::Merge, f)
    }

    /// [`then`](Self::then) with an explicit [`MetadataPolicy`].
    ///
    /// A passing check always keeps the original metadata, merged with the
    /// check's. The policy only decides whether a failing check carries the
    /// original metadata.
    pub fn then_with<U>(self, policy: MetadataPolicy, f: impl FnOnce(&T) -> Outcome<U>) -> Self {
        match self.state {
            Ok(value) => {
                let check = f(&value);
                match check.state {
                    Ok(_) => Outcome::from_parts(Ok(value), self.metadata.merge(&check.metadata)),
                    Err(failure) => Outcome::from_parts(Err(failure), check.metadata)
                        .inherit(&self.metadata, policy),
                }
            }
            Err(failure) => Outcome::from_parts(Err(failure), self.metadata),
        }
    }

    /// Run `f` on the success value.
    pub fn tap(self, f: impl FnOnce(&T)) -> Self {
        if let Ok(value) = &self.state {
            f(value);
        }
        self
    }

    /// Run `f` on the success value when `predicate` holds for it.
    pub fn tap_if(self, predicate: impl FnOnce(&T) -> bool, f: impl FnOnce(&T)) -> Self {
        if let Ok(value) = &self.state {
            if predicate(value) {
                f(value);
            }
        }
        self
    }

    /// Run `f` on the failure.
    pub fn tap_error(self, f: impl FnOnce(&Failure)) -> Self {
        if let Err(failure) = &self.state {
            f(failure);
        }
        self
    }

    /// Run `f` on the failure when `predicate` holds for it.
    pub fn tap_error_if(
        self,
        predicate: impl FnOnce(&Failure) -> bool,
        f: impl FnOnce(&Failure),
    ) -> Self {
        if let Err(failure) = &self.state {
            if predicate(failure) {
                f(failure);
            }
        }
        self
    }

    /// Run exactly one of the two hooks.
    pub fn tap_both(self, on_success: impl FnOnce(&T), on_failure: impl FnOnce(&Failure)) -> Self {
        match &self.state {
            Ok(value) => on_success(value),
            Err(failure) => on_failure(failure),
        }
        self
    }

    /// Fail with `error(&value)` unless `predicate` holds.
    ///
    /// Metadata is kept either way. A prior failure passes through and the
    /// predicate is not evaluated.
    pub fn ensure<F>(self, predicate: impl FnOnce(&T) -> bool, error: impl FnOnce(&T) -> F) -> Self
    where
        F: Into<Failure>,
    {
        match self.state {
            Ok(value) => {
                if predicate(&value) {
                    Outcome::from_parts(Ok(value), self.metadata)
                } else {
                    let failure = error(&value).into();
                    Outcome::from_parts(Err(failure), self.metadata)
                }
            }
            Err(failure) => Outcome::from_parts(Err(failure), self.metadata),
        }
    }

    /// Turn a failure into a success with the value produced by `f`.
    ///
    /// The original failure is discarded; metadata is kept.
    pub fn recover(self, f: impl FnOnce(Failure) -> T) -> Self {
        Outcome::from_parts(Ok(self.state.unwrap_or_else(f)), self.metadata)
    }

    /// Turn a failure into a success holding `value`.
    pub fn recover_value(self, value: T) -> Self {
        Outcome::from_parts(Ok(self.state.unwrap_or(value)), self.metadata)
    }

    /// Replace a failure with the outcome produced by `f`, merging metadata.
    pub fn or_else(self, f: impl FnOnce(Failure) -> Outcome<T>) -> Self {
        match self.state {
            Ok(value) => Outcome::from_parts(Ok(value), self.metadata),
            Err(failure) => f(failure).inherit(&self.metadata, MetadataPolicy::Merge),
        }
    }

    /// Run a rollback for a failure without erasing it.
    ///
    /// Successes pass through and `rollback` never runs. For a failure,
    /// `rollback` runs with it; if the rollback succeeds the original failure is
    /// returned unchanged, and if it fails the result is an
    /// [`AggregateFailure`] of the original followed by the rollback failure.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let kept = Outcome::<()>::failure("E1").compensate(|_| Outcome::ok());
    /// assert_eq!(kept.error().map(|e| e.message()), Some("E1"));
    ///
    /// let both = Outcome::<()>::failure("E1").compensate(|_| Outcome::<()>::failure("E2"));
    /// let messages: Vec<_> = both.errors().map(|e| e.message()).collect();
    /// assert_eq!(messages, vec!["E1", "E2"]);
    /// ```
    pub fn compensate<U>(self, rollback: impl FnOnce(&Failure) -> Outcome<U>) -> Self {
        let original = match self.state {
            Ok(value) => return Outcome::from_parts(Ok(value), self.metadata),
            Err(failure) => failure,
        };
        let undo = rollback(&original);
        match undo.state {
            Ok(_) => Outcome::from_parts(Err(original), self.metadata),
            Err(rollback_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    original = %original,
                    rollback = %rollback_error,
                    "compensation failed"
                );
                let metadata = self.metadata.merge(&undo.metadata);
                let aggregate = AggregateFailure::new(original, [rollback_error]);
                Outcome::from_parts(Err(aggregate.into()), metadata)
            }
        }
    }

    /// Replace the success value, keeping metadata.
    pub fn with_value<U>(self, value: U) -> Outcome<U> {
        self.map(|_| value)
    }

    /// Add `text` after the failure message. No-op on success or empty text.
    pub fn append_error(self, text: &str) -> Self {
        self.map_failure(|failure| failure.append(text))
    }

    /// Add `text` before the failure message. No-op on success or empty text.
    pub fn prepend_error(self, text: &str) -> Self {
        self.map_failure(|failure| failure.prepend(text))
    }

    /// Emit a `tracing` warning when faulted, passing the outcome through.
    #[cfg(feature = "tracing")]
    pub fn trace_failure(self, context: &str) -> Self {
        if let Err(failure) = &self.state {
            tracing::warn!(
                code = failure.code(),
                message = failure.message(),
                metadata = %self.metadata,
                "{}",
                context
            );
        }
        self
    }
}

impl<T: IntoOutcome> Outcome<T> {
    /// Unwrap one level of nesting.
    ///
    /// An outer failure is returned as is. An outer success yields the inner
    /// outcome with the outer metadata merged underneath.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let nested = Outcome::success(Outcome::success(1).with_metadata("inner", 1))
    ///     .with_metadata("outer", 2);
    /// let flat = nested.flatten();
    ///
    /// assert_eq!(flat.value(), Some(&1));
    /// assert_eq!(flat.metadata().len(), 2);
    /// ```
    pub fn flatten(self) -> Outcome<T::Value> {
        self.flatten_with(MetadataPolicy::Merge)
    }

    /// [`flatten`](Self::flatten) with an explicit [`MetadataPolicy`].
    pub fn flatten_with(self, policy: MetadataPolicy) -> Outcome<T::Value> {
        self.bind_with(policy, IntoOutcome::into_outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::SimpleFailure;
    use std::cell::Cell;

    fn traced<T>(outcome: Outcome<T>) -> Outcome<T> {
        outcome.with_metadata("trace", "t-1")
    }

    #[test]
    fn test_map_skips_failure() {
        let calls = Cell::new(0);
        let failure = Failure::new("x");
        let outcome = traced(Outcome::<i32>::failure(failure.clone())).map(|v| {
            calls.set(calls.get() + 1);
            v + 1
        });

        assert_eq!(calls.get(), 0);
        assert!(outcome.error().unwrap().ptr_eq(&failure));
        assert!(outcome.metadata().contains_key("trace"));
    }

    #[test]
    fn test_bind_merges_caller_metadata() {
        let outcome = traced(Outcome::success(1))
            .with_metadata("shared", "outer")
            .bind(|v| Outcome::success(v + 1).with_metadata("shared", "inner"));

        assert_eq!(outcome.value(), Some(&2));
        assert_eq!(outcome.metadata().get_as::<&str>("trace"), Some(&"t-1"));
        assert_eq!(outcome.metadata().get_as::<&str>("shared"), Some(&"inner"));
    }

    #[test]
    fn test_bind_discard_policy() {
        let outcome = traced(Outcome::success(1))
            .bind_with(MetadataPolicy::Discard, |v| Outcome::success(v).with_metadata("own", 1));
        assert!(!outcome.metadata().contains_key("trace"));
        assert!(outcome.metadata().contains_key("own"));
    }

    #[test]
    fn test_bind_failure_from_f_keeps_caller_metadata() {
        let outcome = traced(Outcome::success(1)).bind(|_| Outcome::<i32>::failure("inner"));
        assert_eq!(outcome.error().map(Failure::message), Some("inner"));
        assert!(outcome.metadata().contains_key("trace"));
    }

    #[test]
    fn test_then_keeps_original_value() {
        let outcome = Outcome::success(10).then(|v| Outcome::success(v * 100));
        assert_eq!(outcome.value(), Some(&10));
    }

    #[test]
    fn test_then_propagates_check_failure_with_metadata() {
        let outcome = traced(Outcome::success(10)).then(|_| Outcome::<()>::failure("rejected"));
        assert_eq!(outcome.error().map(Failure::message), Some("rejected"));
        assert!(outcome.metadata().contains_key("trace"));

        let discarded = traced(Outcome::success(10))
            .then_with(MetadataPolicy::Discard, |_| Outcome::<()>::failure("rejected"));
        assert!(discarded.metadata().is_empty());
    }

    #[test]
    fn test_then_with_discard_keeps_metadata_on_pass() {
        let outcome = traced(Outcome::success(10)).then_with(MetadataPolicy::Discard, |_| {
            Outcome::ok().with_metadata("checked", true)
        });
        assert_eq!(outcome.value(), Some(&10));
        assert_eq!(outcome.metadata().get_as::<&str>("trace"), Some(&"t-1"));
        assert!(outcome.metadata().contains_key("checked"));
    }

    #[test]
    fn test_then_skips_on_failure() {
        let outcome = Outcome::<i32>::failure("x").then(|_| -> Outcome<()> {
            panic!("then must not run on failure")
        });
        assert!(outcome.is_faulted());
    }

    #[test]
    fn test_taps_only_fire_on_matching_branch() {
        let success_hits = Cell::new(0);
        let failure_hits = Cell::new(0);

        let ok = Outcome::success(3)
            .tap(|_| success_hits.set(success_hits.get() + 1))
            .tap_if(|v| *v > 5, |_| success_hits.set(success_hits.get() + 100))
            .tap_if(|v| *v < 5, |_| success_hits.set(success_hits.get() + 10))
            .tap_error(|_| failure_hits.set(failure_hits.get() + 1))
            .tap_both(
                |_| success_hits.set(success_hits.get() + 1000),
                |_| failure_hits.set(failure_hits.get() + 1000),
            );
        assert_eq!(ok.value(), Some(&3));
        assert_eq!(success_hits.get(), 1011);
        assert_eq!(failure_hits.get(), 0);

        let bad = Outcome::<i32>::failure("x")
            .tap(|_| success_hits.set(0))
            .tap_error_if(|e| e.message() == "x", |_| failure_hits.set(failure_hits.get() + 1))
            .tap_error_if(|e| e.message() == "y", |_| failure_hits.set(failure_hits.get() + 10));
        assert!(bad.is_faulted());
        assert_eq!(success_hits.get(), 1011);
        assert_eq!(failure_hits.get(), 1);
    }

    #[test]
    fn test_ensure() {
        let passed = traced(Outcome::success(5)).ensure(|v| *v > 0, |_| "negative");
        assert_eq!(passed.value(), Some(&5));

        let failed = traced(Outcome::success(-5)).ensure(|v| *v > 0, |v| format!("{} is negative", v));
        assert_eq!(failed.error().map(Failure::message), Some("-5 is negative"));
        assert!(failed.metadata().contains_key("trace"));

        let prior = Outcome::<i32>::failure("prior")
            .ensure(|_| panic!("predicate must not run"), |_| "other");
        assert_eq!(prior.error().map(Failure::message), Some("prior"));
    }

    #[test]
    fn test_recover() {
        let recovered = traced(Outcome::<usize>::failure("four")).recover(|e| e.message().len());
        assert_eq!(recovered.value(), Some(&4));
        assert!(recovered.metadata().contains_key("trace"));

        let untouched = Outcome::success(1).recover(|_| panic!("must not run"));
        assert_eq!(untouched.value(), Some(&1));

        assert_eq!(Outcome::<i32>::failure("x").recover_value(9).value(), Some(&9));
    }

    #[test]
    fn test_or_else() {
        let replaced = traced(Outcome::<i32>::failure("x"))
            .or_else(|_| Outcome::success(2).with_metadata("fallback", true));
        assert_eq!(replaced.value(), Some(&2));
        assert!(replaced.metadata().contains_key("trace"));
        assert!(replaced.metadata().contains_key("fallback"));
    }

    #[test]
    fn test_compensate_success_never_rolls_back() {
        let outcome = Outcome::success(1).compensate(|_| -> Outcome<()> {
            panic!("rollback must not run")
        });
        assert_eq!(outcome.value(), Some(&1));
    }

    #[test]
    fn test_compensate_returns_original_when_rollback_succeeds() {
        let original = Failure::new("E1");
        let seen = Cell::new(false);
        let outcome = traced(Outcome::<()>::failure(original.clone())).compensate(|e| {
            seen.set(e.ptr_eq(&original));
            Outcome::ok().with_metadata("rolled_back", true)
        });

        assert!(seen.get());
        assert!(outcome.error().unwrap().ptr_eq(&original));
        assert!(!outcome.metadata().contains_key("rolled_back"));
        assert!(outcome.metadata().contains_key("trace"));
    }

    #[test]
    fn test_compensate_aggregates_rollback_failure() {
        let outcome = traced(Outcome::<()>::failure("E1"))
            .compensate(|_| Outcome::<()>::failure("E2").with_metadata("rollback", 1));

        let aggregate = outcome.error().and_then(Failure::as_aggregate).unwrap();
        let messages: Vec<_> = aggregate.errors().iter().map(Failure::message).collect();
        assert_eq!(messages, vec!["E1", "E2"]);
        assert!(outcome.metadata().contains_key("trace"));
        assert!(outcome.metadata().contains_key("rollback"));
    }

    #[test]
    fn test_with_value() {
        let outcome = traced(Outcome::success(1)).with_value("replaced");
        assert_eq!(outcome.value(), Some(&"replaced"));
        assert!(outcome.metadata().contains_key("trace"));
        assert!(Outcome::<i32>::failure("x").with_value(2).is_faulted());
    }

    #[test]
    fn test_append_and_prepend_error() {
        let outcome = Outcome::<()>::failure(SimpleFailure::with_code("Db", "timeout"))
            .append_error(" after 3s")
            .prepend_error("query: ");
        let failure = outcome.error().unwrap();
        assert_eq!(failure.message(), "query: timeout after 3s");
        assert_eq!(failure.code(), "Db");

        let ok = Outcome::success(1).append_error("ignored");
        assert_eq!(ok.value(), Some(&1));
    }

    #[test]
    fn test_flatten() {
        let outer_failure = Outcome::<Outcome<i32>>::failure("outer").flatten();
        assert_eq!(outer_failure.error().map(Failure::message), Some("outer"));

        let inner_failure = traced(Outcome::success(Outcome::<i32>::failure("inner"))).flatten();
        assert_eq!(inner_failure.error().map(Failure::message), Some("inner"));
        assert!(inner_failure.metadata().contains_key("trace"));

        let from_result = Outcome::success(Ok::<_, String>(3)).flatten();
        assert_eq!(from_result.value(), Some(&3));
    }
}
