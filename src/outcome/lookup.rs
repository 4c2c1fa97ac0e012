//! Typed inspection of the failure held by an outcome.
//!
//! Lookups look at the failure itself and, when it is an aggregate, at its
//! direct members. Aggregates nested inside aggregates are not searched.

use super::Outcome;
use crate::failure::{Failure, FailureKind};

impl<T> Outcome<T> {
    /// The first failure of kind `K`, if any.
    ///
    /// ```
    /// use tributary::failure::{ExceptionalFailure, Failure};
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::<()>::failure(Failure::exception(std::io::Error::other("eof")));
    /// assert!(outcome.get_error::<ExceptionalFailure>().is_some());
    /// assert!(Outcome::ok().get_error::<ExceptionalFailure>().is_none());
    /// ```
    pub fn get_error<K: FailureKind>(&self) -> Option<&K> {
        self.error().and_then(Failure::find::<K>)
    }

    /// Returns `true` if the failure is, or directly contains, a `K`.
    pub fn has_error<K: FailureKind>(&self) -> bool {
        self.get_error::<K>().is_some()
    }

    /// `on_match` with the first `K` found, otherwise `on_else`.
    ///
    /// Exactly one of the two callbacks runs. A successful outcome always runs
    /// `on_else`.
    pub fn match_error<K: FailureKind, R>(
        &self,
        on_match: impl FnOnce(&K) -> R,
        on_else: impl FnOnce() -> R,
    ) -> R {
        match self.get_error::<K>() {
            Some(found) => on_match(found),
            None => on_else(),
        }
    }

    /// Every reason behind the failure.
    ///
    /// Empty on success. An aggregate yields its direct members in order; any
    /// other failure yields itself.
    pub fn errors(&self) -> impl Iterator<Item = &Failure> {
        self.error().into_iter().flat_map(Failure::errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{AggregateFailure, ExceptionalFailure, SimpleFailure};
    use std::io;

    #[derive(Debug)]
    struct RateLimited {
        retry_after: u64,
    }

    impl FailureKind for RateLimited {
        fn code(&self) -> &str {
            "RateLimited"
        }

        fn message(&self) -> &str {
            "slow down"
        }
    }

    #[test]
    fn test_get_error_on_direct_failure() {
        let outcome = Outcome::<()>::failure(RateLimited { retry_after: 30 });
        assert_eq!(outcome.get_error::<RateLimited>().map(|e| e.retry_after), Some(30));
        assert!(outcome.has_error::<RateLimited>());
        assert!(!outcome.has_error::<ExceptionalFailure>());
    }

    #[test]
    fn test_get_error_inside_aggregate() {
        let aggregate = AggregateFailure::new(
            Failure::new("plain"),
            [Failure::from(RateLimited { retry_after: 5 })],
        );
        let outcome = Outcome::<()>::failure(aggregate);

        assert!(outcome.has_error::<RateLimited>());
        assert!(outcome.has_error::<SimpleFailure>());
        assert!(outcome.has_error::<AggregateFailure>());
    }

    #[test]
    fn test_lookup_is_not_recursive() {
        let inner = Failure::aggregate([Failure::from(RateLimited { retry_after: 1 })]).unwrap();
        let outer = Failure::aggregate([Failure::new("plain"), inner]).unwrap();
        let outcome = Outcome::<()>::failure(outer);

        assert!(!outcome.has_error::<RateLimited>());
    }

    #[test]
    fn test_success_has_no_errors() {
        let outcome = Outcome::success(1);
        assert!(!outcome.has_error::<SimpleFailure>());
        assert_eq!(outcome.errors().count(), 0);
    }

    #[test]
    fn test_match_error_runs_one_callback() {
        let outcome = Outcome::<()>::failure(Failure::exception(io::Error::other("eof")));

        let matched = outcome.match_error::<ExceptionalFailure, _>(
            |e| e.error().to_string(),
            || "other".to_string(),
        );
        assert_eq!(matched, "eof");

        let unmatched = outcome.match_error::<RateLimited, _>(|_| 1, || 2);
        assert_eq!(unmatched, 2);

        let on_success = Outcome::ok().match_error::<RateLimited, _>(|_| 1, || 2);
        assert_eq!(on_success, 2);
    }

    #[test]
    fn test_errors_lists_aggregate_members() {
        let outcome = Outcome::<()>::failure(Failure::aggregate([
            Failure::new("a"),
            Failure::new("b"),
        ]).unwrap());
        let messages: Vec<_> = outcome.errors().map(Failure::message).collect();
        assert_eq!(messages, vec!["a", "b"]);

        let single = Outcome::<()>::failure("only");
        assert_eq!(single.errors().count(), 1);
    }
}
