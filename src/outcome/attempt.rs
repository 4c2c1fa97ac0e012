//! The boundary where native errors and panics become failures.
//!
//! Everything else in the crate treats failures as data. The functions here
//! are the only ones that take a fallible native computation and turn its
//! error (or panic) into an [`ExceptionalFailure`]-backed outcome.

use std::error::Error as StdError;
use std::future::Future;
use std::panic::{self, UnwindSafe};

use super::Outcome;
use crate::failure::{ExceptionalFailure, Failure, PanicError};

/// Boxed form accepted at the boundary; `?`-compatible with most error types.
type BoxError = Box<dyn StdError + Send + Sync + 'static>;

fn caught<E: Into<BoxError>>(error: E) -> Failure {
    let failure: Failure = ExceptionalFailure::from_boxed(error.into()).into();
    #[cfg(feature = "tracing")]
    tracing::debug!(message = failure.message(), "error converted to failure");
    failure
}

impl<T> Outcome<T> {
    /// Run a fallible computation, capturing its error as an exceptional failure.
    ///
    /// ```
    /// use tributary::failure::ExceptionalFailure;
    /// use tributary::Outcome;
    ///
    /// let parsed = Outcome::attempt(|| "12".parse::<u8>());
    /// assert_eq!(parsed.value(), Some(&12));
    ///
    /// let failed = Outcome::attempt(|| "300".parse::<u8>());
    /// let exceptional = failed.get_error::<ExceptionalFailure>().unwrap();
    /// assert!(exceptional.downcast_ref::<std::num::ParseIntError>().is_some());
    /// ```
    pub fn attempt<E>(f: impl FnOnce() -> Result<T, E>) -> Self
    where
        E: Into<BoxError>,
    {
        match f() {
            Ok(value) => Outcome::success(value),
            Err(error) => Outcome::failure(caught(error)),
        }
    }

    /// Run `f`, turning a panic into an exceptional failure holding a [`PanicError`].
    ///
    /// ```
    /// use tributary::failure::PanicError;
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::<i32>::catch_panic(|| panic!("boom"));
    /// let error = outcome.error().unwrap().to_error();
    /// assert_eq!(error.downcast_ref::<PanicError>().map(|p| p.message.as_str()), Some("boom"));
    /// ```
    pub fn catch_panic(f: impl FnOnce() -> T + UnwindSafe) -> Self {
        match panic::catch_unwind(f) {
            Ok(value) => Outcome::success(value),
            Err(payload) => Outcome::failure(caught(PanicError::from_payload(payload))),
        }
    }

    /// Async form of [`attempt`](Self::attempt).
    pub async fn attempt_async<E, Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        match future.await {
            Ok(value) => Outcome::success(value),
            Err(error) => Outcome::failure(caught(error)),
        }
    }

    /// Map with a fallible function, capturing its error. Metadata is kept.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Outcome<U>
    where
        E: Into<BoxError>,
    {
        let (state, metadata) = self.into_parts();
        let state = state.and_then(|value| f(value).map_err(caught));
        Outcome::from_parts(state, metadata)
    }

    /// Run a fallible action on the value, keeping the value when it succeeds.
    ///
    /// ```
    /// use std::io;
    /// use tributary::failure::ExceptionalFailure;
    /// use tributary::Outcome;
    ///
    /// let outcome = Outcome::ok().try_tap(|_| Err(io::Error::other("boom")));
    /// let exceptional = outcome.get_error::<ExceptionalFailure>().unwrap();
    /// assert_eq!(exceptional.error().to_string(), "boom");
    /// ```
    pub fn try_tap<E>(self, f: impl FnOnce(&T) -> Result<(), E>) -> Self
    where
        E: Into<BoxError>,
    {
        let (state, metadata) = self.into_parts();
        let state = state.and_then(|value| match f(&value) {
            Ok(()) => Ok(value),
            Err(error) => Err(caught(error)),
        });
        Outcome::from_parts(state, metadata)
    }

    /// Async form of [`try_map`](Self::try_map).
    pub async fn try_map_async<U, E, Fut>(self, f: impl FnOnce(T) -> Fut) -> Outcome<U>
    where
        Fut: Future<Output = Result<U, E>>,
        E: Into<BoxError>,
    {
        let (state, metadata) = self.into_parts();
        let state = match state {
            Ok(value) => f(value).await.map_err(caught),
            Err(failure) => Err(failure),
        };
        Outcome::from_parts(state, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_attempt_keeps_exact_error() {
        let outcome = Outcome::<()>::attempt(|| Err(io::Error::new(io::ErrorKind::NotFound, "boom")));

        let exceptional = outcome.get_error::<ExceptionalFailure>().unwrap();
        let io_error = exceptional.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_error.kind(), io::ErrorKind::NotFound);
        assert_eq!(outcome.error().map(Failure::code), Some("Exception"));
        assert_eq!(outcome.error().map(Failure::message), Some("boom"));
    }

    #[test]
    fn test_attempt_accepts_string_errors() {
        let outcome = Outcome::<i32>::attempt(|| Err("plain text"));
        assert_eq!(outcome.error().map(Failure::message), Some("plain text"));
    }

    #[test]
    fn test_catch_panic() {
        let outcome = Outcome::<i32>::catch_panic(|| panic!("kaboom"));
        assert!(outcome.has_error::<ExceptionalFailure>());
        assert_eq!(outcome.error().map(Failure::message), Some("panicked: kaboom"));

        assert_eq!(Outcome::catch_panic(|| 7).value(), Some(&7));
    }

    #[test]
    fn test_try_map_and_try_tap_keep_metadata() {
        let mapped = Outcome::success("42")
            .with_metadata("k", 1)
            .try_map(|s| s.parse::<i32>());
        assert_eq!(mapped.value(), Some(&42));
        assert!(mapped.metadata().contains_key("k"));

        let tapped = Outcome::success(3)
            .with_metadata("k", 1)
            .try_tap(|_| Err(io::Error::other("denied")));
        assert_eq!(tapped.error().map(Failure::message), Some("denied"));
        assert!(tapped.metadata().contains_key("k"));
    }

    #[test]
    fn test_try_map_skips_failure() {
        let calls = AtomicUsize::new(0);
        let outcome = Outcome::<&str>::failure("prior").try_map(|s| {
            calls.fetch_add(1, Ordering::SeqCst);
            s.parse::<i32>()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.error().map(Failure::message), Some("prior"));
    }

    #[tokio::test]
    async fn test_attempt_async() {
        let ok = Outcome::attempt_async(async { Ok::<_, io::Error>(1) }).await;
        assert_eq!(ok.value(), Some(&1));

        let failed = Outcome::<i32>::attempt_async(async { Err(io::Error::other("late")) }).await;
        assert!(failed.has_error::<ExceptionalFailure>());
    }

    #[tokio::test]
    async fn test_try_map_async() {
        let outcome = Outcome::success("9")
            .try_map_async(|s| async move { s.parse::<i32>() })
            .await;
        assert_eq!(outcome.value(), Some(&9));
    }
}
