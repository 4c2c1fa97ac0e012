//! Async-callback forms of the combinators.
//!
//! Each method awaits its callback only on the branch that invokes it; the
//! other branch completes without suspending. Callbacks that receive `&T` must
//! return a future that does not borrow from it (clone what the future needs).
//! Callbacks on the failure branch receive an owned [`Failure`], which is a
//! cheap handle clone.

use std::future::Future;

use super::{MetadataPolicy, Outcome};
use crate::failure::{AggregateFailure, Failure};

impl<T> Outcome<T> {
    /// Async [`map`](Self::map).
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let outcome = Outcome::success(2).map_async(|n| async move { n * 10 }).await;
    /// assert_eq!(outcome.value(), Some(&20));
    /// # });
    /// ```
    pub async fn map_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> Outcome<U>
    where
        Fut: Future<Output = U>,
    {
        let (state, metadata) = self.into_parts();
        let state = match state {
            Ok(value) => Ok(f(value).await),
            Err(failure) => Err(failure),
        };
        Outcome::from_parts(state, metadata)
    }

    /// Async [`bind`](Self::bind).
    pub async fn bind_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> Outcome<U>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        self.bind_with_async(MetadataPolicy::Merge, f).await
    }

    /// Async [`bind_with`](Self::bind_with).
    pub async fn bind_with_async<U, Fut>(
        self,
        policy: MetadataPolicy,
        f: impl FnOnce(T) -> Fut,
    ) -> Outcome<U>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        let (state, metadata) = self.into_parts();
        match state {
            Ok(value) => f(value).await.inherit(&metadata, policy),
            Err(failure) => Outcome::from_parts(Err(failure), metadata),
        }
    }

    /// Async [`then`](Self::then).
    pub async fn then_async<U, Fut>(self, f: impl FnOnce(&T) -> Fut) -> Self
    where
        Fut: Future<Output = Outcome<U>>,
    {
        let (state, metadata) = self.into_parts();
        match state {
            Ok(value) => {
                let (check, metadata) = f(&value)
                    .await
                    .inherit(&metadata, MetadataPolicy::Merge)
                    .into_parts();
                Outcome::from_parts(check.map(|_| value), metadata)
            }
            Err(failure) => Outcome::from_parts(Err(failure), metadata),
        }
    }

    /// Async [`tap`](Self::tap).
    pub async fn tap_async<Fut>(self, f: impl FnOnce(&T) -> Fut) -> Self
    where
        Fut: Future<Output = ()>,
    {
        if let Ok(value) = &self.state {
            f(value).await;
        }
        self
    }

    /// Async [`tap_error`](Self::tap_error).
    pub async fn tap_error_async<Fut>(self, f: impl FnOnce(Failure) -> Fut) -> Self
    where
        Fut: Future<Output = ()>,
    {
        if let Err(failure) = &self.state {
            f(failure.clone()).await;
        }
        self
    }

    /// Async [`ensure`](Self::ensure). Only the predicate is async.
    pub async fn ensure_async<F, Fut>(
        self,
        predicate: impl FnOnce(&T) -> Fut,
        error: impl FnOnce(&T) -> F,
    ) -> Self
    where
        Fut: Future<Output = bool>,
        F: Into<Failure>,
    {
        let (state, metadata) = self.into_parts();
        let state = match state {
            Ok(value) => {
                if predicate(&value).await {
                    Ok(value)
                } else {
                    Err(error(&value).into())
                }
            }
            Err(failure) => Err(failure),
        };
        Outcome::from_parts(state, metadata)
    }

    /// Async [`recover`](Self::recover).
    pub async fn recover_async<Fut>(self, f: impl FnOnce(Failure) -> Fut) -> Self
    where
        Fut: Future<Output = T>,
    {
        let (state, metadata) = self.into_parts();
        let value = match state {
            Ok(value) => value,
            Err(failure) => f(failure).await,
        };
        Outcome::from_parts(Ok(value), metadata)
    }

    /// Async [`or_else`](Self::or_else).
    pub async fn or_else_async<Fut>(self, f: impl FnOnce(Failure) -> Fut) -> Self
    where
        Fut: Future<Output = Outcome<T>>,
    {
        let (state, metadata) = self.into_parts();
        match state {
            Ok(value) => Outcome::from_parts(Ok(value), metadata),
            Err(failure) => f(failure).await.inherit(&metadata, MetadataPolicy::Merge),
        }
    }

    /// Async [`compensate`](Self::compensate).
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let outcome = Outcome::<()>::failure("charge failed")
    ///     .compensate_async(|_| async { Outcome::<()>::failure("refund failed") })
    ///     .await;
    /// assert_eq!(outcome.errors().count(), 2);
    /// # });
    /// ```
    pub async fn compensate_async<U, Fut>(self, rollback: impl FnOnce(Failure) -> Fut) -> Self
    where
        Fut: Future<Output = Outcome<U>>,
    {
        let (state, metadata) = self.into_parts();
        let original = match state {
            Ok(value) => return Outcome::from_parts(Ok(value), metadata),
            Err(failure) => failure,
        };
        let (undo, undo_metadata) = rollback(original.clone()).await.into_parts();
        match undo {
            Ok(_) => Outcome::from_parts(Err(original), metadata),
            Err(rollback_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    original = %original,
                    rollback = %rollback_error,
                    "compensation failed"
                );
                let aggregate = AggregateFailure::new(original, [rollback_error]);
                Outcome::from_parts(Err(aggregate.into()), metadata.merge(&undo_metadata))
            }
        }
    }

    /// Async [`fold`](Self::fold). Exactly one callback runs and is awaited.
    pub async fn fold_async<R, SuccessFut, FailureFut>(
        self,
        on_success: impl FnOnce(T) -> SuccessFut,
        on_failure: impl FnOnce(Failure) -> FailureFut,
    ) -> R
    where
        SuccessFut: Future<Output = R>,
        FailureFut: Future<Output = R>,
    {
        match self.state {
            Ok(value) => on_success(value).await,
            Err(failure) => on_failure(failure).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_map_async_skips_failure() {
        let calls = AtomicUsize::new(0);
        let outcome = Outcome::<i32>::failure("x")
            .with_metadata("k", 1)
            .map_async(|v| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { v + 1 }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(outcome.is_faulted());
        assert!(outcome.metadata().contains_key("k"));
    }

    #[tokio::test]
    async fn test_bind_async_merges_metadata() {
        let outcome = Outcome::success(1)
            .with_metadata("outer", 1)
            .bind_async(|v| async move { Outcome::success(v + 1).with_metadata("inner", 2) })
            .await;
        assert_eq!(outcome.value(), Some(&2));
        assert_eq!(outcome.metadata().len(), 2);

        let discarded = Outcome::success(1)
            .with_metadata("outer", 1)
            .bind_with_async(MetadataPolicy::Discard, |v| async move { Outcome::success(v) })
            .await;
        assert!(discarded.metadata().is_empty());
    }

    #[tokio::test]
    async fn test_then_async_keeps_value() {
        let outcome = Outcome::success(5)
            .then_async(|v| {
                let v = *v;
                async move { Outcome::success(v * 2) }
            })
            .await;
        assert_eq!(outcome.value(), Some(&5));

        let rejected = Outcome::success(5)
            .then_async(|_| async { Outcome::<()>::failure("no") })
            .await;
        assert_eq!(rejected.error().map(Failure::message), Some("no"));
    }

    #[tokio::test]
    async fn test_taps_async() {
        let hits = AtomicUsize::new(0);
        let _ = Outcome::success(1)
            .tap_async(|_| async { hits.fetch_add(1, Ordering::SeqCst); })
            .await
            .tap_error_async(|_| async { hits.fetch_add(10, Ordering::SeqCst); })
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let _ = Outcome::<i32>::failure("x")
            .tap_async(|_| async { hits.fetch_add(100, Ordering::SeqCst); })
            .await
            .tap_error_async(|e| {
                assert_eq!(e.message(), "x");
                async { hits.fetch_add(10, Ordering::SeqCst); }
            })
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_ensure_async() {
        let outcome = Outcome::success(-1)
            .ensure_async(|v| {
                let positive = *v > 0;
                async move { positive }
            }, |v| format!("{} is not positive", v))
            .await;
        assert_eq!(outcome.error().map(Failure::message), Some("-1 is not positive"));
    }

    #[tokio::test]
    async fn test_recover_and_or_else_async() {
        let recovered = Outcome::<usize>::failure("abc")
            .recover_async(|e| async move { e.message().len() })
            .await;
        assert_eq!(recovered.value(), Some(&3));

        let replaced = Outcome::<i32>::failure("x")
            .with_metadata("k", 1)
            .or_else_async(|_| async { Outcome::success(0) })
            .await;
        assert_eq!(replaced.value(), Some(&0));
        assert!(replaced.metadata().contains_key("k"));
    }

    #[tokio::test]
    async fn test_compensate_async_returns_original_on_successful_rollback() {
        let rolled_back = AtomicUsize::new(0);
        let outcome = Outcome::<()>::failure("E1")
            .compensate_async(|_| {
                rolled_back.fetch_add(1, Ordering::SeqCst);
                async { Outcome::ok() }
            })
            .await;
        assert_eq!(rolled_back.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.error().map(Failure::message), Some("E1"));
        assert!(!outcome.error().unwrap().is_aggregate());
    }

    #[tokio::test]
    async fn test_fold_async() {
        let text = Outcome::<i32>::failure("bad")
            .fold_async(
                |v| async move { v.to_string() },
                |e| async move { e.message().to_uppercase() },
            )
            .await;
        assert_eq!(text, "BAD");
    }
}
