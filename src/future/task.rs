//! Boxed and shared task shapes.
//!
//! [`OutcomeTask`] and [`MaybeTask`] are heap-allocated, type-erased futures
//! that can be stored in structs and collections. They are awaited once.
//! [`SharedOutcomeTask`] and [`SharedMaybeTask`] are cloneable and can be
//! awaited any number of times; the underlying computation runs once and every
//! clone observes the same result.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt, Shared};

use crate::failure::Failure;
use crate::maybe::Maybe;
use crate::outcome::Outcome;

/// A boxed future of an [`Outcome`].
///
/// # Example
///
/// ```
/// use tributary::future::OutcomeTask;
/// use tributary::prelude::*;
///
/// # tokio_test::block_on(async {
/// let tasks: Vec<OutcomeTask<i32>> = vec![
///     OutcomeTask::success(1),
///     OutcomeTask::new(async { Outcome::success(2) }),
///     OutcomeTask::failure("offline"),
/// ];
///
/// let mut faulted = 0;
/// for task in tasks {
///     if task.await.is_faulted() {
///         faulted += 1;
///     }
/// }
/// assert_eq!(faulted, 1);
/// # });
/// ```
pub struct OutcomeTask<T> {
    inner: BoxFuture<'static, Outcome<T>>,
}

impl<T: 'static> OutcomeTask<T> {
    /// Box `future`.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        OutcomeTask {
            inner: future.boxed(),
        }
    }

    /// A task that is already complete.
    pub fn ready(outcome: Outcome<T>) -> Self
    where
        T: Send,
    {
        OutcomeTask::new(future::ready(outcome))
    }

    /// A completed success.
    pub fn success(value: T) -> Self
    where
        T: Send,
    {
        OutcomeTask::ready(Outcome::success(value))
    }

    /// A completed failure.
    pub fn failure(failure: impl Into<Failure>) -> Self
    where
        T: Send,
    {
        OutcomeTask::ready(Outcome::failure(failure))
    }

    /// Convert into a re-awaitable [`SharedOutcomeTask`].
    pub fn shared(self) -> SharedOutcomeTask<T>
    where
        T: Clone + Send + Sync,
    {
        SharedOutcomeTask {
            inner: self.inner.shared(),
        }
    }

    /// Adapt a tokio `JoinHandle`.
    ///
    /// A panicked or cancelled task becomes an exceptional failure wrapping the
    /// `JoinError`.
    #[cfg(feature = "tokio")]
    pub fn from_join_handle(handle: tokio::task::JoinHandle<Outcome<T>>) -> Self
    where
        T: Send,
    {
        OutcomeTask::new(async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => Outcome::failure(Failure::exception(join_error)),
            }
        })
    }
}

impl<T> Future for OutcomeTask<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Send + 'static> From<Outcome<T>> for OutcomeTask<T> {
    fn from(outcome: Outcome<T>) -> Self {
        OutcomeTask::ready(outcome)
    }
}

impl<T> fmt::Debug for OutcomeTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeTask").finish_non_exhaustive()
    }
}

/// A cloneable, re-awaitable future of an [`Outcome`].
///
/// ```
/// use tributary::future::OutcomeTask;
/// use tributary::Outcome;
///
/// # tokio_test::block_on(async {
/// let task = OutcomeTask::new(async { Outcome::success(5) }).shared();
/// let again = task.clone();
///
/// assert_eq!(task.await.value(), Some(&5));
/// assert_eq!(again.await.value(), Some(&5));
/// # });
/// ```
pub struct SharedOutcomeTask<T: Clone> {
    inner: Shared<BoxFuture<'static, Outcome<T>>>,
}

impl<T: Clone> Clone for SharedOutcomeTask<T> {
    fn clone(&self) -> Self {
        SharedOutcomeTask {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Future for SharedOutcomeTask<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Clone> fmt::Debug for SharedOutcomeTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedOutcomeTask").finish_non_exhaustive()
    }
}

/// A boxed future of a [`Maybe`].
pub struct MaybeTask<T> {
    inner: BoxFuture<'static, Maybe<T>>,
}

impl<T: 'static> MaybeTask<T> {
    /// Box `future`.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Maybe<T>> + Send + 'static,
    {
        MaybeTask {
            inner: future.boxed(),
        }
    }

    /// A task that is already complete.
    pub fn ready(maybe: Maybe<T>) -> Self
    where
        T: Send,
    {
        MaybeTask::new(future::ready(maybe))
    }

    /// A completed `Some`.
    pub fn some(value: T) -> Self
    where
        T: Send,
    {
        MaybeTask::ready(Maybe::Some(value))
    }

    /// A completed `None`.
    pub fn none() -> Self
    where
        T: Send,
    {
        MaybeTask::ready(Maybe::None)
    }

    /// Convert into a re-awaitable [`SharedMaybeTask`].
    pub fn shared(self) -> SharedMaybeTask<T>
    where
        T: Clone + Send + Sync,
    {
        SharedMaybeTask {
            inner: self.inner.shared(),
        }
    }

    /// Adapt a tokio `JoinHandle`.
    ///
    /// Absence and a dead task are kept apart: the task's `Maybe` is returned
    /// as the success value, while a panicked or cancelled task becomes an
    /// exceptional failure wrapping the `JoinError`.
    #[cfg(feature = "tokio")]
    pub fn from_join_handle(handle: tokio::task::JoinHandle<Maybe<T>>) -> OutcomeTask<Maybe<T>>
    where
        T: Send,
    {
        OutcomeTask::new(async move {
            match handle.await {
                Ok(maybe) => Outcome::success(maybe),
                Err(join_error) => Outcome::failure(Failure::exception(join_error)),
            }
        })
    }
}

impl<T> Future for MaybeTask<T> {
    type Output = Maybe<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Send + 'static> From<Maybe<T>> for MaybeTask<T> {
    fn from(maybe: Maybe<T>) -> Self {
        MaybeTask::ready(maybe)
    }
}

impl<T> fmt::Debug for MaybeTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaybeTask").finish_non_exhaustive()
    }
}

/// A cloneable, re-awaitable future of a [`Maybe`].
pub struct SharedMaybeTask<T: Clone> {
    inner: Shared<BoxFuture<'static, Maybe<T>>>,
}

impl<T: Clone> Clone for SharedMaybeTask<T> {
    fn clone(&self) -> Self {
        SharedMaybeTask {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Future for SharedMaybeTask<T> {
    type Output = Maybe<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Clone> fmt::Debug for SharedMaybeTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMaybeTask").finish_non_exhaustive()
    }
}
