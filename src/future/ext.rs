//! Extension traits lifting the combinator algebra onto pending values.
//!
//! [`OutcomeFutureExt`] is implemented for every `Future<Output = Outcome<T>>`
//! and [`MaybeFutureExt`] for every `Future<Output = Maybe<T>>`, so plain
//! `async` blocks, [`OutcomeTask`]s and [`SharedOutcomeTask`]s all share one
//! surface. Every method awaits the incoming value once, applies the
//! synchronous rule and, for the `_async` forms, awaits the callback on the
//! branch that invokes it. Nothing runs until the returned future is polled.
//!
//! The method names overlap with `futures::FutureExt` (`map`, `then`, ...).
//! Import only one of the two traits in a given scope.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;

use super::task::{MaybeTask, OutcomeTask, SharedMaybeTask, SharedOutcomeTask};
use crate::failure::{Failure, FailureError, FailureKind};
use crate::maybe::Maybe;
use crate::metadata::{Metadata, MetadataBuilder, MetadataValue};
use crate::outcome::{IntoOutcome, MetadataPolicy, Outcome};

/// Combinators for any future resolving to an [`Outcome`].
///
/// Implemented automatically; you don't need to implement this trait yourself.
///
/// # Example
///
/// ```
/// use tributary::prelude::*;
///
/// async fn load(id: u32) -> Outcome<String> {
///     Outcome::success(format!("user-{}", id)).with_metadata("id", id)
/// }
///
/// # tokio_test::block_on(async {
/// let name = load(7)
///     .map(|name| name.to_uppercase())
///     .ensure(|name| !name.is_empty(), |_| "empty name")
///     .await;
///
/// assert_eq!(name.value().map(String::as_str), Some("USER-7"));
/// assert_eq!(name.metadata().get_as::<u32>("id"), Some(&7));
/// # });
/// ```
pub trait OutcomeFutureExt<T>: Future<Output = Outcome<T>> + Sized {
    // ========== Sync callbacks ==========

    /// Pending [`Outcome::map`].
    fn map<U>(self, f: impl FnOnce(T) -> U) -> impl Future<Output = Outcome<U>> {
        async move { self.await.map(f) }
    }

    /// Pending [`Outcome::map_failure`].
    fn map_failure(
        self,
        f: impl FnOnce(Failure) -> Failure,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.map_failure(f) }
    }

    /// Pending [`Outcome::bind`].
    fn bind<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> impl Future<Output = Outcome<U>> {
        async move { self.await.bind(f) }
    }

    /// Pending [`Outcome::bind_with`].
    fn bind_with<U>(
        self,
        policy: MetadataPolicy,
        f: impl FnOnce(T) -> Outcome<U>,
    ) -> impl Future<Output = Outcome<U>> {
        async move { self.await.bind_with(policy, f) }
    }

    /// Pending [`Outcome::then`].
    fn then<U>(self, f: impl FnOnce(&T) -> Outcome<U>) -> impl Future<Output = Outcome<T>> {
        async move { self.await.then(f) }
    }

    /// Pending [`Outcome::then_with`].
    fn then_with<U>(
        self,
        policy: MetadataPolicy,
        f: impl FnOnce(&T) -> Outcome<U>,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.then_with(policy, f) }
    }

    /// Pending [`Outcome::tap`].
    fn tap(self, f: impl FnOnce(&T)) -> impl Future<Output = Outcome<T>> {
        async move { self.await.tap(f) }
    }

    /// Pending [`Outcome::tap_if`].
    fn tap_if(
        self,
        predicate: impl FnOnce(&T) -> bool,
        f: impl FnOnce(&T),
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.tap_if(predicate, f) }
    }

    /// Pending [`Outcome::tap_error`].
    fn tap_error(self, f: impl FnOnce(&Failure)) -> impl Future<Output = Outcome<T>> {
        async move { self.await.tap_error(f) }
    }

    /// Pending [`Outcome::tap_error_if`].
    fn tap_error_if(
        self,
        predicate: impl FnOnce(&Failure) -> bool,
        f: impl FnOnce(&Failure),
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.tap_error_if(predicate, f) }
    }

    /// Pending [`Outcome::tap_both`].
    fn tap_both(
        self,
        on_success: impl FnOnce(&T),
        on_failure: impl FnOnce(&Failure),
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.tap_both(on_success, on_failure) }
    }

    /// Pending [`Outcome::ensure`].
    fn ensure<F: Into<Failure>>(
        self,
        predicate: impl FnOnce(&T) -> bool,
        error: impl FnOnce(&T) -> F,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.ensure(predicate, error) }
    }

    /// Pending [`Outcome::recover`].
    fn recover(self, f: impl FnOnce(Failure) -> T) -> impl Future<Output = Outcome<T>> {
        async move { self.await.recover(f) }
    }

    /// Pending [`Outcome::recover_value`].
    fn recover_value(self, value: T) -> impl Future<Output = Outcome<T>> {
        async move { self.await.recover_value(value) }
    }

    /// Pending [`Outcome::or_else`].
    fn or_else(self, f: impl FnOnce(Failure) -> Outcome<T>) -> impl Future<Output = Outcome<T>> {
        async move { self.await.or_else(f) }
    }

    /// Pending [`Outcome::compensate`].
    fn compensate<U>(
        self,
        rollback: impl FnOnce(&Failure) -> Outcome<U>,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.compensate(rollback) }
    }

    /// Pending [`Outcome::flatten`].
    fn flatten(self) -> impl Future<Output = Outcome<T::Value>>
    where
        T: IntoOutcome,
    {
        async move { self.await.flatten() }
    }

    /// Pending [`Outcome::flatten_with`].
    fn flatten_with(self, policy: MetadataPolicy) -> impl Future<Output = Outcome<T::Value>>
    where
        T: IntoOutcome,
    {
        async move { self.await.flatten_with(policy) }
    }

    /// Pending [`Outcome::with_value`].
    fn with_value<U>(self, value: U) -> impl Future<Output = Outcome<U>> {
        async move { self.await.with_value(value) }
    }

    /// Pending [`Outcome::with_metadata`].
    fn with_metadata(
        self,
        key: impl Into<String>,
        value: impl MetadataValue,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.with_metadata(key, value) }
    }

    /// Pending [`Outcome::with_metadata_map`].
    fn with_metadata_map<V: MetadataValue>(
        self,
        entries: HashMap<String, V>,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.with_metadata_map(entries) }
    }

    /// Pending [`Outcome::with_metadata_entries`].
    fn with_metadata_entries<K, V, I>(self, entries: I) -> impl Future<Output = Outcome<T>>
    where
        K: Into<String>,
        V: MetadataValue,
        I: IntoIterator<Item = (K, V)>,
    {
        async move { self.await.with_metadata_entries(entries) }
    }

    /// Pending [`Outcome::merge_metadata`].
    fn merge_metadata(self, other: Metadata) -> impl Future<Output = Outcome<T>> {
        async move { self.await.merge_metadata(&other) }
    }

    /// Pending [`Outcome::configure_metadata`].
    fn configure_metadata(
        self,
        configure: impl FnOnce(MetadataBuilder) -> MetadataBuilder,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.configure_metadata(configure) }
    }

    /// Pending [`Outcome::append_error`].
    fn append_error(self, text: impl Into<String>) -> impl Future<Output = Outcome<T>> {
        let text = text.into();
        async move { self.await.append_error(&text) }
    }

    /// Pending [`Outcome::prepend_error`].
    fn prepend_error(self, text: impl Into<String>) -> impl Future<Output = Outcome<T>> {
        let text = text.into();
        async move { self.await.prepend_error(&text) }
    }

    /// Pending [`Outcome::into_unit`].
    fn into_unit(self) -> impl Future<Output = Outcome<()>> {
        async move { self.await.into_unit() }
    }

    /// Pending [`Outcome::has_error`].
    fn has_error<K: FailureKind>(self) -> impl Future<Output = bool> {
        async move { self.await.has_error::<K>() }
    }

    /// Pending [`Outcome::match_error`].
    fn match_error<K: FailureKind, R>(
        self,
        on_match: impl FnOnce(&K) -> R,
        on_else: impl FnOnce() -> R,
    ) -> impl Future<Output = R> {
        async move { self.await.match_error(on_match, on_else) }
    }

    /// Pending [`Outcome::fold`].
    fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Failure) -> R,
    ) -> impl Future<Output = R> {
        async move { self.await.fold(on_success, on_failure) }
    }

    /// Pending [`Outcome::value_or`].
    fn value_or(self, fallback: T) -> impl Future<Output = T> {
        async move { self.await.value_or(fallback) }
    }

    /// Pending [`Outcome::value_or_else`].
    fn value_or_else(self, fallback: impl FnOnce(Failure) -> T) -> impl Future<Output = T> {
        async move { self.await.value_or_else(fallback) }
    }

    /// Pending [`Outcome::value_or_default`].
    fn value_or_default(self) -> impl Future<Output = T>
    where
        T: Default,
    {
        async move { self.await.value_or_default() }
    }

    /// Pending [`Outcome::value_or_throw`].
    fn value_or_throw(self) -> impl Future<Output = Result<T, FailureError>> {
        async move { self.await.value_or_throw() }
    }

    /// Pending [`Outcome::value_or_throw_with`].
    fn value_or_throw_with<E>(
        self,
        error: impl FnOnce(Failure) -> E,
    ) -> impl Future<Output = Result<T, E>> {
        async move { self.await.value_or_throw_with(error) }
    }

    /// Pending [`Outcome::throw_if_failed`].
    fn throw_if_failed(self) -> impl Future<Output = Result<Outcome<T>, FailureError>> {
        async move { self.await.throw_if_failed() }
    }

    /// Pending [`Outcome::try_map`].
    fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> impl Future<Output = Outcome<U>>
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        async move { self.await.try_map(f) }
    }

    /// Pending [`Outcome::try_tap`].
    fn try_tap<E>(self, f: impl FnOnce(&T) -> Result<(), E>) -> impl Future<Output = Outcome<T>>
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        async move { self.await.try_tap(f) }
    }

    /// Pending [`Outcome::to_maybe`].
    fn to_maybe(self) -> impl Future<Output = Maybe<T>> {
        async move { self.await.to_maybe() }
    }

    // ========== Async callbacks ==========

    /// Pending [`Outcome::map_async`].
    fn map_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> impl Future<Output = Outcome<U>>
    where
        Fut: Future<Output = U>,
    {
        async move { self.await.map_async(f).await }
    }

    /// Pending [`Outcome::bind_async`].
    fn bind_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> impl Future<Output = Outcome<U>>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.bind_async(f).await }
    }

    /// Pending [`Outcome::bind_with_async`].
    fn bind_with_async<U, Fut>(
        self,
        policy: MetadataPolicy,
        f: impl FnOnce(T) -> Fut,
    ) -> impl Future<Output = Outcome<U>>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.bind_with_async(policy, f).await }
    }

    /// Pending [`Outcome::then_async`].
    fn then_async<U, Fut>(self, f: impl FnOnce(&T) -> Fut) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.then_async(f).await }
    }

    /// Pending [`Outcome::tap_async`].
    fn tap_async<Fut>(self, f: impl FnOnce(&T) -> Fut) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = ()>,
    {
        async move { self.await.tap_async(f).await }
    }

    /// Pending [`Outcome::tap_error_async`].
    fn tap_error_async<Fut>(
        self,
        f: impl FnOnce(Failure) -> Fut,
    ) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = ()>,
    {
        async move { self.await.tap_error_async(f).await }
    }

    /// Pending [`Outcome::ensure_async`].
    fn ensure_async<F, Fut>(
        self,
        predicate: impl FnOnce(&T) -> Fut,
        error: impl FnOnce(&T) -> F,
    ) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = bool>,
        F: Into<Failure>,
    {
        async move { self.await.ensure_async(predicate, error).await }
    }

    /// Pending [`Outcome::recover_async`].
    fn recover_async<Fut>(self, f: impl FnOnce(Failure) -> Fut) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = T>,
    {
        async move { self.await.recover_async(f).await }
    }

    /// Pending [`Outcome::or_else_async`].
    fn or_else_async<Fut>(self, f: impl FnOnce(Failure) -> Fut) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = Outcome<T>>,
    {
        async move { self.await.or_else_async(f).await }
    }

    /// Pending [`Outcome::compensate_async`].
    fn compensate_async<U, Fut>(
        self,
        rollback: impl FnOnce(Failure) -> Fut,
    ) -> impl Future<Output = Outcome<T>>
    where
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.compensate_async(rollback).await }
    }

    /// Pending [`Outcome::try_map_async`].
    fn try_map_async<U, E, Fut>(self, f: impl FnOnce(T) -> Fut) -> impl Future<Output = Outcome<U>>
    where
        Fut: Future<Output = Result<U, E>>,
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        async move { self.await.try_map_async(f).await }
    }

    /// Pending [`Outcome::fold_async`].
    fn fold_async<R, SuccessFut, FailureFut>(
        self,
        on_success: impl FnOnce(T) -> SuccessFut,
        on_failure: impl FnOnce(Failure) -> FailureFut,
    ) -> impl Future<Output = R>
    where
        SuccessFut: Future<Output = R>,
        FailureFut: Future<Output = R>,
    {
        async move { self.await.fold_async(on_success, on_failure).await }
    }

    // ========== Shapes ==========

    /// Box into an [`OutcomeTask`].
    fn into_task(self) -> OutcomeTask<T>
    where
        Self: Send + 'static,
        T: 'static,
    {
        OutcomeTask::new(self)
    }

    /// Box into a re-awaitable [`SharedOutcomeTask`].
    fn into_shared(self) -> SharedOutcomeTask<T>
    where
        Self: Send + 'static,
        T: Clone + Send + Sync + 'static,
    {
        OutcomeTask::new(self).shared()
    }
}

impl<F, T> OutcomeFutureExt<T> for F where F: Future<Output = Outcome<T>> {}

/// Combinators for any future resolving to a [`Maybe`].
///
/// # Example
///
/// ```
/// use tributary::prelude::*;
///
/// async fn lookup(key: &str) -> Maybe<u32> {
///     if key == "port" { Maybe::Some(8080) } else { Maybe::None }
/// }
///
/// # tokio_test::block_on(async {
/// let port = lookup("port").filter(|p| *p > 1024).value_or(80).await;
/// assert_eq!(port, 8080);
///
/// let missing = lookup("host").to_outcome("host not configured").await;
/// assert!(missing.is_faulted());
/// # });
/// ```
pub trait MaybeFutureExt<T>: Future<Output = Maybe<T>> + Sized {
    // ========== Sync callbacks ==========

    /// Pending [`Maybe::if_some`].
    fn if_some(self, action: impl FnOnce(&T)) -> impl Future<Output = Maybe<T>> {
        async move { self.await.if_some(action) }
    }

    /// Pending [`Maybe::if_none`].
    fn if_none(self, action: impl FnOnce()) -> impl Future<Output = Maybe<T>> {
        async move { self.await.if_none(action) }
    }

    /// Pending [`Maybe::tap`].
    fn tap(self, f: impl FnOnce(&T)) -> impl Future<Output = Maybe<T>> {
        async move { self.await.tap(f) }
    }

    /// Pending [`Maybe::map`].
    fn map<U>(self, f: impl FnOnce(T) -> U) -> impl Future<Output = Maybe<U>> {
        async move { self.await.map(f) }
    }

    /// Pending [`Maybe::bind`].
    fn bind<U>(self, f: impl FnOnce(T) -> Maybe<U>) -> impl Future<Output = Maybe<U>> {
        async move { self.await.bind(f) }
    }

    /// Pending [`Maybe::filter`].
    fn filter(self, predicate: impl FnOnce(&T) -> bool) -> impl Future<Output = Maybe<T>> {
        async move { self.await.filter(predicate) }
    }

    /// Pending [`Maybe::or`].
    fn or(self, other: Maybe<T>) -> impl Future<Output = Maybe<T>> {
        async move { self.await.or(other) }
    }

    /// Pending [`Maybe::or_else`].
    fn or_else(self, f: impl FnOnce() -> Maybe<T>) -> impl Future<Output = Maybe<T>> {
        async move { self.await.or_else(f) }
    }

    /// Pending [`Maybe::fold`].
    fn fold<R>(
        self,
        on_some: impl FnOnce(T) -> R,
        on_none: impl FnOnce() -> R,
    ) -> impl Future<Output = R> {
        async move { self.await.fold(on_some, on_none) }
    }

    /// Pending [`Maybe::value_or`].
    fn value_or(self, fallback: T) -> impl Future<Output = T> {
        async move { self.await.value_or(fallback) }
    }

    /// Pending [`Maybe::value_or_else`].
    fn value_or_else(self, fallback: impl FnOnce() -> T) -> impl Future<Output = T> {
        async move { self.await.value_or_else(fallback) }
    }

    /// Pending [`Maybe::value_or_default`].
    fn value_or_default(self) -> impl Future<Output = T>
    where
        T: Default,
    {
        async move { self.await.value_or_default() }
    }

    /// Pending [`Maybe::to_outcome`].
    fn to_outcome(self, failure: impl Into<Failure>) -> impl Future<Output = Outcome<T>> {
        async move { self.await.to_outcome(failure) }
    }

    /// Pending [`Maybe::to_outcome_with`].
    fn to_outcome_with<F: Into<Failure>>(
        self,
        failure: impl FnOnce() -> F,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.to_outcome_with(failure) }
    }

    // ========== Async callbacks ==========

    /// Pending [`Maybe::if_some_async`].
    fn if_some_async<Fut>(self, action: impl FnOnce(&T) -> Fut) -> impl Future<Output = Maybe<T>>
    where
        Fut: Future<Output = ()>,
    {
        async move { self.await.if_some_async(action).await }
    }

    /// Pending [`Maybe::if_none_async`].
    fn if_none_async<Fut>(self, action: impl FnOnce() -> Fut) -> impl Future<Output = Maybe<T>>
    where
        Fut: Future<Output = ()>,
    {
        async move { self.await.if_none_async(action).await }
    }

    /// Pending [`Maybe::map_async`].
    fn map_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> impl Future<Output = Maybe<U>>
    where
        Fut: Future<Output = U>,
    {
        async move { self.await.map_async(f).await }
    }

    /// Pending [`Maybe::bind_async`].
    fn bind_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> impl Future<Output = Maybe<U>>
    where
        Fut: Future<Output = Maybe<U>>,
    {
        async move { self.await.bind_async(f).await }
    }

    /// Pending [`Maybe::filter_async`].
    fn filter_async<Fut>(self, predicate: impl FnOnce(&T) -> Fut) -> impl Future<Output = Maybe<T>>
    where
        Fut: Future<Output = bool>,
    {
        async move { self.await.filter_async(predicate).await }
    }

    /// Pending [`Maybe::fold_async`].
    fn fold_async<R, SomeFut, NoneFut>(
        self,
        on_some: impl FnOnce(T) -> SomeFut,
        on_none: impl FnOnce() -> NoneFut,
    ) -> impl Future<Output = R>
    where
        SomeFut: Future<Output = R>,
        NoneFut: Future<Output = R>,
    {
        async move { self.await.fold_async(on_some, on_none).await }
    }

    // ========== Shapes ==========

    /// Box into a [`MaybeTask`].
    fn into_task(self) -> MaybeTask<T>
    where
        Self: Send + 'static,
        T: 'static,
    {
        MaybeTask::new(self)
    }

    /// Box into a re-awaitable [`SharedMaybeTask`].
    fn into_shared(self) -> SharedMaybeTask<T>
    where
        Self: Send + 'static,
        T: Clone + Send + Sync + 'static,
    {
        MaybeTask::new(self).shared()
    }
}

impl<F, T> MaybeFutureExt<T> for F where F: Future<Output = Maybe<T>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn pending<T>(outcome: Outcome<T>) -> Outcome<T> {
        tokio::task::yield_now().await;
        outcome
    }

    #[tokio::test]
    async fn test_pending_chain_matches_sync_chain() {
        let pending_result = pending(Outcome::success(2).with_metadata("trace", "t"))
            .map(|x| x * 3)
            .bind(|x| Outcome::success(x + 1))
            .then(|x| if *x > 0 { Outcome::ok() } else { Outcome::failure("neg") })
            .await;

        let sync_result = Outcome::success(2)
            .with_metadata("trace", "t")
            .map(|x| x * 3)
            .bind(|x| Outcome::success(x + 1))
            .then(|x| if *x > 0 { Outcome::ok() } else { Outcome::failure("neg") });

        assert_eq!(pending_result, sync_result);
    }

    #[tokio::test]
    async fn test_nothing_runs_until_polled() {
        let calls = AtomicUsize::new(0);
        let future = pending(Outcome::success(1)).tap(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let _ = future.await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_async_callbacks_skip_failure() {
        let calls = AtomicUsize::new(0);
        let outcome = pending(Outcome::<i32>::failure("x"))
            .map_async(|v| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { v + 1 }
            })
            .bind_async(|v| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Outcome::success(v) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.error().map(Failure::message), Some("x"));
    }

    #[tokio::test]
    async fn test_compensate_on_pending() {
        let outcome = pending(Outcome::<()>::failure("E1"))
            .compensate(|_| Outcome::<()>::failure("E2"))
            .await;
        let messages: Vec<_> = outcome.errors().map(Failure::message).collect();
        assert_eq!(messages, vec!["E1", "E2"]);
    }

    #[tokio::test]
    async fn test_append_and_prepend_on_pending() {
        let outcome = pending(Outcome::<()>::failure("core"))
            .append_error("!")
            .prepend_error("ctx: ")
            .await;
        assert_eq!(outcome.error().map(Failure::message), Some("ctx: core!"));
    }

    #[tokio::test]
    async fn test_maybe_future_ext() {
        let value = async { Maybe::Some(4) }
            .map(|v| v * 2)
            .filter_async(|v| {
                let even = v % 2 == 0;
                async move { even }
            })
            .value_or(0)
            .await;
        assert_eq!(value, 8);

        let none = async { Maybe::<i32>::None }
            .to_outcome_with(|| "missing")
            .await;
        assert_eq!(none.error().map(Failure::message), Some("missing"));
    }

    #[tokio::test]
    async fn test_pending_metadata_overloads() {
        let mut map = HashMap::new();
        map.insert("region".to_string(), "eu");

        let outcome = pending(Outcome::success(1))
            .with_metadata_map(map)
            .with_metadata_entries([("attempt", 2u8)])
            .merge_metadata(Metadata::new().with("REGION", "us"))
            .configure_metadata(|builder| builder.with("checked", true))
            .await;

        assert_eq!(outcome.metadata().get_as::<&str>("region"), Some(&"us"));
        assert_eq!(outcome.metadata().get_as::<u8>("attempt"), Some(&2));
        assert!(outcome.metadata().contains_key("checked"));
    }

    #[tokio::test]
    async fn test_pending_try_boundary() {
        let parsed = pending(Outcome::success("42"))
            .try_map(|raw| raw.parse::<i32>())
            .try_tap(|n| {
                if *n > 0 {
                    Ok(())
                } else {
                    Err(std::io::Error::other("not positive"))
                }
            })
            .await;
        assert_eq!(parsed.value(), Some(&42));

        let bad = pending(Outcome::success("x")).try_map(|raw| raw.parse::<i32>()).await;
        assert_eq!(bad.error().map(Failure::code), Some("Exception"));
    }

    #[tokio::test]
    async fn test_pending_throwing_accessors() {
        let thrown = pending(Outcome::<i32>::failure("gone"))
            .value_or_throw_with(|failure| failure.message().len())
            .await;
        assert_eq!(thrown, Err(4));

        let kept = pending(Outcome::success(3)).throw_if_failed().await;
        assert_eq!(kept.ok().and_then(Outcome::into_value), Some(3));
        assert!(pending(Outcome::<i32>::failure("gone")).throw_if_failed().await.is_err());
    }

    #[tokio::test]
    async fn test_pending_policy_variants() {
        let inner = Outcome::success(5).with_metadata("inner", 1);
        let nested = pending(Outcome::success(inner).with_metadata("outer", 1))
            .flatten_with(MetadataPolicy::Discard)
            .await;
        assert_eq!(nested.value(), Some(&5));
        assert!(!nested.metadata().contains_key("outer"));

        let bound = pending(Outcome::success(2).with_metadata("outer", 1))
            .bind_with_async(MetadataPolicy::Merge, |v| async move {
                Outcome::success(v * 10).with_metadata("inner", 1)
            })
            .await;
        assert_eq!(bound.value(), Some(&20));
        assert!(bound.metadata().contains_key("outer"));
        assert!(bound.metadata().contains_key("inner"));
    }

    #[tokio::test]
    async fn test_into_task_boxes_both_kinds() {
        let tasks: Vec<OutcomeTask<i32>> = vec![
            pending(Outcome::success(1)).into_task(),
            pending(Outcome::success(2)).map(|v| v * 10).into_task(),
        ];
        let mut total = 0;
        for task in tasks {
            total += task.await.value_or(0);
        }
        assert_eq!(total, 21);

        let maybe: MaybeTask<&str> = async { Maybe::Some("x") }.into_task();
        assert_eq!(maybe.await, Maybe::Some("x"));
    }
}
