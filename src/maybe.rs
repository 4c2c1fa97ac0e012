//! Optional values
//!
//! [`Maybe<T>`] is an immutable two-state container: `Some(T)` or `None`. It
//! mirrors `Option` but speaks the same combinator vocabulary as
//! [`Outcome`](crate::Outcome) and converts into one with
//! [`to_outcome`](Maybe::to_outcome).
//!
//! # Examples
//!
//! ```
//! use tributary::Maybe;
//!
//! let port = Maybe::some("8080")
//!     .bind(|s| Maybe::from(s.parse::<u16>().ok()))
//!     .filter(|p| *p > 1024)
//!     .value_or(80);
//!
//! assert_eq!(port, 8080);
//! ```

use std::future::Future;

use crate::failure::Failure;
use crate::outcome::Outcome;

/// An optional value.
///
/// Variants are always written qualified (`Maybe::Some`, `Maybe::None`) so they
/// never shadow `Option`'s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Maybe<T> {
    /// A present value.
    Some(T),
    /// No value.
    None,
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::None
    }
}

impl<T> Maybe<T> {
    // ========== Constructors ==========

    /// Wrap a present value.
    #[inline]
    pub fn some(value: T) -> Self {
        Maybe::Some(value)
    }

    /// The empty value.
    #[inline]
    pub fn none() -> Self {
        Maybe::None
    }

    // ========== Predicates ==========

    /// Returns `true` for `Some`.
    #[inline]
    pub fn is_some(&self) -> bool {
        matches!(self, Maybe::Some(_))
    }

    /// Returns `true` for `None`.
    #[inline]
    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Returns `true` for `Some` when `predicate` holds for the value.
    #[inline]
    pub fn is_some_and(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Maybe::Some(value) => predicate(value),
            Maybe::None => false,
        }
    }

    // ========== Extractors ==========

    /// Borrow the value.
    #[inline]
    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Some(value) => Maybe::Some(value),
            Maybe::None => Maybe::None,
        }
    }

    /// Convert into an `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Maybe::Some(value) => Some(value),
            Maybe::None => None,
        }
    }

    /// The value, or `fallback`.
    #[inline]
    pub fn value_or(self, fallback: T) -> T {
        match self {
            Maybe::Some(value) => value,
            Maybe::None => fallback,
        }
    }

    /// The value, or the result of `fallback`. `fallback` only runs for `None`.
    #[inline]
    pub fn value_or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Maybe::Some(value) => value,
            Maybe::None => fallback(),
        }
    }

    /// The value, or `T::default()`.
    #[inline]
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.value_or_else(T::default)
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics on `None`.
    #[track_caller]
    pub fn unwrap(self) -> T {
        self.expect("called `Maybe::unwrap()` on a `None` value")
    }

    /// The value.
    ///
    /// # Panics
    ///
    /// Panics on `None` with `msg`.
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self {
            Maybe::Some(value) => value,
            Maybe::None => panic!("{}", msg),
        }
    }

    /// Iterate over the value, if any.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.as_ref().into_option().into_iter()
    }

    // ========== Side effects ==========

    /// Run `action` on the value if present.
    pub fn if_some(self, action: impl FnOnce(&T)) -> Self {
        if let Maybe::Some(value) = &self {
            action(value);
        }
        self
    }

    /// Run `action` if empty.
    pub fn if_none(self, action: impl FnOnce()) -> Self {
        if self.is_none() {
            action();
        }
        self
    }

    /// Run `action` on the value if present. Same as [`if_some`](Self::if_some),
    /// named for pipelines.
    pub fn tap(self, action: impl FnOnce(&T)) -> Self {
        self.if_some(action)
    }

    // ========== Transformations ==========

    /// Exactly one branch runs; both produce the same output type.
    pub fn fold<R>(self, on_some: impl FnOnce(T) -> R, on_none: impl FnOnce() -> R) -> R {
        match self {
            Maybe::Some(value) => on_some(value),
            Maybe::None => on_none(),
        }
    }

    /// Transform the value. `None` stays `None`.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Maybe::Some(value) => Maybe::Some(f(value)),
            Maybe::None => Maybe::None,
        }
    }

    /// Keep the value only if `predicate` holds.
    #[inline]
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        if let Maybe::Some(value) = self {
            if predicate(&value) {
                return Maybe::Some(value);
            }
        }
        Maybe::None
    }

    /// Chain a computation that may itself be empty.
    #[inline]
    pub fn bind<U>(self, f: impl FnOnce(T) -> Maybe<U>) -> Maybe<U> {
        match self {
            Maybe::Some(value) => f(value),
            Maybe::None => Maybe::None,
        }
    }

    /// `self` if present, otherwise `other`.
    #[inline]
    pub fn or(self, other: Maybe<T>) -> Self {
        match self {
            Maybe::Some(_) => self,
            Maybe::None => other,
        }
    }

    /// `self` if present, otherwise the result of `f`.
    #[inline]
    pub fn or_else(self, f: impl FnOnce() -> Maybe<T>) -> Self {
        match self {
            Maybe::Some(_) => self,
            Maybe::None => f(),
        }
    }

    /// Pair two values when both are present.
    pub fn zip<U>(self, other: Maybe<U>) -> Maybe<(T, U)> {
        match (self, other) {
            (Maybe::Some(a), Maybe::Some(b)) => Maybe::Some((a, b)),
            _ => Maybe::None,
        }
    }

    // ========== Conversions ==========

    /// `Some(v)` becomes a success; `None` becomes a failure built from `failure`.
    ///
    /// ```
    /// use tributary::Maybe;
    ///
    /// let found = Maybe::some(5).to_outcome("not found").fold(|v| v, |_| -1);
    /// assert_eq!(found, 5);
    ///
    /// let missing = Maybe::<i32>::none().to_outcome("not found");
    /// assert_eq!(missing.error().map(|e| e.message()), Some("not found"));
    /// ```
    pub fn to_outcome(self, failure: impl Into<Failure>) -> Outcome<T> {
        match self {
            Maybe::Some(value) => Outcome::success(value),
            Maybe::None => Outcome::failure(failure),
        }
    }

    /// Like [`to_outcome`](Self::to_outcome), building the failure only for `None`.
    pub fn to_outcome_with<F>(self, failure: impl FnOnce() -> F) -> Outcome<T>
    where
        F: Into<Failure>,
    {
        match self {
            Maybe::Some(value) => Outcome::success(value),
            Maybe::None => Outcome::failure(failure()),
        }
    }

    // ========== Async callbacks ==========

    /// Await `action` on the value if present. `None` never suspends.
    pub async fn if_some_async<Fut>(self, action: impl FnOnce(&T) -> Fut) -> Self
    where
        Fut: Future<Output = ()>,
    {
        if let Maybe::Some(value) = &self {
            action(value).await;
        }
        self
    }

    /// Await `action` if empty. `Some` never suspends.
    pub async fn if_none_async<Fut>(self, action: impl FnOnce() -> Fut) -> Self
    where
        Fut: Future<Output = ()>,
    {
        if self.is_none() {
            action().await;
        }
        self
    }

    /// Async [`map`](Self::map).
    pub async fn map_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> Maybe<U>
    where
        Fut: Future<Output = U>,
    {
        match self {
            Maybe::Some(value) => Maybe::Some(f(value).await),
            Maybe::None => Maybe::None,
        }
    }

    /// Async [`bind`](Self::bind).
    pub async fn bind_async<U, Fut>(self, f: impl FnOnce(T) -> Fut) -> Maybe<U>
    where
        Fut: Future<Output = Maybe<U>>,
    {
        match self {
            Maybe::Some(value) => f(value).await,
            Maybe::None => Maybe::None,
        }
    }

    /// Async [`filter`](Self::filter).
    pub async fn filter_async<Fut>(self, predicate: impl FnOnce(&T) -> Fut) -> Self
    where
        Fut: Future<Output = bool>,
    {
        match self {
            Maybe::Some(value) => {
                if predicate(&value).await {
                    Maybe::Some(value)
                } else {
                    Maybe::None
                }
            }
            Maybe::None => Maybe::None,
        }
    }

    /// Async [`fold`](Self::fold).
    pub async fn fold_async<R, SomeFut, NoneFut>(
        self,
        on_some: impl FnOnce(T) -> SomeFut,
        on_none: impl FnOnce() -> NoneFut,
    ) -> R
    where
        SomeFut: Future<Output = R>,
        NoneFut: Future<Output = R>,
    {
        match self {
            Maybe::Some(value) => on_some(value).await,
            Maybe::None => on_none().await,
        }
    }
}

impl<T> Maybe<Maybe<T>> {
    /// Remove one level of nesting.
    pub fn flatten(self) -> Maybe<T> {
        self.bind(|inner| inner)
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Maybe::Some(value),
            None => Maybe::None,
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(maybe: Maybe<T>) -> Self {
        maybe.into_option()
    }
}

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_option().into_iter()
    }
}
