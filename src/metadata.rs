//! Case-insensitive side-channel metadata
//!
//! Every [`Outcome`](crate::Outcome) carries a [`Metadata`] bag next to its
//! value or failure. Metadata never decides success or failure; it is context
//! (trace ids, timings, diagnostic hints) that combinators carry forward.
//!
//! Keys compare case-insensitively and keep insertion order. Values are opaque:
//! anything that is `Debug + PartialEq + Send + Sync + 'static` can be stored,
//! and reading it back requires naming the exact stored type.
//!
//! # Examples
//!
//! ```
//! use tributary::Metadata;
//!
//! let meta = Metadata::new()
//!     .with("TraceId", "abc-123")
//!     .with("attempt", 2u32);
//!
//! assert_eq!(meta.get_as::<&str>("traceid"), Some(&"abc-123"));
//! assert_eq!(meta.get_as::<u32>("ATTEMPT"), Some(&2));
//! assert_eq!(meta.len(), 2);
//! ```
//!
//! Storage is shared between clones and copied on write, so threading the same
//! bag through a long pipeline does not copy it per step.

use std::any::Any;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// A value that can be stored in [`Metadata`].
///
/// Implemented for every `Debug + PartialEq + Send + Sync + 'static` type.
pub trait MetadataValue: Any + fmt::Debug + Send + Sync {
    /// Compare against another stored value. Values of different types are never equal.
    fn eq_value(&self, other: &dyn MetadataValue) -> bool;
}

impl<T> MetadataValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn eq_value(&self, other: &dyn MetadataValue) -> bool {
        let other: &dyn Any = other;
        other.downcast_ref::<T>().is_some_and(|other| other == self)
    }
}

impl dyn MetadataValue {
    /// Borrow the stored value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Returns true if the stored value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

type Entry = (String, Arc<dyn MetadataValue>);

fn keys_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

/// Insertion-ordered, case-insensitive map of opaque values.
///
/// # Examples
///
/// ```
/// use tributary::Metadata;
///
/// let base = Metadata::new().with("region", "eu").with("tier", "gold");
/// let overlay = Metadata::new().with("REGION", "us");
///
/// let merged = base.merge(&overlay);
/// assert_eq!(merged.get_as::<&str>("region"), Some(&"us"));
/// assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["region", "tier"]);
/// ```
#[derive(Clone, Default)]
pub struct Metadata {
    entries: Arc<Vec<Entry>>,
}

impl Metadata {
    /// Create an empty metadata bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a [`MetadataBuilder`].
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::new()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| keys_match(k, key))
    }

    /// Returns true if an entry exists for `key` (case-insensitive).
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Look up the stored value for `key`.
    pub fn get(&self, key: &str) -> Option<&dyn MetadataValue> {
        self.position(key).map(|idx| &*self.entries[idx].1)
    }

    /// Look up the value for `key` and downcast it to `T`.
    ///
    /// Returns `None` when the key is missing or the stored value is not a `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// Insert or replace an entry.
    ///
    /// Replacing keeps the entry's original position and key spelling.
    pub fn insert(&mut self, key: impl Into<String>, value: impl MetadataValue) {
        self.insert_shared(key.into(), Arc::new(value));
    }

    fn insert_shared(&mut self, key: String, value: Arc<dyn MetadataValue>) {
        let entries = Arc::make_mut(&mut self.entries);
        match entries.iter_mut().find(|(k, _)| keys_match(k, &key)) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Remove the entry for `key`, returning true if one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(idx) => {
                Arc::make_mut(&mut self.entries).remove(idx);
                true
            }
            None => false,
        }
    }

    /// Consuming form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl MetadataValue) -> Self {
        self.insert(key, value);
        self
    }

    /// A new bag holding `self` overridden by `other`.
    ///
    /// Entries of `other` win on key collision.
    pub fn merge(&self, other: &Metadata) -> Metadata {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    pub(crate) fn extend_from(&mut self, other: &Metadata) {
        for (key, value) in other.entries.iter() {
            self.insert_shared(key.clone(), Arc::clone(value));
        }
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), &**v))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Render at most `take` entries, appending `...` when entries were skipped.
    ///
    /// ```
    /// use tributary::Metadata;
    ///
    /// let meta = Metadata::new().with("a", 1).with("b", 2).with("c", 3);
    /// assert_eq!(meta.to_string_bounded(2), "{a: 1, b: 2, ...}");
    /// assert_eq!(meta.to_string(), "{a: 1, b: 2, c: 3}");
    /// ```
    pub fn to_string_bounded(&self, take: usize) -> String {
        let mut out = String::from("{");
        for (idx, (key, value)) in self.entries.iter().take(take).enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("{}: {:?}", key, value));
        }
        if self.entries.len() > take {
            if take > 0 {
                out.push_str(", ");
            }
            out.push_str("...");
        }
        out.push('}');
        out
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_bounded(usize::MAX))
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
            || self.len() == other.len()
                && self.entries.iter().all(|(key, value)| {
                    other
                        .get(key)
                        .is_some_and(|theirs| value.eq_value(theirs))
                })
    }
}

impl Index<&str> for Metadata {
    type Output = dyn MetadataValue;

    /// # Panics
    ///
    /// Panics if no entry exists for `key`.
    #[track_caller]
    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no metadata entry for key {:?}", key),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: MetadataValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        meta.extend(iter);
        meta
    }
}

impl<K, V> Extend<(K, V)> for Metadata
where
    K: Into<String>,
    V: MetadataValue,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Fluent builder for [`Metadata`].
///
/// # Example
///
/// ```
/// use tributary::Metadata;
///
/// let meta = Metadata::builder()
///     .with("user", "alice")
///     .with("retries", 0u8)
///     .build();
///
/// assert!(meta.contains_key("USER"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MetadataBuilder {
    metadata: Metadata,
}

impl MetadataBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing bag.
    pub fn from_metadata(metadata: Metadata) -> Self {
        Self { metadata }
    }

    /// Add or replace an entry.
    pub fn with(mut self, key: impl Into<String>, value: impl MetadataValue) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Copy every entry of `other` into the builder, overriding existing keys.
    pub fn with_all(mut self, other: &Metadata) -> Self {
        self.metadata.extend_from(other);
        self
    }

    /// Remove an entry if present.
    pub fn without(mut self, key: &str) -> Self {
        self.metadata.remove(key);
        self
    }

    /// Finish building.
    pub fn build(self) -> Metadata {
        self.metadata
    }
}
