//! Collecting many outcomes into one.

use super::Outcome;
use crate::failure::{AggregateFailure, Failure};
use crate::metadata::Metadata;

/// Running state of a combine, fed one outcome at a time in encounter order.
///
/// The async combine in [`crate::future`] awaits its inputs one by one and
/// feeds them through the same accumulator.
#[derive(Debug)]
pub(crate) struct Accumulator<T> {
    values: Vec<T>,
    failures: Vec<Failure>,
    metadata: Metadata,
}

impl<T> Accumulator<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Accumulator {
            values: Vec::with_capacity(capacity),
            failures: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: Outcome<T>) {
        let (state, metadata) = outcome.into_parts();
        self.metadata.extend_from(&metadata);
        match state {
            // values are dropped once anything has failed
            Ok(value) if self.failures.is_empty() => self.values.push(value),
            Ok(_) => {}
            Err(failure) => {
                self.values.clear();
                self.failures.push(failure);
            }
        }
    }

    pub(crate) fn finish(self) -> Outcome<Vec<T>> {
        let state = match AggregateFailure::from_vec(self.failures) {
            Some(aggregate) => Err(aggregate.into()),
            None => Ok(self.values),
        };
        Outcome::from_parts(state, self.metadata)
    }
}

impl<T> Outcome<Vec<T>> {
    /// Collect outcomes in order.
    ///
    /// All successes give a success holding every value in order. Any failure
    /// gives an [`AggregateFailure`] of every failure in encounter order, and
    /// the success values are discarded. Metadata of every input is merged in
    /// order, later entries winning.
    ///
    /// ```
    /// use tributary::Outcome;
    ///
    /// let all = Outcome::combine(vec![Outcome::success(1), Outcome::success(2)]);
    /// assert_eq!(all.value(), Some(&vec![1, 2]));
    ///
    /// let some_failed = Outcome::combine(vec![
    ///     Outcome::failure("A"),
    ///     Outcome::success(2),
    ///     Outcome::failure("B"),
    /// ]);
    /// let messages: Vec<_> = some_failed.errors().map(|e| e.message()).collect();
    /// assert_eq!(messages, vec!["A", "B"]);
    /// ```
    pub fn combine<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome<T>>,
    {
        let outcomes = outcomes.into_iter();
        let mut acc = Accumulator::with_capacity(outcomes.size_hint().0);
        for outcome in outcomes {
            acc.push(outcome);
        }
        acc.finish()
    }
}

impl Outcome<()> {
    /// Collect outcomes in order, discarding their values.
    ///
    /// Same rules as [`Outcome::combine`].
    pub fn combine_all<U, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome<U>>,
    {
        Outcome::combine(outcomes.into_iter().map(Outcome::into_unit)).into_unit()
    }
}

impl<T> Outcome<T> {
    /// Pair two outcomes.
    ///
    /// Both successes give a tuple. Otherwise every failure present, in order,
    /// is collected into an [`AggregateFailure`]. Metadata of `self` is merged
    /// with that of `other`.
    pub fn and<U>(self, other: Outcome<U>) -> Outcome<(T, U)> {
        let (left, left_meta) = self.into_parts();
        let (right, right_meta) = other.into_parts();
        let metadata = left_meta.merge(&right_meta);
        let state = match (left, right) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(a), Ok(_)) => Err(AggregateFailure::new(a, []).into()),
            (Ok(_), Err(b)) => Err(AggregateFailure::new(b, []).into()),
            (Err(a), Err(b)) => Err(AggregateFailure::new(a, [b]).into()),
        };
        Outcome::from_parts(state, metadata)
    }
}

impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        Outcome::combine(iter)
    }
}
