//! Sequential combine over pending outcomes.

use std::future::Future;

use crate::outcome::{Accumulator, Outcome};

/// Await each future in order and combine the results.
///
/// Futures are awaited one after another, never concurrently, so side effects
/// happen in the supplied order. The result follows the rules of
/// [`Outcome::combine`].
///
/// ```
/// use tributary::future;
/// use tributary::Outcome;
///
/// # tokio_test::block_on(async {
/// let combined = future::combine(vec![
///     future::OutcomeTask::new(async { Outcome::success(1) }),
///     future::OutcomeTask::failure("second"),
///     future::OutcomeTask::success(3),
/// ])
/// .await;
///
/// assert_eq!(combined.errors().map(|e| e.message()).collect::<Vec<_>>(), vec!["second"]);
/// # });
/// ```
pub async fn combine<T, I>(futures: I) -> Outcome<Vec<T>>
where
    I: IntoIterator,
    I::Item: Future<Output = Outcome<T>>,
{
    let futures = futures.into_iter();
    let mut acc = Accumulator::with_capacity(futures.size_hint().0);
    for future in futures {
        acc.push(future.await);
    }
    acc.finish()
}

/// [`combine`], discarding the values.
pub async fn combine_all<U, I>(futures: I) -> Outcome<()>
where
    I: IntoIterator,
    I::Item: Future<Output = Outcome<U>>,
{
    combine(futures).await.into_unit()
}
