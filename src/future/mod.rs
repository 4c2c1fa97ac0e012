//! Asynchronous surfaces
//!
//! The combinator algebra is written once over any `Future` whose output is an
//! [`Outcome`](crate::Outcome) or a [`Maybe`](crate::Maybe):
//!
//! - [`OutcomeFutureExt`] / [`MaybeFutureExt`] - extension traits for any
//!   pending value, including plain `async` blocks
//! - [`OutcomeTask`] / [`MaybeTask`] - boxed, `Send`, awaited once
//! - [`SharedOutcomeTask`] / [`SharedMaybeTask`] - cloneable and re-awaitable
//! - [`combine`] / [`combine_all`] - sequential, in-order collection
//!
//! Nothing here spawns work or awaits concurrently. Each combinator is a single
//! continuation: await the input, apply the synchronous rule, and await the
//! callback if it is async.
//!
//! # Example
//!
//! ```
//! use tributary::prelude::*;
//!
//! async fn fetch_balance(account: &str) -> Outcome<i64> {
//!     if account == "acme" {
//!         Outcome::success(120)
//!     } else {
//!         Outcome::failure("unknown account")
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let task = fetch_balance("acme")
//!     .with_metadata("account", "acme")
//!     .ensure(|b| *b >= 100, |b| format!("balance {} below minimum", b))
//!     .into_task();
//!
//! let outcome = task.await;
//! assert_eq!(outcome.value(), Some(&120));
//! # });
//! ```

mod combine;
mod ext;
mod task;
#[cfg(feature = "tracing")]
mod tracing;

pub use combine::{combine, combine_all};
pub use ext::{MaybeFutureExt, OutcomeFutureExt};
pub use task::{MaybeTask, OutcomeTask, SharedMaybeTask, SharedOutcomeTask};
#[cfg(feature = "tracing")]
pub use self::tracing::OutcomeTracingExt;
