//! Tracing support for pending outcomes.
//!
//! Feature-gated behind `#[cfg(feature = "tracing")]`.

use std::future::Future;

use tracing::instrument::Instrumented;
use tracing::Instrument as _;

use crate::outcome::Outcome;

/// Extension trait for tracing pending outcomes.
///
/// This trait is only available when the `tracing` feature is enabled. The span
/// method is named `in_span` so it does not clash with `tracing::Instrument`.
pub trait OutcomeTracingExt<T>: Future<Output = Outcome<T>> + Sized {
    /// Run this future inside `span`.
    ///
    /// The span is entered on every poll and exited when the poll returns.
    ///
    /// # Example
    ///
    /// ```
    /// use tributary::future::OutcomeTracingExt;
    /// use tributary::Outcome;
    ///
    /// # tokio_test::block_on(async {
    /// let order = async { Outcome::success(42) }
    ///     .in_span(tracing::info_span!("load_order", order_id = 42))
    ///     .await;
    /// assert_eq!(order.value(), Some(&42));
    /// # });
    /// ```
    fn in_span(self, span: tracing::Span) -> Instrumented<Self> {
        self.instrument(span)
    }

    /// Emit a warning when the outcome is faulted. See [`Outcome::trace_failure`].
    fn trace_failure(self, context: impl Into<String>) -> impl Future<Output = Outcome<T>> {
        let context = context.into();
        async move { self.await.trace_failure(&context) }
    }
}

impl<F, T> OutcomeTracingExt<T> for F where F: Future<Output = Outcome<T>> {}
