//! # Tributary
//!
//! Outcome and Maybe types with a combinator algebra that carries metadata
//! and structured failures through long sync and async pipelines.
//!
//! ## Overview
//!
//! - [`Outcome<T>`] - success holding a `T`, or a [`Failure`]; always carries
//!   a case-insensitive [`Metadata`] bag
//! - [`Maybe<T>`] - `Some(T)` or `None`
//! - [`failure`] - the failure taxonomy: simple, aggregate and exceptional
//! - [`future`] - the same algebra over pending values
//!
//! Failures are data. The only places a failure becomes a Rust error are the
//! explicit [`Outcome::value_or_throw`] and [`Outcome::throw_if_failed`]
//! calls, and the only places native errors and panics become failures are
//! [`Outcome::attempt`], [`Outcome::try_map`], [`Outcome::try_tap`] and
//! [`Outcome::catch_panic`].
//!
//! ## Quick Example
//!
//! ```rust
//! use tributary::prelude::*;
//!
//! fn parse_port(raw: &str) -> Outcome<u16> {
//!     Outcome::attempt(|| raw.parse::<u16>())
//!         .with_metadata("input", raw.to_string())
//!         .ensure(|port| *port >= 1024, |port| format!("port {} is privileged", port))
//! }
//!
//! let ok = parse_port("8080");
//! assert_eq!(ok.value(), Some(&8080));
//!
//! let low = parse_port("80");
//! assert_eq!(low.error().map(|e| e.message()), Some("port 80 is privileged"));
//! assert_eq!(low.metadata().get_as::<String>("INPUT").map(String::as_str), Some("80"));
//!
//! // Collect every failure, in order
//! let all = Outcome::combine(["8080", "x", "9000", "y"].map(parse_port));
//! assert_eq!(all.errors().count(), 2);
//! ```
//!
//! ## Features
//!
//! - `tokio` - adapt `tokio::task::JoinHandle` into tasks
//! - `tracing` - span instrumentation and failure events
//! - `serde` - `Serialize` for outcomes and failures, `Serialize`/`Deserialize` for `Maybe`
//! - `proptest` - `Arbitrary` for `Outcome` and `Maybe`

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod failure;
pub mod future;
pub mod maybe;
pub mod metadata;
pub mod outcome;
pub mod testing;

#[cfg(feature = "serde")]
mod serde_impl;

// Re-exports
pub use failure::{
    AggregateFailure, ExceptionalFailure, Failure, FailureError, FailureKind, SimpleFailure,
    WrapError,
};
pub use future::{MaybeFutureExt, MaybeTask, OutcomeFutureExt, OutcomeTask};
pub use maybe::Maybe;
pub use metadata::{Metadata, MetadataBuilder, MetadataValue};
pub use outcome::{IntoOutcome, MetadataPolicy, Outcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::failure::{
        AggregateFailure, ExceptionalFailure, Failure, FailureKind, SimpleFailure, WrapError,
    };
    pub use crate::future::{MaybeFutureExt, MaybeTask, OutcomeFutureExt, OutcomeTask};
    pub use crate::maybe::Maybe;
    pub use crate::metadata::Metadata;
    pub use crate::outcome::{IntoOutcome, MetadataPolicy, Outcome};
}
