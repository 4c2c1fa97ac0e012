//! Testing utilities
//!
//! Assertion macros for [`Outcome`](crate::Outcome) and [`Maybe`](crate::Maybe)
//! and, behind the `proptest` feature, `Arbitrary` implementations for both.
//!
//! # Examples
//!
//! ```rust
//! use tributary::{assert_failure, assert_failure_message, assert_none, assert_some, assert_success};
//! use tributary::{Maybe, Outcome};
//!
//! let value = assert_success!(Outcome::success(42));
//! assert_eq!(value, 42);
//!
//! let failure = assert_failure!(Outcome::<i32>::failure("no route"));
//! assert_eq!(failure.code(), "Error");
//!
//! assert_failure_message!(Outcome::<()>::failure("no route"), "no route");
//!
//! assert_eq!(assert_some!(Maybe::Some(1)), 1);
//! assert_none!(Maybe::<i32>::None);
//! ```

/// Assert that an outcome succeeded, evaluating to its value.
///
/// # Example
///
/// ```rust
/// use tributary::{assert_success, Outcome};
///
/// let value = assert_success!(Outcome::success("ready"));
/// assert_eq!(value, "ready");
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $crate::Outcome::into_result($outcome) {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(failure) => {
                panic!("Expected Success, got Failure: {:?}", failure);
            }
        }
    };
}

/// Assert that an outcome failed, evaluating to its [`Failure`](crate::Failure).
///
/// # Example
///
/// ```rust
/// use tributary::{assert_failure, Outcome};
///
/// let failure = assert_failure!(Outcome::<i32>::failure("timeout"));
/// assert_eq!(failure.message(), "timeout");
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $crate::Outcome::into_result($outcome) {
            ::std::result::Result::Err(failure) => failure,
            ::std::result::Result::Ok(value) => {
                panic!("Expected Failure, got Success: {:?}", value);
            }
        }
    };
}

/// Assert that an outcome failed with a specific message.
///
/// # Example
///
/// ```rust
/// use tributary::{assert_failure_message, Outcome};
///
/// assert_failure_message!(Outcome::<()>::failure("quota exceeded"), "quota exceeded");
/// ```
#[macro_export]
macro_rules! assert_failure_message {
    ($outcome:expr, $expected:expr) => {
        match $crate::Outcome::into_result($outcome) {
            ::std::result::Result::Err(failure) => {
                assert_eq!(failure.message(), $expected);
            }
            ::std::result::Result::Ok(value) => {
                panic!(
                    "Expected Failure with message {:?}, got Success: {:?}",
                    $expected, value
                );
            }
        }
    };
}

/// Assert that a maybe holds a value, evaluating to it.
#[macro_export]
macro_rules! assert_some {
    ($maybe:expr) => {
        match $maybe {
            $crate::Maybe::Some(value) => value,
            $crate::Maybe::None => panic!("Expected Some, got None"),
        }
    };
}

/// Assert that a maybe is empty.
#[macro_export]
macro_rules! assert_none {
    ($maybe:expr) => {
        match $maybe {
            $crate::Maybe::None => {}
            $crate::Maybe::Some(value) => {
                panic!("Expected None, got Some: {:?}", value);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;
#[cfg(feature = "proptest")]
use proptest::strategy::LazyJust;

#[cfg(feature = "proptest")]
use crate::{Failure, Maybe, Outcome};

#[cfg(feature = "proptest")]
impl<T> Arbitrary for Maybe<T>
where
    T: Arbitrary + 'static,
{
    type Parameters = T::Parameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any_with::<T>(args).prop_map(Maybe::Some),
            LazyJust::new(|| Maybe::None),
        ]
        .boxed()
    }
}

/// Successes and plain failures with short codes and messages.
#[cfg(feature = "proptest")]
impl<T> Arbitrary for Outcome<T>
where
    T: Arbitrary + 'static,
{
    type Parameters = T::Parameters;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any_with::<T>(args).prop_map(Outcome::success),
            ("[A-Z][a-z]{0,8}", "[a-z ]{1,16}")
                .prop_map(|(code, message)| Outcome::<T>::failure(Failure::with_code(code, message))),
        ]
        .boxed()
    }
}
