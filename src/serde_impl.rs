//! Serde support (feature-gated)
//!
//! - [`Maybe<T>`] serializes and deserializes exactly like `Option<T>`.
//! - [`Failure`] serializes as `{"code", "message"}`, plus `"errors"` holding
//!   the members of an aggregate.
//! - [`Outcome<T>`] serializes as `{"success": true, "value": ...}` or
//!   `{"success": false, "error": ...}`.
//!
//! Metadata values are opaque and are never serialized. Outcomes and failures
//! are output-only; there is no `Deserialize` for them.
//!
//! # Example
//!
//! ```rust
//! use tributary::{Maybe, Outcome};
//!
//! let json = serde_json::to_string(&Outcome::success(3)).unwrap();
//! assert_eq!(json, r#"{"success":true,"value":3}"#);
//!
//! let nickname: Maybe<String> = serde_json::from_str("null").unwrap();
//! assert!(nickname.is_none());
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Failure, Maybe, Outcome};

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Maybe::Some(value) => serializer.serialize_some(value),
            Maybe::None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Maybe::from)
    }
}

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let members = self.as_aggregate().map(|aggregate| aggregate.errors());
        let len = if members.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Failure", len)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", self.message())?;
        if let Some(members) = members {
            state.serialize_field("errors", members)?;
        }
        state.end()
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self.as_result() {
            Ok(value) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
            }
            Err(failure) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", failure)?;
            }
        }
        state.end()
    }
}
