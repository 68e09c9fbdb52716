//! crates/tr_core/src/ids.rs
//! Identifier tokens for trips and their owned entries.
//! Deterministic, ASCII-only, strict shapes; no I/O.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const TOKEN_MAX_LEN: usize = 64;

/// Token: ^[A-Za-z0-9_.:-]{1,64}$ (ASCII only). UUID strings fit this shape.
#[inline]
pub fn is_valid_token(s: &str) -> bool {
    let bs = s.as_bytes();
    let len = bs.len();
    if len == 0 || len > TOKEN_MAX_LEN {
        return false;
    }
    bs.iter().all(|&b| {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b':' || b == b'-'
    })
}

macro_rules! token_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_token(s) { Ok($name(s.to_owned())) } else { Err(CoreError::InvalidId) }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                if is_valid_token(&value) { Ok($name(value)) } else { Err(CoreError::InvalidId) }
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(v: $name) -> String { v.0 }
        }
    }
}

token_newtype!(
    /// Trip identifier (unique per store).
    TripId
);
token_newtype!(
    /// Itinerary or expense entry identifier (unique within its trip).
    EntryId
);
