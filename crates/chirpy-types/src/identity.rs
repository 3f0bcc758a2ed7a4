use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The first identifier handed out in an empty collection.
            pub const FIRST: Self = Self(1);

            /// Wrap a raw value. Zero is rejected: identifiers are positive.
            pub fn new(raw: u64) -> Result<Self, TypeError> {
                if raw == 0 {
                    return Err(TypeError::ZeroId);
                }
                Ok(Self(raw))
            }

            /// The raw integer value.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// The identifier immediately after this one, or `None` on overflow.
            pub fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: u64 = s
                    .parse()
                    .map_err(|_| TypeError::InvalidId(s.to_string()))?;
                Self::new(raw)
            }
        }
    };
}

entity_id!(
    /// Identifier of a user account. Immutable once assigned.
    UserId,
    "UserId"
);

entity_id!(
    /// Identifier of a chirp. Assigned in creation order and never reused.
    ChirpId,
    "ChirpId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(UserId::new(0), Err(TypeError::ZeroId));
        assert_eq!(ChirpId::new(0), Err(TypeError::ZeroId));
    }

    #[test]
    fn parse_from_decimal() {
        let id: ChirpId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("abc".parse::<UserId>(), Err(TypeError::InvalidId(_))));
        assert!(matches!("-1".parse::<UserId>(), Err(TypeError::InvalidId(_))));
        assert_eq!("0".parse::<UserId>(), Err(TypeError::ZeroId));
    }

    #[test]
    fn next_is_strictly_greater() {
        let id = ChirpId::FIRST;
        let next = id.next().unwrap();
        assert!(next > id);
        assert_eq!(next.get(), 2);
    }

    #[test]
    fn next_overflows_to_none() {
        let last = ChirpId::new(u64::MAX).unwrap();
        assert!(last.next().is_none());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = UserId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let parsed: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn debug_names_the_collection() {
        assert_eq!(format!("{:?}", UserId::FIRST), "UserId(1)");
        assert_eq!(format!("{:?}", ChirpId::FIRST), "ChirpId(1)");
    }
}
