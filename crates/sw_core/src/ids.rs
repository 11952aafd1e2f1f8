//! crates/sw_core/src/ids.rs
//! Identifier newtypes for lists, regions, districts and candidates.
//! Identifiers come from external reference data and may carry spaces or
//! non-ASCII letters ("Lista Civica Nord"), so the shape check is about
//! cleanliness, not charset: non-empty, trimmed, bounded, no control chars.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when validating or parsing identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier longer than {MAX_ID_LEN} bytes")]
    TooLong,
    #[error("identifier has surrounding whitespace or control characters")]
    BadShape,
}

const MAX_ID_LEN: usize = 128;

/// Shape check shared by every identifier type.
#[inline]
pub fn check_identifier(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    if s.trim() != s || s.chars().any(char::is_control) {
        return Err(IdError::BadShape);
    }
    Ok(())
}

macro_rules! simple_string_newtype {
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
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_identifier(s)?;
                Ok($name(s.to_owned()))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                check_identifier(&value)?;
                Ok($name(value))
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(id: $name) -> String { id.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

simple_string_newtype!(
    /// Party list or coalition competing for seats.
    ListId
);
simple_string_newtype!(
    /// Proportional region (constituency) with its own seat count.
    RegionId
);
simple_string_newtype!(
    /// Single-winner district.
    DistrictId
);
simple_string_newtype!(
    /// Candidate standing in a single-winner district.
    CandidateId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_world_names() {
        for ok in ["A", "PD", "Lista Civica Nord", "Fratelli-d'Italia", "Südtirol", "R:01"] {
            assert!(check_identifier(ok).is_ok(), "{ok}");
            let l: ListId = ok.parse().unwrap();
            assert_eq!(l.as_str(), ok);
            assert_eq!(format!("{l}"), ok);
        }
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!("".parse::<RegionId>(), Err(IdError::Empty));
        assert_eq!(" A".parse::<RegionId>(), Err(IdError::BadShape));
        assert_eq!("A\n".parse::<DistrictId>(), Err(IdError::BadShape));
        assert_eq!("A\tB".parse::<CandidateId>(), Err(IdError::BadShape));
        let long = "x".repeat(MAX_ID_LEN + 1);
        assert_eq!(long.parse::<ListId>(), Err(IdError::TooLong));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut v: Vec<ListId> = ["b", "B", "a"].iter().map(|s| s.parse().unwrap()).collect();
        v.sort();
        let got: Vec<&str> = v.iter().map(|l| l.as_str()).collect();
        assert_eq!(got, vec!["B", "a", "b"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_validates_on_the_way_in() {
        let l: ListId = serde_json::from_str("\"PD\"").unwrap();
        assert_eq!(serde_json::to_string(&l).unwrap(), "\"PD\"");
        assert!(serde_json::from_str::<ListId>("\"\"").is_err());
    }
}
