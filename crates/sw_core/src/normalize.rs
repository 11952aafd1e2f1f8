//! Tally normalizer: heterogeneous raw counts → clean `Tally`.
//!
//! Raw counts arrive as JSON numbers, locale-formatted strings
//! (decimal comma, thousand dot: `"1.234.567"`, `"12.345,0"`) or nothing at
//! all. Anything that cannot be read as a non-negative integer is a
//! [`DataGap`] and contributes zero votes. Partial returns are the common
//! case, so gaps are counted and logged, never raised.

use crate::errors::DataGap;
use crate::ids::ListId;
use crate::tally::Tally;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A vote count as produced by the data source.
///
/// Deserializes from any JSON value: numbers, strings and null map to their
/// variants, everything else (booleans, arrays, objects) to `Unreadable`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
    /// A value of the wrong JSON kind; serializes as null.
    Unreadable,
}

#[cfg(feature = "serde")]
mod raw_serde {
    use std::fmt;

    use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

    use super::RawCount;

    struct RawCountVisitor;

    impl<'de> Visitor<'de> for RawCountVisitor {
        type Value = RawCount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a vote count")
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<RawCount, E> {
            Ok(RawCount::Unreadable)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawCount, E> {
            Ok(RawCount::Int(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawCount, E> {
            Ok(RawCount::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawCount, E> {
            Ok(RawCount::Float(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<RawCount, E> {
            Ok(RawCount::Text(v.to_owned()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<RawCount, E> {
            Ok(RawCount::Text(v))
        }

        fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<RawCount, E> {
            Ok(RawCount::Unreadable)
        }

        fn visit_unit<E: de::Error>(self) -> Result<RawCount, E> {
            Ok(RawCount::Missing)
        }

        fn visit_none<E: de::Error>(self) -> Result<RawCount, E> {
            Ok(RawCount::Missing)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<RawCount, D::Error> {
            d.deserialize_any(self)
        }

        // Containers are drained so the surrounding document keeps parsing.
        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawCount, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(RawCount::Unreadable)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawCount, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(RawCount::Unreadable)
        }
    }

    impl<'de> Deserialize<'de> for RawCount {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(RawCountVisitor)
        }
    }
}

impl From<u64> for RawCount {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => RawCount::Int(i),
            Err(_) => RawCount::Text(v.to_string()),
        }
    }
}

impl From<&str> for RawCount {
    fn from(s: &str) -> Self {
        RawCount::Text(s.to_string())
    }
}

/// 2^64 as f64; anything at or above it cannot be a `u64`.
const U64_CEILING_F64: f64 = 18_446_744_073_709_551_616.0;

/// Strict reading of one raw count.
pub fn normalize_count(raw: &RawCount) -> Result<u64, DataGap> {
    match raw {
        RawCount::Missing => Err(DataGap::Missing),
        RawCount::Unreadable => Err(DataGap::Unparseable),
        RawCount::Int(i) => u64::try_from(*i).map_err(|_| DataGap::Negative),
        RawCount::Float(f) => {
            if !f.is_finite() {
                Err(DataGap::NonFinite)
            } else if *f < 0.0 {
                Err(DataGap::Negative)
            } else if *f >= U64_CEILING_F64 {
                Err(DataGap::Overflow)
            } else {
                // Fractional votes are truncated; the bound check above keeps the cast exact.
                Ok(f.trunc() as u64)
            }
        }
        RawCount::Text(s) => parse_locale_count(s),
    }
}

/// Lenient reading: every gap becomes zero.
#[inline]
pub fn count_or_zero(raw: &RawCount) -> u64 {
    normalize_count(raw).unwrap_or(0)
}

/// Parse a decimal-comma / thousand-dot string. Whitespace (NBSP included)
/// and dots group thousands; a single comma opens a fractional part that is
/// truncated.
fn parse_locale_count(s: &str) -> Result<u64, DataGap> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DataGap::Missing);
    }

    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match body.split_once(',') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataGap::Unparseable);
        }
    }

    let digits: String = int_part
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();

    if digits.is_empty() {
        // ",5" reads as zero votes; a bare sign or bare separators do not.
        return match frac_part {
            Some(_) => Ok(0),
            None => Err(DataGap::Unparseable),
        };
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataGap::Unparseable);
    }

    let value: u64 = digits.parse().map_err(|_| DataGap::Overflow)?;
    if negative && value > 0 {
        return Err(DataGap::Negative);
    }
    Ok(value)
}

/// Output of [`normalize_records`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub tally: Tally,
    /// Raw values that were missing or unreadable (each counted as zero).
    pub data_gaps: u64,
}

/// Fold raw `(identifier, count)` observations into a `Tally`.
///
/// Duplicate identifiers are summed; identifiers whose every value is a gap
/// still appear with zero votes.
pub fn normalize_records<'a, I>(records: I) -> Normalized
where
    I: IntoIterator<Item = (&'a ListId, &'a RawCount)>,
{
    let mut data_gaps = 0u64;
    let tally = Tally::from_counts(records.into_iter().map(|(id, raw)| {
        let v = match normalize_count(raw) {
            Ok(v) => v,
            Err(gap) => {
                data_gaps = data_gaps.saturating_add(1);
                tracing::debug!(list = %id, %gap, "vote count normalized to zero");
                0
            }
        };
        (id.clone(), v)
    }));
    Normalized { tally, data_gaps }
}
