//! Exclusion threshold (barrier clause) with exact integer comparison.
//!
//! The threshold is stored in basis points (1 bp = 0.01 %), so fractional
//! barriers such as 1.5 % stay exact and the share test never touches floats:
//! a list is below the barrier iff `votes * 10_000 < bp * total`.

use core::fmt;

use crate::errors::EngineError;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Basis points in 100 %.
pub const FULL_BP: u32 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Barrier(u32);

impl Barrier {
    /// No threshold: every list with votes is eligible.
    pub const NONE: Barrier = Barrier(0);

    /// Exact constructor; values above 100 % are rejected.
    pub fn from_basis_points(bp: u32) -> Result<Self, EngineError> {
        if bp > FULL_BP {
            return Err(EngineError::invalid(format!(
                "barrier {bp} bp exceeds 100%"
            )));
        }
        Ok(Barrier(bp))
    }

    /// From a percentage such as `5.0` or `1.5`, rounded to the nearest basis point.
    pub fn from_percent(pct: f64) -> Result<Self, EngineError> {
        if !pct.is_finite() {
            return Err(EngineError::invalid("barrier percent is not a finite number"));
        }
        if pct < 0.0 {
            return Err(EngineError::invalid(format!("negative barrier percent {pct}")));
        }
        if pct > 100.0 {
            return Err(EngineError::invalid(format!("barrier percent {pct} exceeds 100")));
        }
        // 0.0..=100.0 scaled and rounded fits in 0..=10_000.
        let bp = (pct * 100.0).round() as u32;
        Self::from_basis_points(bp)
    }

    #[inline]
    pub fn basis_points(self) -> u32 {
        self.0
    }

    /// True iff `votes / total` is strictly below the threshold.
    /// An empty total puts every list below any positive barrier.
    #[inline]
    pub fn excludes(self, votes: u64, total: u128) -> bool {
        let lhs = u128::from(votes).saturating_mul(u128::from(FULL_BP));
        let rhs = u128::from(self.0).saturating_mul(total);
        lhs < rhs
    }
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
