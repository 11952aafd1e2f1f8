//! Outstanding-vote estimate for a district.
//!
//! `projected = registered * turnout_bp / 10_000`, `remaining = projected - counted`.
//! Once the count has passed the projection, the rest of the electorate
//! (`registered - counted`) is still outstanding: only a completed district
//! reaches zero before every registered voter is counted. Without
//! registered-voter data the counted total is assumed to be at most half the
//! final turnout.

use sw_core::barrier::FULL_BP;

/// Turnout assumed when neither the district nor the configuration sets one.
pub const DEFAULT_TURNOUT_PCT: f64 = 70.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimateInput {
    pub counted: u64,
    pub registered_voters: Option<u64>,
    pub turnout_bp: u32,
    pub completed: bool,
}

pub fn remaining_votes(input: EstimateInput) -> i64 {
    if input.completed {
        return 0;
    }
    let remaining = match input.registered_voters {
        Some(registered) => {
            let counted = u128::from(input.counted);
            let projected = u128::from(registered) * u128::from(input.turnout_bp) / u128::from(FULL_BP);
            if projected > counted {
                projected - counted
            } else {
                u128::from(registered).saturating_sub(counted)
            }
        }
        None => u128::from(input.counted),
    };
    i64::try_from(remaining).unwrap_or(i64::MAX)
}
