//! D'Hondt (highest averages) apportionment for one region.
//!
//! Contract:
//! - Nothing is allocated when the region has no votes or no seats.
//! - Lists whose share is strictly below the barrier are excluded, whatever
//!   their quotients; lists with zero votes are never eligible.
//! - Seats are awarded one at a time to the largest `votes / (seats_held + 1)`,
//!   which is the same ranking as sorting every `votes / d` for `d = 1..=seats`.
//! - Equal quotients go to the configured `TieBreaker` (default: larger raw
//!   vote total, then identifier); every such decision is logged in `ties`.
//! - Seats that no eligible list can take stay `unallocated`.
//! - Pure integers; quotients are compared by u128 cross-multiplication.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use sw_core::ties::VotesThenId;
use sw_core::{Barrier, EngineError, ListId, Tally, TieBreaker, TieContender, TieRecord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seats won per list in one region.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatAllocation {
    pub total_seats: u32,
    /// Every list present in the input tally, zeros included.
    pub seats: BTreeMap<ListId, u32>,
    pub unallocated: u32,
    /// Lists below the barrier.
    pub excluded: BTreeSet<ListId>,
    pub ties: Vec<TieRecord>,
}

impl SeatAllocation {
    fn empty(votes: &Tally, total_seats: u32) -> Self {
        SeatAllocation {
            total_seats,
            seats: votes.ids().map(|id| (id.clone(), 0)).collect(),
            unallocated: total_seats,
            excluded: BTreeSet::new(),
            ties: Vec::new(),
        }
    }

    /// Seats actually assigned.
    pub fn allocated(&self) -> u32 {
        self.seats.values().fold(0u32, |acc, &s| acc.saturating_add(s))
    }

    #[inline]
    pub fn seats_for(&self, id: &ListId) -> u32 {
        self.seats.get(id).copied().unwrap_or(0)
    }

    /// True iff the final seat was decided by a tie break.
    pub fn last_seat_tie(&self) -> bool {
        self.total_seats > 0 && self.ties.iter().any(|t| t.seat == self.total_seats)
    }

    /// `allocated + unallocated == total_seats` and no list above `total_seats`.
    pub fn check_conservation(&self) -> bool {
        self.allocated().checked_add(self.unallocated) == Some(self.total_seats)
            && self.seats.values().all(|&s| s <= self.total_seats)
    }
}

/// Apportion with the default tie rule (larger vote total, then identifier).
pub fn apportion(votes: &Tally, total_seats: u32, barrier: Barrier) -> SeatAllocation {
    apportion_with(votes, total_seats, barrier, &mut VotesThenId)
}

/// Apportion with a caller-supplied tie breaker.
pub fn apportion_with<B>(
    votes: &Tally,
    total_seats: u32,
    barrier: Barrier,
    breaker: &mut B,
) -> SeatAllocation
where
    B: TieBreaker + ?Sized,
{
    let mut out = SeatAllocation::empty(votes, total_seats);
    let total_valid = votes.total();
    if total_valid == 0 || total_seats == 0 {
        return out;
    }

    // 1) Barrier on natural shares; eligible lists stay in `ListId` order.
    let mut eligible: Vec<(&ListId, u64)> = Vec::new();
    for (id, v) in votes.iter() {
        if barrier.excludes(v, total_valid) {
            out.excluded.insert(id.clone());
        } else if v > 0 {
            eligible.push((id, v));
        }
    }
    if eligible.is_empty() {
        tracing::debug!(%barrier, "no list clears the barrier; all seats unallocated");
        return out;
    }

    // 2) Award seats one by one.
    let mut held: Vec<u32> = vec![0; eligible.len()];
    for seat in 1..=total_seats {
        let tied = best_quotients(&eligible, &held);
        let winner = match tied.as_slice() {
            [only] => *only,
            _ => resolve_tie(seat, &tied, &eligible, breaker, &mut out.ties),
        };
        held[winner] += 1;
    }

    for ((id, _), &s) in eligible.iter().zip(&held) {
        out.seats.insert((*id).clone(), s);
    }
    out.unallocated = 0;
    out
}

/// Boundary form taking raw signed inputs; negative seats or votes and
/// out-of-domain barriers are rejected rather than coerced.
pub fn apportion_checked(
    votes: &[(ListId, i64)],
    total_seats: i64,
    barrier_pct: f64,
) -> Result<SeatAllocation, EngineError> {
    let seats = u32::try_from(total_seats).map_err(|_| {
        EngineError::InvalidArgument(format!("seat count {total_seats} out of range"))
    })?;
    let tally = Tally::try_from_signed(votes.iter().cloned())?;
    let barrier = Barrier::from_percent(barrier_pct)?;
    Ok(apportion(&tally, seats, barrier))
}

/// Indices (into `eligible`) of every list sharing the current best quotient.
fn best_quotients(eligible: &[(&ListId, u64)], held: &[u32]) -> Vec<usize> {
    let mut best: Vec<usize> = Vec::new();
    for i in 0..eligible.len() {
        match best.first() {
            None => best.push(i),
            Some(&b) => match cmp_quotients(eligible[i].1, held[i], eligible[b].1, held[b]) {
                Ordering::Greater => {
                    best.clear();
                    best.push(i);
                }
                Ordering::Equal => best.push(i),
                Ordering::Less => {}
            },
        }
    }
    best
}

fn resolve_tie<B>(
    seat: u32,
    tied: &[usize],
    eligible: &[(&ListId, u64)],
    breaker: &mut B,
    log: &mut Vec<TieRecord>,
) -> usize
where
    B: TieBreaker + ?Sized,
{
    let contenders: Vec<TieContender<'_>> = tied
        .iter()
        .map(|&i| TieContender { list_id: eligible[i].0, votes: eligible[i].1 })
        .collect();
    let choice = breaker.choose(&contenders);
    let pick = if choice.index < tied.len() { choice.index } else { 0 };
    let winner = tied[pick];

    tracing::debug!(seat, winner = %eligible[winner].0, tied = tied.len(), "equal quotients resolved");
    log.push(TieRecord {
        seat,
        contenders: contenders.iter().map(|c| c.list_id.clone()).collect(),
        winner: eligible[winner].0.clone(),
        rng_word: choice.rng_word,
    });
    winner
}

/// Compare `v_a/(s_a+1)` with `v_b/(s_b+1)` without floats.
fn cmp_quotients(v_a: u64, s_a: u32, v_b: u64, s_b: u32) -> Ordering {
    let lhs = u128::from(v_a) * (u128::from(s_b) + 1);
    let rhs = u128::from(v_b) * (u128::from(s_a) + 1);
    lhs.cmp(&rhs)
}
