//! Tie policies for equal D'Hondt quotients.
//!
//! Ties never fall back to incidental iteration order. Contenders are always
//! presented to a [`TieBreaker`] sorted by `ListId`, and the breaker returns
//! an index into that slice.
//!
//! Policy vocabulary (configuration tokens):
//!   `votes_then_id` (default) | `id_order` | `lot` (seeded)

use crate::ids::ListId;
use crate::rng::TieRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One list tied for the seat being awarded.
#[derive(Clone, Copy, Debug)]
pub struct TieContender<'a> {
    pub list_id: &'a ListId,
    /// Raw vote total of the list in this region.
    pub votes: u64,
}

/// Decision returned by a breaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TieChoice {
    pub index: usize,
    /// 1-based index of the RNG word that decided a lot.
    pub rng_word: Option<u64>,
}

impl TieChoice {
    #[inline]
    pub fn deterministic(index: usize) -> Self {
        TieChoice { index, rng_word: None }
    }
}

/// Any deterministic rule for picking among equal quotients.
///
/// `contenders` has at least two entries, sorted by `ListId`. Returning an
/// out-of-range index is treated as `0` by callers.
pub trait TieBreaker {
    fn choose(&mut self, contenders: &[TieContender<'_>]) -> TieChoice;
}

/// Larger raw vote total first, then the lexicographically smaller id.
#[derive(Clone, Copy, Debug, Default)]
pub struct VotesThenId;

impl TieBreaker for VotesThenId {
    fn choose(&mut self, contenders: &[TieContender<'_>]) -> TieChoice {
        let mut best = 0usize;
        for (i, c) in contenders.iter().enumerate().skip(1) {
            if c.votes > contenders[best].votes {
                best = i;
            }
        }
        TieChoice::deterministic(best)
    }
}

/// Lexicographically smallest id wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdOrder;

impl TieBreaker for IdOrder {
    fn choose(&mut self, _contenders: &[TieContender<'_>]) -> TieChoice {
        TieChoice::deterministic(0)
    }
}

/// Drawing lots from a seeded stream.
#[derive(Clone, Debug)]
pub struct Lot(pub TieRng);

impl TieBreaker for Lot {
    fn choose(&mut self, contenders: &[TieContender<'_>]) -> TieChoice {
        match self.0.gen_range_with_index(contenders.len() as u64) {
            Some((pick, word)) => TieChoice {
                index: usize::try_from(pick).unwrap_or(0),
                rng_word: Some(word),
            },
            None => TieChoice::deterministic(0),
        }
    }
}

/// Configured tie policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TiePolicy {
    #[default]
    VotesThenId,
    IdOrder,
    Lot { seed: u64 },
}

impl TiePolicy {
    /// Fresh breaker for one apportionment call. Lots restart from the seed
    /// each call, so results do not depend on the order regions are processed.
    pub fn breaker(&self) -> PolicyBreaker {
        match *self {
            TiePolicy::VotesThenId => PolicyBreaker::VotesThenId(VotesThenId),
            TiePolicy::IdOrder => PolicyBreaker::IdOrder(IdOrder),
            TiePolicy::Lot { seed } => PolicyBreaker::Lot(Lot(TieRng::from_seed_u64(seed))),
        }
    }

    /// Stable token used in logs and outputs.
    pub fn token(&self) -> &'static str {
        match self {
            TiePolicy::VotesThenId => "votes_then_id",
            TiePolicy::IdOrder => "id_order",
            TiePolicy::Lot { .. } => "lot",
        }
    }
}

/// Enum dispatch over the built-in breakers.
#[derive(Clone, Debug)]
pub enum PolicyBreaker {
    VotesThenId(VotesThenId),
    IdOrder(IdOrder),
    Lot(Lot),
}

impl TieBreaker for PolicyBreaker {
    fn choose(&mut self, contenders: &[TieContender<'_>]) -> TieChoice {
        match self {
            PolicyBreaker::VotesThenId(b) => b.choose(contenders),
            PolicyBreaker::IdOrder(b) => b.choose(contenders),
            PolicyBreaker::Lot(b) => b.choose(contenders),
        }
    }
}

/// Audit entry for a resolved tie.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TieRecord {
    /// 1-based number of the seat that was contested.
    pub seat: u32,
    /// Tied lists, in `ListId` order.
    pub contenders: Vec<ListId>,
    pub winner: ListId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rng_word: Option<u64>,
}
