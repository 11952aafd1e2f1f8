//! AGGREGATE stage: per-region allocations + decided districts → national totals.
//!
//! A grand total that differs from the chamber size is a warning value, not an
//! error; mid-count undercounts are the normal case.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sw_algo::SeatAllocation;
use sw_core::ListId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyWarning {
    ChamberSizeMismatch { expected: u32, actual: u32 },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyWarning::ChamberSizeMismatch { expected, actual } => {
                write!(f, "seat total {actual} differs from chamber size {expected}")
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NationalSeatTotals {
    /// Proportional + single-winner seats per list (lists with at least one seat).
    pub seats: BTreeMap<ListId, u32>,
    pub proportional: BTreeMap<ListId, u32>,
    pub single_winner: BTreeMap<ListId, u32>,
    /// Proportional seats no eligible list could take.
    pub unallocated: u32,
    /// Seats assigned so far.
    pub total: u32,
    pub warnings: Vec<ConsistencyWarning>,
}

fn bump(map: &mut BTreeMap<ListId, u32>, id: &ListId, by: u32) {
    if by == 0 {
        return;
    }
    let slot = map.entry(id.clone()).or_insert(0);
    *slot = slot.saturating_add(by);
}

pub fn aggregate_national<'a>(
    regions: impl IntoIterator<Item = &'a SeatAllocation>,
    decided_districts: impl IntoIterator<Item = &'a ListId>,
    expected_chamber_size: u32,
) -> NationalSeatTotals {
    let mut out = NationalSeatTotals::default();

    for alloc in regions {
        for (id, &s) in &alloc.seats {
            bump(&mut out.proportional, id, s);
            bump(&mut out.seats, id, s);
        }
        out.unallocated = out.unallocated.saturating_add(alloc.unallocated);
    }
    for id in decided_districts {
        bump(&mut out.single_winner, id, 1);
        bump(&mut out.seats, id, 1);
    }

    out.total = out.seats.values().fold(0u32, |acc, &s| acc.saturating_add(s));
    if out.total != expected_chamber_size {
        let w = ConsistencyWarning::ChamberSizeMismatch {
            expected: expected_chamber_size,
            actual: out.total,
        };
        tracing::warn!(expected = expected_chamber_size, actual = out.total, "{w}");
        out.warnings.push(w);
    }
    out
}

/// Per-list seat delta against a previous result; keys are the union of both.
pub fn seat_changes(
    current: &BTreeMap<ListId, u32>,
    previous: &BTreeMap<ListId, u32>,
) -> BTreeMap<ListId, i64> {
    let mut out: BTreeMap<ListId, i64> = BTreeMap::new();
    for (id, &s) in current {
        *out.entry(id.clone()).or_insert(0) += i64::from(s);
    }
    for (id, &s) in previous {
        *out.entry(id.clone()).or_insert(0) -= i64::from(s);
    }
    out
}
