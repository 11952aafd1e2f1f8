//! TABULATE stage: group raw records by region / district and normalize counts.
//!
//! Records naming a region or district absent from the configuration are
//! skipped (warn) and counted; they never reach the math.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sw_core::{normalize_count, normalize_records, CandidateId, DistrictId, ListId, Normalized, RegionId};

use crate::snapshot::{DistrictRecord, ProportionalRecord};

/// Normalized proportional tallies keyed by configured region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionTallies {
    pub by_region: BTreeMap<RegionId, Normalized>,
    pub skipped: u64,
}

/// One candidate's normalized total within a district.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateTotal {
    pub candidate: CandidateId,
    pub list: ListId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub votes: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistrictTally {
    /// Ranked: votes descending, then list id, then candidate id.
    pub candidates: Vec<CandidateTotal>,
    pub data_gaps: u64,
}

impl DistrictTally {
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().fold(0u64, |acc, c| acc.saturating_add(c.votes))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistrictTallies {
    pub by_district: BTreeMap<DistrictId, DistrictTally>,
    pub skipped: u64,
}

pub fn tabulate_regions<'a>(
    known: impl IntoIterator<Item = &'a RegionId>,
    records: &[ProportionalRecord],
) -> RegionTallies {
    let mut grouped: BTreeMap<&RegionId, Vec<&ProportionalRecord>> =
        known.into_iter().map(|r| (r, Vec::new())).collect();
    let mut skipped = 0u64;

    for rec in records {
        match grouped.get_mut(&rec.region) {
            Some(rows) => rows.push(rec),
            None => {
                skipped += 1;
                tracing::warn!(region = %rec.region, list = %rec.list, "record for unknown region skipped");
            }
        }
    }

    let by_region = grouped
        .into_iter()
        .map(|(region, rows)| {
            let normalized = normalize_records(rows.iter().map(|r| (&r.list, &r.votes)));
            (region.clone(), normalized)
        })
        .collect();

    RegionTallies { by_region, skipped }
}

pub fn tabulate_districts<'a>(
    known: impl IntoIterator<Item = &'a DistrictId>,
    records: &[DistrictRecord],
) -> DistrictTallies {
    let known: BTreeSet<&DistrictId> = known.into_iter().collect();
    let mut acc: BTreeMap<&DistrictId, (BTreeMap<(&CandidateId, &ListId), (u64, Option<&str>)>, u64)> =
        known.iter().map(|d| (*d, (BTreeMap::new(), 0))).collect();
    let mut skipped = 0u64;

    for rec in records {
        let Some((cands, gaps)) = acc.get_mut(&rec.district) else {
            skipped += 1;
            tracing::warn!(district = %rec.district, candidate = %rec.candidate, "record for unknown district skipped");
            continue;
        };
        let votes = match normalize_count(&rec.votes) {
            Ok(v) => v,
            Err(gap) => {
                *gaps += 1;
                tracing::debug!(district = %rec.district, candidate = %rec.candidate, %gap, "vote count normalized to zero");
                0
            }
        };
        let slot = cands.entry((&rec.candidate, &rec.list)).or_insert((0, None));
        slot.0 = slot.0.saturating_add(votes);
        if slot.1.is_none() {
            slot.1 = rec.name.as_deref();
        }
    }

    let by_district = acc
        .into_iter()
        .map(|(district, (cands, data_gaps))| {
            let mut candidates: Vec<CandidateTotal> = cands
                .into_iter()
                .map(|((candidate, list), (votes, name))| CandidateTotal {
                    candidate: candidate.clone(),
                    list: list.clone(),
                    name: name.map(str::to_owned),
                    votes,
                })
                .collect();
            candidates.sort_by(|a, b| {
                b.votes
                    .cmp(&a.votes)
                    .then_with(|| a.list.cmp(&b.list))
                    .then_with(|| a.candidate.cmp(&b.candidate))
            });
            (district.clone(), DistrictTally { candidates, data_gaps })
        })
        .collect();

    DistrictTallies { by_district, skipped }
}
