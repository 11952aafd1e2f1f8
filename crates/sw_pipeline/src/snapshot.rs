//! One snapshot of partial returns, as delivered by the ingestion layer.
//! Counts stay raw here; the tabulate stage normalizes them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sw_core::{CandidateId, DistrictId, ListId, RawCount, RegionId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub proportional: Vec<ProportionalRecord>,
    #[serde(default)]
    pub districts: Vec<DistrictRecord>,
    /// Districts whose count is complete; nothing is outstanding there.
    #[serde(default)]
    pub completed_districts: BTreeSet<DistrictId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProportionalRecord {
    pub region: RegionId,
    pub list: ListId,
    #[serde(default)]
    pub votes: RawCount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    pub district: DistrictId,
    pub candidate: CandidateId,
    pub list: ListId,
    #[serde(default)]
    pub votes: RawCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
