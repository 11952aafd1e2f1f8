//! Election configuration: chamber layout and static reference data.
//!
//! Reference tables (district → region, registered voters, previous holders,
//! previous proportional seats) are passed in with every run; the engine keeps
//! no global tables.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sw_algo::CloseMargin;
use sw_core::{Barrier, DistrictId, ListId, RegionId, TiePolicy};

use crate::estimate::DEFAULT_TURNOUT_PCT;
use crate::PipelineError;

fn default_turnout() -> f64 {
    DEFAULT_TURNOUT_PCT
}

fn default_close_margin() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Expected seats in the whole chamber (proportional + single-winner).
    pub chamber_size: u32,
    #[serde(default)]
    pub barrier_pct: f64,
    #[serde(default = "default_turnout")]
    pub expected_turnout_pct: f64,
    #[serde(default = "default_close_margin")]
    pub close_margin_pct: f64,
    #[serde(default)]
    pub tie_policy: TiePolicy,
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub districts: Vec<DistrictConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub id: RegionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Proportional seats apportioned in this region.
    pub seats: u32,
    /// Proportional seats per list at the previous election.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_seats: Option<BTreeMap<ListId, u32>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistrictConfig {
    pub id: DistrictId,
    pub region: RegionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_voters: Option<u64>,
    /// Overrides the configuration-wide turnout for this district.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_turnout_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_holder: Option<ListId>,
}

/// Numeric parameters resolved from an [`ElectionConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub barrier: Barrier,
    pub close_margin: CloseMargin,
    /// Default projected turnout in basis points.
    pub turnout_bp: u32,
    /// Per-district turnout overrides in basis points.
    pub district_turnout_bp: BTreeMap<DistrictId, u32>,
    pub tie_policy: TiePolicy,
}

impl Params {
    pub fn turnout_for(&self, district: &DistrictId) -> u32 {
        self.district_turnout_bp.get(district).copied().unwrap_or(self.turnout_bp)
    }
}

fn percent_bp(field: &str, pct: f64) -> Result<u32, PipelineError> {
    Barrier::from_percent(pct)
        .map(Barrier::basis_points)
        .map_err(|e| PipelineError::Config(format!("{field}: {e}")))
}

/// Check identifiers and percentages, and resolve them into [`Params`].
pub fn validate_config(cfg: &ElectionConfig) -> Result<Params, PipelineError> {
    let barrier = Barrier::from_percent(cfg.barrier_pct)
        .map_err(|e| PipelineError::Config(format!("barrier_pct: {e}")))?;
    let close_margin = CloseMargin::from_percent(cfg.close_margin_pct)
        .map_err(|e| PipelineError::Config(format!("close_margin_pct: {e}")))?;
    let turnout_bp = percent_bp("expected_turnout_pct", cfg.expected_turnout_pct)?;

    let mut regions: BTreeSet<&RegionId> = BTreeSet::new();
    for r in &cfg.regions {
        if !regions.insert(&r.id) {
            return Err(PipelineError::Config(format!("duplicate region id {}", r.id)));
        }
    }

    let mut district_ids: BTreeSet<&DistrictId> = BTreeSet::new();
    let mut district_turnout_bp = BTreeMap::new();
    for d in &cfg.districts {
        if !district_ids.insert(&d.id) {
            return Err(PipelineError::Config(format!("duplicate district id {}", d.id)));
        }
        if !regions.contains(&d.region) {
            return Err(PipelineError::Config(format!(
                "district {} refers to unknown region {}",
                d.id, d.region
            )));
        }
        if let Some(pct) = d.expected_turnout_pct {
            let bp = percent_bp(&format!("district {} expected_turnout_pct", d.id), pct)?;
            district_turnout_bp.insert(d.id.clone(), bp);
        }
    }

    let proportional: u64 = cfg.regions.iter().map(|r| u64::from(r.seats)).sum();
    let planned = proportional + cfg.districts.len() as u64;
    if planned != u64::from(cfg.chamber_size) {
        tracing::warn!(
            chamber_size = cfg.chamber_size,
            planned,
            "configured seats do not add up to the chamber size"
        );
    }

    Ok(Params {
        barrier,
        close_margin,
        turnout_bp,
        district_turnout_bp,
        tie_policy: cfg.tie_policy,
    })
}
