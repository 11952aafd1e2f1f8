//! sw_pipeline: deterministic pipeline surface (validate→tabulate→apportion→estimate→classify→aggregate)
//! This crate stays I/O-free; loading, canonical JSON and hashing live in `sw_io`,
//! math lives in `sw_algo`. A run is a pure function of (config, snapshot): no
//! caching and no memory of earlier snapshots.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::Serialize;
use sw_algo::{apportion_with, SeatAllocation};
use sw_core::{ListId, RegionId, Tally, TiePolicy};

pub mod aggregate;
pub mod config;
pub mod estimate;
pub mod races;
pub mod snapshot;
pub mod tabulate;

pub use aggregate::{aggregate_national, seat_changes, ConsistencyWarning, NationalSeatTotals};
pub use config::{validate_config, DistrictConfig, ElectionConfig, Params, RegionConfig};
pub use races::DistrictRaceState;
pub use snapshot::{DistrictRecord, ProportionalRecord, Snapshot};

/// Single error surface for a pipeline run. Once the configuration is
/// accepted a run cannot fail: data problems become gaps and warnings.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("config: {0}")]
    Config(String),
}

// ---------------------------- Outcome documents ----------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionResult {
    pub region: RegionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub votes: Tally,
    pub total_votes: u64,
    pub allocation: SeatAllocation,
    pub data_gaps: u64,
    /// Delta against the previous election's proportional seats, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_changes: Option<BTreeMap<ListId, i64>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectionOutcome {
    /// `"SNP:<sha256>"` of the canonical snapshot; assigned by the caller after hashing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    pub tie_policy: TiePolicy,
    pub barrier_bp: u32,
    pub regions: Vec<RegionResult>,
    pub districts: Vec<DistrictRaceState>,
    pub national: NationalSeatTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_changes: Option<BTreeMap<ListId, i64>>,
    /// Records naming regions/districts absent from the configuration.
    pub skipped_records: u64,
    /// Raw counts that were missing or unreadable (counted as zero).
    pub data_gaps: u64,
}

// ---------------------------- Orchestration ----------------------------

/// Run the whole engine over one snapshot.
pub fn run(cfg: &ElectionConfig, snap: &Snapshot) -> Result<ElectionOutcome, PipelineError> {
    let params = validate_config(cfg)?;

    // 1) tabulate
    let regions_t = tabulate::tabulate_regions(cfg.regions.iter().map(|r| &r.id), &snap.proportional);
    let districts_t = tabulate::tabulate_districts(cfg.districts.iter().map(|d| &d.id), &snap.districts);
    for d in &snap.completed_districts {
        if !districts_t.by_district.contains_key(d) {
            tracing::warn!(district = %d, "completed district is not configured");
        }
    }

    // 2) apportion
    let mut regions = Vec::with_capacity(cfg.regions.len());
    for rc in &cfg.regions {
        let normalized = regions_t.by_region.get(&rc.id).cloned().unwrap_or_default();
        let mut breaker = params.tie_policy.breaker();
        let allocation = apportion_with(&normalized.tally, rc.seats, params.barrier, &mut breaker);
        tracing::debug!(
            region = %rc.id,
            seats = rc.seats,
            allocated = allocation.allocated(),
            ties = allocation.ties.len(),
            "region apportioned"
        );
        let changes = rc.previous_seats.as_ref().map(|prev| seat_changes(&allocation.seats, prev));
        regions.push(RegionResult {
            region: rc.id.clone(),
            name: rc.name.clone(),
            total_votes: u64::try_from(normalized.tally.total()).unwrap_or(u64::MAX),
            votes: normalized.tally,
            allocation,
            data_gaps: normalized.data_gaps,
            seat_changes: changes,
        });
    }

    // 3) estimate + classify
    let empty = tabulate::DistrictTally::default();
    let districts: Vec<DistrictRaceState> = cfg
        .districts
        .iter()
        .map(|dc| {
            let tally = districts_t.by_district.get(&dc.id).unwrap_or(&empty);
            let ctx = races::DistrictContext {
                district: &dc.id,
                region: &dc.region,
                registered_voters: dc.registered_voters,
                turnout_bp: params.turnout_for(&dc.id),
                completed: snap.completed_districts.contains(&dc.id),
                previous_holder: dc.previous_holder.as_ref(),
            };
            races::classify_district(&ctx, tally, params.close_margin)
        })
        .collect();

    // 4) aggregate
    let national = aggregate_national(
        regions.iter().map(|r| &r.allocation),
        districts.iter().filter_map(DistrictRaceState::decided),
        cfg.chamber_size,
    );
    let national_changes = previous_national(cfg).map(|prev| seat_changes(&national.seats, &prev));

    let data_gaps = regions.iter().map(|r| r.data_gaps).sum::<u64>()
        + districts.iter().map(|d| d.data_gaps).sum::<u64>();
    let skipped_records = regions_t.skipped + districts_t.skipped;

    tracing::info!(
        regions = regions.len(),
        districts = districts.len(),
        decided = national.single_winner.values().sum::<u32>(),
        seats = national.total,
        skipped_records,
        data_gaps,
        "run complete"
    );

    Ok(ElectionOutcome {
        snapshot_id: None,
        tie_policy: params.tie_policy,
        barrier_bp: params.barrier.basis_points(),
        regions,
        districts,
        national,
        national_changes,
        skipped_records,
        data_gaps,
    })
}

/// Previous-election seats per list: regional proportional tables plus prior
/// district holders. `None` when no previous data is configured at all.
fn previous_national(cfg: &ElectionConfig) -> Option<BTreeMap<ListId, u32>> {
    let has_any = cfg.regions.iter().any(|r| r.previous_seats.is_some())
        || cfg.districts.iter().any(|d| d.previous_holder.is_some());
    if !has_any {
        return None;
    }
    let mut prev: BTreeMap<ListId, u32> = BTreeMap::new();
    let proportional = cfg.regions.iter().filter_map(|r| r.previous_seats.as_ref()).flatten();
    let districts = cfg.districts.iter().filter_map(|d| d.previous_holder.as_ref()).map(|id| (id, &1u32));
    for (id, &s) in proportional.chain(districts) {
        let slot = prev.entry(id.clone()).or_insert(0);
        *slot = slot.saturating_add(s);
    }
    Some(prev)
}
