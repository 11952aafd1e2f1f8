//! CLASSIFY stage: ranked district tallies → `RaceInput` → `RaceStatus`.

use serde::Serialize;
use sw_algo::{classify_with, CloseMargin, RaceEntry, RaceInput, RaceStatus};
use sw_core::{DistrictId, ListId, RegionId};

use crate::estimate::{remaining_votes, EstimateInput};
use crate::tabulate::{CandidateTotal, DistrictTally};

/// Classified state of one district race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictRaceState {
    pub district: DistrictId,
    pub region: RegionId,
    #[serde(flatten)]
    pub status: RaceStatus,
    /// Leader minus runner-up (leader's total when unopposed).
    pub margin: u64,
    pub total_votes: u64,
    pub remaining_estimate: i64,
    pub data_gaps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_holder: Option<ListId>,
    pub candidates: Vec<CandidateTotal>,
}

impl DistrictRaceState {
    /// Winning list, once the race is final.
    pub fn decided(&self) -> Option<&ListId> {
        if self.status.is_final {
            self.status.acting.as_ref()
        } else {
            None
        }
    }
}

fn entry(c: &CandidateTotal) -> RaceEntry {
    RaceEntry { list_id: c.list.clone(), votes: c.votes, display_name: c.name.clone() }
}

/// Leader and runner-up come from the ranked tally; a runner-up with no votes
/// yet is treated as absent.
pub fn build_race_input(
    tally: &DistrictTally,
    remaining_estimate: i64,
    previous_holder: Option<&ListId>,
) -> RaceInput {
    let mut ranked = tally.candidates.iter();
    let leader = ranked.next().map(entry);
    let runner_up = ranked.next().filter(|c| c.votes > 0).map(entry);
    RaceInput {
        leader,
        runner_up,
        total_votes: tally.total_votes(),
        remaining_estimate,
        previous_holder: previous_holder.cloned(),
    }
}

pub struct DistrictContext<'a> {
    pub district: &'a DistrictId,
    pub region: &'a RegionId,
    pub registered_voters: Option<u64>,
    pub turnout_bp: u32,
    pub completed: bool,
    pub previous_holder: Option<&'a ListId>,
}

pub fn classify_district(
    ctx: &DistrictContext<'_>,
    tally: &DistrictTally,
    close: CloseMargin,
) -> DistrictRaceState {
    let total_votes = tally.total_votes();
    if ctx.registered_voters.is_none() && !ctx.completed {
        tracing::debug!(district = %ctx.district, "no registered-voter data; outstanding assumed equal to counted");
    }
    let remaining_estimate = remaining_votes(EstimateInput {
        counted: total_votes,
        registered_voters: ctx.registered_voters,
        turnout_bp: ctx.turnout_bp,
        completed: ctx.completed,
    });

    let input = build_race_input(tally, remaining_estimate, ctx.previous_holder);
    let margin = match (&input.leader, &input.runner_up) {
        (Some(l), Some(r)) => l.votes.saturating_sub(r.votes),
        (Some(l), None) => l.votes,
        _ => 0,
    };
    let status = classify_with(&input, close);

    tracing::debug!(
        district = %ctx.district,
        label = %status.label,
        is_final = status.is_final,
        margin,
        remaining_estimate,
        "district classified"
    );

    DistrictRaceState {
        district: ctx.district.clone(),
        region: ctx.region.clone(),
        status,
        margin,
        total_votes,
        remaining_estimate,
        data_gaps: tally.data_gaps,
        previous_holder: ctx.previous_holder.cloned(),
        candidates: tally.candidates.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_algo::RaceLabel;

    fn cand(c: &str, list: &str, votes: u64) -> CandidateTotal {
        CandidateTotal { candidate: c.parse().unwrap(), list: list.parse().unwrap(), name: None, votes }
    }

    #[test]
    fn zero_vote_runner_up_is_absent() {
        let t = DistrictTally { candidates: vec![cand("c1", "A", 10), cand("c2", "B", 0)], data_gaps: 0 };
        let input = build_race_input(&t, 0, None);
        assert!(input.runner_up.is_none());
        assert_eq!(input.leader.unwrap().votes, 10);
    }

    #[test]
    fn completed_district_is_final() {
        let d: DistrictId = "D1".parse().unwrap();
        let r: RegionId = "R1".parse().unwrap();
        let prev: ListId = "B".parse().unwrap();
        let ctx = DistrictContext {
            district: &d,
            region: &r,
            registered_voters: Some(1_000_000),
            turnout_bp: 7_000,
            completed: true,
            previous_holder: Some(&prev),
        };
        let t = DistrictTally { candidates: vec![cand("c1", "A", 510), cand("c2", "B", 490)], data_gaps: 2 };
        let s = classify_district(&ctx, &t, CloseMargin::default());
        assert_eq!(s.status.label, RaceLabel::Gained);
        assert_eq!(s.decided(), Some(&"A".parse().unwrap()));
        assert_eq!((s.margin, s.total_votes, s.remaining_estimate, s.data_gaps), (20, 1_000, 0, 2));
    }

    #[test]
    fn open_district_uses_projection() {
        let d: DistrictId = "D1".parse().unwrap();
        let r: RegionId = "R1".parse().unwrap();
        let ctx = DistrictContext {
            district: &d,
            region: &r,
            registered_voters: Some(10_000),
            turnout_bp: 7_000,
            completed: false,
            previous_holder: None,
        };
        let t = DistrictTally { candidates: vec![cand("c1", "A", 3_000), cand("c2", "B", 1_000)], data_gaps: 0 };
        let s = classify_district(&ctx, &t, CloseMargin::default());
        assert_eq!(s.remaining_estimate, 3_000);
        assert_eq!(s.status.label, RaceLabel::Leading);
        assert_eq!(s.decided(), None);
    }

    #[test]
    fn counts_past_projection_stay_open() {
        let d: DistrictId = "D1".parse().unwrap();
        let r: RegionId = "R1".parse().unwrap();
        let ctx = DistrictContext {
            district: &d,
            region: &r,
            registered_voters: Some(1_000),
            turnout_bp: 7_000,
            completed: false,
            previous_holder: None,
        };
        let t = DistrictTally { candidates: vec![cand("c1", "A", 360), cand("c2", "B", 350)], data_gaps: 0 };
        let s = classify_district(&ctx, &t, CloseMargin::default());
        assert_eq!(s.remaining_estimate, 290);
        assert!(!s.status.is_final);
        assert_eq!(s.decided(), None);
    }
}
