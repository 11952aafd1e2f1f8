//! District race status from partial returns.
//!
//! States, evaluated in order:
//! 1. no leader or nothing counted            → `AwaitingData`
//! 2. leader without runner-up                → final outcome once nothing is outstanding,
//!                                              otherwise `Leading`
//! 3. "leader" behind the runner-up           → `TooClose` / `Contested`, no acting list
//! 4. leader ahead by margin `m`:
//!    outstanding ≥ m and m > close margin    → `Leading`
//!    outstanding ≥ m and m ≤ close margin    → `TooClose`
//!    outstanding < m                         → final outcome
//!
//! A final outcome is `Held` when the leader's list held the seat before,
//! `Gained` when another list held it, `Elected` without prior-holder data.
//! The result is a pure function of the input; presentation (colors, names)
//! is left to callers via the acting list.

use core::fmt;

use sw_core::barrier::FULL_BP;
use sw_core::{Barrier, EngineError, ListId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A contender as seen in the current snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaceEntry {
    pub list_id: ListId,
    pub votes: u64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub display_name: Option<String>,
}

/// Everything the classifier looks at.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaceInput {
    pub leader: Option<RaceEntry>,
    pub runner_up: Option<RaceEntry>,
    pub total_votes: u64,
    /// Estimated votes still to be counted; `<= 0` means nothing left.
    pub remaining_estimate: i64,
    pub previous_holder: Option<ListId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RaceLabel {
    AwaitingData,
    Leading,
    TooClose,
    Contested,
    Held,
    Gained,
    Elected,
}

impl RaceLabel {
    pub fn token(&self) -> &'static str {
        match self {
            RaceLabel::AwaitingData => "awaiting_data",
            RaceLabel::Leading => "leading",
            RaceLabel::TooClose => "too_close",
            RaceLabel::Contested => "contested",
            RaceLabel::Held => "held",
            RaceLabel::Gained => "gained",
            RaceLabel::Elected => "elected",
        }
    }

    /// Labels that only a final result carries.
    pub fn is_outcome(&self) -> bool {
        matches!(self, RaceLabel::Held | RaceLabel::Gained | RaceLabel::Elected)
    }
}

impl fmt::Display for RaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaceStatus {
    pub label: RaceLabel,
    pub is_final: bool,
    /// The list the label refers to (current front-runner or winner).
    pub acting: Option<ListId>,
}

impl RaceStatus {
    fn open(label: RaceLabel, acting: Option<ListId>) -> Self {
        RaceStatus { label, is_final: false, acting }
    }

    fn decided(leader: &RaceEntry, previous: Option<&ListId>) -> Self {
        let label = match previous {
            Some(p) if *p == leader.list_id => RaceLabel::Held,
            Some(_) => RaceLabel::Gained,
            None => RaceLabel::Elected,
        };
        RaceStatus { label, is_final: true, acting: Some(leader.list_id.clone()) }
    }
}

/// Margin (share of counted votes) at or under which a race is too close to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseMargin(u32);

impl CloseMargin {
    pub fn from_percent(pct: f64) -> Result<Self, EngineError> {
        Barrier::from_percent(pct).map(|b| CloseMargin(b.basis_points()))
    }

    #[inline]
    pub fn basis_points(self) -> u32 {
        self.0
    }

    /// `gap / total <= margin`, in exact integer math.
    #[inline]
    fn covers(self, gap: u64, total: u64) -> bool {
        u128::from(gap) * u128::from(FULL_BP) <= u128::from(self.0) * u128::from(total)
    }
}

impl Default for CloseMargin {
    /// One percent.
    fn default() -> Self {
        CloseMargin(100)
    }
}

/// Classify with the standard 1 % close-race margin.
pub fn classify(input: &RaceInput) -> RaceStatus {
    classify_with(input, CloseMargin::default())
}

pub fn classify_with(input: &RaceInput, close: CloseMargin) -> RaceStatus {
    let leader = match &input.leader {
        Some(l) if input.total_votes > 0 => l,
        _ => return RaceStatus::open(RaceLabel::AwaitingData, None),
    };
    let remaining = i128::from(input.remaining_estimate);
    let previous = input.previous_holder.as_ref();

    let runner_up = match &input.runner_up {
        None => {
            return if remaining <= 0 {
                RaceStatus::decided(leader, previous)
            } else {
                RaceStatus::open(RaceLabel::Leading, Some(leader.list_id.clone()))
            };
        }
        Some(r) => r,
    };

    // Mis-ordered input: the runner-up field holds the larger count.
    if runner_up.votes > leader.votes {
        let gap = runner_up.votes - leader.votes;
        let label = if close.covers(gap, input.total_votes) && remaining > i128::from(gap) {
            RaceLabel::TooClose
        } else {
            RaceLabel::Contested
        };
        return RaceStatus::open(label, None);
    }

    let margin = leader.votes - runner_up.votes;
    let reversible = remaining >= i128::from(margin);
    if !reversible {
        return RaceStatus::decided(leader, previous);
    }
    let label = if close.covers(margin, input.total_votes) {
        RaceLabel::TooClose
    } else {
        RaceLabel::Leading
    };
    RaceStatus::open(label, Some(leader.list_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lid(s: &str) -> ListId {
        s.parse().unwrap()
    }

    fn entry(list: &str, votes: u64) -> RaceEntry {
        RaceEntry { list_id: lid(list), votes, display_name: None }
    }

    fn race(
        leader: Option<(&str, u64)>,
        runner: Option<(&str, u64)>,
        total: u64,
        remaining: i64,
        prev: Option<&str>,
    ) -> RaceInput {
        RaceInput {
            leader: leader.map(|(l, v)| entry(l, v)),
            runner_up: runner.map(|(l, v)| entry(l, v)),
            total_votes: total,
            remaining_estimate: remaining,
            previous_holder: prev.map(lid),
        }
    }

    #[test]
    fn awaiting_data() {
        let s = classify(&race(None, None, 0, 1_000, None));
        assert_eq!(s, RaceStatus { label: RaceLabel::AwaitingData, is_final: false, acting: None });
        let s = classify(&race(Some(("A", 0)), None, 0, 0, None));
        assert_eq!(s.label, RaceLabel::AwaitingData);
    }

    #[test]
    fn lone_leader() {
        let s = classify(&race(Some(("A", 10)), None, 10, 500, Some("B")));
        assert_eq!(s, RaceStatus { label: RaceLabel::Leading, is_final: false, acting: Some(lid("A")) });

        let s = classify(&race(Some(("A", 10)), None, 10, 0, Some("A")));
        assert_eq!((s.label, s.is_final), (RaceLabel::Held, true));
        let s = classify(&race(Some(("A", 10)), None, 10, -3, Some("B")));
        assert_eq!((s.label, s.is_final), (RaceLabel::Gained, true));
        let s = classify(&race(Some(("A", 10)), None, 10, 0, None));
        assert_eq!((s.label, s.is_final), (RaceLabel::Elected, true));
    }

    #[test]
    fn decided_and_held() {
        let s = classify(&race(Some(("A", 52_000)), Some(("B", 48_000)), 100_000, 0, Some("A")));
        assert_eq!(s, RaceStatus { label: RaceLabel::Held, is_final: true, acting: Some(lid("A")) });
    }

    #[test]
    fn too_close_to_call() {
        let s = classify(&race(Some(("A", 50_200)), Some(("B", 49_800)), 100_000, 5_000, None));
        assert_eq!(s, RaceStatus { label: RaceLabel::TooClose, is_final: false, acting: Some(lid("A")) });
    }

    #[test]
    fn leading_with_clear_but_reversible_margin() {
        let s = classify(&race(Some(("A", 60_000)), Some(("B", 40_000)), 100_000, 30_000, Some("B")));
        assert_eq!(s, RaceStatus { label: RaceLabel::Leading, is_final: false, acting: Some(lid("A")) });
    }

    #[test]
    fn exactly_one_percent_is_too_close() {
        let s = classify(&race(Some(("A", 50_500)), Some(("B", 49_500)), 100_000, 1_000, None));
        assert_eq!(s.label, RaceLabel::TooClose);
        let s = classify(&race(Some(("A", 50_501)), Some(("B", 49_499)), 100_000, 1_002, None));
        assert_eq!(s.label, RaceLabel::Leading);
    }

    #[test]
    fn outstanding_equal_to_margin_is_still_open() {
        let s = classify(&race(Some(("A", 600)), Some(("B", 400)), 1_000, 200, None));
        assert!(!s.is_final);
        let s = classify(&race(Some(("A", 600)), Some(("B", 400)), 1_000, 199, Some("B")));
        assert_eq!((s.label, s.is_final), (RaceLabel::Gained, true));
    }

    #[test]
    fn dead_heat_with_nothing_left_stays_open() {
        let s = classify(&race(Some(("A", 500)), Some(("B", 500)), 1_000, 0, None));
        assert_eq!((s.label, s.is_final), (RaceLabel::TooClose, false));
    }

    #[test]
    fn misordered_leader() {
        let s = classify(&race(Some(("A", 49_800)), Some(("B", 50_200)), 100_000, 5_000, None));
        assert_eq!(s, RaceStatus { label: RaceLabel::TooClose, is_final: false, acting: None });
        let s = classify(&race(Some(("A", 40_000)), Some(("B", 60_000)), 100_000, 5_000, None));
        assert_eq!(s, RaceStatus { label: RaceLabel::Contested, is_final: false, acting: None });
        let s = classify(&race(Some(("A", 49_800)), Some(("B", 50_200)), 100_000, 0, None));
        assert_eq!(s.label, RaceLabel::Contested);
    }

    #[test]
    fn custom_close_margin() {
        let input = race(Some(("A", 520)), Some(("B", 480)), 1_000, 100, None);
        assert_eq!(classify(&input).label, RaceLabel::Leading);
        let wide = CloseMargin::from_percent(5.0).unwrap();
        assert_eq!(classify_with(&input, wide).label, RaceLabel::TooClose);
    }

    #[test]
    fn tokens_are_stable() {
        assert_eq!(RaceLabel::TooClose.to_string(), "too_close");
        assert_eq!(RaceLabel::AwaitingData.token(), "awaiting_data");
        assert!(RaceLabel::Gained.is_outcome());
        assert!(!RaceLabel::Leading.is_outcome());
    }

    fn arb_race() -> impl Strategy<Value = RaceInput> {
        (0u64..100_000, 0u64..100_000, 0u64..50_000, -1_000i64..200_000, prop::option::of(0u8..3))
            .prop_map(|(a, b, other, remaining, prev)| {
                let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
                RaceInput {
                    leader: Some(entry("A", hi)),
                    runner_up: Some(entry("B", lo)),
                    total_votes: hi + lo + other,
                    remaining_estimate: remaining,
                    previous_holder: prev.map(|p| lid(["A", "B", "C"][usize::from(p)])),
                }
            })
    }

    proptest! {
        #[test]
        fn prop_unreachable_margin_is_final(input in arb_race()) {
            let leader = input.leader.as_ref().unwrap().votes;
            let runner = input.runner_up.as_ref().unwrap().votes;
            let s = classify(&input);
            if input.total_votes > 0 && i128::from(input.remaining_estimate) < i128::from(leader - runner) {
                prop_assert!(s.is_final);
            }
        }

        #[test]
        fn prop_final_means_unreachable(input in arb_race()) {
            let leader = input.leader.as_ref().unwrap().votes;
            let runner = input.runner_up.as_ref().unwrap().votes;
            let s = classify(&input);
            if s.is_final {
                prop_assert!(i128::from(input.remaining_estimate) < i128::from(leader - runner));
            }
        }

        #[test]
        fn prop_turnover_is_a_gain(input in arb_race()) {
            let s = classify(&input);
            if let (true, Some(prev)) = (s.is_final, input.previous_holder.as_ref()) {
                if *prev != lid("A") {
                    prop_assert_eq!(s.label, RaceLabel::Gained);
                } else {
                    prop_assert_eq!(s.label, RaceLabel::Held);
                }
            }
        }

        #[test]
        fn prop_classification_is_idempotent(input in arb_race()) {
            prop_assert_eq!(classify(&input), classify(&input));
        }
    }
}
