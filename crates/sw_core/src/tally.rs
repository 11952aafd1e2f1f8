//! `Tally`: identifier → non-negative vote count.
//!
//! Keys are unique and kept in `ListId` order so every downstream scan is
//! deterministic. A tally is never mutated in place once built; the
//! combinators below return new tallies.

use std::collections::BTreeMap;

use crate::errors::EngineError;
use crate::ids::ListId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tally(BTreeMap<ListId, u64>);

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from non-negative counts; duplicate keys are summed (saturating).
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (ListId, u64)>,
    {
        let mut map: BTreeMap<ListId, u64> = BTreeMap::new();
        for (id, v) in counts {
            let slot = map.entry(id).or_insert(0);
            *slot = slot.saturating_add(v);
        }
        Tally(map)
    }

    /// Build from signed counts, rejecting any negative value.
    pub fn try_from_signed<I>(counts: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (ListId, i64)>,
    {
        let mut checked = Vec::new();
        for (id, v) in counts {
            let v = u64::try_from(v).map_err(|_| {
                EngineError::invalid(format!("negative vote count {v} for list {id}"))
            })?;
            checked.push((id, v));
        }
        Ok(Self::from_counts(checked))
    }

    /// Votes for `id` (zero if absent).
    #[inline]
    pub fn get(&self, id: &ListId) -> u64 {
        self.0.get(id).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, id: &ListId) -> bool {
        self.0.contains_key(id)
    }

    /// Sum of all counts, widened so it cannot overflow.
    pub fn total(&self) -> u128 {
        self.0.values().map(|&v| u128::from(v)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ListId, u64)> + '_ {
        self.0.iter().map(|(k, &v)| (k, v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &ListId> + '_ {
        self.0.keys()
    }

    /// New tally with `id` set to `votes`.
    pub fn with_votes(&self, id: ListId, votes: u64) -> Self {
        let mut map = self.0.clone();
        map.insert(id, votes);
        Tally(map)
    }

    /// New tally holding the per-key sum of both inputs.
    pub fn merged(&self, other: &Tally) -> Self {
        Self::from_counts(self.iter().chain(other.iter()).map(|(k, v)| (k.clone(), v)))
    }

    /// Entries sorted by votes descending, then by identifier.
    pub fn ranked(&self) -> Vec<(&ListId, u64)> {
        let mut v: Vec<(&ListId, u64)> = self.iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    pub fn as_map(&self) -> &BTreeMap<ListId, u64> {
        &self.0
    }
}

impl FromIterator<(ListId, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (ListId, u64)>>(iter: I) -> Self {
        Self::from_counts(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lid(s: &str) -> ListId {
        s.parse().unwrap()
    }

    #[test]
    fn duplicates_are_summed() {
        let t = Tally::from_counts([(lid("A"), 3), (lid("B"), 1), (lid("A"), 4)]);
        assert_eq!(t.get(&lid("A")), 7);
        assert_eq!(t.get(&lid("C")), 0);
        assert_eq!(t.total(), 8);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = Tally::try_from_signed([(lid("A"), 10), (lid("B"), -1)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(m) if m.contains("B")));
        assert!(Tally::try_from_signed([(lid("A"), 0)]).is_ok());
    }

    #[test]
    fn combinators_leave_input_untouched() {
        let a = Tally::from_counts([(lid("A"), 1)]);
        let b = a.with_votes(lid("B"), 5);
        let c = a.merged(&b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.get(&lid("B")), 5);
        assert_eq!(c.get(&lid("A")), 2);
        assert_eq!(c.get(&lid("B")), 5);
    }

    #[test]
    fn ranked_breaks_equal_votes_by_id() {
        let t = Tally::from_counts([(lid("C"), 5), (lid("A"), 5), (lid("B"), 9)]);
        let order: Vec<&str> = t.ranked().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn total_does_not_overflow() {
        let t = Tally::from_counts([(lid("A"), u64::MAX), (lid("B"), u64::MAX)]);
        assert_eq!(t.total(), 2 * u128::from(u64::MAX));
    }
}
