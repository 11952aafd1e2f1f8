//! sw_core: Core types for the seat engine.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! workspace (`sw_algo`, `sw_pipeline`, `sw_io`, `sw_cli`):
//!
//! - Identifiers: `ListId`, `RegionId`, `DistrictId`, `CandidateId`
//! - `Tally` (identifier → non-negative votes) and the count normalizer
//! - `Barrier` (exclusion threshold in basis points)
//! - Tie policies and the seeded `TieRng` used only for drawing lots
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod barrier;
pub mod errors;
pub mod ids;
pub mod normalize;
pub mod rng;
pub mod tally;
pub mod ties;

pub use barrier::Barrier;
pub use errors::{DataGap, EngineError};
pub use ids::{CandidateId, DistrictId, IdError, ListId, RegionId};
pub use normalize::{count_or_zero, normalize_count, normalize_records, Normalized, RawCount};
pub use rng::TieRng;
pub use tally::Tally;
pub use ties::{PolicyBreaker, TieBreaker, TieChoice, TieContender, TiePolicy, TieRecord};
