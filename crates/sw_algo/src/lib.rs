// crates/sw_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Election math: proportional apportionment and district race status.
//! Pure functions over immutable inputs; no I/O, no shared state.

pub use sw_core::{Barrier, EngineError, ListId, Tally, TiePolicy};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod dhondt;

    pub use dhondt::{apportion, apportion_checked, apportion_with, SeatAllocation};
}

pub use allocation::{apportion, apportion_checked, apportion_with, SeatAllocation};

// ----------------------------- District races ---------------------------------------

pub mod race;

pub use race::{classify, classify_with, CloseMargin, RaceEntry, RaceInput, RaceLabel, RaceStatus};
