//! Error taxonomy shared by the engine crates.
//!
//! Only genuinely invalid configuration fails a call (`EngineError`). Gaps in
//! vote data (`DataGap`) are recovered by the normalizer and never cross the
//! engine boundary as errors.

use core::fmt;

/// Fatal to the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Negative seat/vote counts, or an out-of-domain barrier.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidArgument(msg.into())
    }
}

/// Why a raw count could not be read. Always normalized to zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataGap {
    Missing,
    Unparseable,
    Negative,
    NonFinite,
    Overflow,
}

impl fmt::Display for DataGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataGap::Missing => write!(f, "missing"),
            DataGap::Unparseable => write!(f, "unparseable"),
            DataGap::Negative => write!(f, "negative"),
            DataGap::NonFinite => write!(f, "non-finite"),
            DataGap::Overflow => write!(f, "overflow"),
        }
    }
}
