//! crates/sw_io/src/lib.rs
//! Local file I/O for the seat engine: typed JSON loaders, canonical JSON
//! output, and SHA-256 digests. Offline posture: any `<scheme>://` path is
//! rejected before the filesystem is touched.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub use canonical_json::{to_canonical_json_bytes, to_pretty_json_bytes, write_canonical_file, write_json_file};
pub use hasher::{sha256_canonical, sha256_hex, snapshot_digest, snapshot_id};
pub use loader::{load_config, load_snapshot};

/// Unified error for sw_io.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or a document that does not match the expected shape.
    #[error("json error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url(s: &str) -> bool {
    s.trim().contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        assert!(looks_like_url("https://example.org/cfg.json"));
        assert!(looks_like_url(" file:///tmp/x.json"));
        assert!(!looks_like_url("data/cfg.json"));
        assert!(!looks_like_url("C:\\data\\cfg.json"));
    }
}
