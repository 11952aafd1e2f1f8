//! crates/sw_io/src/hasher.rs
//!
//! SHA-256 digests over raw bytes and over canonical JSON.
//! Hex digests are lowercase. A snapshot's identity is the digest of its
//! canonical JSON, so two snapshots that differ only in key order or
//! whitespace share an id; callers may cache outcomes by it.

use digest::Digest;
use serde::Serialize;
use sha2::Sha256;
use sw_pipeline::Snapshot;

use crate::canonical_json::to_canonical_json_bytes;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

pub fn snapshot_digest(snap: &Snapshot) -> Result<String, serde_json::Error> {
    sha256_canonical(snap)
}

/// `SNP:<hex>`
pub fn snapshot_id(snap: &Snapshot) -> Result<String, serde_json::Error> {
    snapshot_digest(snap).map(|hex| format!("SNP:{hex}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hashing_ignores_key_order() {
        #[derive(Serialize)]
        struct T {
            b: u32,
            a: u32,
        }
        let h1 = sha256_canonical(&T { b: 2, a: 1 }).unwrap();
        let h2 = sha256_canonical(&json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn snapshot_ids_track_content() {
        let a: Snapshot = serde_json::from_value(json!({
            "proportional": [{"region": "R1", "list": "A", "votes": 10}]
        }))
        .unwrap();
        let mut b = a.clone();
        let id_a = snapshot_id(&a).unwrap();
        assert!(id_a.starts_with("SNP:"));
        assert_eq!(id_a.len(), 4 + 64);
        assert_eq!(id_a, snapshot_id(&b).unwrap());

        b.completed_districts.insert("D1".parse().unwrap());
        assert_ne!(id_a, snapshot_id(&b).unwrap());
    }
}
