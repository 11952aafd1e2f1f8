//! Loader: read local JSON documents (election config, vote snapshot) into the
//! pipeline's typed structs. No network I/O; semantic checks stay in
//! `sw_pipeline::validate_config`.

use std::path::Path;

use serde::de::DeserializeOwned;
use sw_pipeline::{ElectionConfig, Snapshot};

use crate::{looks_like_url, IoError, IoResult};

fn ensure_local(path: &Path) -> IoResult<()> {
    let s = path.to_string_lossy();
    if looks_like_url(&s) {
        return Err(IoError::Invalid(format!("non-local path not allowed: {s}")));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    ensure_local(path)?;
    let shown = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| IoError::Read { path: shown.clone(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| IoError::Json { path: shown, source })
}

pub fn load_config(path: &Path) -> IoResult<ElectionConfig> {
    let cfg: ElectionConfig = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        regions = cfg.regions.len(),
        districts = cfg.districts.len(),
        "config loaded"
    );
    Ok(cfg)
}

pub fn load_snapshot(path: &Path) -> IoResult<Snapshot> {
    let snap: Snapshot = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        proportional = snap.proportional.len(),
        districts = snap.districts.len(),
        completed = snap.completed_districts.len(),
        "snapshot loaded"
    );
    Ok(snap)
}
