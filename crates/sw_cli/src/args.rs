// crates/sw_cli/src/args.rs
//
// Offline CLI argument surface.
// - No networked paths (reject any scheme:// like http/https/file)
// - Inputs: --config and --snapshot, both required local files
// - Output: --out file (stdout when omitted), --pretty for indented JSON
// - Seed override for drawing lots (u64 decimal or 0x-hex up to 16 nybbles)
// - --validate-only loads and checks the configuration without running the engine

use clap::Parser;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seatwatch",
    disable_help_subcommand = true,
    about = "Seat projections and district race status from partial returns"
)]
pub struct Args {
    /// Election configuration JSON (regions, districts, barrier, tie policy).
    #[arg(long)]
    pub config: PathBuf,

    /// Vote snapshot JSON (proportional + district records).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Output file for the outcome JSON (default: stdout).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Indented JSON instead of canonical compact JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Tie lot seed override; switches the tie policy to `lot`. Decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Load and validate inputs only; do not run the engine.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress status messages and lower logging to errors only.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_file(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{label} {}", p.display()))),
    }
}

/// Absolute path; falls back to CWD-relative when the file does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

/// Scheme and existence checks on parsed arguments, then path normalization.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    if let Some(out) = &args.out {
        ensure_local_path(out)?;
    }
    ensure_local_file(&args.config, "--config")?;
    ensure_local_file(&args.snapshot, "--snapshot")?;

    args.config = normalize_path(&args.config);
    args.snapshot = normalize_path(&args.snapshot);
    args.out = args.out.take().map(|p| normalize_path(&p));
    Ok(args)
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}
