// crates/sw_cli/src/main.rs
//
// load → (seed override) → validate → run → canonical JSON out.
// Status lines and logs go to stderr; stdout carries only the outcome JSON.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const IO: u8 = 4;
}

use std::io::Write;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args, CliError};
use sw_core::TiePolicy;
use sw_io::IoError;
use sw_pipeline::{ElectionConfig, PipelineError, Snapshot};

/// Environment variable holding the log filter (`tracing_subscriber::EnvFilter` syntax).
const LOG_ENV: &str = "SEATWATCH_LOG";

/// Central error type for exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Argument, JSON shape, or configuration failures.
    Validation(String),
    /// Read/write failures.
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seatwatch: error: {e}");
            let rc = match e {
                CliError::NonLocalPath(_) => exitcodes::VALIDATION,
                CliError::NotFound(_) => exitcodes::IO,
            };
            return ExitCode::from(rc);
        }
    };

    init_logging(args.quiet);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("seatwatch: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc)
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_inputs(args: &Args) -> Result<(ElectionConfig, Snapshot), MainError> {
    let mut cfg = sw_io::load_config(&args.config).map_err(map_io_err)?;
    let snap = sw_io::load_snapshot(&args.snapshot).map_err(map_io_err)?;
    if let Some(seed) = args.seed {
        tracing::info!(seed, "tie policy overridden to lot");
        cfg.tie_policy = TiePolicy::Lot { seed };
    }
    Ok((cfg, snap))
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let (cfg, snap) = load_inputs(args)?;

    if args.validate_only {
        sw_pipeline::validate_config(&cfg).map_err(map_pipeline_err)?;
        if !args.quiet {
            eprintln!("validate-only: inputs OK");
        }
        return Ok(());
    }

    let mut outcome = sw_pipeline::run(&cfg, &snap).map_err(map_pipeline_err)?;
    let snapshot_id = sw_io::snapshot_id(&snap)
        .map_err(|e| MainError::Validation(format!("snapshot digest: {e}")))?;
    outcome.snapshot_id = Some(snapshot_id);

    match &args.out {
        Some(path) => sw_io::write_json_file(path, &outcome, args.pretty).map_err(map_io_err)?,
        None => {
            let bytes = if args.pretty {
                sw_io::to_pretty_json_bytes(&outcome)
            } else {
                sw_io::to_canonical_json_bytes(&outcome)
            }
            .map_err(|e| MainError::Io(format!("encode outcome: {e}")))?;
            let mut stdout = std::io::stdout().lock();
            let written = (|| -> std::io::Result<()> {
                stdout.write_all(&bytes)?;
                if !args.pretty {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()
            })();
            written.map_err(|e| MainError::Io(format!("stdout: {e}")))?;
        }
    }

    if !args.quiet {
        let decided = outcome.districts.iter().filter(|d| d.status.is_final).count();
        eprintln!(
            "seatwatch: {} of {} seats assigned, {}/{} districts decided, {} records skipped",
            outcome.national.total,
            cfg.chamber_size,
            decided,
            outcome.districts.len(),
            outcome.skipped_records
        );
    }
    Ok(())
}

fn map_error(e: &MainError) -> u8 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Read { .. } | IoError::Write { .. } => MainError::Io(e.to_string()),
        IoError::Json { .. } | IoError::Invalid(_) => MainError::Validation(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Config(_) => MainError::Validation(e.to_string()),
    }
}
