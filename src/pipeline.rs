//! The per-fixture round trip: decode, reassemble, byte-compare.
//!
//! Intermediate files live in a unique temporary directory per fixture, so
//! concurrent runs never clobber each other and cleanup is uniform across
//! success and failure paths. With `keep_failed`, a failed fixture's
//! directory is persisted for inspection instead of removed.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::config::SuiteConfig;
use crate::fixtures::discover_fixtures;
use crate::process::{run_command, run_command_to_file};
use crate::status::{FixtureStatus, status_line};

/// Result of checking one fixture.
#[derive(Debug)]
pub struct CheckReport {
    pub status: FixtureStatus,
    /// Intermediate directory persisted for a failed fixture, when
    /// `keep_failed` is set.
    pub kept_dir: Option<PathBuf>,
}

/// Run the whole suite, writing one status line per fixture to `out`.
///
/// Per-fixture failures are local: the suite continues to the next fixture.
/// Only environment errors (unreadable fixture directory, unspawnable tools)
/// abort the run.
pub fn run_suite(cfg: &SuiteConfig, out: &mut dyn Write) -> Result<()> {
    cfg.validate()?;
    let fixtures = discover_fixtures(&cfg.fixtures_dir, &cfg.source_extension)?;
    info!(count = fixtures.len(), "suite started");

    for fixture in &fixtures {
        let report = check_fixture(fixture, cfg)
            .with_context(|| format!("check fixture {}", fixture.display()))?;
        writeln!(out, "{}", status_line(report.status, fixture)).context("write status line")?;
        if let Some(kept) = &report.kept_dir {
            warn!(fixture = %fixture.display(), kept = %kept.display(), "kept intermediates");
        }
    }

    info!("suite finished");
    Ok(())
}

/// Round-trip a single fixture through the external decoder, assembler, and
/// comparator. The fixture file itself is never modified.
#[instrument(skip_all, fields(fixture = %fixture.display()))]
pub fn check_fixture(fixture: &Path, cfg: &SuiteConfig) -> Result<CheckReport> {
    let stem = fixture
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("fixture");
    let scratch = tempfile::Builder::new()
        .prefix(&format!("roundtrip-{stem}-"))
        .tempdir()
        .context("create scratch dir")?;
    let decoded = scratch.path().join(format!("{stem}.{}", cfg.source_extension));
    let reassembled = scratch.path().join(format!("{stem}.bin"));
    let timeout = Duration::from_secs(cfg.timeout_secs);

    let status = run_round_trip(fixture, cfg, &decoded, &reassembled, timeout)?;

    let kept_dir = if !status.is_ok() && cfg.keep_failed {
        Some(scratch.into_path())
    } else {
        None
    };
    Ok(CheckReport { status, kept_dir })
}

fn run_round_trip(
    fixture: &Path,
    cfg: &SuiteConfig,
    decoded: &Path,
    reassembled: &Path,
    timeout: Duration,
) -> Result<FixtureStatus> {
    debug!("decoding");
    let mut decode = Command::new(&cfg.decoder);
    decode.arg(fixture);
    let outcome = run_command_to_file(decode, decoded, timeout, cfg.output_limit_bytes)
        .context("run decoder")?;
    if !outcome.success() {
        debug!(exit_code = ?outcome.status.code(), timed_out = outcome.timed_out,
               stderr = %outcome.stderr_lossy(), "decode failed");
        return Ok(FixtureStatus::DecodeFailed);
    }

    debug!("assembling");
    let mut assemble = command_from(&cfg.assembler.command)?;
    assemble.arg("-o").arg(reassembled).arg(decoded);
    let outcome =
        run_command(assemble, timeout, cfg.output_limit_bytes).context("run assembler")?;
    if !outcome.success() || !reassembled.exists() {
        debug!(exit_code = ?outcome.status.code(), timed_out = outcome.timed_out,
               stderr = %outcome.stderr_lossy(), "assembly failed");
        return Ok(FixtureStatus::AssembleFailed);
    }

    debug!("comparing");
    let mut compare = command_from(&cfg.comparator.command)?;
    compare.arg(reassembled).arg(fixture);
    let outcome =
        run_command(compare, timeout, cfg.output_limit_bytes).context("run comparator")?;
    if outcome.success() {
        Ok(FixtureStatus::Ok)
    } else {
        debug!(exit_code = ?outcome.status.code(), "bytes differ");
        Ok(FixtureStatus::Mismatch)
    }
}

fn command_from(argv: &[String]) -> Result<Command> {
    let Some((program, args)) = argv.split_first() else {
        bail!("command must be non-empty");
    };
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}
