//! CLI command implementations.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::SuiteConfig;
use crate::fixtures::discover_fixtures;
use crate::pipeline::run_suite;

/// Print the fixtures that would be processed, one absolute path per line.
pub fn list(cfg: &SuiteConfig) -> Result<()> {
    cfg.validate()?;
    let fixtures = discover_fixtures(&cfg.fixtures_dir, &cfg.source_extension)?;
    debug!(count = fixtures.len(), "listing fixtures");
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for fixture in fixtures {
        writeln!(out, "{}", fixture.display()).context("write fixture path")?;
    }
    Ok(())
}

/// Run the round-trip suite over every fixture.
pub fn run(cfg: &SuiteConfig) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_suite(cfg, &mut out)
}
