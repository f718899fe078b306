//! Fixture discovery.
//!
//! A fixture is any regular file in the fixture directory whose name does not
//! end in the source text extension. Discovery is non-recursive and sorted by
//! file name so the status stream is deterministic across runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Discover binary fixtures in `dir`, excluding files with the given source
/// extension (without the dot) and subdirectories.
///
/// Returns absolute paths sorted by file name. A missing or unreadable
/// directory is an environment error and propagates.
pub fn discover_fixtures(dir: &Path, source_extension: &str) -> Result<Vec<PathBuf>> {
    let mut fixtures = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("read fixtures dir {}", dir.display()))?
    {
        let entry = entry.context("read fixture entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some(source_extension) {
            debug!(path = %path.display(), "skipping source file");
            continue;
        }
        let absolute = path
            .canonicalize()
            .with_context(|| format!("resolve fixture {}", path.display()))?;
        fixtures.push(absolute);
    }
    fixtures.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
    debug!(count = fixtures.len(), dir = %dir.display(), "fixtures discovered");
    Ok(fixtures)
}
