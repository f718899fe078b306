//! Harness configuration loaded from `roundtrip.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Harness configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values; a missing file
/// means all defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuiteConfig {
    /// Directory listed (non-recursively) for binary fixtures.
    pub fixtures_dir: PathBuf,

    /// Path to the external decoder executable. Invoked as
    /// `decoder <fixture>` with stdout captured as the decoded text.
    pub decoder: PathBuf,

    /// File extension (without the dot) identifying source text files,
    /// which are excluded from fixture iteration.
    pub source_extension: String,

    /// Keep the intermediate files of failed fixtures for post-mortem
    /// inspection instead of deleting them.
    pub keep_failed: bool,

    /// Wall-clock budget in seconds for each external command.
    pub timeout_secs: u64,

    /// Truncate captured child stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    pub assembler: AssemblerConfig,
    pub comparator: ComparatorConfig,
}

/// External assembler invocation. The decoded text path and an `-o <output>`
/// pair are appended to `command`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Command prefix, e.g. `["nasm"]`.
    pub command: Vec<String>,
}

/// External byte comparator. Invoked as `<command...> <reassembled> <fixture>`;
/// exit 0 means byte-identical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Command prefix, e.g. `["cmp"]`.
    pub command: Vec<String>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            command: vec!["nasm".to_string()],
        }
    }
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            command: vec!["cmp".to_string()],
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("files"),
            decoder: PathBuf::from("./decoder"),
            source_extension: "asm".to_string(),
            keep_failed: false,
            timeout_secs: 60,
            output_limit_bytes: 100_000,
            assembler: AssemblerConfig::default(),
            comparator: ComparatorConfig::default(),
        }
    }
}

impl SuiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source_extension.trim().is_empty() {
            return Err(anyhow!("source_extension must be non-empty"));
        }
        if self.source_extension.starts_with('.') {
            return Err(anyhow!("source_extension must not include a leading dot"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.assembler.command.is_empty() || self.assembler.command[0].trim().is_empty() {
            return Err(anyhow!("assembler.command must be a non-empty array"));
        }
        if self.comparator.command.is_empty() || self.comparator.command[0].trim().is_empty() {
            return Err(anyhow!("comparator.command must be a non-empty array"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SuiteConfig::default()`.
pub fn load_config(path: &Path) -> Result<SuiteConfig> {
    if !path.exists() {
        let cfg = SuiteConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SuiteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
