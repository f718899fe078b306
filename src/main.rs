//! Round-trip verification harness for an external disassembler.
//!
//! Decodes each binary fixture with an external decoder, reassembles the
//! decoded text with an external assembler, and byte-compares the result
//! against the original fixture. Prints `OK`/`FAILED` per fixture.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use roundtrip::config::{SuiteConfig, load_config};
use roundtrip::{cli, logging};

#[derive(Parser)]
#[command(
    name = "roundtrip",
    version,
    about = "Round-trip verification harness for an external disassembler"
)]
struct Cli {
    /// Path to the TOML config file. Missing file means all defaults.
    #[arg(long, default_value = "roundtrip.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the fixtures that would be processed.
    List {
        /// Fixture directory (overrides config).
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
    /// Decode, reassemble, and byte-compare every fixture.
    Run {
        /// Fixture directory (overrides config).
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Decoder executable (overrides config).
        #[arg(long)]
        decoder: Option<PathBuf>,
        /// Keep intermediate files of failed fixtures for inspection.
        #[arg(long)]
        keep_failed: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    match cli.command {
        Command::List { fixtures } => {
            let cfg = with_overrides(cfg, fixtures, None, false);
            cli::list(&cfg)
        }
        Command::Run {
            fixtures,
            decoder,
            keep_failed,
        } => {
            let cfg = with_overrides(cfg, fixtures, decoder, keep_failed);
            cli::run(&cfg)
        }
    }
}

/// Apply CLI flag overrides on top of the loaded config.
fn with_overrides(
    mut cfg: SuiteConfig,
    fixtures: Option<PathBuf>,
    decoder: Option<PathBuf>,
    keep_failed: bool,
) -> SuiteConfig {
    if let Some(fixtures) = fixtures {
        cfg.fixtures_dir = fixtures;
    }
    if let Some(decoder) = decoder {
        cfg.decoder = decoder;
    }
    if keep_failed {
        cfg.keep_failed = true;
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::parse_from(["roundtrip", "run"]);
        assert_eq!(cli.config, PathBuf::from("roundtrip.toml"));
        assert!(matches!(
            cli.command,
            Command::Run {
                fixtures: None,
                decoder: None,
                keep_failed: false,
            }
        ));
    }

    #[test]
    fn parse_run_with_flags() {
        let cli = Cli::parse_from([
            "roundtrip",
            "run",
            "--fixtures",
            "corpus",
            "--decoder",
            "bin/decoder",
            "--keep-failed",
        ]);
        match cli.command {
            Command::Run {
                fixtures,
                decoder,
                keep_failed,
            } => {
                assert_eq!(fixtures, Some(PathBuf::from("corpus")));
                assert_eq!(decoder, Some(PathBuf::from("bin/decoder")));
                assert!(keep_failed);
            }
            Command::List { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let cfg = with_overrides(
            SuiteConfig::default(),
            Some(PathBuf::from("corpus")),
            Some(PathBuf::from("bin/decoder")),
            true,
        );
        assert_eq!(cfg.fixtures_dir, PathBuf::from("corpus"));
        assert_eq!(cfg.decoder, PathBuf::from("bin/decoder"));
        assert!(cfg.keep_failed);
    }

    #[test]
    fn overrides_keep_config_when_absent() {
        let base = SuiteConfig::default();
        let cfg = with_overrides(base.clone(), None, None, false);
        assert_eq!(cfg, base);
    }
}
