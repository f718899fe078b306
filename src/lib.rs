//! Round-trip verification harness for an external disassembler.
//!
//! For every binary fixture in a directory, the harness decodes it with an
//! external decoder, reassembles the decoded text with an external assembler,
//! and byte-compares the result against the original fixture. One status line
//! is printed per fixture. The harness owns none of the interesting work:
//! decoding, assembling, and comparison are all external collaborators invoked
//! as child processes.
//!
//! - **[`fixtures`]**: Fixture discovery (deterministic, source files excluded).
//! - **[`pipeline`]**: The per-fixture decode → assemble → compare round trip.
//! - **[`process`]**: Bounded child process execution.
//! - **[`config`]**: TOML configuration with CLI overrides.

pub mod cli;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod status;
