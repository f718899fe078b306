//! Per-fixture round-trip status and its stdout rendering.

use std::path::Path;

/// Outcome of one fixture's round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureStatus {
    /// Decode, reassembly, and comparison all succeeded; bytes are identical.
    Ok,
    /// The decoder exited non-zero (or timed out); reassembly and comparison
    /// were not attempted.
    DecodeFailed,
    /// The assembler exited non-zero, timed out, or produced no output file.
    AssembleFailed,
    /// The reassembled binary differs from the fixture (or the comparator
    /// itself failed).
    Mismatch,
}

impl FixtureStatus {
    pub fn is_ok(self) -> bool {
        self == FixtureStatus::Ok
    }
}

/// Render the status line printed to stdout for a fixture.
///
/// Decode failures and byte mismatches print identically; assembler failures
/// get their own category so an assembly error is not mistaken for a decoder
/// bug.
pub fn status_line(status: FixtureStatus, fixture: &Path) -> String {
    match status {
        FixtureStatus::Ok => format!("OK     {}", fixture.display()),
        FixtureStatus::DecodeFailed | FixtureStatus::Mismatch => {
            format!("FAILED {}", fixture.display())
        }
        FixtureStatus::AssembleFailed => format!("FAILED (assemble) {}", fixture.display()),
    }
}
