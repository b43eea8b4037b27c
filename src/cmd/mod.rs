//! Command-line front ends.
//!
//! [`server`] backs the `resolver` binary and [`client`] backs
//! `resolver-cli`. Both are parsed with clap and run against an output
//! writer so they can be exercised in tests.

pub mod client;
pub mod server;

use std::io::{self, Write};

/// Writes the version line used by both `version` subcommands.
pub fn print_version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", crate::version::VERSION)
}
