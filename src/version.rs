//! Version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time, so the CLI and
//! any embedding driver report the same string.

/// The witness version string (for example, `0.1.0`).
pub const WITNESS_VERSION: &str = env!("CARGO_PKG_VERSION");
