#![forbid(unsafe_code)]
//! witness: a rewriting test interpreter
//!
//! A script's bare comparisons are its tests and its print statements are report output. The
//! pipeline parses the script into a concrete syntax tree, rewrites those statements into calls
//! against an instrumentation hook, regenerates source, and runs it in a sandboxed interpreter
//! with an [`observer::Observer`] installed as the hook.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Tested programs**: Errors inside the interpreted program are values
//!   ([`runtime::Exception`]), never Rust panics.

pub mod cli;
pub mod interpolator;
pub mod observer;
pub mod runtime;
pub mod version;

pub use witness_syntax::{Node, SyntaxError, TreeError, codec, query};

pub use interpolator::{Interpolator, interpolate};
pub use observer::{ExecutiveSummary, FileReport, Observer, ObserverConfig, Tally, test_source};
pub use runtime::{Sandbox, SandboxConfig};
