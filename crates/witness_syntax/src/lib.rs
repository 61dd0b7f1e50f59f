//! Shared syntax frontend for the witness interpreter: lexer, concrete syntax tree, parser, codec.
//!
//! ## Notes
//! - This crate is “syntax-only”: it knows nothing about evaluation or instrumentation.
//! - Vocabulary identity (token kinds/grammar symbols/keywords) comes from `witness_core::lang`
//!   registries.
//!
//! ## Examples
//! ```rust
//! use witness_syntax::{codec, query};
//!
//! let tree = codec::parse("1 + 1 == 2\n", true).unwrap();
//! let stmt = tree.children()[0].clone();
//! assert!(query::contains(&stmt, "comp_op").unwrap());
//! assert_eq!(codec::serialize(&stmt), "1 + 1 == 2");
//! ```
//!
//! ## See also
//! - `witness_core::lang` for registry-backed language vocabulary.

pub mod codec;
pub mod cst;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod writer;

pub use cst::{Interior, Leaf, Node, Span};
pub use diagnostics::{CompileError, SyntaxError, TreeError};
pub use parser::StartSymbol;
