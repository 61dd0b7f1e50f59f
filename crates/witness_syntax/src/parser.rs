//! Parser for the host language
//!
//! Converts a token stream into a concrete syntax tree. Every production the parser walks through
//! becomes an interior node, so `x` used as an expression statement is a chain of single-child
//! nodes from `stmt` down to the `NAME` leaf.
//!
//! ## Examples
//!
//! ```rust
//! use witness_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("1 + 1 == 2\n").unwrap();
//! let tree = parser::parse(&tokens, true).unwrap();
//! assert_eq!(tree.kind().name(), "file_input");
//! ```

use crate::cst::{Node, Span};
use crate::diagnostics::CompileError;
use crate::lexer::Token;
use witness_core::lang::keywords::KeywordId;
use witness_core::lang::symbols::SymbolId;
use witness_core::lang::tokens::TokenId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
