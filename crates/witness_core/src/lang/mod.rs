//! Host-language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: token kinds, grammar symbols,
//! reserved keywords and builtin exception kinds.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer, parser, runtime
//! and reporter. Instead, callers work with **stable IDs** (e.g. `TokenId`, `SymbolId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no tree types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide names, numeric codes and spellings.
//!
//! ## Examples
//! ```rust
//! use witness_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("if"), Some(KeywordId::If));
//! assert_eq!(keywords::as_str(KeywordId::If), "if");
//! ```

pub mod errors;
pub mod keywords;
pub mod kinds;
pub mod registry;
pub mod symbols;
pub mod tokens;
