//! Shareable metadata for `witness_core::lang` registries.
//!
//! The `witness_core::lang` module is a set of **registry-first** vocabularies: token kinds, grammar
//! symbols, keywords and builtin exception kinds. This submodule provides the small, dependency-free
//! metadata types that are reused across all registries.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in
//!   `const` tables.
//! - Metadata is meant for tooling/diagnostics; enforcement of syntax rules still lives
//!   in the lexer/parser.
//!
//! ## See also
//! - [`crate::lang::tokens`]
//! - [`crate::lang::symbols`]
//! - [`crate::lang::keywords`]

/// Numeric code shared by token kinds (`< 256`) and grammar symbols (`>= 256`).
///
/// ## Examples
/// ```rust
/// use witness_core::lang::registry::{KindCode, FIRST_SYMBOL_CODE};
///
/// let code: KindCode = 257;
/// assert!(code >= FIRST_SYMBOL_CODE);
/// ```
pub type KindCode = u16;

/// First numeric code used by grammar symbols. Every token kind sorts below it.
pub const FIRST_SYMBOL_CODE: KindCode = 256;

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - This is intended for docs/tooling (e.g. to warn on legacy spellings), not for
///   feature-gating by itself.
///
/// ## Examples
/// ```rust
/// use witness_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    /// Accepted for compatibility with older scripts (e.g. `<>`, string exceptions).
    Legacy,
}

/// Shared metadata shape for "registry-first" vocabulary items.
///
/// Registries that need extra per-item data (e.g. a numeric code or an operator spelling) wrap this
/// struct in an "extension" info type.
///
/// ## Notes
/// - `description` is intentionally mandatory to keep docs/tooling consistent.
/// - This type is `Copy` so it can live in `const` tables.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub stability: Stability,
}
