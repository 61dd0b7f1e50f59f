//! Define the reserved keyword vocabulary of the host language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings and
//! categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Keywords are lexed as `NAME` leaves; the parser consults this registry to decide whether a
//!   name may be used as an identifier.
//! - `True`, `False` and `None` are deliberately *not* reserved: they are ordinary names bound in the
//!   builtin namespace.
//!
//! ## Examples
//! ```rust
//! use witness_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("print"), Some(KeywordId::Print));
//! assert_eq!(keywords::as_str(KeywordId::Print), "print");
//! assert!(!keywords::is_keyword("True"));
//! ```

use super::registry::{LangItemInfo, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Statements
    Assert,
    Break,
    Class,
    Continue,
    Def,
    Del,
    For,
    From,
    Global,
    If,
    Import,
    Pass,
    Print,
    Raise,
    Return,
    Try,
    While,

    // Clauses
    As,
    Elif,
    Else,
    Except,
    Finally,

    // Word operators
    And,
    In,
    Is,
    Not,
    Or,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Statement,
    Clause,
    Operator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub item: LangItemInfo<KeywordId>,
    pub category: KeywordCategory,
}

/// Registry of all keywords, in [`KeywordId`] declaration order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Assert, "assert", KeywordCategory::Statement, "Raise AssertionError when a test is false."),
    info(KeywordId::Break, "break", KeywordCategory::Statement, "Leave the innermost loop."),
    info(KeywordId::Class, "class", KeywordCategory::Statement, "Define an exception class."),
    info(KeywordId::Continue, "continue", KeywordCategory::Statement, "Start the next loop iteration."),
    info(KeywordId::Def, "def", KeywordCategory::Statement, "Define a function."),
    info(KeywordId::Del, "del", KeywordCategory::Statement, "Unbind names or remove items."),
    info(KeywordId::For, "for", KeywordCategory::Statement, "Iterate over a sequence."),
    info(KeywordId::From, "from", KeywordCategory::Statement, "Import names out of a module."),
    info(KeywordId::Global, "global", KeywordCategory::Statement, "Route assignments to module globals."),
    info(KeywordId::If, "if", KeywordCategory::Statement, "Conditional execution."),
    info(KeywordId::Import, "import", KeywordCategory::Statement, "Bind a module to a name."),
    info(KeywordId::Pass, "pass", KeywordCategory::Statement, "Do nothing."),
    info(KeywordId::Print, "print", KeywordCategory::Statement, "Write values to standard output."),
    info(KeywordId::Raise, "raise", KeywordCategory::Statement, "Raise or re-raise an exception."),
    info(KeywordId::Return, "return", KeywordCategory::Statement, "Return from a function."),
    info(KeywordId::Try, "try", KeywordCategory::Statement, "Handle exceptions."),
    info(KeywordId::While, "while", KeywordCategory::Statement, "Loop while a test holds."),
    info(KeywordId::As, "as", KeywordCategory::Clause, "Rename an imported name or bind a caught exception."),
    info(KeywordId::Elif, "elif", KeywordCategory::Clause, "Chained conditional branch."),
    info(KeywordId::Else, "else", KeywordCategory::Clause, "Fallback branch."),
    info(KeywordId::Except, "except", KeywordCategory::Clause, "Exception handler clause."),
    info(KeywordId::Finally, "finally", KeywordCategory::Clause, "Cleanup clause."),
    info(KeywordId::And, "and", KeywordCategory::Operator, "Short-circuit conjunction."),
    info(KeywordId::In, "in", KeywordCategory::Operator, "Membership test / loop target separator."),
    info(KeywordId::Is, "is", KeywordCategory::Operator, "Identity comparison."),
    info(KeywordId::Not, "not", KeywordCategory::Operator, "Logical negation."),
    info(KeywordId::Or, "or", KeywordCategory::Operator, "Short-circuit disjunction."),
];

/// Return the registry entry for a keyword.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).item.canonical
}

/// Resolve a spelling to a keyword id.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.item.canonical == s).map(|k| k.item.id)
}

/// Return `true` when `s` is reserved and cannot be used as an identifier.
pub fn is_keyword(s: &str) -> bool {
    from_str(s).is_some()
}

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        item: LangItemInfo {
            id,
            canonical,
            aliases: &[],
            description,
            stability: Stability::Stable,
        },
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_like_the_enum() {
        for (index, info) in KEYWORDS.iter().enumerate() {
            assert_eq!(info.item.id as usize, index, "{} is out of order", info.item.canonical);
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(from_str("if"), Some(KeywordId::If));
        assert_eq!(from_str("If"), None);
        assert_eq!(info_for(KeywordId::Not).category, KeywordCategory::Operator);
    }

    #[test]
    fn literals_are_plain_names() {
        for name in ["True", "False", "None", "pprint"] {
            assert!(!is_keyword(name), "{name} must stay an identifier");
        }
    }
}
