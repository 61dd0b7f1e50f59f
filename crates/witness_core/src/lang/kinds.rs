//! The combined kind namespace used to tag concrete-syntax-tree nodes.
//!
//! A [`Kind`] is either a token kind (leaves) or a grammar symbol (interior nodes). Both share one
//! numeric space: token codes sort below [`FIRST_SYMBOL_CODE`], symbol codes at or above it, so a
//! numeric code or a name always resolves to at most one kind.
//!
//! ## Examples
//! ```rust
//! use witness_core::lang::kinds::Kind;
//! use witness_core::lang::symbols::SymbolId;
//! use witness_core::lang::tokens::TokenId;
//!
//! assert_eq!(Kind::from_name("comparison"), Some(Kind::Symbol(SymbolId::Comparison)));
//! assert_eq!(Kind::from_code(4), Some(Kind::Token(TokenId::Newline)));
//! assert_eq!(Kind::Token(TokenId::Name).name(), "NAME");
//! assert_eq!(Kind::from_code(9999), None);
//! ```

use std::fmt;

use super::registry::{FIRST_SYMBOL_CODE, KindCode};
use super::symbols::{self, SymbolId};
use super::tokens::{self, TokenId};

/// Tag of a tree node: a token kind for leaves, a grammar symbol for interior nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Token(TokenId),
    Symbol(SymbolId),
}

impl Kind {
    /// Human-readable name, resolved through the owning registry.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Token(t) => tokens::as_str(t),
            Kind::Symbol(s) => symbols::as_str(s),
        }
    }

    /// Numeric code in the combined namespace.
    pub fn code(self) -> KindCode {
        match self {
            Kind::Token(t) => tokens::code(t),
            Kind::Symbol(s) => symbols::code(s),
        }
    }

    /// Resolve a name against the grammar table first, then the token table.
    pub fn from_name(name: &str) -> Option<Kind> {
        symbols::from_name(name)
            .map(Kind::Symbol)
            .or_else(|| tokens::from_name(name).map(Kind::Token))
    }

    /// Resolve a numeric code in the combined namespace.
    pub fn from_code(code: KindCode) -> Option<Kind> {
        if code >= FIRST_SYMBOL_CODE {
            symbols::from_code(code).map(Kind::Symbol)
        } else {
            tokens::from_code(code).map(Kind::Token)
        }
    }

    pub fn is_token(self) -> bool {
        matches!(self, Kind::Token(_))
    }
}

impl From<TokenId> for Kind {
    fn from(id: TokenId) -> Self {
        Kind::Token(id)
    }
}

impl From<SymbolId> for Kind {
    fn from(id: SymbolId) -> Self {
        Kind::Symbol(id)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_kind_round_trips() {
        for info in tokens::TOKENS {
            let kind = Kind::Token(info.item.id);
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
        }
        for info in symbols::SYMBOLS {
            let kind = Kind::Symbol(info.item.id);
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn names_do_not_collide_across_tables() {
        for info in tokens::TOKENS {
            assert!(symbols::from_name(info.item.canonical).is_none());
        }
    }

    #[test]
    fn unknown_lookups() {
        assert_eq!(Kind::from_name("foo"), None);
        assert_eq!(Kind::from_code(25), None);
        assert_eq!(Kind::from_code(KindCode::MAX), None);
    }
}
