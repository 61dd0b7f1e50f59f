//! Define the token-kind vocabulary: every leaf of a concrete syntax tree carries one of these.
//!
//! Token kinds live in the numeric namespace below [`FIRST_SYMBOL_CODE`]; the codes follow the
//! classic CPython `token` module so that pretty-printed trees read the way Python users expect.
//!
//! ## Notes
//! - [`TOKENS`] is ordered like [`TokenId`]; [`info_for`] indexes the table by discriminant.
//! - Keywords are not token kinds: they are `NAME` leaves whose text is reserved
//!   (see [`crate::lang::keywords`]).
//!
//! ## Examples
//! ```rust
//! use witness_core::lang::tokens::{self, TokenId};
//!
//! assert_eq!(tokens::from_name("NEWLINE"), Some(TokenId::Newline));
//! assert_eq!(tokens::code(TokenId::EqEqual), 28);
//! assert_eq!(tokens::from_spelling("<>"), Some(TokenId::NotEqual));
//! ```

use super::registry::{FIRST_SYMBOL_CODE, KindCode, LangItemInfo, Stability};

/// Stable identifier for every token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenId {
    // Layout / data-bearing
    EndMarker,
    Name,
    Number,
    String,
    Newline,
    Indent,
    Dedent,

    // Brackets / punctuation
    LPar,
    RPar,
    LSqb,
    RSqb,
    Colon,
    Comma,
    Semi,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    VBar,
    Amper,
    Less,
    Greater,
    Equal,
    Dot,
    Percent,
    LBrace,
    RBrace,
    EqEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Tilde,
    Circumflex,
    LeftShift,
    RightShift,
    DoubleStar,
    PlusEqual,
    MinEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    DoubleSlash,
    DoubleSlashEqual,
}

/// Metadata for a token kind.
///
/// ## Notes
/// - `item.canonical` is the upper-case kind name (`"NAME"`, `"EQEQUAL"`).
/// - `spelling` is the fixed source text for operator/punctuation kinds; data-bearing kinds
///   (`NAME`, `NUMBER`, `STRING`) and layout kinds have none.
/// - `legacy_spellings` are extra source spellings accepted by the lexer.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub item: LangItemInfo<TokenId>,
    pub code: KindCode,
    pub spelling: Option<&'static str>,
    pub legacy_spellings: &'static [&'static str],
}

/// Registry of all token kinds, in [`TokenId`] declaration order.
pub const TOKENS: &[TokenInfo] = &[
    layout(TokenId::EndMarker, 0, "ENDMARKER", "End of input."),
    layout(TokenId::Name, 1, "NAME", "Identifier or reserved word."),
    layout(TokenId::Number, 2, "NUMBER", "Integer or floating-point literal."),
    layout(TokenId::String, 3, "STRING", "String literal, kept with its quotes."),
    layout(TokenId::Newline, 4, "NEWLINE", "End of a logical line."),
    layout(TokenId::Indent, 5, "INDENT", "Start of a deeper indentation level."),
    layout(TokenId::Dedent, 6, "DEDENT", "End of an indentation level."),
    fixed(TokenId::LPar, 7, "LPAR", "("),
    fixed(TokenId::RPar, 8, "RPAR", ")"),
    fixed(TokenId::LSqb, 9, "LSQB", "["),
    fixed(TokenId::RSqb, 10, "RSQB", "]"),
    fixed(TokenId::Colon, 11, "COLON", ":"),
    fixed(TokenId::Comma, 12, "COMMA", ","),
    fixed(TokenId::Semi, 13, "SEMI", ";"),
    fixed(TokenId::Plus, 14, "PLUS", "+"),
    fixed(TokenId::Minus, 15, "MINUS", "-"),
    fixed(TokenId::Star, 16, "STAR", "*"),
    fixed(TokenId::Slash, 17, "SLASH", "/"),
    fixed(TokenId::VBar, 18, "VBAR", "|"),
    fixed(TokenId::Amper, 19, "AMPER", "&"),
    fixed(TokenId::Less, 20, "LESS", "<"),
    fixed(TokenId::Greater, 21, "GREATER", ">"),
    fixed(TokenId::Equal, 22, "EQUAL", "="),
    fixed(TokenId::Dot, 23, "DOT", "."),
    fixed(TokenId::Percent, 24, "PERCENT", "%"),
    fixed(TokenId::LBrace, 26, "LBRACE", "{"),
    fixed(TokenId::RBrace, 27, "RBRACE", "}"),
    fixed(TokenId::EqEqual, 28, "EQEQUAL", "=="),
    TokenInfo {
        legacy_spellings: &["<>"],
        ..fixed(TokenId::NotEqual, 29, "NOTEQUAL", "!=")
    },
    fixed(TokenId::LessEqual, 30, "LESSEQUAL", "<="),
    fixed(TokenId::GreaterEqual, 31, "GREATEREQUAL", ">="),
    fixed(TokenId::Tilde, 32, "TILDE", "~"),
    fixed(TokenId::Circumflex, 33, "CIRCUMFLEX", "^"),
    fixed(TokenId::LeftShift, 34, "LEFTSHIFT", "<<"),
    fixed(TokenId::RightShift, 35, "RIGHTSHIFT", ">>"),
    fixed(TokenId::DoubleStar, 36, "DOUBLESTAR", "**"),
    fixed(TokenId::PlusEqual, 37, "PLUSEQUAL", "+="),
    fixed(TokenId::MinEqual, 38, "MINEQUAL", "-="),
    fixed(TokenId::StarEqual, 39, "STAREQUAL", "*="),
    fixed(TokenId::SlashEqual, 40, "SLASHEQUAL", "/="),
    fixed(TokenId::PercentEqual, 41, "PERCENTEQUAL", "%="),
    fixed(TokenId::DoubleSlash, 47, "DOUBLESLASH", "//"),
    fixed(TokenId::DoubleSlashEqual, 48, "DOUBLESLASHEQUAL", "//="),
];

/// Return the registry entry for a token kind.
pub fn info_for(id: TokenId) -> &'static TokenInfo {
    &TOKENS[id as usize]
}

/// Return the upper-case kind name (`"NAME"`, `"NEWLINE"`, ...).
pub fn as_str(id: TokenId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the numeric code of a token kind.
pub fn code(id: TokenId) -> KindCode {
    info_for(id).code
}

/// Return the fixed source spelling of an operator/punctuation kind.
pub fn spelling(id: TokenId) -> Option<&'static str> {
    info_for(id).spelling
}

/// Resolve an upper-case kind name. Lookup is case-sensitive.
pub fn from_name(name: &str) -> Option<TokenId> {
    TOKENS.iter().find(|t| t.item.canonical == name).map(|t| t.item.id)
}

/// Resolve a numeric code. Codes at or above [`FIRST_SYMBOL_CODE`] never match.
pub fn from_code(code: KindCode) -> Option<TokenId> {
    if code >= FIRST_SYMBOL_CODE {
        return None;
    }
    TOKENS.iter().find(|t| t.code == code).map(|t| t.item.id)
}

/// Resolve an operator/punctuation spelling, including legacy spellings.
pub fn from_spelling(text: &str) -> Option<TokenId> {
    TOKENS
        .iter()
        .find(|t| t.spelling == Some(text) || t.legacy_spellings.contains(&text))
        .map(|t| t.item.id)
}

const fn layout(id: TokenId, code: KindCode, name: &'static str, description: &'static str) -> TokenInfo {
    TokenInfo {
        item: LangItemInfo {
            id,
            canonical: name,
            aliases: &[],
            description,
            stability: Stability::Stable,
        },
        code,
        spelling: None,
        legacy_spellings: &[],
    }
}

const fn fixed(id: TokenId, code: KindCode, name: &'static str, spelling: &'static str) -> TokenInfo {
    TokenInfo {
        item: LangItemInfo {
            id,
            canonical: name,
            aliases: &[],
            description: "Operator or punctuation with a fixed spelling.",
            stability: Stability::Stable,
        },
        code,
        spelling: Some(spelling),
        legacy_spellings: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_like_the_enum() {
        for (index, info) in TOKENS.iter().enumerate() {
            assert_eq!(info.item.id as usize, index, "{} is out of order", info.item.canonical);
        }
    }

    #[test]
    fn codes_are_unique_and_below_symbol_range() {
        let mut seen = std::collections::HashSet::new();
        for info in TOKENS {
            assert!(info.code < FIRST_SYMBOL_CODE);
            assert!(seen.insert(info.code), "duplicate code {}", info.code);
        }
    }

    #[test]
    fn name_and_code_round_trip() {
        for info in TOKENS {
            assert_eq!(from_name(info.item.canonical), Some(info.item.id));
            assert_eq!(from_code(info.code), Some(info.item.id));
        }
        assert_eq!(from_code(256), None);
        assert_eq!(from_name("newline"), None);
    }

    #[test]
    fn legacy_not_equal_spelling() {
        assert_eq!(from_spelling("!="), Some(TokenId::NotEqual));
        assert_eq!(from_spelling("<>"), Some(TokenId::NotEqual));
        assert_eq!(spelling(TokenId::NotEqual), Some("!="));
        assert_eq!(info_for(TokenId::NotEqual).item.stability, Stability::Stable);
    }
}
