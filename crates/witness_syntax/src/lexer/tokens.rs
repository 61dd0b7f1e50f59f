//! Token types for the lexer.
//!
//! Every token carries a registry-backed kind ([`TokenId`]) plus its raw source spelling. Keywords
//! are `NAME` tokens whose spelling is reserved; use [`Token::is_keyword`] to test for them.
//!
//! ## Notes
//! - Layout tokens (`NEWLINE`, `INDENT`, `DEDENT`, `ENDMARKER`) have empty text.
//! - `line` is the 1-based line on which the token begins.

use crate::cst::Span;
use witness_core::lang::keywords::{self, KeywordId};
use witness_core::lang::tokens::TokenId;

/// A token with its kind, raw spelling, and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenId,
    pub text: String,
    pub span: Span,
    pub line: u32,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenId, text: impl Into<String>, span: Span, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
        }
    }

    /// Return `true` if this is a `NAME` token spelled like the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind == TokenId::Name && self.text == keywords::as_str(id)
    }

    /// Return `true` if this is a `NAME` token that is not a reserved word.
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenId::Name && keyword_id(&self.text).is_none()
    }

    /// Short human-readable description used in "expected X, found Y" diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenId::Newline => "end of line".to_string(),
            TokenId::Indent => "indent".to_string(),
            TokenId::Dedent => "dedent".to_string(),
            TokenId::EndMarker => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
