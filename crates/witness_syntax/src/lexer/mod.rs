//! Lexer for the host language
//!
//! Handles tokenization including:
//! - Identifiers and reserved words (both emitted as `NAME`)
//! - Numeric and string literals (kept in their raw spelling)
//! - Operators and punctuation, resolved through the token registry
//! - Indentation-based blocks (INDENT/DEDENT tokens)
//!
//! ## Module Structure
//!
//! - `tokens` - Token type
//! - `strings` - String literal scanning
//! - `numbers` - Numeric literal scanning
//! - `indent` - INDENT/DEDENT handling

mod indent;
mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, keyword_id};

use crate::cst::Span;
use crate::diagnostics::CompileError;
use witness_core::lang::tokens::{self as token_registry, TokenId};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Lexer state diagram (simplified):
//
// [Start of line] → count spaces → [Inside code]
//                                       ↓
//                                      see '(' → [bracket_depth++]
//                                       ↓
//                                      see '\n' → skip (inside brackets)
//                                       ↓
//                                      see ')' → [bracket_depth--]
// ============================================================================

/// Lexer for host-language source code.
///
/// Converts source text into a stream of tokens, handling:
/// - Python-style indentation (INDENT/DEDENT tokens)
/// - Implicit line continuation inside brackets, explicit continuation with `\`
/// - 1-based line tracking for every token
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: u32,
    indent_stack: Vec<usize>,
    pending_dedents: usize,
    at_line_start: bool,
    /// Bracket depth for implicit line continuation (parens, brackets, braces)
    bracket_depth: usize,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            indent_stack: vec![0],
            pending_dedents: 0,
            at_line_start: true,
            bracket_depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// A non-empty token stream always ends with `NEWLINE`, then any remaining `DEDENT`s, then
    /// `ENDMARKER`, even when the source lacks a trailing newline.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        if self.bracket_depth > 0 {
            self.errors.push(CompileError::syntax(
                "unexpected end of input: unclosed bracket".to_string(),
                self.here(),
            ));
        }

        let needs_newline = self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenId::Newline | TokenId::Indent | TokenId::Dedent));
        if needs_newline {
            self.push_layout(TokenId::Newline);
        }

        // Emit remaining dedents at EOF
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push_layout(TokenId::Dedent);
        }
        self.push_layout(TokenId::EndMarker);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn here(&self) -> Span {
        Span::new(self.current_pos, self.current_pos)
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Handle pending dedents first
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            self.push_layout(TokenId::Dedent);
            return;
        }

        // Handle indentation at line start
        if self.at_line_start {
            self.handle_indentation();
            return;
        }

        // Skip whitespace (but not newlines)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\x0c' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;
        let line = self.line;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Comments
            '#' => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            }

            // Newlines
            '\n' => {
                // Implicit line continuation: skip newlines inside brackets
                if self.bracket_depth > 0 {
                    return;
                }
                self.tokens
                    .push(Token::new(TokenId::Newline, "", Span::new(start, self.current_pos), line));
                self.at_line_start = true;
            }

            // Skip carriage return
            '\r' => {}

            // Explicit line continuation
            '\\' => {
                if self.peek() == Some('\r') {
                    self.advance();
                }
                if self.peek() == Some('\n') {
                    self.advance();
                } else {
                    self.errors.push(CompileError::syntax(
                        "unexpected character after line continuation character".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                }
            }

            // Strings
            '"' | '\'' => self.scan_string(start, line, c),

            // Numbers
            '0'..='9' => self.scan_number(start, line, c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start, line, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start, line),

            // Operators and punctuation
            _ => self.scan_operator(start, line, c),
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn add_token(&mut self, kind: TokenId, start: usize, line: u32) {
        let text = &self.source[start..self.current_pos];
        self.tokens
            .push(Token::new(kind, text, Span::new(start, self.current_pos), line));
    }

    fn push_layout(&mut self, kind: TokenId) {
        let span = self.here();
        let line = self.line;
        self.tokens.push(Token::new(kind, "", span, line));
    }

    /// Scan the longest operator/punctuation spelling known to the token registry.
    fn scan_operator(&mut self, start: usize, line: u32, first: char) {
        let rest = &self.source[start..];
        let matched = (1..=3)
            .rev()
            .filter_map(|len| rest.get(..len))
            .find_map(|spelling| token_registry::from_spelling(spelling).map(|id| (id, spelling.len())));

        let Some((kind, len)) = matched else {
            self.errors.push(CompileError::syntax(
                format!("unexpected character '{}'", first),
                Span::new(start, self.current_pos),
            ));
            return;
        };

        // The first character is already consumed.
        for _ in 1..len {
            self.advance();
        }

        match kind {
            TokenId::LPar | TokenId::LSqb | TokenId::LBrace => self.bracket_depth += 1,
            TokenId::RPar | TokenId::RSqb | TokenId::RBrace => {
                if self.bracket_depth == 0 {
                    self.errors.push(CompileError::syntax(
                        "unmatched closing bracket".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                } else {
                    self.bracket_depth -= 1;
                }
            }
            _ => {}
        }
        self.add_token(kind, start, line);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize, line: u32) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        // Reserved words stay NAME tokens; the parser consults the keyword registry.
        self.add_token(TokenId::Name, start, line);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenId> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            kinds("1 + 1 == 2\n"),
            vec![
                TokenId::Number,
                TokenId::Plus,
                TokenId::Number,
                TokenId::EqEqual,
                TokenId::Number,
                TokenId::Newline,
                TokenId::EndMarker,
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_synthesised() {
        assert_eq!(kinds("x"), vec![TokenId::Name, TokenId::Newline, TokenId::EndMarker]);
        assert_eq!(kinds(""), vec![TokenId::EndMarker]);
    }

    #[test]
    fn test_indent_and_dedent() {
        let source = "if x:\n    y = 1\n    if y:\n        z\nw\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenId::Name,
                TokenId::Name,
                TokenId::Colon,
                TokenId::Newline,
                TokenId::Indent,
                TokenId::Name,
                TokenId::Equal,
                TokenId::Number,
                TokenId::Newline,
                TokenId::Name,
                TokenId::Name,
                TokenId::Colon,
                TokenId::Newline,
                TokenId::Indent,
                TokenId::Name,
                TokenId::Newline,
                TokenId::Dedent,
                TokenId::Dedent,
                TokenId::Name,
                TokenId::Newline,
                TokenId::EndMarker,
            ]
        );
    }

    #[test]
    fn test_dedents_at_eof_without_newline() {
        let toks = kinds("def f():\n    return 1");
        assert_eq!(
            &toks[toks.len() - 3..],
            &[TokenId::Newline, TokenId::Dedent, TokenId::EndMarker]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_dropped() {
        assert_eq!(
            kinds("# heading\n\nx = 1  # trailing\n\n   # indented comment\ny\n"),
            vec![
                TokenId::Name,
                TokenId::Equal,
                TokenId::Number,
                TokenId::Newline,
                TokenId::Name,
                TokenId::Newline,
                TokenId::EndMarker,
            ]
        );
    }

    #[test]
    fn test_brackets_continue_lines() {
        assert_eq!(
            texts("f(1,\n  2)\n"),
            vec!["f", "(", "1", ",", "2", ")", "", ""]
        );
    }

    #[test]
    fn test_backslash_continuation() {
        assert_eq!(texts("x = 1 + \\\n    2\n"), vec!["x", "=", "1", "+", "2", "", ""]);
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds("a //= b ** c <> d"),
            vec![
                TokenId::Name,
                TokenId::DoubleSlashEqual,
                TokenId::Name,
                TokenId::DoubleStar,
                TokenId::Name,
                TokenId::NotEqual,
                TokenId::Name,
                TokenId::Newline,
                TokenId::EndMarker,
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = lex("a\n\nb = (1,\n 2)\n").unwrap();
        let lines: Vec<(String, u32)> = tokens
            .iter()
            .filter(|t| !t.text.is_empty())
            .map(|t| (t.text.clone(), t.line))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 3),
                ("=".to_string(), 3),
                ("(".to_string(), 3),
                ("1".to_string(), 3),
                (",".to_string(), 3),
                ("2".to_string(), 4),
                (")".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_keywords_are_names() {
        let tokens = lex("print x").unwrap();
        assert_eq!(tokens[0].kind, TokenId::Name);
        assert!(tokens[0].is_keyword(witness_core::lang::keywords::KeywordId::Print));
        assert!(tokens[1].is_identifier());
    }

    #[test]
    fn test_errors() {
        assert!(lex("a ! b").is_err());
        assert!(lex("x)").is_err());
        assert!(lex("f(1,").is_err());
        assert!(lex("if x:\n        a\n    b\n").is_err());
    }
}
