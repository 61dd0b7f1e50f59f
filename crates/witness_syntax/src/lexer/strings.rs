//! String scanning for the lexer
//!
//! Handles single-, double- and triple-quoted strings. The token keeps the raw spelling (quotes and
//! escapes included); decoding happens in `witness_core::strings::decode_literal`.

use super::Lexer;
use crate::cst::Span;
use crate::diagnostics::CompileError;
use witness_core::lang::tokens::TokenId;

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self, start: usize, line: u32, quote: char) {
        // Check for triple-quoted string
        let triple = self.peek() == Some(quote) && self.peek_next() == Some(quote);
        if triple {
            self.advance(); // consume second quote
            self.advance(); // consume third quote
        }

        loop {
            match self.peek() {
                None => {
                    self.errors.push(CompileError::syntax(
                        "unterminated string literal".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
                Some('\\') => {
                    // Skip the escaped character, whatever it is (including a newline).
                    self.advance();
                    self.advance();
                }
                Some('\n') if !triple => {
                    self.errors.push(CompileError::syntax(
                        "EOL while scanning string literal".to_string(),
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
                Some(c) if c == quote => {
                    self.advance();
                    if !triple {
                        break;
                    }
                    if self.peek() == Some(quote) && self.peek_next() == Some(quote) {
                        self.advance();
                        self.advance();
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.add_token(TokenId::String, start, line);
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use witness_core::lang::tokens::TokenId;

    fn first(source: &str) -> (TokenId, String) {
        let tokens = lex(source).unwrap();
        (tokens[0].kind, tokens[0].text.clone())
    }

    #[test]
    fn test_raw_spelling_is_kept() {
        assert_eq!(first(r"'it\'s'"), (TokenId::String, r"'it\'s'".to_string()));
        assert_eq!(first(r#""a\"b""#), (TokenId::String, r#""a\"b""#.to_string()));
        assert_eq!(first("''"), (TokenId::String, "''".to_string()));
    }

    #[test]
    fn test_triple_quoted_spans_lines() {
        let tokens = lex("x = '''one\ntwo'''\ny\n").unwrap();
        assert_eq!(tokens[2].text, "'''one\ntwo'''");
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[4].text, "y");
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_unterminated() {
        assert!(lex("'abc").is_err());
        assert!(lex("'abc\n'").is_err());
        assert!(lex("'''abc").is_err());
    }
}
