//! Number scanning for the lexer
//!
//! Handles integer and floating-point literals. The token keeps the raw spelling; the literal is
//! validated here so that out-of-range integers are syntax errors rather than runtime surprises.

use super::Lexer;
use crate::cst::Span;
use crate::diagnostics::CompileError;
use witness_core::lang::tokens::TokenId;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize, line: u32, first: char) {
        let mut is_float = first == '.';

        self.scan_digits();

        // Decimal part
        if !is_float && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance(); // consume .
            self.scan_digits();
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            let after = self.peek_next();
            let signed = matches!(after, Some('+' | '-'));
            let has_digits = if signed {
                self.source[self.current_pos..]
                    .chars()
                    .nth(2)
                    .is_some_and(|c| c.is_ascii_digit())
            } else {
                after.is_some_and(|c| c.is_ascii_digit())
            };
            if has_digits {
                is_float = true;
                self.advance(); // e
                if signed {
                    self.advance();
                }
                self.scan_digits();
            }
        }

        let cleaned: String = self.source[start..self.current_pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let valid = if is_float {
            cleaned.parse::<f64>().is_ok()
        } else {
            cleaned.parse::<i64>().is_ok()
        };
        if !valid {
            self.errors.push(CompileError::syntax(
                format!("invalid numeric literal: {}", &self.source[start..self.current_pos]),
                Span::new(start, self.current_pos),
            ));
            return;
        }

        self.add_token(TokenId::Number, start, line);
    }

    fn scan_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;

    fn spellings(source: &str) -> Vec<String> {
        lex(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.text.is_empty())
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(spellings("1_000 2.5 .5 1e3 2E-2"), vec!["1_000", "2.5", ".5", "1e3", "2E-2"]);
    }

    #[test]
    fn test_attribute_after_int_is_not_a_float() {
        assert_eq!(spellings("1.x"), vec!["1", ".", "x"]);
    }

    #[test]
    fn test_integer_overflow_is_a_syntax_error() {
        assert!(lex("99999999999999999999").is_err());
    }
}
