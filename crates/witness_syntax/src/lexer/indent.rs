//! Indentation handling for the lexer
//!
//! Implements Python-style INDENT/DEDENT tokens.

use super::Lexer;
use crate::cst::Span;
use crate::diagnostics::CompileError;
use witness_core::lang::tokens::TokenId;

/// Tabs advance the column to the next multiple of this width.
const TAB_WIDTH: usize = 8;

impl<'a> Lexer<'a> {
    pub(super) fn handle_indentation(&mut self) {
        let start = self.current_pos;
        let mut indent = 0;

        // Count leading spaces/tabs
        while let Some(c) = self.peek() {
            match c {
                ' ' => {
                    indent += 1;
                    self.advance();
                }
                '\t' => {
                    indent = (indent / TAB_WIDTH + 1) * TAB_WIDTH;
                    self.advance();
                }
                '\x0c' => {
                    indent = 0;
                    self.advance();
                }
                '#' => {
                    // Comment line - skip to end
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    return; // Stay at line start
                }
                '\n' => {
                    // Blank line - skip
                    self.advance();
                    return; // Stay at line start
                }
                '\r' => {
                    self.advance();
                }
                _ => break,
            }
        }

        // At end of file?
        if self.is_at_end() {
            self.at_line_start = false;
            return;
        }

        let line = self.line;
        let current_indent = *self.indent_stack.last().unwrap_or(&0);

        if indent > current_indent {
            self.indent_stack.push(indent);
            self.tokens
                .push(super::Token::new(TokenId::Indent, "", Span::new(start, self.current_pos), line));
        } else if indent < current_indent {
            // Count how many dedents we need BEFORE modifying the stack
            let count = self.indent_stack.iter().rev().take_while(|&&level| indent < level).count();

            for _ in 0..count {
                self.indent_stack.pop();
            }
            if self.indent_stack.is_empty() {
                self.indent_stack.push(0);
            }

            // Verify we landed on a valid indent level
            let final_indent = *self.indent_stack.last().unwrap_or(&0);
            if indent != final_indent {
                self.errors.push(CompileError::syntax(
                    "unindent does not match any outer indentation level".to_string(),
                    Span::new(start, self.current_pos),
                ));
            }

            // Emit dedent tokens
            if count > 0 {
                self.tokens
                    .push(super::Token::new(TokenId::Dedent, "", Span::new(start, self.current_pos), line));
                self.pending_dedents = count - 1;
            }
        }

        self.at_line_start = false;
    }
}
