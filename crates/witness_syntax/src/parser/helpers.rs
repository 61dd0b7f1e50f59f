/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`, `leaf`)
/// - Matching / expecting token kinds and keywords
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is `ENDMARKER`.
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenId::EndMarker
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Advance to the next token and return the token we just consumed.
    ///
    /// `ENDMARKER` is never stepped over.
    fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Consume the current token as a tree leaf.
    fn leaf(&mut self) -> Node {
        let with_lines = self.with_lines;
        let token = self.advance();
        Node::leaf(token.kind, token.text.clone(), with_lines.then_some(token.line))
    }

    /// Return `true` if the current token has the given kind.
    fn check(&self, kind: TokenId) -> bool {
        self.peek().kind == kind
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().is_keyword(id)
    }

    /// Return `true` if the current token is one of `kinds`.
    fn check_any(&self, kinds: &[TokenId]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    /// Consume a token of the given kind as a leaf.
    fn expect(&mut self, kind: TokenId, what: &str) -> Result<Node, CompileError> {
        if self.check(kind) {
            Ok(self.leaf())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Consume the given keyword as a `NAME` leaf.
    fn expect_keyword(&mut self, id: KeywordId) -> Result<Node, CompileError> {
        if self.check_keyword(id) {
            Ok(self.leaf())
        } else {
            let what = format!("'{}'", witness_core::lang::keywords::as_str(id));
            Err(self.unexpected(&what))
        }
    }

    /// Consume a non-reserved `NAME` as a leaf.
    fn expect_identifier(&mut self) -> Result<Node, CompileError> {
        if self.peek().is_identifier() {
            Ok(self.leaf())
        } else {
            Err(self.unexpected("a name"))
        }
    }

    /// Build an "expected X, found Y" error at the current token.
    fn unexpected(&self, what: &str) -> CompileError {
        let token = self.peek();
        CompileError::syntax(format!("expected {}, found {}", what, token.describe()), token.span)
    }

    /// Skip to the start of the next logical line.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.advance().kind == TokenId::Newline {
                return;
            }
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Check if the current token can start an expression.
    fn is_at_expr_start(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenId::Name => token.is_identifier() || token.is_keyword(KeywordId::Not),
            TokenId::Number
            | TokenId::String
            | TokenId::LPar
            | TokenId::LSqb
            | TokenId::LBrace
            | TokenId::Plus
            | TokenId::Minus
            | TokenId::Tilde => true,
            _ => false,
        }
    }

    /// Check if the current token starts a compound statement.
    fn at_compound_start(&self) -> bool {
        [
            KeywordId::If,
            KeywordId::While,
            KeywordId::For,
            KeywordId::Try,
            KeywordId::Def,
            KeywordId::Class,
        ]
        .into_iter()
        .any(|id| self.check_keyword(id))
    }
}
