/// Expression parsing.
///
/// One method per precedence level, lowest first. Each level always produces its own node, even
/// when it wraps a single operand.
impl<'a> Parser<'a> {
    // ========================================================================
    // Boolean levels
    // ========================================================================

    /// `test: or_test`
    fn test(&mut self) -> Result<Node, CompileError> {
        let inner = self.or_test()?;
        Ok(Node::interior(SymbolId::Test, vec![inner]))
    }

    /// `or_test: and_test ('or' and_test)*`
    fn or_test(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.and_test()?];
        while self.check_keyword(KeywordId::Or) {
            children.push(self.leaf());
            children.push(self.and_test()?);
        }
        Ok(Node::interior(SymbolId::OrTest, children))
    }

    /// `and_test: not_test ('and' not_test)*`
    fn and_test(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.not_test()?];
        while self.check_keyword(KeywordId::And) {
            children.push(self.leaf());
            children.push(self.not_test()?);
        }
        Ok(Node::interior(SymbolId::AndTest, children))
    }

    /// `not_test: 'not' not_test | comparison`
    fn not_test(&mut self) -> Result<Node, CompileError> {
        let children = if self.check_keyword(KeywordId::Not) {
            let keyword = self.leaf();
            self.enter_nesting()?;
            let operand = self.not_test();
            self.nesting -= 1;
            vec![keyword, operand?]
        } else {
            vec![self.comparison()?]
        };
        Ok(Node::interior(SymbolId::NotTest, children))
    }

    /// `comparison: expr (comp_op expr)*`
    fn comparison(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expr()?];
        while let Some(op) = self.comp_op() {
            children.push(op);
            children.push(self.expr()?);
        }
        Ok(Node::interior(SymbolId::Comparison, children))
    }

    /// `comp_op: '<' | '>' | '==' | '>=' | '<=' | '!=' | 'in' | 'not' 'in' | 'is' | 'is' 'not'`
    ///
    /// Returns `None` (consuming nothing) when the current token does not start a comparison
    /// operator.
    fn comp_op(&mut self) -> Option<Node> {
        let children = if self.check_any(&COMPARISON_TOKENS) || self.check_keyword(KeywordId::In) {
            vec![self.leaf()]
        } else if self.check_keyword(KeywordId::Not) && self.peek_next().is_keyword(KeywordId::In) {
            vec![self.leaf(), self.leaf()]
        } else if self.check_keyword(KeywordId::Is) {
            let mut children = vec![self.leaf()];
            if self.check_keyword(KeywordId::Not) {
                children.push(self.leaf());
            }
            children
        } else {
            return None;
        };
        Some(Node::interior(SymbolId::CompOp, children))
    }

    // ========================================================================
    // Binary levels
    // ========================================================================

    /// `expr: xor_expr ('|' xor_expr)*`
    fn expr(&mut self) -> Result<Node, CompileError> {
        self.binary(SymbolId::Expr, &[TokenId::VBar], Self::xor_expr)
    }

    /// `xor_expr: and_expr ('^' and_expr)*`
    fn xor_expr(&mut self) -> Result<Node, CompileError> {
        self.binary(SymbolId::XorExpr, &[TokenId::Circumflex], Self::and_expr)
    }

    /// `and_expr: shift_expr ('&' shift_expr)*`
    fn and_expr(&mut self) -> Result<Node, CompileError> {
        self.binary(SymbolId::AndExpr, &[TokenId::Amper], Self::shift_expr)
    }

    /// `shift_expr: arith_expr (('<<' | '>>') arith_expr)*`
    fn shift_expr(&mut self) -> Result<Node, CompileError> {
        self.binary(
            SymbolId::ShiftExpr,
            &[TokenId::LeftShift, TokenId::RightShift],
            Self::arith_expr,
        )
    }

    /// `arith_expr: term (('+' | '-') term)*`
    fn arith_expr(&mut self) -> Result<Node, CompileError> {
        self.binary(SymbolId::ArithExpr, &[TokenId::Plus, TokenId::Minus], Self::term)
    }

    /// `term: factor (('*' | '/' | '%' | '//') factor)*`
    fn term(&mut self) -> Result<Node, CompileError> {
        self.binary(
            SymbolId::Term,
            &[TokenId::Star, TokenId::Slash, TokenId::Percent, TokenId::DoubleSlash],
            Self::factor,
        )
    }

    /// Left-associative `operand (op operand)*` level.
    fn binary(
        &mut self,
        symbol: SymbolId,
        ops: &[TokenId],
        operand: fn(&mut Self) -> Result<Node, CompileError>,
    ) -> Result<Node, CompileError> {
        let mut children = vec![operand(self)?];
        while self.check_any(ops) {
            children.push(self.leaf());
            children.push(operand(self)?);
        }
        Ok(Node::interior(symbol, children))
    }

    // ========================================================================
    // Unary and postfix levels
    // ========================================================================

    /// `factor: ('+' | '-' | '~') factor | power`
    fn factor(&mut self) -> Result<Node, CompileError> {
        let children = if self.check_any(&[TokenId::Plus, TokenId::Minus, TokenId::Tilde]) {
            let sign = self.leaf();
            self.enter_nesting()?;
            let operand = self.factor();
            self.nesting -= 1;
            vec![sign, operand?]
        } else {
            vec![self.power()?]
        };
        Ok(Node::interior(SymbolId::Factor, children))
    }

    /// `power: atom trailer* ['**' factor]`
    fn power(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.atom()?];
        while self.check_any(&[TokenId::LPar, TokenId::LSqb, TokenId::Dot]) {
            children.push(self.trailer()?);
        }
        if self.check(TokenId::DoubleStar) {
            children.push(self.leaf());
            self.enter_nesting()?;
            let exponent = self.factor();
            self.nesting -= 1;
            children.push(exponent?);
        }
        Ok(Node::interior(SymbolId::Power, children))
    }

    /// `trailer: '(' [arglist] ')' | '[' subscript ']' | '.' NAME`
    fn trailer(&mut self) -> Result<Node, CompileError> {
        let children = if self.check(TokenId::Dot) {
            vec![self.leaf(), self.expect_identifier()?]
        } else if self.check(TokenId::LPar) {
            let open = self.leaf();
            let mut children = vec![open];
            if !self.check(TokenId::RPar) {
                children.push(self.nested(Self::arglist)?);
            }
            children.push(self.expect(TokenId::RPar, "')'")?);
            children
        } else {
            let open = self.expect(TokenId::LSqb, "'['")?;
            let subscript = self.nested(Self::subscript)?;
            vec![open, subscript, self.expect(TokenId::RSqb, "']'")?]
        };
        Ok(Node::interior(SymbolId::Trailer, children))
    }

    /// `subscript: test | [test] ':' [test]`
    fn subscript(&mut self) -> Result<Node, CompileError> {
        let mut children = Vec::new();
        if !self.check(TokenId::Colon) {
            children.push(self.test()?);
        }
        if self.check(TokenId::Colon) {
            children.push(self.leaf());
            if self.is_at_expr_start() {
                children.push(self.test()?);
            }
        }
        if children.is_empty() {
            return Err(self.unexpected("a subscript"));
        }
        Ok(Node::interior(SymbolId::Subscript, children))
    }

    /// `atom: '(' [testlist] ')' | '[' [listmaker] ']' | '{' [dictmaker] '}' | NAME | NUMBER | STRING+`
    fn atom(&mut self) -> Result<Node, CompileError> {
        let kind = self.peek().kind;
        let is_identifier = self.peek().is_identifier();
        let children = match kind {
            TokenId::LPar => self.bracketed(TokenId::RPar, "')'", Self::testlist)?,
            TokenId::LSqb => self.bracketed(TokenId::RSqb, "']'", Self::listmaker)?,
            TokenId::LBrace => self.bracketed(TokenId::RBrace, "'}'", Self::dictmaker)?,
            TokenId::Name if is_identifier => vec![self.leaf()],
            TokenId::Number => vec![self.leaf()],
            TokenId::String => {
                let mut strings = vec![self.leaf()];
                while self.check(TokenId::String) {
                    strings.push(self.leaf());
                }
                strings
            }
            _ => return Err(self.unexpected("an expression")),
        };
        Ok(Node::interior(SymbolId::Atom, children))
    }

    /// `open [inner] close`, where `inner` is skipped when the closer follows immediately.
    fn bracketed(
        &mut self,
        close: TokenId,
        close_text: &str,
        inner: fn(&mut Self) -> Result<Node, CompileError>,
    ) -> Result<Vec<Node>, CompileError> {
        let mut children = vec![self.leaf()];
        if !self.check(close) {
            children.push(self.nested(inner)?);
        }
        children.push(self.expect(close, close_text)?);
        Ok(children)
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// `listmaker: test (',' test)* [',']`
    fn listmaker(&mut self) -> Result<Node, CompileError> {
        self.separated(SymbolId::ListMaker, Self::test)
    }

    /// `exprlist: expr (',' expr)* [',']`
    fn exprlist(&mut self) -> Result<Node, CompileError> {
        self.separated(SymbolId::ExprList, Self::expr)
    }

    /// `testlist: test (',' test)* [',']`
    fn testlist(&mut self) -> Result<Node, CompileError> {
        self.separated(SymbolId::TestList, Self::test)
    }

    /// `item (',' item)* [',']`, stopping at a trailing comma.
    fn separated(
        &mut self,
        symbol: SymbolId,
        item: fn(&mut Self) -> Result<Node, CompileError>,
    ) -> Result<Node, CompileError> {
        let mut children = vec![item(self)?];
        while self.check(TokenId::Comma) {
            children.push(self.leaf());
            if !self.is_at_expr_start() {
                break;
            }
            children.push(item(self)?);
        }
        Ok(Node::interior(symbol, children))
    }

    /// `dictmaker: test ':' test (',' test ':' test)* [',']`
    fn dictmaker(&mut self) -> Result<Node, CompileError> {
        let mut children = Vec::new();
        loop {
            children.push(self.test()?);
            children.push(self.expect(TokenId::Colon, "':'")?);
            children.push(self.test()?);
            if !self.check(TokenId::Comma) {
                break;
            }
            children.push(self.leaf());
            if !self.is_at_expr_start() {
                break;
            }
        }
        Ok(Node::interior(SymbolId::DictMaker, children))
    }

    /// `arglist: argument (',' argument)* [',']`
    fn arglist(&mut self) -> Result<Node, CompileError> {
        let mut children = Vec::new();
        let mut saw_keyword = false;
        loop {
            let span = self.current_span();
            let argument = self.argument()?;
            let is_keyword = argument.children().len() == 3;
            if saw_keyword && !is_keyword {
                return Err(CompileError::syntax("non-keyword arg after keyword arg".to_string(), span));
            }
            saw_keyword |= is_keyword;
            children.push(argument);
            if !self.check(TokenId::Comma) {
                break;
            }
            children.push(self.leaf());
            if !self.is_at_expr_start() {
                break;
            }
        }
        Ok(Node::interior(SymbolId::ArgList, children))
    }

    /// `argument: test ['=' test]`
    fn argument(&mut self) -> Result<Node, CompileError> {
        let span = self.current_span();
        let mut children = vec![self.test()?];
        if self.check(TokenId::Equal) {
            if children[0].sole_leaf().is_none_or(|leaf| leaf.kind != TokenId::Name) {
                return Err(CompileError::syntax(
                    "keyword can't be an expression".to_string(),
                    span,
                ));
            }
            children.push(self.leaf());
            children.push(self.test()?);
        }
        Ok(Node::interior(SymbolId::Argument, children))
    }
}

/// Single-token comparison operators.
const COMPARISON_TOKENS: [TokenId; 6] = [
    TokenId::Less,
    TokenId::Greater,
    TokenId::EqEqual,
    TokenId::GreaterEqual,
    TokenId::LessEqual,
    TokenId::NotEqual,
];
