/// Statement parsing.
///
/// Simple statements end at their `NEWLINE` leaf; compound statements own their suites, which
/// carry the `NEWLINE INDENT ... DEDENT` layout leaves.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    /// `stmt: simple_stmt | compound_stmt`
    fn stmt(&mut self) -> Result<Node, CompileError> {
        let inner = if self.at_compound_start() {
            self.compound_stmt()?
        } else {
            self.simple_stmt()?
        };
        Ok(Node::interior(SymbolId::Stmt, vec![inner]))
    }

    /// `simple_stmt: small_stmt (';' small_stmt)* [';'] NEWLINE`
    fn simple_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.small_stmt()?];
        while self.check(TokenId::Semi) {
            children.push(self.leaf());
            if self.check(TokenId::Newline) {
                break;
            }
            children.push(self.small_stmt()?);
        }
        children.push(self.expect(TokenId::Newline, "end of line")?);
        Ok(Node::interior(SymbolId::SimpleStmt, children))
    }

    /// `small_stmt: expr_stmt | print_stmt | del_stmt | pass_stmt | flow_stmt | import_stmt | global_stmt
    ///     | assert_stmt`
    fn small_stmt(&mut self) -> Result<Node, CompileError> {
        let keyword = (self.peek().kind == TokenId::Name)
            .then(|| crate::lexer::keyword_id(&self.peek().text))
            .flatten();

        let inner = match keyword {
            Some(KeywordId::Print) => self.print_stmt()?,
            Some(KeywordId::Del) => self.del_stmt()?,
            Some(KeywordId::Pass) => Node::interior(SymbolId::PassStmt, vec![self.leaf()]),
            Some(KeywordId::Break | KeywordId::Continue | KeywordId::Return | KeywordId::Raise) => {
                self.flow_stmt()?
            }
            Some(KeywordId::Import | KeywordId::From) => self.import_stmt()?,
            Some(KeywordId::Global) => self.global_stmt()?,
            Some(KeywordId::Assert) => self.assert_stmt()?,
            _ => self.expr_stmt()?,
        };
        Ok(Node::interior(SymbolId::SmallStmt, vec![inner]))
    }

    /// `expr_stmt: testlist (augassign testlist | ('=' testlist)*)`
    fn expr_stmt(&mut self) -> Result<Node, CompileError> {
        let span = self.current_span();
        let first = self.testlist()?;

        if self.check_any(&AUGASSIGN_OPS) {
            self.check_aug_target(&first, span)?;
            let op = Node::interior(SymbolId::AugAssign, vec![self.leaf()]);
            let value = self.testlist()?;
            return Ok(Node::interior(SymbolId::ExprStmt, vec![first, op, value]));
        }

        let mut children = vec![first];
        let mut target_span = span;
        while self.check(TokenId::Equal) {
            // Everything left of an '=' is an assignment target.
            if let Some(target) = children.last() {
                self.check_target(target, target_span)?;
            }
            children.push(self.leaf());
            target_span = self.current_span();
            children.push(self.testlist()?);
        }
        Ok(Node::interior(SymbolId::ExprStmt, children))
    }

    /// `print_stmt: 'print' [test (',' test)* [',']]`
    fn print_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::Print)?];
        if self.is_at_expr_start() {
            children.push(self.test()?);
            while self.check(TokenId::Comma) {
                children.push(self.leaf());
                if !self.is_at_expr_start() {
                    break;
                }
                children.push(self.test()?);
            }
        }
        Ok(Node::interior(SymbolId::PrintStmt, children))
    }

    /// `del_stmt: 'del' exprlist`
    fn del_stmt(&mut self) -> Result<Node, CompileError> {
        let keyword = self.expect_keyword(KeywordId::Del)?;
        let span = self.current_span();
        let targets = self.exprlist()?;
        self.check_target(&targets, span)?;
        Ok(Node::interior(SymbolId::DelStmt, vec![keyword, targets]))
    }

    /// `flow_stmt: break_stmt | continue_stmt | return_stmt | raise_stmt`
    fn flow_stmt(&mut self) -> Result<Node, CompileError> {
        let inner = if self.check_keyword(KeywordId::Break) {
            Node::interior(SymbolId::BreakStmt, vec![self.leaf()])
        } else if self.check_keyword(KeywordId::Continue) {
            Node::interior(SymbolId::ContinueStmt, vec![self.leaf()])
        } else if self.check_keyword(KeywordId::Return) {
            let mut children = vec![self.leaf()];
            if self.is_at_expr_start() {
                children.push(self.testlist()?);
            }
            Node::interior(SymbolId::ReturnStmt, children)
        } else {
            let mut children = vec![self.expect_keyword(KeywordId::Raise)?];
            if self.is_at_expr_start() {
                children.push(self.test()?);
            }
            Node::interior(SymbolId::RaiseStmt, children)
        };
        Ok(Node::interior(SymbolId::FlowStmt, vec![inner]))
    }

    /// `import_stmt: import_name | import_from`
    fn import_stmt(&mut self) -> Result<Node, CompileError> {
        let inner = if self.check_keyword(KeywordId::Import) {
            let keyword = self.leaf();
            let names = self.name_list(SymbolId::DottedAsNames, Self::dotted_as_name)?;
            Node::interior(SymbolId::ImportName, vec![keyword, names])
        } else {
            let mut children = vec![self.expect_keyword(KeywordId::From)?, self.dotted_name()?];
            children.push(self.expect_keyword(KeywordId::Import)?);
            if self.check(TokenId::LPar) {
                children.push(self.leaf());
                children.push(self.name_list(SymbolId::ImportAsNames, Self::import_as_name)?);
                children.push(self.expect(TokenId::RPar, "')'")?);
            } else {
                children.push(self.name_list(SymbolId::ImportAsNames, Self::import_as_name)?);
            }
            Node::interior(SymbolId::ImportFrom, children)
        };
        Ok(Node::interior(SymbolId::ImportStmt, vec![inner]))
    }

    /// `import_as_names: import_as_name (',' import_as_name)* [',']`, and the same shape for
    /// `dotted_as_names` (which takes no trailing comma).
    fn name_list(
        &mut self,
        symbol: SymbolId,
        item: fn(&mut Self) -> Result<Node, CompileError>,
    ) -> Result<Node, CompileError> {
        let mut children = vec![item(self)?];
        while self.check(TokenId::Comma) {
            children.push(self.leaf());
            if symbol == SymbolId::ImportAsNames && !self.peek().is_identifier() {
                break;
            }
            children.push(item(self)?);
        }
        Ok(Node::interior(symbol, children))
    }

    /// `import_as_name: NAME ['as' NAME]`
    fn import_as_name(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_identifier()?];
        if self.check_keyword(KeywordId::As) {
            children.push(self.leaf());
            children.push(self.expect_identifier()?);
        }
        Ok(Node::interior(SymbolId::ImportAsName, children))
    }

    /// `dotted_as_name: dotted_name ['as' NAME]`
    fn dotted_as_name(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.dotted_name()?];
        if self.check_keyword(KeywordId::As) {
            children.push(self.leaf());
            children.push(self.expect_identifier()?);
        }
        Ok(Node::interior(SymbolId::DottedAsName, children))
    }

    /// `dotted_name: NAME ('.' NAME)*`
    fn dotted_name(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_identifier()?];
        while self.check(TokenId::Dot) {
            children.push(self.leaf());
            children.push(self.expect_identifier()?);
        }
        Ok(Node::interior(SymbolId::DottedName, children))
    }

    /// `global_stmt: 'global' NAME (',' NAME)*`
    fn global_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::Global)?, self.expect_identifier()?];
        while self.check(TokenId::Comma) {
            children.push(self.leaf());
            children.push(self.expect_identifier()?);
        }
        Ok(Node::interior(SymbolId::GlobalStmt, children))
    }

    /// `assert_stmt: 'assert' test [',' test]`
    fn assert_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::Assert)?, self.test()?];
        if self.check(TokenId::Comma) {
            children.push(self.leaf());
            children.push(self.test()?);
        }
        Ok(Node::interior(SymbolId::AssertStmt, children))
    }

    // ========================================================================
    // Compound statements
    // ========================================================================

    /// `compound_stmt: if_stmt | while_stmt | for_stmt | try_stmt | funcdef | classdef`
    fn compound_stmt(&mut self) -> Result<Node, CompileError> {
        let inner = if self.check_keyword(KeywordId::If) {
            self.if_stmt()?
        } else if self.check_keyword(KeywordId::While) {
            self.while_stmt()?
        } else if self.check_keyword(KeywordId::For) {
            self.for_stmt()?
        } else if self.check_keyword(KeywordId::Try) {
            self.try_stmt()?
        } else if self.check_keyword(KeywordId::Def) {
            self.funcdef()?
        } else if self.check_keyword(KeywordId::Class) {
            self.classdef()?
        } else {
            return Err(self.unexpected("a compound statement"));
        };
        Ok(Node::interior(SymbolId::CompoundStmt, vec![inner]))
    }

    /// `if_stmt: 'if' test ':' suite ('elif' test ':' suite)* ['else' ':' suite]`
    fn if_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::If)?];
        self.condition_and_suite(&mut children)?;
        while self.check_keyword(KeywordId::Elif) {
            children.push(self.leaf());
            self.condition_and_suite(&mut children)?;
        }
        self.else_clause(&mut children)?;
        Ok(Node::interior(SymbolId::IfStmt, children))
    }

    /// `while_stmt: 'while' test ':' suite ['else' ':' suite]`
    fn while_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::While)?];
        self.condition_and_suite(&mut children)?;
        self.else_clause(&mut children)?;
        Ok(Node::interior(SymbolId::WhileStmt, children))
    }

    /// `for_stmt: 'for' exprlist 'in' testlist ':' suite ['else' ':' suite]`
    fn for_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::For)?];
        let span = self.current_span();
        let target = self.exprlist()?;
        self.check_target(&target, span)?;
        children.push(target);
        children.push(self.expect_keyword(KeywordId::In)?);
        children.push(self.testlist()?);
        children.push(self.expect(TokenId::Colon, "':'")?);
        children.push(self.suite()?);
        self.else_clause(&mut children)?;
        Ok(Node::interior(SymbolId::ForStmt, children))
    }

    /// `try_stmt: 'try' ':' suite ((except_clause ':' suite)+ ['else' ':' suite] ['finally' ':' suite] | 'finally' ':' suite)`
    fn try_stmt(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![
            self.expect_keyword(KeywordId::Try)?,
            self.expect(TokenId::Colon, "':'")?,
            self.suite()?,
        ];

        let mut handlers = 0;
        let mut saw_bare_except = false;
        while self.check_keyword(KeywordId::Except) {
            if saw_bare_except {
                return Err(CompileError::syntax(
                    "default 'except:' must be last".to_string(),
                    self.current_span(),
                ));
            }
            let clause = self.except_clause()?;
            saw_bare_except = clause.children().len() == 1;
            children.push(clause);
            children.push(self.expect(TokenId::Colon, "':'")?);
            children.push(self.suite()?);
            handlers += 1;
        }

        if handlers > 0 {
            self.else_clause(&mut children)?;
        }

        if self.check_keyword(KeywordId::Finally) {
            children.push(self.leaf());
            children.push(self.expect(TokenId::Colon, "':'")?);
            children.push(self.suite()?);
        } else if handlers == 0 {
            return Err(self.unexpected("'except' or 'finally'"));
        }

        Ok(Node::interior(SymbolId::TryStmt, children))
    }

    /// `except_clause: 'except' [test ['as' NAME]]`
    fn except_clause(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::Except)?];
        if self.is_at_expr_start() {
            children.push(self.test()?);
            if self.check_keyword(KeywordId::As) {
                children.push(self.leaf());
                children.push(self.expect_identifier()?);
            }
        }
        Ok(Node::interior(SymbolId::ExceptClause, children))
    }

    /// `funcdef: 'def' NAME parameters ':' suite`
    fn funcdef(&mut self) -> Result<Node, CompileError> {
        let children = vec![
            self.expect_keyword(KeywordId::Def)?,
            self.expect_identifier()?,
            self.parameters()?,
            self.expect(TokenId::Colon, "':'")?,
            self.suite()?,
        ];
        Ok(Node::interior(SymbolId::FuncDef, children))
    }

    /// `parameters: '(' [varargslist] ')'`
    fn parameters(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect(TokenId::LPar, "'('")?];
        if !self.check(TokenId::RPar) {
            children.push(self.varargslist()?);
        }
        children.push(self.expect(TokenId::RPar, "')'")?);
        Ok(Node::interior(SymbolId::Parameters, children))
    }

    /// `varargslist: fpdef ['=' test] (',' fpdef ['=' test])* [',']`
    fn varargslist(&mut self) -> Result<Node, CompileError> {
        let mut children = Vec::new();
        let mut saw_default = false;
        loop {
            let span = self.current_span();
            children.push(Node::interior(SymbolId::FpDef, vec![self.expect_identifier()?]));
            if self.check(TokenId::Equal) {
                children.push(self.leaf());
                children.push(self.test()?);
                saw_default = true;
            } else if saw_default {
                return Err(CompileError::syntax(
                    "non-default argument follows default argument".to_string(),
                    span,
                ));
            }
            if !self.check(TokenId::Comma) {
                break;
            }
            children.push(self.leaf());
            if self.check(TokenId::RPar) {
                break;
            }
        }
        Ok(Node::interior(SymbolId::VarArgsList, children))
    }

    /// `classdef: 'class' NAME ['(' [testlist] ')'] ':' suite`
    fn classdef(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.expect_keyword(KeywordId::Class)?, self.expect_identifier()?];
        if self.check(TokenId::LPar) {
            children.push(self.leaf());
            if !self.check(TokenId::RPar) {
                children.push(self.testlist()?);
            }
            children.push(self.expect(TokenId::RPar, "')'")?);
        }
        children.push(self.expect(TokenId::Colon, "':'")?);
        children.push(self.suite()?);
        Ok(Node::interior(SymbolId::ClassDef, children))
    }

    /// `suite: simple_stmt | NEWLINE INDENT stmt+ DEDENT`
    fn suite(&mut self) -> Result<Node, CompileError> {
        if !self.check(TokenId::Newline) {
            let inline = self.simple_stmt()?;
            return Ok(Node::interior(SymbolId::Suite, vec![inline]));
        }

        let mut children = vec![self.leaf()];
        children.push(self.expect(TokenId::Indent, "an indented block")?);
        loop {
            children.push(self.stmt()?);
            if self.check(TokenId::Dedent) || self.is_at_end() {
                break;
            }
        }
        children.push(self.expect(TokenId::Dedent, "dedent")?);
        Ok(Node::interior(SymbolId::Suite, children))
    }

    /// `test ':' suite`, appended to `children`.
    fn condition_and_suite(&mut self, children: &mut Vec<Node>) -> Result<(), CompileError> {
        children.push(self.test()?);
        children.push(self.expect(TokenId::Colon, "':'")?);
        children.push(self.suite()?);
        Ok(())
    }

    /// `['else' ':' suite]`, appended to `children`.
    fn else_clause(&mut self, children: &mut Vec<Node>) -> Result<(), CompileError> {
        if self.check_keyword(KeywordId::Else) {
            children.push(self.leaf());
            children.push(self.expect(TokenId::Colon, "':'")?);
            children.push(self.suite()?);
        }
        Ok(())
    }
}

/// Token kinds spelling an augmented assignment.
const AUGASSIGN_OPS: [TokenId; 6] = [
    TokenId::PlusEqual,
    TokenId::MinEqual,
    TokenId::StarEqual,
    TokenId::SlashEqual,
    TokenId::PercentEqual,
    TokenId::DoubleSlashEqual,
];
