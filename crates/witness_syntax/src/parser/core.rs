/// Parser core types and entrypoints.
///
/// This chunk defines the [`Parser`] type, the [`StartSymbol`] selector, and the three root
/// productions (`file_input`, `single_input`, `eval_input`).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Maximum bracket and unary nesting accepted before the parser bails out.
///
/// Each level descends through every expression precedence level, so the bound is sized to stay
/// well inside a 2 MiB thread stack in unoptimised builds.
pub const MAX_NESTING: usize = 32;

/// Which root production to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSymbol {
    /// A whole program (`file_input`).
    File,
    /// One interactive statement (`single_input`).
    Single,
    /// One expression list (`eval_input`).
    Eval,
}

impl StartSymbol {
    /// The start symbol that parses trees rooted at `kind`, if `kind` is a root.
    pub fn for_root(kind: SymbolId) -> Option<StartSymbol> {
        match kind {
            SymbolId::FileInput => Some(StartSymbol::File),
            SymbolId::SingleInput => Some(StartSymbol::Single),
            SymbolId::EvalInput => Some(StartSymbol::Eval),
            _ => None,
        }
    }
}

/// Parser state.
///
/// ## Notes
/// - Recovery happens only between top-level statements of a `file_input`: the parser skips to
///   the next logical line and carries on, so one pass reports every broken statement.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
    /// Attach source lines to leaves.
    with_lines: bool,
    /// Current bracket nesting, bounded by [`MAX_NESTING`].
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `witness_syntax::lexer`; must end with `ENDMARKER`.
    /// - `with_lines`: record the 1-based source line on every leaf.
    pub fn new(tokens: &'a [Token], with_lines: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            with_lines,
            nesting: 0,
        }
    }

    /// Parse the token stream from the given start symbol.
    ///
    /// ## Errors
    /// Returns every [`CompileError`] collected.
    pub fn parse(mut self, start: StartSymbol) -> Result<Node, Vec<CompileError>> {
        if self.tokens.last().map(|t| t.kind) != Some(TokenId::EndMarker) {
            return Err(vec![CompileError::syntax(
                "token stream does not end with ENDMARKER".to_string(),
                Span::default(),
            )]);
        }

        let result = match start {
            StartSymbol::File => Ok(self.file_input()),
            StartSymbol::Single => self.single_input(),
            StartSymbol::Eval => self.eval_input(),
        };

        match result {
            Ok(tree) if self.errors.is_empty() => Ok(tree),
            Ok(_) => Err(self.errors),
            Err(e) => {
                self.errors.push(e);
                Err(self.errors)
            }
        }
    }

    /// `file_input: (NEWLINE | stmt)* ENDMARKER`
    fn file_input(&mut self) -> Node {
        let mut children = Vec::new();

        while !self.is_at_end() {
            if self.check(TokenId::Newline) {
                children.push(self.leaf());
                continue;
            }
            // Layout tokens only reach the top level after an error or a stray indent. Report
            // the first one and keep parsing the block's lines as top-level statements.
            if self.check(TokenId::Indent) || self.check(TokenId::Dedent) {
                if self.errors.is_empty() {
                    let err = CompileError::syntax("unexpected indent".to_string(), self.current_span());
                    self.errors.push(err);
                }
                self.advance();
                continue;
            }
            match self.stmt() {
                Ok(stmt) => children.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        children.push(self.leaf());
        Node::interior(SymbolId::FileInput, children)
    }

    /// `single_input: NEWLINE | simple_stmt | compound_stmt NEWLINE`
    ///
    /// The trailing `NEWLINE` after a compound statement is optional, since the lexer already
    /// closes the block with `DEDENT`s.
    fn single_input(&mut self) -> Result<Node, CompileError> {
        let children = if self.check(TokenId::Newline) {
            vec![self.leaf()]
        } else if self.at_compound_start() {
            let mut children = vec![self.compound_stmt()?];
            if self.check(TokenId::Newline) {
                children.push(self.leaf());
            }
            children
        } else {
            vec![self.simple_stmt()?]
        };

        if !self.is_at_end() {
            return Err(CompileError::syntax(
                "multiple statements found while compiling a single statement".to_string(),
                self.current_span(),
            ));
        }
        Ok(Node::interior(SymbolId::SingleInput, children))
    }

    /// `eval_input: testlist NEWLINE* ENDMARKER`
    fn eval_input(&mut self) -> Result<Node, CompileError> {
        let mut children = vec![self.testlist()?];
        while self.check(TokenId::Newline) {
            children.push(self.leaf());
        }
        if !self.is_at_end() {
            return Err(self.unexpected("end of expression"));
        }
        children.push(self.leaf());
        Ok(Node::interior(SymbolId::EvalInput, children))
    }
}
