/// Miscellaneous parser utilities.
///
/// This chunk contains small shared helpers that don’t cleanly fit into “stmt” or “expr”:
/// nesting limits and assignment-target validation.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// Enter one level of bracket or unary nesting. Pair with `self.nesting -= 1`.
    fn enter_nesting(&mut self) -> Result<(), CompileError> {
        if self.nesting >= MAX_NESTING {
            return Err(CompileError::syntax(
                "too many nested parentheses".to_string(),
                self.current_span(),
            ));
        }
        self.nesting += 1;
        Ok(())
    }

    /// Run `inner` one nesting level deeper.
    fn nested(&mut self, inner: fn(&mut Self) -> Result<Node, CompileError>) -> Result<Node, CompileError> {
        self.enter_nesting()?;
        let result = inner(self);
        self.nesting -= 1;
        result
    }

    /// Validate an assignment, `del`, or `for` target.
    ///
    /// Accepts names, attribute references, subscriptions, and (possibly nested) tuples or lists
    /// of those.
    fn check_target(&self, target: &Node, span: Span) -> Result<(), CompileError> {
        let node = target.collapse();

        if let Some(leaf) = node.as_leaf() {
            return if leaf.kind == TokenId::Name {
                Ok(())
            } else {
                Err(cant_assign("literal", span))
            };
        }

        match node.symbol() {
            // `a, b` at top level, or the contents of `(...)` / `[...]`.
            Some(SymbolId::TestList | SymbolId::ExprList | SymbolId::ListMaker) => node
                .children()
                .iter()
                .filter(|child| !child.is(TokenId::Comma))
                .try_for_each(|child| self.check_target(child, span)),
            Some(SymbolId::Atom) => match node.children() {
                [open, inner, _close] if open.is(TokenId::LPar) || open.is(TokenId::LSqb) => {
                    self.check_target(inner, span)
                }
                _ => Err(cant_assign("literal", span)),
            },
            Some(SymbolId::Power) => {
                let children = node.children();
                let ends_in_call = children
                    .last()
                    .and_then(|last| last.child(0))
                    .is_some_and(|open| open.is(TokenId::LPar));
                if children.iter().any(|c| c.is(TokenId::DoubleStar)) {
                    Err(cant_assign("operator", span))
                } else if ends_in_call {
                    Err(cant_assign("function call", span))
                } else {
                    Ok(())
                }
            }
            Some(SymbolId::Comparison) => Err(cant_assign("comparison", span)),
            _ => Err(cant_assign("operator", span)),
        }
    }

    /// Validate an augmented-assignment target: a single name, attribute, or subscription.
    fn check_aug_target(&self, target: &Node, span: Span) -> Result<(), CompileError> {
        let node = target.collapse();
        let is_sequence = matches!(
            node.symbol(),
            Some(SymbolId::TestList | SymbolId::ExprList | SymbolId::Atom)
        );
        if is_sequence {
            return Err(CompileError::syntax(
                "illegal expression for augmented assignment".to_string(),
                span,
            ));
        }
        self.check_target(target, span)
    }
}

fn cant_assign(what: &str, span: Span) -> CompileError {
    CompileError::syntax(format!("can't assign to {}", what), span)
}
