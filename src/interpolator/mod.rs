//! Source-to-source rewriting of test scripts.
//!
//! Every simple statement (top level or nested in a block) is classified. Tests and print
//! statements are replaced by a call to the instrumentation hook carrying the statement's
//! original text and line; fixture is left alone.
//!
//! ## Examples
//! ```rust
//! let rewritten = witness::interpolator::interpolate("x = 1\nx == 1\n").unwrap();
//! assert_eq!(
//!     rewritten,
//!     "x = 1\n__witness__ . intercept ( \"x == 1\" , 2 , globals ( ) , locals ( ) , COMPARING = True , PRINTING = False )"
//! );
//! ```

mod classify;
mod synth;

pub use classify::{Classification, classify, is_comparison_test, is_print_like};
pub use synth::{UNKNOWN_LINE, call_source, synthesize_call};

use miette::Diagnostic;
use thiserror::Error;
use witness_core::lang::symbols::SymbolId;
use witness_syntax::{Node, SyntaxError, TreeError, codec, query};

/// Name the rewritten program uses for the instrumentation hook.
pub const HOOK_NAME: &str = "__witness__";

/// Failures of [`Interpolator::interpolate`].
#[derive(Debug, Error, Diagnostic)]
pub enum InterpolateError {
    /// The input program does not parse.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),

    #[error("synthesized hook call produced an empty statement")]
    #[diagnostic(code(witness::interpolate::empty_statement))]
    EmptyStatement,
}

/// Counts from one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub tests: usize,
    pub prints: usize,
    pub fixtures: usize,
}

/// Rewrites programs against a named hook.
#[derive(Debug, Clone)]
pub struct Interpolator {
    hook_name: String,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(HOOK_NAME)
    }
}

impl Interpolator {
    pub fn new(hook_name: impl Into<String>) -> Self {
        Self {
            hook_name: hook_name.into(),
        }
    }

    pub fn hook_name(&self) -> &str {
        &self.hook_name
    }

    /// Parse `source`, rewrite it, and regenerate source text.
    ///
    /// ## Errors
    /// [`InterpolateError::Syntax`] if `source` does not parse; nothing is rewritten then.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn interpolate(&self, source: &str) -> Result<String, InterpolateError> {
        let mut tree = codec::parse(source, true)?;
        let stats = self.rewrite(&mut tree)?;
        tracing::debug!(tests = stats.tests, prints = stats.prints, fixtures = stats.fixtures, "rewrote program");
        Ok(codec::serialize(&tree))
    }

    /// Rewrite a parsed program in place.
    pub fn rewrite(&self, tree: &mut Node) -> Result<RewriteStats, InterpolateError> {
        let mut stats = RewriteStats::default();
        self.walk(tree, &mut stats)?;
        Ok(stats)
    }

    /// Depth-first walk. A `stmt` or inline `suite` whose first child is a `simple_stmt` is
    /// classified and possibly replaced; the walk then descends into every child either way.
    fn walk(&self, node: &mut Node, stats: &mut RewriteStats) -> Result<(), InterpolateError> {
        let holds_simple_statement = (node.is(SymbolId::Stmt) || node.is(SymbolId::Suite))
            && node.child(0).is_some_and(|child| child.is(SymbolId::SimpleStmt));
        if holds_simple_statement {
            self.rewrite_statement(node, stats)?;
        }
        if let Some(children) = node.children_mut() {
            for child in children {
                self.walk(child, stats)?;
            }
        }
        Ok(())
    }

    fn rewrite_statement(&self, holder: &mut Node, stats: &mut RewriteStats) -> Result<(), InterpolateError> {
        let Some(children) = holder.children_mut() else {
            return Ok(());
        };
        let statement = Node::interior(SymbolId::Stmt, vec![children[0].clone()]);
        let program = codec::reparse(&query::promote(statement.clone())?)?;
        let classification = classify(&program)?;
        tracing::debug!(
            line = query::first_line(&statement),
            classification = classification.as_str(),
            "classified statement"
        );

        let Some((comparing, printing)) = classification.flags() else {
            stats.fixtures += 1;
            return Ok(());
        };
        if comparing {
            stats.tests += 1;
        } else {
            stats.prints += 1;
        }
        children[0] = synthesize_call(&self.hook_name, &statement, comparing, printing)?;
        Ok(())
    }
}

/// Rewrite `source` against the default hook name.
pub fn interpolate(source: &str) -> Result<String, InterpolateError> {
    Interpolator::default().interpolate(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_left_alone() {
        let mut tree = codec::parse("foo = 'bar'\n", true).unwrap();
        let before = tree.clone();
        let stats = Interpolator::default().rewrite(&mut tree).unwrap();
        assert_eq!(tree, before);
        assert_eq!(stats, RewriteStats { tests: 0, prints: 0, fixtures: 1 });
    }

    #[test]
    fn nested_blocks_and_inline_suites_are_rewritten() {
        let source = "def f():\n    return 1\nif True: f() == 1\nfor i in [1]:\n    print i\n";
        let mut tree = codec::parse(source, true).unwrap();
        let stats = Interpolator::default().rewrite(&mut tree).unwrap();
        assert_eq!(stats, RewriteStats { tests: 1, prints: 1, fixtures: 1 });
        let text = codec::serialize(&tree);
        assert!(text.contains("\"f ( ) == 1\" , 3"));
        assert!(text.contains("\"print i\" , 5"));
    }

    #[test]
    fn custom_hook_name() {
        let text = Interpolator::new("probe").interpolate("1 < 2\n").unwrap();
        assert!(text.starts_with("probe . intercept"));
    }

    #[test]
    fn syntax_errors_surface_before_rewriting() {
        assert!(matches!(interpolate("x = = 1\n"), Err(InterpolateError::Syntax(_))));
    }
}
