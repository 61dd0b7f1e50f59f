//! Statement classification: test, print-like, or fixture.
//!
//! Classification is purely syntactic and works on a reparsed one-statement program.

use witness_core::lang::symbols::SymbolId;
use witness_syntax::{Node, TreeError, query};

/// What the interpolator does with a simple statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// An explicit comparison; its truth value is tallied.
    Test,
    /// A `print` statement; its output goes into the report.
    PrintLike,
    /// Anything else; executed unchanged.
    Fixture,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Test => "test",
            Classification::PrintLike => "print",
            Classification::Fixture => "fixture",
        }
    }

    /// `(COMPARING, PRINTING)` flags of the hook call, or `None` for fixture.
    pub fn flags(self) -> Option<(bool, bool)> {
        match self {
            Classification::Test => Some((true, false)),
            Classification::PrintLike => Some((false, true)),
            Classification::Fixture => None,
        }
    }
}

/// A fragment holding a `comparison` with at least one explicit `comp_op`.
///
/// Every expression statement contains a `comparison` node, so the operator is what makes a test.
pub fn is_comparison_test(fragment: &Node) -> Result<bool, TreeError> {
    for comparison in query::find_all(fragment, SymbolId::Comparison)? {
        if query::contains(comparison, SymbolId::CompOp)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// A fragment holding a `print_stmt`.
///
/// Calls such as `pprint(x)` are not detected; they run as fixture.
pub fn is_print_like(fragment: &Node) -> Result<bool, TreeError> {
    query::contains(fragment, SymbolId::PrintStmt)
}

/// Classify a fragment. The test check wins over the print check.
pub fn classify(fragment: &Node) -> Result<Classification, TreeError> {
    if is_comparison_test(fragment)? {
        Ok(Classification::Test)
    } else if is_print_like(fragment)? {
        Ok(Classification::PrintLike)
    } else {
        Ok(Classification::Fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use witness_syntax::codec;

    fn classify_source(source: &str) -> Classification {
        classify(&codec::parse(source, false).unwrap()).unwrap()
    }

    #[test]
    fn explicit_comparisons_are_tests() {
        assert_eq!(classify_source("1 + 1 == 2\n"), Classification::Test);
        assert_eq!(classify_source("x not in [1, 2]\n"), Classification::Test);
        assert_eq!(classify_source("a < b < c\n"), Classification::Test);
    }

    #[test]
    fn bare_expressions_and_assignments_are_fixture() {
        assert_eq!(classify_source("foo = 'bar'\n"), Classification::Fixture);
        assert_eq!(classify_source("f(x)\n"), Classification::Fixture);
        assert_eq!(classify_source("pprint(x)\n"), Classification::Fixture);
    }

    #[test]
    fn print_statements_are_print_like() {
        assert_eq!(classify_source("print 'hello world'\n"), Classification::PrintLike);
        assert_eq!(classify_source("print\n"), Classification::PrintLike);
    }

    #[test]
    fn test_check_takes_precedence() {
        assert_eq!(classify_source("print 1 == 1\n"), Classification::Test);
    }

    #[test]
    fn flags_follow_classification() {
        assert_eq!(Classification::Test.flags(), Some((true, false)));
        assert_eq!(Classification::PrintLike.flags(), Some((false, true)));
        assert_eq!(Classification::Fixture.flags(), None);
    }
}
