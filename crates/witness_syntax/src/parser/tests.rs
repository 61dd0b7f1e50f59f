#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the shape of the concrete tree for specific syntactic forms and on the
/// parser's error reporting.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Node, Vec<CompileError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens, true)
    }

    fn parse_as(source: &str, start: StartSymbol) -> Result<Node, Vec<CompileError>> {
        let tokens = lexer::lex(source)?;
        parse_from(&tokens, start, false)
    }

    fn kinds_of(node: &Node) -> Vec<&'static str> {
        node.children().iter().map(|c| c.kind().name()).collect()
    }

    fn count(node: &Node, symbol: SymbolId) -> usize {
        node.preorder().filter(|n| n.is(symbol)).count()
    }

    fn first_error(source: &str) -> String {
        parse_str(source).expect_err("source should be rejected")[0].message.clone()
    }

    #[test]
    fn test_file_input_shape() {
        let tree = parse_str("x = 1\ny\n").unwrap();
        assert!(tree.is(SymbolId::FileInput));
        assert_eq!(kinds_of(&tree), vec!["stmt", "stmt", "ENDMARKER"]);
    }

    #[test]
    fn test_empty_file() {
        let tree = parse_str("").unwrap();
        assert_eq!(kinds_of(&tree), vec!["ENDMARKER"]);
    }

    #[test]
    fn test_full_chain_is_kept() {
        let tree = parse_str("x\n").unwrap();
        let chain: Vec<&str> = tree.children()[0].preorder().map(|n| n.kind().name()).collect();
        assert_eq!(
            chain,
            vec![
                "stmt",
                "simple_stmt",
                "small_stmt",
                "expr_stmt",
                "testlist",
                "test",
                "or_test",
                "and_test",
                "not_test",
                "comparison",
                "expr",
                "xor_expr",
                "and_expr",
                "shift_expr",
                "arith_expr",
                "term",
                "factor",
                "power",
                "atom",
                "NAME",
                "NEWLINE",
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        let tree = parse_str("1 + 1 == 2\n").unwrap();
        assert_eq!(count(&tree, SymbolId::Comparison), 1);
        assert_eq!(count(&tree, SymbolId::CompOp), 1);

        let bare = parse_str("1 + 1\n").unwrap();
        assert_eq!(count(&bare, SymbolId::Comparison), 1);
        assert_eq!(count(&bare, SymbolId::CompOp), 0);
    }

    #[test]
    fn test_two_word_comparison_operators() {
        let tree = parse_str("a not in b\nc is not d\ne < f <= g\n").unwrap();
        let ops: Vec<Vec<&str>> = tree
            .preorder()
            .filter(|n| n.is(SymbolId::CompOp))
            .map(|n| n.leaves().map(|l| l.text.as_str()).collect())
            .collect();
        assert_eq!(ops, vec![vec!["not", "in"], vec!["is", "not"], vec!["<"], vec!["<="]]);
    }

    #[test]
    fn test_print_statement() {
        let tree = parse_str("print 'hello world'\nprint\nprint a, b,\n").unwrap();
        assert_eq!(count(&tree, SymbolId::PrintStmt), 3);
    }

    #[test]
    fn test_print_is_not_an_expression() {
        assert!(parse_str("x = print\n").is_err());
    }

    #[test]
    fn test_line_numbers_on_leaves() {
        let tree = parse_str("a = 1\n\nb = (2,\n 3)\n").unwrap();
        let lines: Vec<(&str, Option<u32>)> = tree
            .leaves()
            .filter(|l| !l.text.is_empty())
            .map(|l| (l.text.as_str(), l.line))
            .collect();
        assert_eq!(lines[0], ("a", Some(1)));
        assert_eq!(lines[3], ("b", Some(3)));
        assert_eq!(lines.last(), Some(&(")", Some(4))));
    }

    #[test]
    fn test_without_line_info() {
        let tree = parse_as("a = 1\n", StartSymbol::File).unwrap();
        assert!(tree.leaves().all(|l| l.line.is_none()));
    }

    #[test]
    fn test_compound_statements() {
        let source = "\
def f(a, b=2):
    if a:
        return a
    elif b:
        pass
    else:
        return None

for i in range(3):
    while i:
        i -= 1
    else:
        continue

try:
    f(1)
except ValueError as e:
    print e
except:
    raise
else:
    x = 1
finally:
    y = 2

class Oops(Exception):
    pass
";
        let tree = parse_str(source).unwrap();
        assert_eq!(count(&tree, SymbolId::FuncDef), 1);
        assert_eq!(count(&tree, SymbolId::IfStmt), 1);
        assert_eq!(count(&tree, SymbolId::ForStmt), 1);
        assert_eq!(count(&tree, SymbolId::WhileStmt), 1);
        assert_eq!(count(&tree, SymbolId::TryStmt), 1);
        assert_eq!(count(&tree, SymbolId::ExceptClause), 2);
        assert_eq!(count(&tree, SymbolId::ClassDef), 1);
        // Top level: def, for, try, class.
        assert_eq!(kinds_of(&tree), vec!["stmt", "stmt", "stmt", "stmt", "ENDMARKER"]);
    }

    #[test]
    fn test_suite_layout_leaves() {
        let tree = parse_str("if x:\n    y\n").unwrap();
        let suite = tree.preorder().find(|n| n.is(SymbolId::Suite)).unwrap();
        assert_eq!(kinds_of(suite), vec!["NEWLINE", "INDENT", "stmt", "DEDENT"]);
    }

    #[test]
    fn test_inline_suite() {
        let tree = parse_str("if x: y = 1\n").unwrap();
        let suite = tree.preorder().find(|n| n.is(SymbolId::Suite)).unwrap();
        assert_eq!(kinds_of(suite), vec!["simple_stmt"]);
    }

    #[test]
    fn test_multiple_small_statements() {
        let tree = parse_str("a = 1; b = 2;\n").unwrap();
        let simple = tree.preorder().find(|n| n.is(SymbolId::SimpleStmt)).unwrap();
        assert_eq!(
            kinds_of(simple),
            vec!["small_stmt", "SEMI", "small_stmt", "SEMI", "NEWLINE"]
        );
    }

    #[test]
    fn test_atoms_and_trailers() {
        let tree = parse_str("x = [1, 2][0:1] + {'a': (1,)}['a'] + f(a, k=2).y + 'ab' 'cd'\n").unwrap();
        assert_eq!(count(&tree, SymbolId::Trailer), 4);
        assert_eq!(count(&tree, SymbolId::DictMaker), 1);
        assert_eq!(count(&tree, SymbolId::Argument), 2);
    }

    #[test]
    fn test_single_input() {
        let tree = parse_as("x = 1\n", StartSymbol::Single).unwrap();
        assert_eq!(kinds_of(&tree), vec!["simple_stmt"]);

        let tree = parse_as("if x:\n    y\n", StartSymbol::Single).unwrap();
        assert_eq!(kinds_of(&tree)[0], "compound_stmt");

        let err = parse_as("a\nb\n", StartSymbol::Single).unwrap_err();
        assert!(err[0].message.contains("multiple statements"));
    }

    #[test]
    fn test_eval_input() {
        let tree = parse_as("1 + 1 == 2", StartSymbol::Eval).unwrap();
        assert_eq!(kinds_of(&tree), vec!["testlist", "NEWLINE", "ENDMARKER"]);
        assert!(parse_as("x = 1", StartSymbol::Eval).is_err());
    }

    #[test]
    fn test_assignment_targets() {
        assert!(parse_str("a, (b, [c, d.e]) = f\n").is_ok());
        assert!(parse_str("a[0] = b.c = 1\n").is_ok());
        assert!(parse_str("del a, b[0]\n").is_ok());
        assert!(first_error("f() = 1\n").contains("function call"));
        assert!(first_error("1 = x\n").contains("literal"));
        assert!(first_error("a + b = c\n").contains("operator"));
        assert!(first_error("a, b += 1\n").contains("augmented"));
    }

    #[test]
    fn test_argument_rules() {
        assert!(first_error("f(a=1, b)\n").contains("non-keyword arg"));
        assert!(first_error("f(a.b=1)\n").contains("keyword can't be an expression"));
        assert!(first_error("def f(a=1, b):\n    pass\n").contains("non-default argument"));
    }

    #[test]
    fn test_try_requires_handler() {
        assert!(first_error("try:\n    x\ny\n").contains("'except' or 'finally'"));
        assert!(first_error("try:\n    x\nexcept:\n    y\nexcept E:\n    z\n").contains("must be last"));
    }

    #[test]
    fn test_unexpected_indent_is_single_error() {
        let err = parse_str("x = 1\n    y = 2\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("unexpected indent"));
    }

    #[test]
    fn test_recovery_reports_each_bad_statement() {
        let err = parse_str("x = = 1\ny = 2\nz = :\n").unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_expected_found_message() {
        assert_eq!(first_error("if x\n    y\n"), "expected ':', found end of line");
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("x = {}1{}\n", "(".repeat(300), ")".repeat(300));
        assert!(first_error(&deep).contains("too many nested"));
        let shallow = format!("x = {}1{}\n", "(".repeat(30), ")".repeat(30));
        assert!(parse_str(&shallow).is_ok());
    }

    #[test]
    fn test_nesting_limit_fits_a_small_thread_stack() {
        let worker = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let deep = format!("x = {}1{}\n", "(".repeat(99), ")".repeat(99));
                let at_limit = format!("x = {}1{}\n", "[".repeat(MAX_NESTING - 1), "]".repeat(MAX_NESTING - 1));
                let unary = format!("x = {}1\n", "-".repeat(99));
                (first_error(&deep), parse_str(&at_limit).is_ok(), first_error(&unary))
            })
            .unwrap();
        let (deep, at_limit, unary) = worker.join().unwrap();
        assert!(deep.contains("too many nested"), "{deep}");
        assert!(at_limit);
        assert!(unary.contains("too many nested"), "{unary}");
    }

    #[test]
    fn test_import_statements() {
        let tree = parse_str("import a.b as c, d\nfrom pprint import (pprint as p, x,)\n").unwrap();
        assert_eq!(count(&tree, SymbolId::ImportStmt), 2);
        assert_eq!(count(&tree, SymbolId::ImportName), 1);
        assert_eq!(count(&tree, SymbolId::ImportFrom), 1);
        assert_eq!(count(&tree, SymbolId::DottedAsName), 2);
        assert_eq!(count(&tree, SymbolId::ImportAsName), 2);
        assert_eq!(count(&tree, SymbolId::DottedName), 3);
        let from = tree.preorder().find(|n| n.is(SymbolId::ImportFrom)).unwrap();
        assert_eq!(kinds_of(from), vec!["NAME", "dotted_name", "NAME", "LPAR", "import_as_names", "RPAR"]);
    }

    #[test]
    fn test_incomplete_imports_are_rejected() {
        assert!(parse_str("import\n").is_err());
        assert!(parse_str("from a import\n").is_err());
        assert!(parse_str("from a.b\n").is_err());
        assert!(parse_str("import a as\n").is_err());
        assert!(parse_str("from = 1\n").is_err());
    }

    #[test]
    fn test_keywords_cannot_be_names() {
        assert!(parse_str("def = 1\n").is_err());
        assert!(parse_str("x.if\n").is_err());
        assert!(parse_str("True = 1\n").is_ok());
    }
}
