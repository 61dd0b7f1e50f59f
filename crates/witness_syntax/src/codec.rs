//! Convert between source text and concrete syntax trees.
//!
//! ## Notes
//! - [`serialize`] is not a formatter: comments and original spacing are lost, every pair of
//!   adjacent tokens is separated by exactly one space, and blocks are re-indented by four spaces
//!   per level. The output always reparses to the same token sequence.
//! - [`pretty_print`] is for humans only.

use std::fmt::Write as _;

use witness_core::lang::tokens::TokenId;

use crate::cst::Node;
use crate::diagnostics::{SyntaxError, TreeError};
use crate::lexer;
use crate::parser::{self, StartSymbol};
use crate::writer::SourceWriter;

/// Parse a whole program into a `file_input` tree.
///
/// With `with_line_info`, every leaf records the 1-based line on which its token begins.
pub fn parse(source: &str, with_line_info: bool) -> Result<Node, SyntaxError> {
    parse_with(source, StartSymbol::File, with_line_info)
}

/// Parse an expression list into an `eval_input` tree.
pub fn parse_expression(source: &str, with_line_info: bool) -> Result<Node, SyntaxError> {
    parse_with(source, StartSymbol::Eval, with_line_info)
}

/// Parse one statement into a `single_input` tree.
pub fn parse_single(source: &str, with_line_info: bool) -> Result<Node, SyntaxError> {
    parse_with(source, StartSymbol::Single, with_line_info)
}

/// Lex and parse `source` from the given start symbol.
pub fn parse_with(source: &str, start: StartSymbol, with_line_info: bool) -> Result<Node, SyntaxError> {
    let tokens = lexer::lex(source).map_err(|errors| SyntaxError::from_errors(source, errors))?;
    parser::parse_from(&tokens, start, with_line_info).map_err(|errors| SyntaxError::from_errors(source, errors))
}

/// Regenerate source text from a tree or fragment.
pub fn serialize(tree: &Node) -> String {
    let mut writer = SourceWriter::default();
    for leaf in tree.leaves() {
        match leaf.kind {
            TokenId::Newline => writer.newline(),
            TokenId::Indent => writer.indent(),
            TokenId::Dedent => writer.dedent(),
            TokenId::EndMarker => {}
            _ => writer.token(&leaf.text),
        }
    }
    writer.finish()
}

/// Render a tree with every kind resolved to its name, one node per line.
///
/// ```text
/// file_input
///   stmt
///     ...
///       NAME "x" (line 1)
/// ```
pub fn pretty_print(tree: &Node) -> String {
    let mut writer = SourceWriter::new(2);
    pretty_node(&mut writer, tree);
    writer.finish()
}

fn pretty_node(writer: &mut SourceWriter, node: &Node) {
    match node {
        Node::Leaf(leaf) => {
            let mut line = format!("{} {:?}", node.kind().name(), leaf.text);
            if let Some(n) = leaf.line {
                let _ = write!(line, " (line {})", n);
            }
            writer.writeln(&line);
        }
        Node::Interior(interior) => {
            writer.writeln(node.kind().name());
            writer.indent();
            for child in &interior.children {
                pretty_node(writer, child);
            }
            writer.dedent();
        }
    }
}

/// Serialize a root tree and parse it again with the matching entry point.
///
/// The result carries no line information: lines in regenerated text do not correspond to the
/// original source.
///
/// ## Errors
/// - [`TreeError::InvalidRoot`] if the tree is not rooted at `file_input`, `single_input`, or
///   `eval_input`.
/// - [`TreeError::Syntax`] if the regenerated text does not parse.
pub fn reparse(tree: &Node) -> Result<Node, TreeError> {
    let start = tree
        .symbol()
        .and_then(StartSymbol::for_root)
        .ok_or(TreeError::InvalidRoot { found: tree.kind() })?;
    Ok(parse_with(&serialize(tree), start, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use witness_core::lang::symbols::SymbolId;

    fn texts(tree: &Node) -> Vec<String> {
        tree.leaves()
            .filter(|l| !l.text.is_empty())
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn test_serialize_spaces_tokens() {
        let tree = parse("x=f(1,2)  # note\n", false).unwrap();
        assert_eq!(serialize(&tree), "x = f ( 1 , 2 )");
    }

    #[test]
    fn test_serialize_reindents_blocks() {
        let source = "def f(a):\n  if a:\n\treturn 1\n  return 2\nprint f(1)\n";
        let tree = parse(source, false).unwrap();
        assert_eq!(
            serialize(&tree),
            "def f ( a ) :\n    if a :\n        return 1\n    return 2\nprint f ( 1 )"
        );
    }

    #[test]
    fn test_serialize_keeps_string_spelling() {
        let tree = parse("print 'it\\'s', \"x\"\n", false).unwrap();
        assert_eq!(serialize(&tree), "print 'it\\'s' , \"x\"");
    }

    #[test]
    fn test_round_trip_preserves_tokens() {
        let source = "class E(Exception):\n    pass\ntry:\n    raise E('boom')\nexcept E as e:\n    x = [1, 2][0] ** -2\n";
        let tree = parse(source, true).unwrap();
        let again = parse(&serialize(&tree), true).unwrap();
        assert_eq!(texts(&tree), texts(&again));
    }

    #[test]
    fn test_pretty_print_names_kinds() {
        let tree = parse("x\n", true).unwrap();
        let printed = pretty_print(&tree);
        assert!(printed.starts_with("file_input\n  stmt\n    simple_stmt\n"));
        assert!(printed.contains("NAME \"x\" (line 1)"));
        assert!(printed.ends_with("ENDMARKER \"\" (line 2)"));
    }

    #[test]
    fn test_parse_expression_and_single() {
        let expr = parse_expression("1 + 1 == 2", false).unwrap();
        assert!(expr.is(SymbolId::EvalInput));
        let single = parse_single("x = 1", false).unwrap();
        assert!(single.is(SymbolId::SingleInput));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse("x = 1\ny = = 2\n", false).unwrap_err();
        assert_eq!(err.line, 2);
        let err = parse("s = 'open\n", false).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_reparse_roots() {
        let tree = parse("a = 1\n", true).unwrap();
        let again = reparse(&tree).unwrap();
        assert_eq!(texts(&tree), texts(&again));
        assert!(again.leaves().all(|l| l.line.is_none()));

        let stmt = tree.children()[0].clone();
        assert!(matches!(reparse(&stmt), Err(TreeError::InvalidRoot { .. })));
    }
}
