//! Synthesis of the replacement hook call.

use witness_core::strings::escape_for_double_quotes;
use witness_syntax::{Node, codec, query};

use super::InterpolateError;

/// Line number passed to the hook when the statement carries no line information.
pub const UNKNOWN_LINE: i64 = -1;

/// Render a Python-style boolean literal.
fn py_bool(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// Source text of the hook call standing in for `statement`.
pub fn call_source(hook_name: &str, statement: &Node, comparing: bool, printing: bool) -> String {
    let line = query::first_line(statement).map_or(UNKNOWN_LINE, i64::from);
    let text = escape_for_double_quotes(&codec::serialize(statement));
    format!(
        "{hook_name}.intercept(\"{text}\", {line}, globals(), locals(), COMPARING={}, PRINTING={})\n",
        py_bool(comparing),
        py_bool(printing),
    )
}

/// Build the `simple_stmt` that replaces `statement` in the tree.
///
/// The call is parsed as a one-statement program and its statement taken back out, so the
/// replacement is always a well-formed fragment.
pub fn synthesize_call(
    hook_name: &str,
    statement: &Node,
    comparing: bool,
    printing: bool,
) -> Result<Node, InterpolateError> {
    let source = call_source(hook_name, statement, comparing, printing);
    let program = codec::parse(&source, false)?;
    let stmt = query::demote(program)?;
    match stmt {
        Node::Interior(interior) => interior
            .children
            .into_iter()
            .next()
            .ok_or(InterpolateError::EmptyStatement),
        Node::Leaf(_) => Err(InterpolateError::EmptyStatement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use witness_core::lang::symbols::SymbolId;

    fn first_statement(source: &str) -> Node {
        codec::parse(source, true).unwrap().children()[0].clone()
    }

    #[test]
    fn call_carries_text_line_and_flags() {
        let program = codec::parse("x = 1\n1 + 1 == 2\n", true).unwrap();
        let stmt = &program.children()[1];
        assert_eq!(
            call_source("__witness__", stmt, true, false),
            "__witness__.intercept(\"1 + 1 == 2\", 2, globals(), locals(), COMPARING=True, PRINTING=False)\n"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let stmt = first_statement("print 'hello'\n");
        assert_eq!(
            call_source("__witness__", &stmt, false, true),
            "__witness__.intercept(\"print \\'hello\\'\", 1, globals(), locals(), COMPARING=False, PRINTING=True)\n"
        );
    }

    #[test]
    fn missing_line_information_uses_the_sentinel() {
        let stmt = codec::parse("a == b\n", false).unwrap().children()[0].clone();
        assert!(call_source("hook", &stmt, true, false).contains("\"a == b\", -1,"));
    }

    #[test]
    fn synthesized_fragment_is_a_simple_statement() {
        let stmt = first_statement("a == b\n");
        let call = synthesize_call("__witness__", &stmt, true, false).unwrap();
        assert!(call.is(SymbolId::SimpleStmt));
        assert!(query::contains(&call, SymbolId::ArgList).unwrap());
    }
}
