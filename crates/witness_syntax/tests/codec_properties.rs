//! Codec round-trip properties over generated programs, plus layout snapshots.
//!
//! Run with: `cargo test -p witness_syntax --test codec_properties`
//! Review snapshot changes: `cargo insta review`

use proptest::prelude::*;
use witness_core::lang::tokens::TokenId;
use witness_syntax::{Node, codec, query};

fn tokens(tree: &Node) -> Vec<(TokenId, String)> {
    tree.leaves().map(|leaf| (leaf.kind, leaf.text.clone())).collect()
}

fn atom() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "total", "items", "x1"]).prop_map(str::to_string),
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z ]{0,6}".prop_map(|s| format!("'{s}'")),
        Just("None".to_string()),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    atom().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "//", "%"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), prop::collection::vec(inner, 0..3))
                .prop_map(|(f, args)| format!("f({}) + {f}", args.join(", "))),
        ]
    })
}

fn simple_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        expression().prop_map(|e| format!("x = {e}")),
        expression().prop_map(|e| format!("print {e}")),
        (expression(), prop::sample::select(vec!["==", "!=", "<", ">=", "in", "not in", "is not"]), expression())
            .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        Just("pass".to_string()),
    ]
}

fn program() -> impl Strategy<Value = String> {
    let block = (expression(), prop::collection::vec(simple_statement(), 1..4)).prop_map(|(cond, body)| {
        let body: Vec<String> = body.into_iter().map(|s| format!("  {s}\n")).collect();
        format!("if {cond}:\n{}", body.concat())
    });
    let statement = prop_oneof![3 => simple_statement().prop_map(|s| format!("{s}\n")), 1 => block];
    prop::collection::vec(statement, 1..6).prop_map(|statements| statements.concat())
}

proptest! {
    /// Regenerated text parses back to the same token sequence.
    #[test]
    fn serialize_then_parse_preserves_tokens(source in program()) {
        let tree = codec::parse(&source, false).expect("generated program parses");
        let again = codec::parse(&codec::serialize(&tree), false).expect("regenerated program parses");
        prop_assert_eq!(tokens(&tree), tokens(&again));
    }

    /// Serializing is a fixed point after one pass.
    #[test]
    fn serialize_is_stable(source in program()) {
        let once = codec::serialize(&codec::parse(&source, false).expect("parses"));
        let twice = codec::serialize(&codec::parse(&once, false).expect("parses"));
        prop_assert_eq!(once, twice);
    }

    /// Every statement can be promoted to a program and demoted back unchanged.
    #[test]
    fn promote_then_demote_is_identity(source in program()) {
        let tree = codec::parse(&source, true).expect("parses");
        for stmt in tree.children().iter().filter(|child| child.symbol().is_some()) {
            let program = query::promote(stmt.clone()).expect("statement promotes");
            prop_assert_eq!(&query::demote(program).expect("program demotes"), stmt);
        }
    }
}

#[test]
fn pretty_print_snapshot() {
    let tree = codec::parse("x == 1\n", false).unwrap();
    let text = codec::pretty_print(&tree);
    let leaves: Vec<&str> = text.lines().filter(|line| line.contains('"')).map(str::trim).collect();
    insta::assert_debug_snapshot!(leaves, @r#"
    [
        "NAME \"x\"",
        "EQEQUAL \"==\"",
        "NUMBER \"1\"",
        "NEWLINE \"\"",
        "ENDMARKER \"\"",
    ]
    "#);
}
