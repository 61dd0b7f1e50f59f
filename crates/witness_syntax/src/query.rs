//! Kind-based queries over trees and fragments.
//!
//! Kinds can be named (`"comp_op"`, `"NAME"`), given by numeric code, or passed as typed ids.
//!
//! ## Examples
//! ```rust
//! use witness_syntax::{codec, query};
//!
//! let tree = codec::parse("1 + 1 == 2\n", true).unwrap();
//! assert!(query::contains(&tree, "comp_op").unwrap());
//! assert_eq!(query::find_all(&tree, "NUMBER").unwrap().len(), 3);
//! assert!(query::find_all(&tree, "no_such_kind").is_err());
//! ```

use witness_core::lang::kinds::Kind;
use witness_core::lang::registry::KindCode;
use witness_core::lang::symbols::SymbolId;
use witness_core::lang::tokens::TokenId;

use crate::cst::Node;
use crate::diagnostics::TreeError;

/// A node kind as supplied by a caller, resolved against the combined token/grammar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindQuery<'a> {
    Name(&'a str),
    Code(KindCode),
    Kind(Kind),
}

impl KindQuery<'_> {
    /// Resolve to a [`Kind`].
    ///
    /// ## Errors
    /// [`TreeError::UnknownKind`] if the name or code is in neither table.
    pub fn resolve(self) -> Result<Kind, TreeError> {
        match self {
            KindQuery::Name(name) => Kind::from_name(name).ok_or_else(|| TreeError::UnknownKind(name.to_string())),
            KindQuery::Code(code) => Kind::from_code(code).ok_or_else(|| TreeError::UnknownKind(code.to_string())),
            KindQuery::Kind(kind) => Ok(kind),
        }
    }
}

impl<'a> From<&'a str> for KindQuery<'a> {
    fn from(name: &'a str) -> Self {
        KindQuery::Name(name)
    }
}

impl From<KindCode> for KindQuery<'_> {
    fn from(code: KindCode) -> Self {
        KindQuery::Code(code)
    }
}

impl From<Kind> for KindQuery<'_> {
    fn from(kind: Kind) -> Self {
        KindQuery::Kind(kind)
    }
}

impl From<TokenId> for KindQuery<'_> {
    fn from(id: TokenId) -> Self {
        KindQuery::Kind(id.into())
    }
}

impl From<SymbolId> for KindQuery<'_> {
    fn from(id: SymbolId) -> Self {
        KindQuery::Kind(id.into())
    }
}

/// Every subtree whose root has the given kind, in depth-first pre-order.
///
/// Returns an empty vector when nothing matches.
pub fn find_all<'t, 'q>(tree: &'t Node, kind: impl Into<KindQuery<'q>>) -> Result<Vec<&'t Node>, TreeError> {
    let kind = kind.into().resolve()?;
    Ok(tree.preorder().filter(|node| node.kind() == kind).collect())
}

/// Whether any subtree has the given kind.
pub fn contains<'q>(tree: &Node, kind: impl Into<KindQuery<'q>>) -> Result<bool, TreeError> {
    let kind = kind.into().resolve()?;
    Ok(tree.preorder().any(|node| node.kind() == kind))
}

/// Wrap a `stmt` fragment as a one-statement program: `[file_input, stmt, NEWLINE, ENDMARKER]`.
///
/// ## Errors
/// [`TreeError::NotAStatement`] if the fragment is not rooted at `stmt`.
pub fn promote(statement: Node) -> Result<Node, TreeError> {
    if !statement.is(SymbolId::Stmt) {
        return Err(TreeError::NotAStatement {
            found: statement.kind(),
        });
    }
    Ok(Node::interior(
        SymbolId::FileInput,
        vec![
            statement,
            Node::leaf(TokenId::Newline, "", None),
            Node::leaf(TokenId::EndMarker, "", None),
        ],
    ))
}

/// Inverse of [`promote`]: take the statement out of a one-statement program.
///
/// ## Errors
/// [`TreeError::NotAStatement`] if the program's first child is not a `stmt`, and
/// [`TreeError::InvalidRoot`] if the tree is not a `file_input`.
pub fn demote(program: Node) -> Result<Node, TreeError> {
    let found = program.kind();
    let Node::Interior(root) = program else {
        return Err(TreeError::InvalidRoot { found });
    };
    if root.kind != SymbolId::FileInput {
        return Err(TreeError::InvalidRoot { found });
    }
    match root.children.into_iter().next() {
        Some(stmt) if stmt.is(SymbolId::Stmt) => Ok(stmt),
        Some(other) => Err(TreeError::NotAStatement { found: other.kind() }),
        None => Err(TreeError::InvalidRoot { found }),
    }
}

/// The first source line recorded on any leaf of the fragment.
pub fn first_line(fragment: &Node) -> Option<u32> {
    fragment.leaves().find_map(|leaf| leaf.line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    fn statement(source: &str) -> Node {
        let tree = codec::parse(source, true).unwrap();
        tree.children()[0].clone()
    }

    #[test]
    fn test_find_all_by_name_code_and_id() {
        let tree = codec::parse("a == b\nc < d\n", false).unwrap();
        let by_name = find_all(&tree, "comp_op").unwrap().len();
        let by_code = find_all(&tree, Kind::from(SymbolId::CompOp).code()).unwrap().len();
        let by_id = find_all(&tree, SymbolId::CompOp).unwrap().len();
        assert_eq!((by_name, by_code, by_id), (2, 2, 2));
    }

    #[test]
    fn test_find_all_preorder() {
        let tree = codec::parse("x = y\n", false).unwrap();
        let names: Vec<&str> = find_all(&tree, TokenId::Name)
            .unwrap()
            .into_iter()
            .filter_map(Node::text)
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_find_all_empty_and_unknown() {
        let tree = codec::parse("pass\n", false).unwrap();
        assert!(find_all(&tree, "comparison").unwrap().is_empty());
        assert!(matches!(find_all(&tree, "bogus"), Err(TreeError::UnknownKind(_))));
        assert!(matches!(contains(&tree, 9999u16), Err(TreeError::UnknownKind(_))));
    }

    #[test]
    fn test_contains_on_fragment() {
        let stmt = statement("print 1 < 2\n");
        assert!(contains(&stmt, "print_stmt").unwrap());
        assert!(contains(&stmt, "comp_op").unwrap());
        assert!(!contains(&stmt, "file_input").unwrap());
    }

    #[test]
    fn test_promote_and_demote() {
        let stmt = statement("x = 1\n");
        let program = promote(stmt.clone()).unwrap();
        assert_eq!(
            program.children().iter().map(|c| c.kind().name()).collect::<Vec<_>>(),
            vec!["stmt", "NEWLINE", "ENDMARKER"]
        );
        assert!(codec::reparse(&program).is_ok());
        assert_eq!(demote(program).unwrap(), stmt);
    }

    #[test]
    fn test_promote_rejects_non_statements() {
        let tree = codec::parse("x = 1\n", false).unwrap();
        let err = promote(tree).unwrap_err();
        assert!(matches!(err, TreeError::NotAStatement { .. }));
        assert_eq!(err.to_string(), "expected a stmt node, found file_input");
    }

    #[test]
    fn test_first_line() {
        let tree = codec::parse("\n\nx = 1\n", true).unwrap();
        assert_eq!(first_line(&tree.children()[0]), Some(3));
        let bare = codec::parse("x = 1\n", false).unwrap();
        assert_eq!(first_line(&bare), None);
    }
}
