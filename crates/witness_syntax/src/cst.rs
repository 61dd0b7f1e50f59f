//! Concrete syntax tree.
//!
//! The tree keeps every grammar production the parser walked through: an expression statement such
//! as `1 + 1 == 2` is a full chain `stmt → simple_stmt → small_stmt → expr_stmt → testlist → test →
//! or_test → ... → comparison → ...`. Nothing is pruned, so queries like "does this statement
//! contain a `comp_op`" answer exactly what the source says.
//!
//! A node is either a [`Leaf`] (a token: kind, spelling, optional line) or an [`Interior`] node (a
//! grammar symbol plus ordered children, never empty).

use witness_core::lang::kinds::Kind;
use witness_core::lang::symbols::SymbolId;
use witness_core::lang::tokens::TokenId;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// A terminal token in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: TokenId,
    pub text: String,
    /// 1-based line on which the token begins, when the tree was parsed with line info.
    pub line: Option<u32>,
}

/// A grammar production with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interior {
    pub kind: SymbolId,
    pub children: Vec<Node>,
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Interior(Interior),
}

impl Node {
    /// Build a leaf.
    pub fn leaf(kind: TokenId, text: impl Into<String>, line: Option<u32>) -> Node {
        Node::Leaf(Leaf {
            kind,
            text: text.into(),
            line,
        })
    }

    /// Build an interior node. Callers must supply at least one child.
    pub fn interior(kind: SymbolId, children: Vec<Node>) -> Node {
        debug_assert!(!children.is_empty(), "interior node {kind:?} without children");
        Node::Interior(Interior { kind, children })
    }

    /// The node's kind in the combined token/grammar namespace.
    pub fn kind(&self) -> Kind {
        match self {
            Node::Leaf(leaf) => Kind::Token(leaf.kind),
            Node::Interior(node) => Kind::Symbol(node.kind),
        }
    }

    /// Return `true` if the node has the given kind.
    pub fn is(&self, kind: impl Into<Kind>) -> bool {
        self.kind() == kind.into()
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Node::Interior(node) => Some(node.kind),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Interior(_) => None,
        }
    }

    /// Children of an interior node; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Interior(node) => &node.children,
            Node::Leaf(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Interior(node) => Some(&mut node.children),
            Node::Leaf(_) => None,
        }
    }

    /// The `index`-th child, if any.
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// Text of a leaf; `None` for interior nodes.
    pub fn text(&self) -> Option<&str> {
        self.as_leaf().map(|leaf| leaf.text.as_str())
    }

    /// Follow single-child chains down to the node where the tree first branches or ends.
    ///
    /// `x` parsed as a `test` collapses to its `NAME` leaf; `a + b` stops at the `arith_expr`.
    pub fn collapse(&self) -> &Node {
        let mut node = self;
        while let [only] = node.children() {
            node = only;
        }
        node
    }

    /// The leaf reached by [`Node::collapse`], if the chain ends in one.
    pub fn sole_leaf(&self) -> Option<&Leaf> {
        self.collapse().as_leaf()
    }

    /// Iterate over this node and all of its descendants in depth-first pre-order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Iterate over the leaves under this node, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.preorder().filter_map(Node::as_leaf)
    }

    /// Drop line information from every leaf.
    pub fn strip_lines(&mut self) {
        match self {
            Node::Leaf(leaf) => leaf.line = None,
            Node::Interior(node) => node.children.iter_mut().for_each(Node::strip_lines),
        }
    }
}

/// Depth-first pre-order traversal, see [`Node::preorder`].
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        // [arith_expr [term NAME:a] PLUS:+ [term NUMBER:1]]
        Node::interior(
            SymbolId::ArithExpr,
            vec![
                Node::interior(SymbolId::Term, vec![Node::leaf(TokenId::Name, "a", Some(1))]),
                Node::leaf(TokenId::Plus, "+", Some(1)),
                Node::interior(SymbolId::Term, vec![Node::leaf(TokenId::Number, "1", Some(2))]),
            ],
        )
    }

    #[test]
    fn preorder_visits_parents_first() {
        let tree = sample();
        let kinds: Vec<&str> = tree.preorder().map(|n| n.kind().name()).collect();
        assert_eq!(kinds, vec!["arith_expr", "term", "NAME", "PLUS", "term", "NUMBER"]);
    }

    #[test]
    fn leaves_in_source_order() {
        let tree = sample();
        let texts: Vec<&str> = tree.leaves().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "+", "1"]);
    }

    #[test]
    fn collapse_stops_at_branch() {
        let tree = sample();
        assert!(tree.collapse().is(SymbolId::ArithExpr));
        assert_eq!(tree.children()[0].sole_leaf().map(|l| l.text.as_str()), Some("a"));
    }

    #[test]
    fn strip_lines_clears_every_leaf() {
        let mut tree = sample();
        tree.strip_lines();
        assert!(tree.leaves().all(|l| l.line.is_none()));
    }
}
