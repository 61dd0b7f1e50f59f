//! Define the grammar-symbol vocabulary: every interior node of a concrete syntax tree carries one.
//!
//! Grammar symbols occupy the numeric namespace starting at [`FIRST_SYMBOL_CODE`], assigned in
//! grammar order. Names are the lower-case production names used by the parser and by
//! name-based tree queries (`"comparison"`, `"comp_op"`, `"print_stmt"`).
//!
//! ## Examples
//! ```rust
//! use witness_core::lang::symbols::{self, SymbolId};
//!
//! assert_eq!(symbols::from_name("comp_op"), Some(SymbolId::CompOp));
//! assert_eq!(symbols::code(SymbolId::SingleInput), 256);
//! assert_eq!(symbols::as_str(SymbolId::FileInput), "file_input");
//! ```

use super::registry::{FIRST_SYMBOL_CODE, KindCode, LangItemInfo, Stability};

/// Stable identifier for every grammar symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolId {
    // Roots
    SingleInput,
    FileInput,
    EvalInput,

    // Definitions
    FuncDef,
    ClassDef,
    Parameters,
    VarArgsList,
    FpDef,

    // Statements
    Stmt,
    SimpleStmt,
    SmallStmt,
    ExprStmt,
    AugAssign,
    PrintStmt,
    DelStmt,
    PassStmt,
    FlowStmt,
    BreakStmt,
    ContinueStmt,
    ReturnStmt,
    RaiseStmt,
    ImportStmt,
    ImportName,
    ImportFrom,
    ImportAsName,
    DottedAsName,
    ImportAsNames,
    DottedAsNames,
    DottedName,
    GlobalStmt,
    AssertStmt,
    CompoundStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    TryStmt,
    ExceptClause,
    Suite,

    // Expressions
    Test,
    OrTest,
    AndTest,
    NotTest,
    Comparison,
    CompOp,
    Expr,
    XorExpr,
    AndExpr,
    ShiftExpr,
    ArithExpr,
    Term,
    Factor,
    Power,
    Atom,
    ListMaker,
    Trailer,
    Subscript,
    ExprList,
    TestList,
    DictMaker,
    ArgList,
    Argument,
}

/// Metadata for a grammar symbol.
#[derive(Debug, Clone, Copy)]
pub struct SymbolInfo {
    pub item: LangItemInfo<SymbolId>,
    pub code: KindCode,
}

/// Registry of all grammar symbols, in [`SymbolId`] declaration order.
///
/// ## Notes
/// - Codes are contiguous: `code == FIRST_SYMBOL_CODE + position`.
pub const SYMBOLS: &[SymbolInfo] = &[
    info(SymbolId::SingleInput, "single_input", "Root for a single interactive statement."),
    info(SymbolId::FileInput, "file_input", "Root for a whole program; ends with ENDMARKER."),
    info(SymbolId::EvalInput, "eval_input", "Root for a standalone expression."),
    info(SymbolId::FuncDef, "funcdef", "`def name(params): suite`."),
    info(SymbolId::ClassDef, "classdef", "`class Name(bases): suite`."),
    info(SymbolId::Parameters, "parameters", "Parenthesised parameter list of a funcdef."),
    info(SymbolId::VarArgsList, "varargslist", "Comma-separated parameters with optional defaults."),
    info(SymbolId::FpDef, "fpdef", "A single parameter name."),
    info(SymbolId::Stmt, "stmt", "A statement: simple or compound."),
    info(SymbolId::SimpleStmt, "simple_stmt", "One logical line of small statements."),
    info(SymbolId::SmallStmt, "small_stmt", "A single non-compound statement."),
    info(SymbolId::ExprStmt, "expr_stmt", "Expression, assignment, or augmented assignment."),
    info(SymbolId::AugAssign, "augassign", "Augmented assignment operator (`+=`, ...)."),
    info(SymbolId::PrintStmt, "print_stmt", "The literal `print` statement."),
    info(SymbolId::DelStmt, "del_stmt", "`del targets`."),
    info(SymbolId::PassStmt, "pass_stmt", "`pass`."),
    info(SymbolId::FlowStmt, "flow_stmt", "Break, continue, return, or raise."),
    info(SymbolId::BreakStmt, "break_stmt", "`break`."),
    info(SymbolId::ContinueStmt, "continue_stmt", "`continue`."),
    info(SymbolId::ReturnStmt, "return_stmt", "`return [value]`."),
    info(SymbolId::RaiseStmt, "raise_stmt", "`raise [exception]`."),
    info(SymbolId::ImportStmt, "import_stmt", "`import` or `from ... import`."),
    info(SymbolId::ImportName, "import_name", "`import dotted_as_names`."),
    info(SymbolId::ImportFrom, "import_from", "`from dotted_name import import_as_names`."),
    info(SymbolId::ImportAsName, "import_as_name", "`NAME [as NAME]` after `from ... import`."),
    info(SymbolId::DottedAsName, "dotted_as_name", "`dotted_name [as NAME]` after `import`."),
    info(SymbolId::ImportAsNames, "import_as_names", "Comma-separated import_as_name items."),
    info(SymbolId::DottedAsNames, "dotted_as_names", "Comma-separated dotted_as_name items."),
    info(SymbolId::DottedName, "dotted_name", "`NAME ('.' NAME)*`."),
    info(SymbolId::GlobalStmt, "global_stmt", "`global names`."),
    info(SymbolId::AssertStmt, "assert_stmt", "`assert test [, message]`."),
    info(SymbolId::CompoundStmt, "compound_stmt", "A statement owning one or more suites."),
    info(SymbolId::IfStmt, "if_stmt", "`if` / `elif` / `else`."),
    info(SymbolId::WhileStmt, "while_stmt", "`while test: suite [else: suite]`."),
    info(SymbolId::ForStmt, "for_stmt", "`for targets in values: suite [else: suite]`."),
    info(SymbolId::TryStmt, "try_stmt", "`try` with `except` and/or `finally` clauses."),
    info(SymbolId::ExceptClause, "except_clause", "`except [test [as NAME]]`."),
    info(SymbolId::Suite, "suite", "An inline simple statement or an indented block."),
    info(SymbolId::Test, "test", "Top of the expression chain."),
    info(SymbolId::OrTest, "or_test", "Short-circuit `or`."),
    info(SymbolId::AndTest, "and_test", "Short-circuit `and`."),
    info(SymbolId::NotTest, "not_test", "Logical `not`."),
    info(SymbolId::Comparison, "comparison", "Operands joined by comparison operators."),
    info(SymbolId::CompOp, "comp_op", "A comparison operator, including `not in` and `is not`."),
    info(SymbolId::Expr, "expr", "Bitwise or (`|`)."),
    info(SymbolId::XorExpr, "xor_expr", "Bitwise xor (`^`)."),
    info(SymbolId::AndExpr, "and_expr", "Bitwise and (`&`)."),
    info(SymbolId::ShiftExpr, "shift_expr", "Shifts (`<<`, `>>`)."),
    info(SymbolId::ArithExpr, "arith_expr", "Addition and subtraction."),
    info(SymbolId::Term, "term", "Multiplication, division, floor division, modulo."),
    info(SymbolId::Factor, "factor", "Unary `+`, `-`, `~`."),
    info(SymbolId::Power, "power", "Atom with trailers and optional `**` exponent."),
    info(SymbolId::Atom, "atom", "Name, literal, or bracketed display."),
    info(SymbolId::ListMaker, "listmaker", "Elements of a list display."),
    info(SymbolId::Trailer, "trailer", "Call, subscript, or attribute access."),
    info(SymbolId::Subscript, "subscript", "Index or slice inside `[...]`."),
    info(SymbolId::ExprList, "exprlist", "Comma-separated targets."),
    info(SymbolId::TestList, "testlist", "Comma-separated expressions."),
    info(SymbolId::DictMaker, "dictmaker", "`key: value` pairs of a dict display."),
    info(SymbolId::ArgList, "arglist", "Call arguments."),
    info(SymbolId::Argument, "argument", "Positional or `NAME=value` keyword argument."),
];

/// Return the registry entry for a grammar symbol.
pub fn info_for(id: SymbolId) -> &'static SymbolInfo {
    &SYMBOLS[id as usize]
}

/// Return the production name (`"file_input"`, `"comparison"`, ...).
pub fn as_str(id: SymbolId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the numeric code of a grammar symbol.
pub fn code(id: SymbolId) -> KindCode {
    info_for(id).code
}

/// Resolve a production name. Lookup is case-sensitive.
pub fn from_name(name: &str) -> Option<SymbolId> {
    SYMBOLS.iter().find(|s| s.item.canonical == name).map(|s| s.item.id)
}

/// Resolve a numeric code.
pub fn from_code(code: KindCode) -> Option<SymbolId> {
    let index = usize::from(code.checked_sub(FIRST_SYMBOL_CODE)?);
    SYMBOLS.get(index).map(|s| s.item.id)
}

const fn info(id: SymbolId, name: &'static str, description: &'static str) -> SymbolInfo {
    SymbolInfo {
        item: LangItemInfo {
            id,
            canonical: name,
            aliases: &[],
            description,
            stability: Stability::Stable,
        },
        code: FIRST_SYMBOL_CODE + id as KindCode,
    }
}
