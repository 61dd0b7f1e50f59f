//! Builtin exception vocabulary (Python-like).
//!
//! This registry exists so the runtime and the reporter agree on builtin exception names and on the
//! class hierarchy used by `except` matching.

use super::registry::{LangItemInfo, Stability};

/// Stable identifier for every builtin exception class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    Exception,
    ArithmeticError,
    LookupError,
    AssertionError,
    AttributeError,
    ImportError,
    IndexError,
    KeyError,
    NameError,
    OverflowError,
    RuntimeError,
    SyntaxError,
    TypeError,
    ValueError,
    ZeroDivisionError,
}

/// Metadata for a builtin exception kind.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionInfo {
    pub item: LangItemInfo<ExceptionKind>,
    /// Direct base class; `None` only for the root `Exception`.
    pub base: Option<ExceptionKind>,
}

/// Registry of builtin exception kinds, in [`ExceptionKind`] declaration order.
///
/// ## Notes
/// - A base always appears before its subclasses.
pub const EXCEPTIONS: &[ExceptionInfo] = &[
    info(ExceptionKind::Exception, "Exception", None, "Root of every catchable exception."),
    info(
        ExceptionKind::ArithmeticError,
        "ArithmeticError",
        Some(ExceptionKind::Exception),
        "Base for numeric failures.",
    ),
    info(
        ExceptionKind::LookupError,
        "LookupError",
        Some(ExceptionKind::Exception),
        "Base for failed index/key lookups.",
    ),
    info(
        ExceptionKind::AssertionError,
        "AssertionError",
        Some(ExceptionKind::Exception),
        "Raised by a failing `assert` statement.",
    ),
    info(
        ExceptionKind::AttributeError,
        "AttributeError",
        Some(ExceptionKind::Exception),
        "Raised when an attribute or method does not exist.",
    ),
    info(
        ExceptionKind::ImportError,
        "ImportError",
        Some(ExceptionKind::Exception),
        "Raised when an import names an unknown module or member.",
    ),
    info(
        ExceptionKind::IndexError,
        "IndexError",
        Some(ExceptionKind::LookupError),
        "Raised when a sequence index is out of range.",
    ),
    info(
        ExceptionKind::KeyError,
        "KeyError",
        Some(ExceptionKind::LookupError),
        "Raised when a dict key is missing.",
    ),
    info(
        ExceptionKind::NameError,
        "NameError",
        Some(ExceptionKind::Exception),
        "Raised when a name is not bound in any visible namespace.",
    ),
    info(
        ExceptionKind::OverflowError,
        "OverflowError",
        Some(ExceptionKind::ArithmeticError),
        "Raised when an integer result does not fit in 64 bits.",
    ),
    info(
        ExceptionKind::RuntimeError,
        "RuntimeError",
        Some(ExceptionKind::Exception),
        "Raised for interpreter-level failures such as exceeding the recursion depth.",
    ),
    info(
        ExceptionKind::SyntaxError,
        "SyntaxError",
        Some(ExceptionKind::Exception),
        "Raised when source handed to the sandbox at run time does not parse.",
    ),
    info(
        ExceptionKind::TypeError,
        "TypeError",
        Some(ExceptionKind::Exception),
        "Raised when an operation receives a value of an inappropriate type.",
    ),
    info(
        ExceptionKind::ValueError,
        "ValueError",
        Some(ExceptionKind::Exception),
        "Raised when an operation receives a value of the right type but an invalid value.",
    ),
    info(
        ExceptionKind::ZeroDivisionError,
        "ZeroDivisionError",
        Some(ExceptionKind::ArithmeticError),
        "Raised when dividing or taking modulo by zero.",
    ),
];

/// Return the registry entry for an exception kind.
pub fn info_for(kind: ExceptionKind) -> &'static ExceptionInfo {
    &EXCEPTIONS[kind as usize]
}

/// Return the class name of an exception kind.
pub fn as_str(kind: ExceptionKind) -> &'static str {
    info_for(kind).item.canonical
}

/// Return the direct base of an exception kind.
pub fn base(kind: ExceptionKind) -> Option<ExceptionKind> {
    info_for(kind).base
}

/// Resolve a class name to an exception kind.
pub fn from_str(name: &str) -> Option<ExceptionKind> {
    EXCEPTIONS.iter().find(|e| e.item.canonical == name).map(|e| e.item.id)
}

/// Return `true` when `kind` is `ancestor` or inherits from it.
pub fn is_subclass(kind: ExceptionKind, ancestor: ExceptionKind) -> bool {
    let mut current = Some(kind);
    while let Some(k) = current {
        if k == ancestor {
            return true;
        }
        current = base(k);
    }
    false
}

const fn info(
    id: ExceptionKind,
    canonical: &'static str,
    base: Option<ExceptionKind>,
    description: &'static str,
) -> ExceptionInfo {
    ExceptionInfo {
        item: LangItemInfo {
            id,
            canonical,
            aliases: &[],
            description,
            stability: Stability::Stable,
        },
        base,
    }
}
