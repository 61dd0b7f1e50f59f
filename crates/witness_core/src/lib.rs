//! Provide shared, pure semantic helpers and canonical language vocabulary for the witness interpreter.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both:
//! - the syntax frontend can use to name and classify tree nodes, and
//! - the runtime sandbox can use to enforce Python-like numeric and string semantics.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, and no tree types.
//! - Current scope: numeric policy (Python-like semantics), string semantics (Unicode-scalar indexing/slicing,
//!   literal decoding, `repr`), and canonical language vocabulary.

pub mod lang;
pub mod strings;

/// Represent the numeric category used by semantic policy.
///
/// This is not a concrete runtime type. It exists to describe "int-like" and "float-like" behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTy {
    Int,
    Float,
}

/// Represent a numeric operator subject to promotion/coercion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `//` (Python-style floor division): returns `Int` for `Int // Int`, otherwise `Float`.
    FloorDiv,
    Mod,
    Pow,
}

impl NumericOp {
    /// Map an operator spelling (`"+"`, `"//"`, `"+="`) to its numeric operator.
    ///
    /// Augmented spellings resolve to the underlying binary operator.
    pub fn from_spelling(op: &str) -> Option<NumericOp> {
        match op.strip_suffix('=').filter(|base| !base.is_empty()).unwrap_or(op) {
            "+" => Some(NumericOp::Add),
            "-" => Some(NumericOp::Sub),
            "*" => Some(NumericOp::Mul),
            "/" => Some(NumericOp::Div),
            "//" => Some(NumericOp::FloorDiv),
            "%" => Some(NumericOp::Mod),
            "**" => Some(NumericOp::Pow),
            _ => None,
        }
    }
}

/// Classify the exponent for `**` so policy can decide `Int` vs `Float` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowExponentKind {
    /// A non-negative integer (e.g., `2`, `0`)
    NonNegativeInt,
    /// A negative integer (e.g., `-1`)
    NegativeInt,
    /// A float
    Float,
}

impl PowExponentKind {
    /// Classify a `**` exponent from its runtime value.
    ///
    /// ## Parameters
    /// - `rhs_is_float`: whether the exponent is a float.
    /// - `rhs_int`: the exponent's integer value, when it is an int.
    pub fn classify(rhs_is_float: bool, rhs_int: Option<i64>) -> Self {
        match (rhs_is_float, rhs_int) {
            (false, Some(val)) if val >= 0 => PowExponentKind::NonNegativeInt,
            (false, Some(_)) => PowExponentKind::NegativeInt,
            _ => PowExponentKind::Float,
        }
    }
}

/// Determine the numeric result category for a binary operation.
///
/// ## Parameters
/// - `op`: the numeric operator.
/// - `lhs`: numeric category of the left operand.
/// - `rhs`: numeric category of the right operand.
/// - `pow_exp_kind`: exponent classification for `Pow` (`**`) operations.
///
/// ## Returns
/// - (`NumericTy`): `Int` or `Float` per the Python-like numeric policy.
///
/// ## Notes
/// - `/` always yields `Float` (even `Int / Int`).
/// - `//`, `%`, `+`, `-`, `*` yield `Float` if either operand is `Float`, otherwise `Int`.
/// - `**` yields `Int` only for `Int ** Int` with a non-negative exponent; otherwise `Float`.
///
/// ## Examples
/// ```rust
/// use witness_core::{result_numeric_type, NumericOp, NumericTy, PowExponentKind};
/// assert_eq!(result_numeric_type(NumericOp::Div, NumericTy::Int, NumericTy::Int, None), NumericTy::Float);
/// assert_eq!(
///     result_numeric_type(NumericOp::Pow, NumericTy::Int, NumericTy::Int, Some(PowExponentKind::NonNegativeInt)),
///     NumericTy::Int
/// );
/// ```
pub fn result_numeric_type(
    op: NumericOp,
    lhs: NumericTy,
    rhs: NumericTy,
    pow_exp_kind: Option<PowExponentKind>,
) -> NumericTy {
    match op {
        NumericOp::Div => NumericTy::Float,

        NumericOp::FloorDiv | NumericOp::Mod | NumericOp::Add | NumericOp::Sub | NumericOp::Mul => {
            if lhs == NumericTy::Float || rhs == NumericTy::Float {
                NumericTy::Float
            } else {
                NumericTy::Int
            }
        }

        NumericOp::Pow => {
            // Int result only when: both operands Int AND exponent is non-negative
            if lhs == NumericTy::Int && rhs == NumericTy::Int {
                match pow_exp_kind {
                    Some(PowExponentKind::NonNegativeInt) => NumericTy::Int,
                    _ => NumericTy::Float,
                }
            } else {
                NumericTy::Float
            }
        }
    }
}

// =====================================================================
// Runtime-facing numeric helpers (pure)
// =====================================================================

/// Python-like modulo for integers (sign of divisor).
///
/// ## Parameters
/// - `a`: dividend
/// - `b`: divisor (must be non-zero)
///
/// ## Returns
/// - (`i64`): remainder with the sign of the divisor.
#[inline]
pub fn py_mod_i64_impl(a: i64, b: i64) -> i64 {
    debug_assert!(b != 0);
    // `wrapping_rem` keeps `i64::MIN % -1` from overflowing.
    let r = a.wrapping_rem(b);
    if (r > 0 && b < 0) || (r < 0 && b > 0) { r + b } else { r }
}

/// Python-like floor division for integers (rounds toward negative infinity).
///
/// ## Returns
/// - `None` when the quotient overflows (`i64::MIN // -1`).
#[inline]
pub fn py_floor_div_i64_impl(a: i64, b: i64) -> Option<i64> {
    debug_assert!(b != 0);
    let q = a.checked_div(b)?;
    let r = a.wrapping_rem(b);
    if (r > 0 && b < 0) || (r < 0 && b > 0) { q.checked_sub(1) } else { Some(q) }
}

/// Python-like modulo for floats (sign of divisor).
#[inline]
pub fn py_mod_f64_impl(a: f64, b: f64) -> f64 {
    debug_assert!(b != 0.0);
    let r = a % b;
    if (r > 0.0 && b < 0.0) || (r < 0.0 && b > 0.0) {
        r + b
    } else {
        r
    }
}

/// Python-like floor division for floats.
#[inline]
pub fn py_floor_div_f64_impl(a: f64, b: f64) -> f64 {
    debug_assert!(b != 0.0);
    (a / b).floor()
}
