//! Operators: arithmetic under the Python-like numeric policy, comparisons, `%` formatting.

use std::cmp::Ordering;

use witness_core::lang::errors::ExceptionKind;
use witness_core::{
    NumericOp, NumericTy, PowExponentKind, py_floor_div_f64_impl, py_floor_div_i64_impl, py_mod_f64_impl,
    py_mod_i64_impl, result_numeric_type,
};

use super::exception::{Exception, overflow, type_error, value_error, zero_division};
use super::value::{Number, Value};

const INT_DIVISION_BY_ZERO: &str = "integer division or modulo by zero";

/// Apply a binary operator spelled `op` (`"+"`, `"//"`, `"<<"`, ...).
pub fn binary(op: &str, lhs: &Value, rhs: &Value) -> Result<Value, Exception> {
    if let (Some(a), Some(b), Some(numeric)) = (lhs.as_number(), rhs.as_number(), NumericOp::from_spelling(op)) {
        return arithmetic(numeric, a, b);
    }
    match (op, lhs, rhs) {
        ("+", Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{a}{b}"))),
        ("+", Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        ("+", Value::Tuple(a), Value::Tuple(b)) => Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect())),
        ("*", seq, count) | ("*", count, seq) if count.as_index().is_some() && is_sequence(seq) => {
            repeat(seq, count.as_index().unwrap_or(0))
        }
        ("%", Value::Str(template), args) => percent_format(template, args).map(Value::str),
        ("|" | "^" | "&" | "<<" | ">>", _, _) => bitwise(op, lhs, rhs),
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

/// Apply a unary operator (`-`, `+`, `~`).
pub fn unary(op: &str, operand: &Value) -> Result<Value, Exception> {
    match (op, operand.as_number()) {
        ("-", Some(Number::Int(i))) => i.checked_neg().map(Value::Int).ok_or_else(overflow),
        ("-", Some(Number::Float(f))) => Ok(Value::Float(-f)),
        ("+", Some(number)) => Ok(number.into_value()),
        ("~", Some(Number::Int(i))) => Ok(Value::Int(!i)),
        _ => Err(type_error(format!(
            "bad operand type for unary {}: '{}'",
            op,
            operand.type_name()
        ))),
    }
}

/// Evaluate one link of a comparison chain. `op` is the joined comparison spelling
/// (`"<"`, `"not in"`, `"is not"`, `"<>"`).
pub fn compare(op: &str, lhs: &Value, rhs: &Value) -> Result<bool, Exception> {
    match op {
        "==" => Ok(lhs.py_eq(rhs)),
        "!=" | "<>" => Ok(!lhs.py_eq(rhs)),
        "is" => Ok(lhs.is_same(rhs)),
        "is not" => Ok(!lhs.is_same(rhs)),
        "in" => contains(rhs, lhs),
        "not in" => contains(rhs, lhs).map(|found| !found),
        "<" | ">" | "<=" | ">=" => {
            let Some(ordering) = order(lhs, rhs, op)? else {
                return Ok(false);
            };
            Ok(match op {
                "<" => ordering == Ordering::Less,
                ">" => ordering == Ordering::Greater,
                "<=" => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
        _ => Err(type_error(format!("unknown comparison operator '{op}'"))),
    }
}

/// Total-ish ordering used by `<` and `sorted`. `None` when a float comparison involves NaN.
pub fn order(lhs: &Value, rhs: &Value, op: &str) -> Result<Option<Ordering>, Exception> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(match (a, b) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
            (x, y) => x.to_f64().partial_cmp(&y.to_f64()),
        });
    }
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => order_seq(&a.borrow(), &b.borrow(), op),
        (Value::Tuple(a), Value::Tuple(b)) => order_seq(a, b, op),
        _ => Err(type_error(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn order_seq(a: &[Value], b: &[Value], op: &str) -> Result<Option<Ordering>, Exception> {
    for (x, y) in a.iter().zip(b) {
        if !x.py_eq(y) {
            return order(x, y, op);
        }
    }
    Ok(Some(a.len().cmp(&b.len())))
}

/// `item in container`.
pub fn contains(container: &Value, item: &Value) -> Result<bool, Exception> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(&**needle)),
            _ => Err(type_error("'in <string>' requires string as left operand")),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|v| v.py_eq(item))),
        Value::Tuple(items) => Ok(items.iter().any(|v| v.py_eq(item))),
        Value::Dict(dict) => Ok(dict.borrow().get(item).is_some()),
        Value::Namespace(ns) => Ok(matches!(item, Value::Str(name) if ns.contains(name))),
        _ => Err(type_error(format!(
            "argument of type '{}' is not iterable",
            container.type_name()
        ))),
    }
}

fn arithmetic(op: NumericOp, a: Number, b: Number) -> Result<Value, Exception> {
    let ty = |n: Number| match n {
        Number::Int(_) => NumericTy::Int,
        Number::Float(_) => NumericTy::Float,
    };
    let pow_kind = (op == NumericOp::Pow).then(|| match b {
        Number::Int(i) => PowExponentKind::classify(false, Some(i)),
        Number::Float(_) => PowExponentKind::classify(true, None),
    });
    match (result_numeric_type(op, ty(a), ty(b), pow_kind), a, b) {
        (NumericTy::Int, Number::Int(x), Number::Int(y)) => int_arithmetic(op, x, y).map(Value::Int),
        (_, Number::Int(_), Number::Int(_)) if op == NumericOp::Div && b.to_f64() == 0.0 => {
            Err(zero_division(INT_DIVISION_BY_ZERO))
        }
        _ => float_arithmetic(op, a.to_f64(), b.to_f64()).map(Value::Float),
    }
}

fn int_arithmetic(op: NumericOp, x: i64, y: i64) -> Result<i64, Exception> {
    let checked = match op {
        NumericOp::Add => x.checked_add(y),
        NumericOp::Sub => x.checked_sub(y),
        NumericOp::Mul => x.checked_mul(y),
        NumericOp::FloorDiv | NumericOp::Mod if y == 0 => return Err(zero_division(INT_DIVISION_BY_ZERO)),
        NumericOp::FloorDiv => py_floor_div_i64_impl(x, y),
        NumericOp::Mod => Some(py_mod_i64_impl(x, y)),
        NumericOp::Pow => u32::try_from(y).ok().and_then(|exp| x.checked_pow(exp)),
        // `/` always produces a float.
        NumericOp::Div => None,
    };
    checked.ok_or_else(overflow)
}

fn float_arithmetic(op: NumericOp, x: f64, y: f64) -> Result<f64, Exception> {
    match op {
        NumericOp::Add => Ok(x + y),
        NumericOp::Sub => Ok(x - y),
        NumericOp::Mul => Ok(x * y),
        NumericOp::Div | NumericOp::FloorDiv if y == 0.0 => Err(zero_division("float division by zero")),
        NumericOp::Mod if y == 0.0 => Err(zero_division("float modulo")),
        NumericOp::Div => Ok(x / y),
        NumericOp::FloorDiv => Ok(py_floor_div_f64_impl(x, y)),
        NumericOp::Mod => Ok(py_mod_f64_impl(x, y)),
        NumericOp::Pow if x == 0.0 && y < 0.0 => Err(zero_division("0.0 cannot be raised to a negative power")),
        NumericOp::Pow if x < 0.0 && y.fract() != 0.0 => {
            Err(value_error("negative number cannot be raised to a fractional power"))
        }
        NumericOp::Pow => Ok(x.powf(y)),
    }
}

fn bitwise(op: &str, lhs: &Value, rhs: &Value) -> Result<Value, Exception> {
    if let (Value::Bool(a), Value::Bool(b)) = (lhs, rhs) {
        match op {
            "|" => return Ok(Value::Bool(a | b)),
            "&" => return Ok(Value::Bool(a & b)),
            "^" => return Ok(Value::Bool(a ^ b)),
            _ => {}
        }
    }
    let (Some(a), Some(b)) = (lhs.as_index(), rhs.as_index()) else {
        return Err(unsupported(op, lhs, rhs));
    };
    let shift = || u32::try_from(b).map_err(|_| value_error("negative shift count"));
    let result = match op {
        "|" => a | b,
        "&" => a & b,
        "^" => a ^ b,
        "<<" => {
            let amount = shift()?;
            let shifted = a.checked_shl(amount).ok_or_else(overflow)?;
            if shifted >> amount != a {
                return Err(overflow());
            }
            shifted
        }
        _ => {
            let amount = shift()?;
            a >> amount.min(63)
        }
    };
    Ok(Value::Int(result))
}

fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::List(_) | Value::Tuple(_))
}

fn repeat(seq: &Value, count: i64) -> Result<Value, Exception> {
    let n = usize::try_from(count.max(0)).map_err(|_| overflow())?;
    Ok(match seq {
        Value::Str(s) => Value::str(s.repeat(n)),
        Value::List(items) => Value::list(repeat_items(&items.borrow(), n)),
        Value::Tuple(items) => Value::tuple(repeat_items(items, n)),
        _ => return Err(type_error("can't multiply sequence by non-int")),
    })
}

fn repeat_items(items: &[Value], n: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len() * n);
    for _ in 0..n {
        out.extend(items.iter().cloned());
    }
    out
}

fn unsupported(op: &str, lhs: &Value, rhs: &Value) -> Exception {
    type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        lhs.type_name(),
        rhs.type_name()
    ))
}

/// `template % args` with the conversions `%s %r %d %i %f %x %%`, optional `-`/`0` flags, width
/// and precision.
pub fn percent_format(template: &str, args: &Value) -> Result<String, Exception> {
    let values: Vec<Value> = match args {
        Value::Tuple(items) => items.to_vec(),
        other => vec![other.clone()],
    };
    let mut remaining = values.into_iter();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut left_align = false;
        let mut zero_pad = false;
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => left_align = true,
                '0' => zero_pad = true,
                _ => break,
            }
            chars.next();
        }
        let width = take_digits(&mut chars);
        let precision = if chars.peek() == Some(&'.') {
            chars.next();
            Some(take_digits(&mut chars).unwrap_or(0))
        } else {
            None
        };
        let Some(conversion) = chars.next() else {
            return Err(value_error("incomplete format"));
        };
        if conversion == '%' {
            out.push('%');
            continue;
        }
        let value = remaining
            .next()
            .ok_or_else(|| type_error("not enough arguments for format string"))?;
        let body = convert(conversion, &value, precision)?;
        let width = width.unwrap_or(0);
        let pad = width.saturating_sub(body.chars().count());
        if left_align {
            out.push_str(&body);
            out.push_str(&" ".repeat(pad));
        } else if zero_pad && matches!(conversion, 'd' | 'i' | 'f' | 'x') {
            let (sign, digits) = body.strip_prefix('-').map_or(("", body.as_str()), |rest| ("-", rest));
            out.push_str(sign);
            out.push_str(&"0".repeat(pad));
            out.push_str(digits);
        } else {
            out.push_str(&" ".repeat(pad));
            out.push_str(&body);
        }
    }

    if remaining.next().is_some() && matches!(args, Value::Tuple(_)) {
        return Err(type_error("not all arguments converted during string formatting"));
    }
    Ok(out)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }
    digits.parse().ok()
}

fn convert(conversion: char, value: &Value, precision: Option<usize>) -> Result<String, Exception> {
    let number = || {
        value
            .as_number()
            .ok_or_else(|| type_error(format!("%{} format: a number is required, not {}", conversion, value.type_name())))
    };
    match conversion {
        's' => Ok(value.to_str()),
        'r' => Ok(value.repr()),
        'd' | 'i' => Ok(match number()? {
            Number::Int(i) => i.to_string(),
            Number::Float(f) => format!("{}", f.trunc() as i64),
        }),
        'f' => Ok(format!("{:.*}", precision.unwrap_or(6), number()?.to_f64())),
        'x' => match number()? {
            Number::Int(i) if i < 0 => Ok(format!("-{:x}", i.unsigned_abs())),
            Number::Int(i) => Ok(format!("{i:x}")),
            Number::Float(_) => Err(type_error("%x format: an integer is required, not float")),
        },
        other => Err(Exception::new(
            ExceptionKind::ValueError,
            format!("unsupported format character '{other}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    #[test]
    fn division_policy() {
        assert!(matches!(binary("/", &int(7), &int(2)), Ok(Value::Float(f)) if f == 3.5));
        assert!(matches!(binary("//", &int(-7), &int(2)), Ok(Value::Int(-4))));
        assert!(matches!(binary("%", &int(-7), &int(2)), Ok(Value::Int(1))));
        assert!(matches!(binary("**", &int(2), &int(10)), Ok(Value::Int(1024))));
        assert!(matches!(binary("**", &int(2), &int(-1)), Ok(Value::Float(f)) if f == 0.5));
    }

    #[test]
    fn division_by_zero() {
        let err = binary("/", &int(1), &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "ZeroDivisionError: integer division or modulo by zero");
        let err = binary("%", &Value::Float(1.0), &int(0)).unwrap_err();
        assert!(err.is(ExceptionKind::ArithmeticError));
    }

    #[test]
    fn overflow_is_an_exception() {
        let err = binary("*", &int(i64::MAX), &int(2)).unwrap_err();
        assert!(err.is(ExceptionKind::OverflowError));
        assert!(unary("-", &int(i64::MIN)).is_err());
    }

    #[test]
    fn sequences() {
        assert_eq!(binary("+", &Value::str("ab"), &Value::str("c")).unwrap().to_str(), "abc");
        assert_eq!(binary("*", &int(2), &Value::str("ab")).unwrap().to_str(), "abab");
        let doubled = binary("*", &Value::list(vec![int(1)]), &int(2)).unwrap();
        assert_eq!(doubled.repr(), "[1, 1]");
        assert!(binary("+", &Value::str("a"), &int(1)).is_err());
    }

    #[test]
    fn comparisons() {
        assert!(compare("<", &int(1), &Value::Float(1.5)).unwrap());
        assert!(compare("not in", &int(3), &Value::list(vec![int(1)])).unwrap());
        assert!(compare("in", &Value::str("ell"), &Value::str("hello")).unwrap());
        assert!(compare("<>", &int(1), &int(2)).unwrap());
        assert!(compare("is", &Value::None, &Value::None).unwrap());
        assert!(compare("<", &Value::tuple(vec![int(1), int(2)]), &Value::tuple(vec![int(1), int(3)])).unwrap());
        assert!(compare("<", &int(1), &Value::str("a")).is_err());
    }

    #[test]
    fn percent_formatting() {
        let args = Value::tuple(vec![Value::str("x"), int(5), Value::Float(2.5)]);
        assert_eq!(percent_format("%s=%03d (%.2f) 100%%", &args).unwrap(), "x=005 (2.50) 100%");
        assert_eq!(percent_format("[%-4s]", &Value::str("ab")).unwrap(), "[ab  ]");
        assert_eq!(percent_format("%r", &Value::str("q")).unwrap(), "'q'");
        assert!(percent_format("%s %s", &Value::str("one")).is_err());
        assert!(percent_format("%s", &Value::tuple(vec![int(1), int(2)])).is_err());
    }
}
