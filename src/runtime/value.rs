//! Runtime values and their Python-style rendering.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use witness_core::strings::repr_str;
use witness_syntax::Node;

use super::builtins::{self, BuiltinId, MethodId, ModuleId};
use super::exception::{ExcClass, ExcInstance, Exception, type_error};
use super::namespace::Namespace;

/// A value manipulated by a running program.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    Dict(Rc<RefCell<Dict>>),
    Function(Rc<Function>),
    Builtin(BuiltinId),
    Method(Rc<BoundMethod>),
    Class(ExcClass),
    Instance(Rc<ExcInstance>),
    /// What `globals()` and `locals()` return.
    Namespace(Namespace),
    /// The object bound to the instrumentation identifier.
    Hook,
    /// A module bound by `import`.
    Module(ModuleId),
}

/// A user function created by `def`.
#[derive(Debug)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// The `suite` node of the definition.
    pub body: Node,
    /// Globals of the defining module.
    pub globals: Namespace,
    pub filename: Rc<str>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    /// Evaluated once, when the `def` statement runs.
    pub default: Option<Value>,
}

/// A builtin method together with the object it was looked up on.
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Value,
    pub method: MethodId,
}

/// An insertion-ordered dictionary keyed by hashable values.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.py_eq(key))
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), Exception> {
        key.check_hashable()?;
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Value {
        Value::Str(text.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(items.into())
    }

    pub fn dict(dict: Dict) -> Value {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }

    /// The Python type name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin_function_or_method",
            Value::Method(_) => "builtin_function_or_method",
            Value::Class(_) => "type",
            Value::Instance(instance) => instance.class.name(),
            Value::Namespace(_) => "namespace",
            Value::Hook => "hook",
            Value::Module(_) => "module",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Namespace(ns) => !ns.is_empty(),
            _ => true,
        }
    }

    /// `str(value)`.
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            Value::Instance(instance) => instance.message(),
            _ => self.repr(),
        }
    }

    /// `repr(value)`.
    pub fn repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => repr_str(s),
            Value::List(items) => format!("[{}]", join_reprs(&items.borrow())),
            Value::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Value::Tuple(items) => format!("({})", join_reprs(items)),
            Value::Dict(dict) => {
                let entries: Vec<String> = dict
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Function(function) => format!("<function {}>", function.name),
            Value::Builtin(id) => format!("<built-in function {}>", builtins::name(*id)),
            Value::Method(bound) => format!(
                "<built-in method {} of {} object>",
                builtins::method_name(bound.method),
                bound.receiver.type_name()
            ),
            Value::Class(class) => format!("<class '{}'>", class.name()),
            Value::Instance(instance) => format!("{}({})", instance.class.name(), join_reprs(&instance.args)),
            Value::Namespace(_) => "<namespace>".to_string(),
            Value::Hook => "<witness hook>".to_string(),
            Value::Module(id) => format!("<module '{}'>", builtins::module_path(*id)),
        }
    }

    /// `a == b`: numbers compare across `bool`/`int`/`float`, containers compare element-wise.
    pub fn py_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (None, None) | (Hook, Hook) => true,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => Rc::ptr_eq(a, b) || seq_eq(&a.borrow(), &b.borrow()),
            (Tuple(a), Tuple(b)) => seq_eq(a, b),
            (Dict(a), Dict(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.py_eq(w)))
            }
            (Class(a), Class(b)) => a.same(b),
            (Instance(a), Instance(b)) => Rc::ptr_eq(a, b),
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Builtin(a), Builtin(b)) => a == b,
            (Module(a), Module(b)) => a == b,
            (Namespace(a), Namespace(b)) => a.ptr_eq(b),
            (Method(a), Method(b)) => a.method == b.method && a.receiver.is_same(&b.receiver),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.eq(b),
                _ => false,
            },
        }
    }

    /// `a is b`: identity for containers and callables, equality for atoms.
    pub fn is_same(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (List(a), List(b)) => Rc::ptr_eq(a, b),
            (Tuple(a), Tuple(b)) => Rc::ptr_eq(a, b),
            (Dict(a), Dict(b)) => Rc::ptr_eq(a, b),
            (Method(a), Method(b)) => Rc::ptr_eq(a, b),
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Bool(_), _) | (_, Bool(_)) => false,
            (Int(_), Float(_)) | (Float(_), Int(_)) => false,
            _ => self.py_eq(other),
        }
    }

    /// Numeric view: `bool` and `int` as integers, `float` as float.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// An integer view for indexing and counts (`bool` counts as an integer).
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn check_hashable(&self) -> Result<(), Exception> {
        match self {
            Value::List(_) | Value::Dict(_) | Value::Namespace(_) => {
                Err(type_error(format!("unhashable type: '{}'", self.type_name())))
            }
            Value::Tuple(items) => items.iter().try_for_each(Value::check_hashable),
            _ => Ok(()),
        }
    }

    /// The items a `for` loop (or `list(x)`) walks over.
    pub fn iterate(&self) -> Result<Vec<Value>, Exception> {
        match self {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::Tuple(items) => Ok(items.to_vec()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
            Value::Dict(dict) => Ok(dict.borrow().keys().cloned().collect()),
            _ => Err(type_error(format!("'{}' object is not iterable", self.type_name()))),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// A number taken out of a `bool`, `int` or `float`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

fn seq_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y))
}

fn join_reprs(items: &[Value]) -> String {
    items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
}

/// Render a float the way Python's `repr` does: integral values keep a `.0`, very large and very
/// small magnitudes switch to exponent notation (`1e+16`, `1e-05`).
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{f:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }
    if f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rendering() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn repr_and_str() {
        let list = Value::list(vec![Value::Int(1), Value::str("a"), Value::None]);
        assert_eq!(list.repr(), "[1, 'a', None]");
        assert_eq!(Value::tuple(vec![Value::Int(1)]).repr(), "(1,)");
        assert_eq!(Value::tuple(vec![]).repr(), "()");
        assert_eq!(Value::str("it's").repr(), "\"it's\"");
        assert_eq!(Value::str("plain").to_str(), "plain");
        assert_eq!(Value::Bool(true).to_str(), "True");
    }

    #[test]
    fn dict_keeps_insertion_order() {
        let mut dict = Dict::new();
        dict.insert(Value::str("b"), Value::Int(1)).unwrap();
        dict.insert(Value::str("a"), Value::Int(2)).unwrap();
        dict.insert(Value::str("b"), Value::Int(3)).unwrap();
        assert_eq!(Value::dict(dict).repr(), "{'b': 3, 'a': 2}");
    }

    #[test]
    fn unhashable_keys_are_rejected() {
        let mut dict = Dict::new();
        let err = dict.insert(Value::list(vec![]), Value::None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: unhashable type: 'list'");
    }

    #[test]
    fn equality_crosses_numeric_types() {
        assert!(Value::Int(1).py_eq(&Value::Float(1.0)));
        assert!(Value::Bool(true).py_eq(&Value::Int(1)));
        assert!(!Value::Int(1).py_eq(&Value::str("1")));
        let a = Value::list(vec![Value::Int(1)]);
        let b = Value::list(vec![Value::Int(1)]);
        assert!(a.py_eq(&b));
        assert!(!a.is_same(&b));
        assert!(a.is_same(&a.clone()));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::str("").truthy());
        assert!(Value::list(vec![Value::None]).truthy());
        assert!(!Value::Float(0.0).truthy());
    }
}
