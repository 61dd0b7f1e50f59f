//! Builtin functions and methods of builtin objects.
//!
//! ## Notes
//! - [`BUILTINS`] and [`METHODS`] are registries in the style of `witness_core::lang`: ordered like
//!   their id enums, looked up by name.
//! - Exception classes are not listed here; names such as `ValueError` resolve through
//!   `witness_core::lang::errors`.

use std::cmp::Ordering;

use super::exception::{ExcClass, Exception, index_error, type_error, value_error};
use super::namespace::Scope;
use super::ops;
use super::value::{BoundMethod, Dict, Number, Value};
use super::{Intercept, Sandbox};

/// Stable identifier for every builtin function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinId {
    Len,
    Str,
    Repr,
    Int,
    Float,
    Bool,
    Abs,
    Min,
    Max,
    Range,
    List,
    Tuple,
    Dict,
    Sorted,
    Sum,
    IsInstance,
    Globals,
    Locals,
    Pprint,
    CatchException,
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinInfo {
    pub id: BuiltinId,
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of builtin functions, in [`BuiltinId`] declaration order.
pub const BUILTINS: &[BuiltinInfo] = &[
    builtin(BuiltinId::Len, "len", "Number of items in a str, list, tuple or dict."),
    builtin(BuiltinId::Str, "str", "Printable rendering of a value."),
    builtin(BuiltinId::Repr, "repr", "Source-like rendering of a value."),
    builtin(BuiltinId::Int, "int", "Convert a number or numeric string to int."),
    builtin(BuiltinId::Float, "float", "Convert a number or numeric string to float."),
    builtin(BuiltinId::Bool, "bool", "Truth value of a value."),
    builtin(BuiltinId::Abs, "abs", "Absolute value of a number."),
    builtin(BuiltinId::Min, "min", "Smallest item of an iterable or of the arguments."),
    builtin(BuiltinId::Max, "max", "Largest item of an iterable or of the arguments."),
    builtin(BuiltinId::Range, "range", "List of integers in an arithmetic progression."),
    builtin(BuiltinId::List, "list", "New list from an iterable."),
    builtin(BuiltinId::Tuple, "tuple", "New tuple from an iterable."),
    builtin(BuiltinId::Dict, "dict", "New dict from pairs and keyword arguments."),
    builtin(BuiltinId::Sorted, "sorted", "New sorted list from an iterable."),
    builtin(BuiltinId::Sum, "sum", "Sum of the numbers of an iterable."),
    builtin(BuiltinId::IsInstance, "isinstance", "Whether a value is an instance of a class."),
    builtin(BuiltinId::Globals, "globals", "The current global namespace."),
    builtin(BuiltinId::Locals, "locals", "The current local namespace."),
    builtin(BuiltinId::Pprint, "pprint", "Write repr(value) and a newline to standard output."),
    builtin(
        BuiltinId::CatchException,
        "catch_exception",
        "Call a function; return the class of the exception it raised, or None.",
    ),
];

const fn builtin(id: BuiltinId, name: &'static str, description: &'static str) -> BuiltinInfo {
    BuiltinInfo { id, name, description }
}

pub fn info_for(id: BuiltinId) -> &'static BuiltinInfo {
    &BUILTINS[id as usize]
}

pub fn name(id: BuiltinId) -> &'static str {
    info_for(id).name
}

pub fn from_str(name: &str) -> Option<BuiltinId> {
    BUILTINS.iter().find(|b| b.name == name).map(|b| b.id)
}

/// Which kind of object a method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    List,
    Dict,
    Str,
    Hook,
}

/// Stable identifier for every builtin method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodId {
    Append,
    Extend,
    Pop,
    Get,
    Keys,
    Values,
    Items,
    Upper,
    Lower,
    Strip,
    Split,
    Join,
    Replace,
    StartsWith,
    EndsWith,
    Intercept,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodInfo {
    pub id: MethodId,
    pub name: &'static str,
    pub receiver: Receiver,
}

/// Registry of builtin methods, in [`MethodId`] declaration order.
pub const METHODS: &[MethodInfo] = &[
    method(MethodId::Append, "append", Receiver::List),
    method(MethodId::Extend, "extend", Receiver::List),
    method(MethodId::Pop, "pop", Receiver::List),
    method(MethodId::Get, "get", Receiver::Dict),
    method(MethodId::Keys, "keys", Receiver::Dict),
    method(MethodId::Values, "values", Receiver::Dict),
    method(MethodId::Items, "items", Receiver::Dict),
    method(MethodId::Upper, "upper", Receiver::Str),
    method(MethodId::Lower, "lower", Receiver::Str),
    method(MethodId::Strip, "strip", Receiver::Str),
    method(MethodId::Split, "split", Receiver::Str),
    method(MethodId::Join, "join", Receiver::Str),
    method(MethodId::Replace, "replace", Receiver::Str),
    method(MethodId::StartsWith, "startswith", Receiver::Str),
    method(MethodId::EndsWith, "endswith", Receiver::Str),
    method(MethodId::Intercept, "intercept", Receiver::Hook),
];

const fn method(id: MethodId, name: &'static str, receiver: Receiver) -> MethodInfo {
    MethodInfo { id, name, receiver }
}

pub fn method_name(id: MethodId) -> &'static str {
    METHODS[id as usize].name
}

/// Find a method by name on a value.
pub fn lookup_method(value: &Value, name: &str) -> Option<MethodId> {
    let receiver = match value {
        Value::List(_) => Receiver::List,
        Value::Dict(_) => Receiver::Dict,
        Value::Str(_) => Receiver::Str,
        Value::Hook => Receiver::Hook,
        _ => return None,
    };
    METHODS
        .iter()
        .find(|m| m.receiver == receiver && m.name == name)
        .map(|m| m.id)
}

/// Stable identifier for every importable module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    Pprint,
    Witness,
    Utils,
    /// Older test scripts import the utilities as `from pytest import utils`.
    Pytest,
}

/// What a module attribute resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    Builtin(BuiltinId),
    Module(ModuleId),
}

impl From<Export> for Value {
    fn from(export: Export) -> Self {
        match export {
            Export::Builtin(id) => Value::Builtin(id),
            Export::Module(id) => Value::Module(id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    pub id: ModuleId,
    /// Full dotted path; only dot-free paths can be imported directly.
    pub path: &'static str,
    pub exports: &'static [(&'static str, Export)],
}

/// Registry of importable modules, in [`ModuleId`] declaration order.
pub const MODULES: &[ModuleInfo] = &[
    module(ModuleId::Pprint, "pprint", &[("pprint", Export::Builtin(BuiltinId::Pprint))]),
    module(ModuleId::Witness, "witness", &[("utils", Export::Module(ModuleId::Utils))]),
    module(
        ModuleId::Utils,
        "witness.utils",
        &[
            ("catchException", Export::Builtin(BuiltinId::CatchException)),
            ("catch_exception", Export::Builtin(BuiltinId::CatchException)),
        ],
    ),
    module(ModuleId::Pytest, "pytest", &[("utils", Export::Module(ModuleId::Utils))]),
];

const fn module(id: ModuleId, path: &'static str, exports: &'static [(&'static str, Export)]) -> ModuleInfo {
    ModuleInfo { id, path, exports }
}

pub fn module_path(id: ModuleId) -> &'static str {
    MODULES[id as usize].path
}

/// Look up `name` among a module's attributes.
pub fn module_export(id: ModuleId, name: &str) -> Option<Export> {
    MODULES[id as usize]
        .exports
        .iter()
        .find(|(export, _)| *export == name)
        .map(|(_, export)| *export)
}

/// Resolve a dotted import path: the first segment names a top-level module, each later segment
/// a submodule attribute.
pub fn resolve_module(path: &[&str]) -> Option<ModuleId> {
    let (first, rest) = path.split_first()?;
    let mut id = MODULES.iter().find(|m| m.path == *first)?.id;
    for segment in rest {
        match module_export(id, segment)? {
            Export::Module(next) => id = next,
            Export::Builtin(_) => return None,
        }
    }
    Some(id)
}

type Kwargs = Vec<(String, Value)>;

fn no_kwargs(name: &str, kwargs: &Kwargs) -> Result<(), Exception> {
    match kwargs.first() {
        Some((key, _)) => Err(type_error(format!("{name}() got an unexpected keyword argument '{key}'"))),
        None => Ok(()),
    }
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), Exception> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = if min == max {
        format!("exactly {min}")
    } else if args.len() < min {
        format!("at least {min}")
    } else {
        format!("at most {max}")
    };
    let plural = if expected.ends_with(" 1") { "" } else { "s" };
    Err(type_error(format!(
        "{}() takes {} argument{} ({} given)",
        name,
        expected,
        plural,
        args.len()
    )))
}

impl Sandbox<'_> {
    /// Call a builtin function.
    pub(crate) fn call_builtin(
        &mut self,
        id: BuiltinId,
        scope: &Scope,
        args: Vec<Value>,
        kwargs: Kwargs,
    ) -> Result<Value, Exception> {
        let fname = name(id);
        if !matches!(id, BuiltinId::Dict | BuiltinId::CatchException | BuiltinId::Sum) {
            no_kwargs(fname, &kwargs)?;
        }
        match id {
            BuiltinId::Len => {
                arity(fname, &args, 1, 1)?;
                length(&args[0]).map(Value::Int)
            }
            BuiltinId::Str => {
                arity(fname, &args, 0, 1)?;
                Ok(Value::str(args.first().map(Value::to_str).unwrap_or_default()))
            }
            BuiltinId::Repr => {
                arity(fname, &args, 1, 1)?;
                Ok(Value::str(args[0].repr()))
            }
            BuiltinId::Int => {
                arity(fname, &args, 0, 1)?;
                args.first().map_or(Ok(Value::Int(0)), to_int)
            }
            BuiltinId::Float => {
                arity(fname, &args, 0, 1)?;
                args.first().map_or(Ok(Value::Float(0.0)), to_float)
            }
            BuiltinId::Bool => {
                arity(fname, &args, 0, 1)?;
                Ok(Value::Bool(args.first().is_some_and(Value::truthy)))
            }
            BuiltinId::Abs => {
                arity(fname, &args, 1, 1)?;
                match args[0].as_number() {
                    Some(Number::Int(i)) => i.checked_abs().map(Value::Int).ok_or_else(super::exception::overflow),
                    Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
                    None => Err(type_error(format!(
                        "bad operand type for abs(): '{}'",
                        args[0].type_name()
                    ))),
                }
            }
            BuiltinId::Min => extremum(fname, args, Ordering::Less),
            BuiltinId::Max => extremum(fname, args, Ordering::Greater),
            BuiltinId::Range => range(&args),
            BuiltinId::List => {
                arity(fname, &args, 0, 1)?;
                let items = args.first().map_or(Ok(Vec::new()), Value::iterate)?;
                Ok(Value::list(items))
            }
            BuiltinId::Tuple => {
                arity(fname, &args, 0, 1)?;
                let items = args.first().map_or(Ok(Vec::new()), Value::iterate)?;
                Ok(Value::tuple(items))
            }
            BuiltinId::Dict => {
                arity(fname, &args, 0, 1)?;
                let mut dict = Dict::new();
                if let Some(source) = args.first() {
                    fill_dict(&mut dict, source)?;
                }
                for (key, value) in kwargs {
                    dict.insert(Value::str(key), value)?;
                }
                Ok(Value::dict(dict))
            }
            BuiltinId::Sorted => {
                arity(fname, &args, 1, 1)?;
                let mut items = args[0].iterate()?;
                sort_values(&mut items)?;
                Ok(Value::list(items))
            }
            BuiltinId::Sum => {
                arity(fname, &args, 1, 2)?;
                let mut total = args.get(1).cloned().unwrap_or(Value::Int(0));
                for (key, value) in kwargs {
                    if key != "start" {
                        return Err(type_error(format!("sum() got an unexpected keyword argument '{key}'")));
                    }
                    total = value;
                }
                if matches!(total, Value::Str(_)) {
                    return Err(type_error("sum() can't sum strings [use ''.join(seq) instead]"));
                }
                for item in args[0].iterate()? {
                    total = ops::binary("+", &total, &item)?;
                }
                Ok(total)
            }
            BuiltinId::IsInstance => {
                arity(fname, &args, 2, 2)?;
                is_instance(&args[0], &args[1]).map(Value::Bool)
            }
            BuiltinId::Globals => {
                arity(fname, &args, 0, 0)?;
                Ok(Value::Namespace(scope.globals.clone()))
            }
            BuiltinId::Locals => {
                arity(fname, &args, 0, 0)?;
                Ok(Value::Namespace(scope.locals.clone()))
            }
            BuiltinId::Pprint => {
                arity(fname, &args, 1, 1)?;
                self.write_stdout(&format!("{}\n", args[0].repr()));
                Ok(Value::None)
            }
            BuiltinId::CatchException => {
                let mut args = args.into_iter();
                let Some(function) = args.next() else {
                    return Err(type_error("catch_exception() takes at least 1 argument (0 given)"));
                };
                match self.call_value(&function, scope, args.collect(), kwargs) {
                    Ok(_) => Ok(Value::None),
                    Err(exc) => Ok(Value::Class(exc.class().clone())),
                }
            }
        }
    }

    /// Call a bound builtin method.
    pub(crate) fn call_method(&mut self, bound: &BoundMethod, args: Vec<Value>, kwargs: Kwargs) -> Result<Value, Exception> {
        let mname = method_name(bound.method);
        if bound.method == MethodId::Intercept {
            let call = Intercept::from_args(args, kwargs)?;
            return self.dispatch_hook(call).map(|()| Value::None);
        }
        no_kwargs(mname, &kwargs)?;
        match (&bound.receiver, bound.method) {
            (Value::List(items), MethodId::Append) => {
                arity(mname, &args, 1, 1)?;
                items.borrow_mut().extend(args);
                Ok(Value::None)
            }
            (Value::List(items), MethodId::Extend) => {
                arity(mname, &args, 1, 1)?;
                let extra = args[0].iterate()?;
                items.borrow_mut().extend(extra);
                Ok(Value::None)
            }
            (Value::List(items), MethodId::Pop) => {
                arity(mname, &args, 0, 1)?;
                let mut items = items.borrow_mut();
                if items.is_empty() {
                    return Err(index_error("pop from empty list"));
                }
                let index = match args.first() {
                    Some(v) => v.as_index().ok_or_else(|| type_error("an integer is required"))?,
                    None => -1,
                };
                let position = witness_core::strings::normalize_index(items.len(), index)
                    .ok_or_else(|| index_error("pop index out of range"))?;
                Ok(items.remove(position))
            }
            (Value::Dict(dict), MethodId::Get) => {
                arity(mname, &args, 1, 2)?;
                let dict = dict.borrow();
                Ok(dict
                    .get(&args[0])
                    .cloned()
                    .unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
            }
            (Value::Dict(dict), MethodId::Keys) => {
                arity(mname, &args, 0, 0)?;
                Ok(Value::list(dict.borrow().keys().cloned().collect()))
            }
            (Value::Dict(dict), MethodId::Values) => {
                arity(mname, &args, 0, 0)?;
                Ok(Value::list(dict.borrow().values().cloned().collect()))
            }
            (Value::Dict(dict), MethodId::Items) => {
                arity(mname, &args, 0, 0)?;
                let pairs = dict
                    .borrow()
                    .iter()
                    .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                    .collect();
                Ok(Value::list(pairs))
            }
            (Value::Str(s), _) => string_method(s, bound.method, mname, &args),
            (receiver, _) => Err(type_error(format!(
                "descriptor '{}' does not apply to a '{}' object",
                mname,
                receiver.type_name()
            ))),
        }
    }
}

fn string_method(s: &str, id: MethodId, mname: &str, args: &[Value]) -> Result<Value, Exception> {
    let text_arg = |i: usize| match args.get(i) {
        Some(Value::Str(t)) => Ok(t.clone()),
        Some(other) => Err(type_error(format!(
            "{}() argument {} must be str, not {}",
            mname,
            i + 1,
            other.type_name()
        ))),
        None => Err(type_error(format!("{mname}() missing argument {}", i + 1))),
    };
    match id {
        MethodId::Upper => {
            arity(mname, args, 0, 0)?;
            Ok(Value::str(s.to_uppercase()))
        }
        MethodId::Lower => {
            arity(mname, args, 0, 0)?;
            Ok(Value::str(s.to_lowercase()))
        }
        MethodId::Strip => {
            arity(mname, args, 0, 1)?;
            if args.is_empty() || matches!(args[0], Value::None) {
                return Ok(Value::str(s.trim()));
            }
            let chars = text_arg(0)?;
            Ok(Value::str(s.trim_matches(|c| chars.contains(c))))
        }
        MethodId::Split => {
            arity(mname, args, 0, 1)?;
            let parts: Vec<Value> = if args.is_empty() || matches!(args[0], Value::None) {
                s.split_whitespace().map(Value::str).collect()
            } else {
                let sep = text_arg(0)?;
                if sep.is_empty() {
                    return Err(value_error("empty separator"));
                }
                s.split(&*sep).map(Value::str).collect()
            };
            Ok(Value::list(parts))
        }
        MethodId::Join => {
            arity(mname, args, 1, 1)?;
            let mut pieces = Vec::new();
            for (i, item) in args[0].iterate()?.into_iter().enumerate() {
                match item {
                    Value::Str(piece) => pieces.push(piece.to_string()),
                    other => {
                        return Err(type_error(format!(
                            "sequence item {}: expected str instance, {} found",
                            i,
                            other.type_name()
                        )));
                    }
                }
            }
            Ok(Value::str(pieces.join(s)))
        }
        MethodId::Replace => {
            arity(mname, args, 2, 2)?;
            let (old, new) = (text_arg(0)?, text_arg(1)?);
            Ok(Value::str(s.replace(&*old, &new)))
        }
        MethodId::StartsWith => {
            arity(mname, args, 1, 1)?;
            Ok(Value::Bool(s.starts_with(&*text_arg(0)?)))
        }
        MethodId::EndsWith => {
            arity(mname, args, 1, 1)?;
            Ok(Value::Bool(s.ends_with(&*text_arg(0)?)))
        }
        _ => Err(type_error(format!("'str' object has no method '{mname}'"))),
    }
}

/// `len(value)`.
pub fn length(value: &Value) -> Result<i64, Exception> {
    let n = match value {
        Value::Str(s) => witness_core::strings::str_len(s),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(dict) => dict.borrow().len(),
        Value::Namespace(ns) => ns.len(),
        other => {
            return Err(type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )));
        }
    };
    i64::try_from(n).map_err(|_| super::exception::overflow())
}

fn to_int(value: &Value) -> Result<Value, Exception> {
    match value {
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) if f.is_finite() => {
            let truncated = f.trunc();
            if truncated.abs() >= 9.223_372_036_854_776e18 {
                return Err(super::exception::overflow());
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Float(_) => Err(value_error("cannot convert float NaN or infinity to integer")),
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| value_error(format!("invalid literal for int() with base 10: {}", value.repr()))),
        other => Err(type_error(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn to_float(value: &Value) -> Result<Value, Exception> {
    match value.as_number() {
        Some(number) => Ok(Value::Float(number.to_f64())),
        None => match value {
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| value_error(format!("could not convert string to float: {}", value.repr()))),
            other => Err(type_error(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))),
        },
    }
}

fn extremum(fname: &str, args: Vec<Value>, wanted: Ordering) -> Result<Value, Exception> {
    let items = match args.len() {
        0 => return Err(type_error(format!("{fname} expected 1 arguments, got 0"))),
        1 => args[0].iterate()?,
        _ => args,
    };
    let mut best: Option<Value> = None;
    for item in items {
        best = Some(match best {
            None => item,
            Some(current) => {
                if ops::order(&item, &current, "<")? == Some(wanted) {
                    item
                } else {
                    current
                }
            }
        });
    }
    best.ok_or_else(|| value_error(format!("{fname}() arg is an empty sequence")))
}

fn range(args: &[Value]) -> Result<Value, Exception> {
    arity("range", args, 1, 3)?;
    let mut ints = Vec::with_capacity(args.len());
    for arg in args {
        ints.push(arg.as_index().ok_or_else(|| {
            type_error(format!("range() integer argument expected, got {}", arg.type_name()))
        })?);
    }
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(type_error("range expected at most 3 arguments")),
    };
    if step == 0 {
        return Err(value_error("range() step argument must not be zero"));
    }
    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Int(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(Value::list(items))
}

fn fill_dict(dict: &mut Dict, source: &Value) -> Result<(), Exception> {
    if let Value::Dict(other) = source {
        for (k, v) in other.borrow().iter() {
            dict.insert(k.clone(), v.clone())?;
        }
        return Ok(());
    }
    for (i, pair) in source.iterate()?.into_iter().enumerate() {
        match pair.iterate()?.as_slice() {
            [key, value] => dict.insert(key.clone(), value.clone())?,
            items => {
                return Err(value_error(format!(
                    "dictionary update sequence element #{} has length {}; 2 is required",
                    i,
                    items.len()
                )));
            }
        }
    }
    Ok(())
}

/// Stable sort with the `<` ordering; incomparable items raise `TypeError`.
pub fn sort_values(items: &mut [Value]) -> Result<(), Exception> {
    let mut failure = None;
    items.sort_by(|a, b| match ops::order(a, b, "<") {
        Ok(ordering) => ordering.unwrap_or(Ordering::Equal),
        Err(exc) => {
            failure.get_or_insert(exc);
            Ordering::Equal
        }
    });
    failure.map_or(Ok(()), Err)
}

fn is_instance(value: &Value, class: &Value) -> Result<bool, Exception> {
    match class {
        Value::Tuple(classes) => {
            for candidate in classes.iter() {
                if is_instance(value, candidate)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Value::Class(class) => Ok(match value {
            Value::Instance(instance) => instance.class.is_subclass(class),
            _ => false,
        }),
        Value::Builtin(id) => Ok(match id {
            BuiltinId::Int => matches!(value, Value::Int(_) | Value::Bool(_)),
            BuiltinId::Float => matches!(value, Value::Float(_)),
            BuiltinId::Bool => matches!(value, Value::Bool(_)),
            BuiltinId::Str => matches!(value, Value::Str(_)),
            BuiltinId::List => matches!(value, Value::List(_)),
            BuiltinId::Tuple => matches!(value, Value::Tuple(_)),
            BuiltinId::Dict => matches!(value, Value::Dict(_)),
            _ => return Err(type_error("isinstance() arg 2 must be a class or tuple of classes")),
        }),
        _ => Err(type_error("isinstance() arg 2 must be a class or tuple of classes")),
    }
}

/// A builtin exception class by name.
pub fn exception_class(name: &str) -> Option<Value> {
    witness_core::lang::errors::from_str(name).map(|kind| Value::Class(ExcClass::Builtin(kind)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use witness_core::lang::errors::ExceptionKind;

    #[test]
    fn tables_are_ordered_like_the_enums() {
        for (index, info) in BUILTINS.iter().enumerate() {
            assert_eq!(info.id as usize, index);
        }
        for (index, info) in METHODS.iter().enumerate() {
            assert_eq!(info.id as usize, index);
        }
        for (index, info) in MODULES.iter().enumerate() {
            assert_eq!(info.id as usize, index);
        }
    }

    #[test]
    fn module_paths_resolve_through_submodules() {
        assert_eq!(resolve_module(&["pprint"]), Some(ModuleId::Pprint));
        assert_eq!(resolve_module(&["witness", "utils"]), Some(ModuleId::Utils));
        assert_eq!(resolve_module(&["pytest", "utils"]), Some(ModuleId::Utils));
        assert_eq!(resolve_module(&["witness.utils"]), None);
        assert_eq!(resolve_module(&["pprint", "pprint"]), None);
        assert_eq!(resolve_module(&[]), None);
        assert_eq!(
            module_export(ModuleId::Utils, "catchException"),
            Some(Export::Builtin(BuiltinId::CatchException))
        );
    }

    #[test]
    fn lookup() {
        assert_eq!(from_str("catch_exception"), Some(BuiltinId::CatchException));
        assert_eq!(from_str("print"), None);
        assert_eq!(lookup_method(&Value::str("x"), "upper"), Some(MethodId::Upper));
        assert_eq!(lookup_method(&Value::str("x"), "append"), None);
        assert_eq!(lookup_method(&Value::Hook, "intercept"), Some(MethodId::Intercept));
    }

    #[test]
    fn conversions() {
        assert!(matches!(to_int(&Value::str(" 42 ")), Ok(Value::Int(42))));
        assert!(matches!(to_int(&Value::Float(-2.7)), Ok(Value::Int(-2))));
        let err = to_int(&Value::str("x")).unwrap_err();
        assert_eq!(err.to_string(), "ValueError: invalid literal for int() with base 10: 'x'");
        assert!(matches!(to_float(&Value::Int(3)), Ok(Value::Float(f)) if f == 3.0));
    }

    #[test]
    fn ranges() {
        assert_eq!(range(&[Value::Int(3)]).unwrap().repr(), "[0, 1, 2]");
        assert_eq!(range(&[Value::Int(5), Value::Int(0), Value::Int(-2)]).unwrap().repr(), "[5, 3, 1]");
        assert!(range(&[Value::Int(1), Value::Int(2), Value::Int(0)]).is_err());
    }

    #[test]
    fn sorting_and_extremes() {
        let mut items = vec![Value::Int(3), Value::Float(1.5), Value::Int(2)];
        sort_values(&mut items).unwrap();
        assert_eq!(Value::list(items).repr(), "[1.5, 2, 3]");
        let mut mixed = vec![Value::Int(1), Value::str("a")];
        assert!(sort_values(&mut mixed).is_err());
        let max = extremum("max", vec![Value::Int(1), Value::Int(9), Value::Int(4)], Ordering::Greater).unwrap();
        assert!(matches!(max, Value::Int(9)));
        assert!(extremum("min", vec![Value::list(vec![])], Ordering::Less).is_err());
    }

    #[test]
    fn isinstance_with_classes_and_types() {
        let instance = Value::Instance(std::rc::Rc::new(super::super::exception::ExcInstance::new(
            ExcClass::Builtin(ExceptionKind::KeyError),
            vec![],
        )));
        let lookup = exception_class("LookupError").unwrap();
        assert!(is_instance(&instance, &lookup).unwrap());
        assert!(is_instance(&Value::Bool(true), &Value::Builtin(BuiltinId::Int)).unwrap());
        assert!(!is_instance(&Value::Int(1), &Value::Builtin(BuiltinId::Str)).unwrap());
    }
}
