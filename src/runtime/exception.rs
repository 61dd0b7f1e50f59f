//! Exceptions raised by running programs, and their tracebacks.
//!
//! A runtime failure is a value, never a Rust panic: every evaluation step returns
//! `Result<_, Exception>` and `try`/`except` inspects the [`ExcClass`] of what came back.

use std::fmt::Write as _;
use std::rc::Rc;

use witness_core::lang::errors::{self, ExceptionKind};

use super::namespace::Namespace;
use super::value::Value;

/// A user-defined exception class (`class Name(Base): ...`).
#[derive(Debug)]
pub struct UserClass {
    pub name: String,
    pub bases: Vec<ExcClass>,
    /// Bindings made by the class body.
    pub attrs: Namespace,
}

/// An exception class: builtin or user-defined.
#[derive(Debug, Clone)]
pub enum ExcClass {
    Builtin(ExceptionKind),
    User(Rc<UserClass>),
}

impl ExcClass {
    pub fn name(&self) -> &str {
        match self {
            ExcClass::Builtin(kind) => errors::as_str(*kind),
            ExcClass::User(class) => &class.name,
        }
    }

    /// Class identity.
    pub fn same(&self, other: &ExcClass) -> bool {
        match (self, other) {
            (ExcClass::Builtin(a), ExcClass::Builtin(b)) => a == b,
            (ExcClass::User(a), ExcClass::User(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether `self` is `ancestor` or inherits from it.
    pub fn is_subclass(&self, ancestor: &ExcClass) -> bool {
        if self.same(ancestor) {
            return true;
        }
        match (self, ancestor) {
            (ExcClass::Builtin(kind), ExcClass::Builtin(base)) => errors::is_subclass(*kind, *base),
            (ExcClass::Builtin(_), ExcClass::User(_)) => false,
            (ExcClass::User(class), _) => class.bases.iter().any(|base| base.is_subclass(ancestor)),
        }
    }

    /// A class attribute, searching bases depth-first.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match self {
            ExcClass::Builtin(_) => None,
            ExcClass::User(class) => class
                .attrs
                .get(name)
                .or_else(|| class.bases.iter().find_map(|base| base.attribute(name))),
        }
    }
}

/// An exception instance: what `ValueError('bad')` evaluates to and what `except ... as e` binds.
#[derive(Debug)]
pub struct ExcInstance {
    pub class: ExcClass,
    pub args: Vec<Value>,
}

impl ExcInstance {
    pub fn new(class: ExcClass, args: Vec<Value>) -> Self {
        Self { class, args }
    }

    /// `str(instance)`.
    pub fn message(&self) -> String {
        match self.args.as_slice() {
            [] => String::new(),
            [only] if matches!(self.class, ExcClass::Builtin(ExceptionKind::KeyError)) => only.repr(),
            [only] => only.to_str(),
            many => Value::tuple(many.to_vec()).repr(),
        }
    }

    /// The last line of a traceback: `KindName: message`, or just `KindName`.
    pub fn summary(&self) -> String {
        let message = self.message();
        if message.is_empty() {
            self.class.name().to_string()
        } else {
            format!("{}: {}", self.class.name(), message)
        }
    }
}

/// One traceback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub filename: Rc<str>,
    pub line: Option<u32>,
    pub function: Rc<str>,
}

/// A raised exception travelling up the sandbox's call stack.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .instance.summary())]
pub struct Exception {
    pub instance: Rc<ExcInstance>,
    /// Frames from the outermost to the raising one.
    pub traceback: Vec<Frame>,
}

impl Exception {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let args = if message.is_empty() {
            Vec::new()
        } else {
            vec![Value::str(message)]
        };
        Self::from_instance(Rc::new(ExcInstance::new(ExcClass::Builtin(kind), args)))
    }

    pub fn from_instance(instance: Rc<ExcInstance>) -> Self {
        Self {
            instance,
            traceback: Vec::new(),
        }
    }

    pub fn class(&self) -> &ExcClass {
        &self.instance.class
    }

    pub fn kind_name(&self) -> &str {
        self.instance.class.name()
    }

    pub fn message(&self) -> String {
        self.instance.message()
    }

    /// Whether this exception would be caught by `except <kind>`.
    pub fn is(&self, kind: ExceptionKind) -> bool {
        self.class().is_subclass(&ExcClass::Builtin(kind))
    }

    /// Render the traceback the way the report shows it, newline-terminated:
    ///
    /// ```text
    /// Traceback (most recent call last):
    ///   File "<string>", line 1, in <module>
    /// ZeroDivisionError: integer division or modulo by zero
    /// ```
    pub fn render_traceback(&self) -> String {
        let mut out = String::from("Traceback (most recent call last):\n");
        for frame in &self.traceback {
            let line = frame.line.map_or_else(|| "?".to_string(), |n| n.to_string());
            let _ = writeln!(out, "  File \"{}\", line {}, in {}", frame.filename, line, frame.function);
        }
        out.push_str(&self.instance.summary());
        out.push('\n');
        out
    }
}

pub fn type_error(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::TypeError, message)
}

pub fn value_error(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::ValueError, message)
}

pub fn name_error(name: &str) -> Exception {
    Exception::new(ExceptionKind::NameError, format!("name '{name}' is not defined"))
}

pub fn index_error(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::IndexError, message)
}

pub fn key_error(key: &Value) -> Exception {
    let instance = ExcInstance::new(ExcClass::Builtin(ExceptionKind::KeyError), vec![key.clone()]);
    Exception::from_instance(Rc::new(instance))
}

pub fn attribute_error(value: &Value, name: &str) -> Exception {
    Exception::new(
        ExceptionKind::AttributeError,
        format!("'{}' object has no attribute '{}'", value.type_name(), name),
    )
}

pub fn import_error(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::ImportError, message)
}

pub fn zero_division(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::ZeroDivisionError, message)
}

pub fn overflow() -> Exception {
    Exception::new(ExceptionKind::OverflowError, "integer result does not fit in 64 bits")
}

pub fn runtime_error(message: impl Into<String>) -> Exception {
    Exception::new(ExceptionKind::RuntimeError, message)
}
