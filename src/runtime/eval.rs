//! Expression evaluation and assignment targets.
//!
//! `eval` first collapses single-child chains (`test -> or_test -> ... -> atom -> NAME`), so each
//! level below only sees nodes where an operator or a bracket actually appears.

use std::rc::Rc;

use witness_core::lang::symbols::{self, SymbolId};
use witness_core::lang::tokens::TokenId;
use witness_core::strings::{self, decode_literal};
use witness_syntax::{Leaf, Node};

use super::builtins::{self, exception_class, lookup_method};
use super::exception::{
    Exception, attribute_error, index_error, key_error, name_error, runtime_error, type_error, value_error,
};
use super::namespace::Scope;
use super::ops;
use super::value::{BoundMethod, Dict, Value};
use super::Sandbox;

type Kwargs = Vec<(String, Value)>;

/// The `index`-th child of a parser-built node.
pub(crate) fn part(node: &Node, index: usize) -> Result<&Node, Exception> {
    node.child(index).ok_or_else(|| {
        runtime_error(format!(
            "malformed {} node: missing child {index}",
            node.kind().name()
        ))
    })
}

/// Text of a leaf child, or `""` for interior nodes.
pub(crate) fn spelling(node: &Node) -> &str {
    node.text().unwrap_or_default()
}

/// The operand children of a comma-separated list node (`testlist`, `exprlist`, `listmaker`).
pub(crate) fn items(node: &Node) -> impl Iterator<Item = &Node> {
    node.children().iter().filter(|child| !child.is(TokenId::Comma))
}

impl Sandbox<'_> {
    /// Evaluate an expression node.
    pub(crate) fn eval(&mut self, node: &Node, scope: &Scope) -> Result<Value, Exception> {
        let node = node.collapse();
        let Some(symbol) = node.symbol() else {
            return match node.as_leaf() {
                Some(leaf) => self.eval_leaf(leaf, scope),
                None => Err(runtime_error("expected an expression")),
            };
        };
        match symbol {
            SymbolId::EvalInput => self.eval(part(node, 0)?, scope),
            SymbolId::OrTest => self.eval_boolean(node, scope, true),
            SymbolId::AndTest => self.eval_boolean(node, scope, false),
            SymbolId::NotTest => Ok(Value::Bool(!self.eval(part(node, 1)?, scope)?.truthy())),
            SymbolId::Comparison => self.eval_comparison(node, scope),
            SymbolId::Expr
            | SymbolId::XorExpr
            | SymbolId::AndExpr
            | SymbolId::ShiftExpr
            | SymbolId::ArithExpr
            | SymbolId::Term => self.eval_binary(node, scope),
            SymbolId::Factor => {
                let operand = self.eval(part(node, 1)?, scope)?;
                ops::unary(spelling(part(node, 0)?), &operand)
            }
            SymbolId::Power => self.eval_power(node, scope),
            SymbolId::Atom => self.eval_atom(node, scope),
            SymbolId::TestList | SymbolId::ExprList | SymbolId::ListMaker => {
                let values = self.eval_items(node, scope)?;
                Ok(Value::tuple(values))
            }
            other => Err(runtime_error(format!(
                "cannot evaluate a {} node",
                symbols::as_str(other)
            ))),
        }
    }

    /// Evaluate a list node and return its values (no tuple wrapping).
    pub(crate) fn eval_items(&mut self, node: &Node, scope: &Scope) -> Result<Vec<Value>, Exception> {
        items(node).map(|item| self.eval(item, scope)).collect()
    }

    fn eval_leaf(&mut self, leaf: &Leaf, scope: &Scope) -> Result<Value, Exception> {
        match leaf.kind {
            TokenId::Name => lookup_name(&leaf.text, scope),
            TokenId::Number => parse_number(&leaf.text),
            TokenId::String => decode_literal(&leaf.text)
                .map(Value::str)
                .map_err(|_| malformed_literal(&leaf.text)),
            other => Err(runtime_error(format!(
                "unexpected token {} in expression",
                witness_core::lang::tokens::as_str(other)
            ))),
        }
    }

    /// `a or b or c` / `a and b and c`: short-circuit, yielding the deciding operand.
    fn eval_boolean(&mut self, node: &Node, scope: &Scope, is_or: bool) -> Result<Value, Exception> {
        let mut value = Value::None;
        for operand in node.children().iter().step_by(2) {
            value = self.eval(operand, scope)?;
            if value.truthy() == is_or {
                break;
            }
        }
        Ok(value)
    }

    /// `a < b <= c`: each link compares neighbours, stopping at the first false one.
    fn eval_comparison(&mut self, node: &Node, scope: &Scope) -> Result<Value, Exception> {
        let children = node.children();
        let mut left = self.eval(part(node, 0)?, scope)?;
        for pair in children[1..].chunks(2) {
            let [op, right] = pair else {
                return Err(runtime_error("malformed comparison"));
            };
            let right = self.eval(right, scope)?;
            if !ops::compare(&comparison_operator(op), &left, &right)? {
                return Ok(Value::Bool(false));
            }
            left = right;
        }
        Ok(Value::Bool(true))
    }

    fn eval_binary(&mut self, node: &Node, scope: &Scope) -> Result<Value, Exception> {
        let children = node.children();
        let mut value = self.eval(part(node, 0)?, scope)?;
        for pair in children[1..].chunks(2) {
            let [op, right] = pair else {
                return Err(runtime_error("malformed binary expression"));
            };
            let right = self.eval(right, scope)?;
            value = ops::binary(spelling(op), &value, &right)?;
        }
        Ok(value)
    }

    /// `atom trailer* ['**' factor]`
    fn eval_power(&mut self, node: &Node, scope: &Scope) -> Result<Value, Exception> {
        let children = node.children();
        let mut value = self.eval(part(node, 0)?, scope)?;
        let mut index = 1;
        while let Some(child) = children.get(index) {
            if child.is(SymbolId::Trailer) {
                value = self.apply_trailer(value, child, scope)?;
                index += 1;
            } else {
                let exponent = self.eval(part(node, index + 1)?, scope)?;
                value = ops::binary("**", &value, &exponent)?;
                index += 2;
            }
        }
        Ok(value)
    }

    fn apply_trailer(&mut self, value: Value, trailer: &Node, scope: &Scope) -> Result<Value, Exception> {
        let opener = part(trailer, 0)?;
        match opener.as_leaf().map(|leaf| leaf.kind) {
            Some(TokenId::LPar) => {
                let (args, kwargs) = match trailer.child(1).filter(|c| c.is(SymbolId::ArgList)) {
                    Some(arglist) => self.eval_arguments(arglist, scope)?,
                    None => (Vec::new(), Vec::new()),
                };
                self.call_value(&value, scope, args, kwargs)
            }
            Some(TokenId::LSqb) => {
                let subscript = part(trailer, 1)?;
                match self.eval_subscript(subscript, scope)? {
                    Subscript::Index(key) => get_item(&value, &key),
                    Subscript::Slice(lower, upper) => get_slice(&value, lower, upper),
                }
            }
            _ => get_attribute(&value, spelling(part(trailer, 1)?)),
        }
    }

    fn eval_arguments(&mut self, arglist: &Node, scope: &Scope) -> Result<(Vec<Value>, Kwargs), Exception> {
        let mut args = Vec::new();
        let mut kwargs: Kwargs = Vec::new();
        for argument in arglist.children().iter().filter(|c| c.is(SymbolId::Argument)) {
            match argument.children() {
                [value] => args.push(self.eval(value, scope)?),
                [keyword, _, value] => {
                    let name = keyword.sole_leaf().map(|leaf| leaf.text.clone()).unwrap_or_default();
                    if kwargs.iter().any(|(existing, _)| *existing == name) {
                        return Err(type_error(format!("keyword argument repeated: '{name}'")));
                    }
                    let value = self.eval(value, scope)?;
                    kwargs.push((name, value));
                }
                _ => return Err(runtime_error("malformed argument")),
            }
        }
        Ok((args, kwargs))
    }

    fn eval_subscript(&mut self, subscript: &Node, scope: &Scope) -> Result<Subscript, Exception> {
        let children = subscript.children();
        let Some(colon) = children.iter().position(|c| c.is(TokenId::Colon)) else {
            return Ok(Subscript::Index(self.eval(part(subscript, 0)?, scope)?));
        };
        let mut bound = |node: Option<&Node>| -> Result<Option<i64>, Exception> {
            let Some(node) = node else { return Ok(None) };
            match self.eval(node, scope)? {
                Value::None => Ok(None),
                value => value
                    .as_index()
                    .map(Some)
                    .ok_or_else(|| type_error("slice indices must be integers or None")),
            }
        };
        let lower = bound(children[..colon].first())?;
        let upper = bound(children.get(colon + 1))?;
        Ok(Subscript::Slice(lower, upper))
    }

    fn eval_atom(&mut self, node: &Node, scope: &Scope) -> Result<Value, Exception> {
        let children = node.children();
        let opener = part(node, 0)?;
        match opener.as_leaf().map(|leaf| leaf.kind) {
            Some(TokenId::LPar) => match children {
                [_, inner, _] => self.eval(inner, scope),
                _ => Ok(Value::tuple(Vec::new())),
            },
            Some(TokenId::LSqb) => match children {
                [_, inner, _] => Ok(Value::list(self.eval_items(inner, scope)?)),
                _ => Ok(Value::list(Vec::new())),
            },
            Some(TokenId::LBrace) => {
                let mut dict = Dict::new();
                if let [_, maker, _] = children {
                    let entries: Vec<&Node> = items(maker).filter(|c| !c.is(TokenId::Colon)).collect();
                    for pair in entries.chunks(2) {
                        let [key, value] = pair else {
                            return Err(runtime_error("malformed dict display"));
                        };
                        let key = self.eval(key, scope)?;
                        let value = self.eval(value, scope)?;
                        dict.insert(key, value)?;
                    }
                }
                Ok(Value::dict(dict))
            }
            Some(TokenId::String) => {
                let mut text = String::new();
                for piece in children {
                    let raw = spelling(piece);
                    let decoded = decode_literal(raw).map_err(|_| malformed_literal(raw))?;
                    text.push_str(&decoded);
                }
                Ok(Value::str(text))
            }
            _ => self.eval(opener, scope),
        }
    }

    /// Bind `value` to an assignment target (`x`, `a, b`, `[a, b]`, `x[i]`, `obj.attr`).
    pub(crate) fn assign(&mut self, target: &Node, value: Value, scope: &Scope) -> Result<(), Exception> {
        let target = target.collapse();
        if let Some(leaf) = target.as_leaf() {
            if leaf.kind == TokenId::Name {
                scope.assign(&leaf.text, value);
                return Ok(());
            }
            return Err(runtime_error(format!("can't assign to literal {}", leaf.text)));
        }
        match target.symbol() {
            Some(SymbolId::TestList | SymbolId::ExprList | SymbolId::ListMaker) => {
                self.assign_unpacked(target, value, scope)
            }
            Some(SymbolId::Atom) => match target.children() {
                [_, inner, _] if inner.is(SymbolId::ListMaker) => self.assign_unpacked(inner, value, scope),
                [_, inner, _] => self.assign(inner, value, scope),
                _ => Err(runtime_error("can't assign to ()")),
            },
            Some(SymbolId::Power) => {
                let (object, trailer) = self.trailer_target(target, scope)?;
                match spelling(part(trailer, 0)?) {
                    "[" => match self.eval_subscript(part(trailer, 1)?, scope)? {
                        Subscript::Index(key) => set_item(&object, key, value),
                        Subscript::Slice(lower, upper) => set_slice(&object, lower, upper, value),
                    },
                    "." => Err(type_error(format!(
                        "'{}' object attributes are read-only",
                        object.type_name()
                    ))),
                    _ => Err(runtime_error("can't assign to function call")),
                }
            }
            _ => Err(runtime_error("can't assign to expression")),
        }
    }

    fn assign_unpacked(&mut self, targets: &Node, value: Value, scope: &Scope) -> Result<(), Exception> {
        let targets: Vec<&Node> = items(targets).collect();
        let values = value.iterate()?;
        if values.len() > targets.len() {
            return Err(value_error("too many values to unpack"));
        }
        if values.len() < targets.len() {
            let plural = if values.len() == 1 { "" } else { "s" };
            return Err(value_error(format!(
                "need more than {} value{} to unpack",
                values.len(),
                plural
            )));
        }
        for (target, value) in targets.into_iter().zip(values) {
            self.assign(target, value, scope)?;
        }
        Ok(())
    }

    /// Evaluate a `power` target up to its last trailer; return the object and that trailer.
    fn trailer_target<'n>(&mut self, target: &'n Node, scope: &Scope) -> Result<(Value, &'n Node), Exception> {
        let children = target.children();
        let Some((last, init)) = children.split_last().filter(|(last, _)| last.is(SymbolId::Trailer)) else {
            return Err(runtime_error("can't assign to operator"));
        };
        let mut object = self.eval(part(target, 0)?, scope)?;
        for trailer in &init[1..] {
            object = self.apply_trailer(object, trailer, scope)?;
        }
        Ok((object, last))
    }

    /// `del target`
    pub(crate) fn delete(&mut self, target: &Node, scope: &Scope) -> Result<(), Exception> {
        let target = target.collapse();
        if let Some(leaf) = target.as_leaf() {
            if leaf.kind == TokenId::Name && scope.delete(&leaf.text) {
                return Ok(());
            }
            return Err(name_error(&leaf.text));
        }
        match target.symbol() {
            Some(SymbolId::TestList | SymbolId::ExprList) => {
                for item in items(target) {
                    self.delete(item, scope)?;
                }
                Ok(())
            }
            Some(SymbolId::Atom) => match target.children() {
                [_, inner, _] => self.delete(inner, scope),
                _ => Err(runtime_error("can't delete ()")),
            },
            Some(SymbolId::Power) => {
                let (object, trailer) = self.trailer_target(target, scope)?;
                if spelling(part(trailer, 0)?) != "[" {
                    return Err(runtime_error("can't delete this target"));
                }
                match self.eval_subscript(part(trailer, 1)?, scope)? {
                    Subscript::Index(key) => del_item(&object, &key),
                    Subscript::Slice(lower, upper) => set_slice(&object, lower, upper, Value::list(Vec::new())),
                }
            }
            _ => Err(runtime_error("can't delete expression")),
        }
    }
}

enum Subscript {
    Index(Value),
    Slice(Option<i64>, Option<i64>),
}

/// The spelling of a `comp_op` node: `"<"`, `"not in"`, `"is not"`.
pub(crate) fn comparison_operator(op: &Node) -> String {
    op.leaves().map(|leaf| leaf.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Resolve a name: scope first, then builtin functions and exception classes.
pub(crate) fn lookup_name(name: &str, scope: &Scope) -> Result<Value, Exception> {
    if let Some(value) = scope.lookup(name) {
        return Ok(value);
    }
    match name {
        "None" => Ok(Value::None),
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        _ => builtins::from_str(name)
            .map(Value::Builtin)
            .or_else(|| exception_class(name))
            .ok_or_else(|| name_error(name)),
    }
}

/// `NUMBER` leaf text: a float if it has a fraction or exponent, otherwise an int.
fn parse_number(text: &str) -> Result<Value, Exception> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let parsed = if cleaned.contains(['.', 'e', 'E']) {
        cleaned.parse::<f64>().ok().map(Value::Float)
    } else {
        cleaned.parse::<i64>().ok().map(Value::Int)
    };
    parsed.ok_or_else(|| value_error(format!("invalid numeric literal: {text}")))
}

fn malformed_literal(raw: &str) -> Exception {
    value_error(format!("malformed string literal {raw}"))
}

fn sequence_index(len: usize, index: &Value, type_name: &str) -> Result<usize, Exception> {
    let Some(raw) = index.as_index() else {
        return Err(type_error(format!(
            "{} indices must be integers, not {}",
            type_name,
            index.type_name()
        )));
    };
    strings::normalize_index(len, raw).ok_or_else(|| index_error(format!("{type_name} index out of range")))
}

fn get_item(container: &Value, key: &Value) -> Result<Value, Exception> {
    match container {
        Value::List(list) => {
            let list = list.borrow();
            let index = sequence_index(list.len(), key, "list")?;
            Ok(list[index].clone())
        }
        Value::Tuple(items) => {
            let index = sequence_index(items.len(), key, "tuple")?;
            Ok(items[index].clone())
        }
        Value::Str(s) => {
            let Some(raw) = key.as_index() else {
                return Err(type_error(format!("string indices must be integers, not {}", key.type_name())));
            };
            strings::str_char_at(s, raw)
                .map(Value::str)
                .map_err(|_| index_error("string index out of range"))
        }
        Value::Dict(dict) => {
            key.check_hashable()?;
            dict.borrow().get(key).cloned().ok_or_else(|| key_error(key))
        }
        other => Err(type_error(format!("'{}' object is not subscriptable", other.type_name()))),
    }
}

fn get_slice(container: &Value, lower: Option<i64>, upper: Option<i64>) -> Result<Value, Exception> {
    match container {
        Value::List(list) => {
            let list = list.borrow();
            let (lo, hi) = strings::slice_bounds(list.len(), lower, upper);
            Ok(Value::list(list[lo..hi].to_vec()))
        }
        Value::Tuple(items) => {
            let (lo, hi) = strings::slice_bounds(items.len(), lower, upper);
            Ok(Value::tuple(items[lo..hi].to_vec()))
        }
        Value::Str(s) => Ok(Value::str(strings::str_slice(s, lower, upper))),
        other => Err(type_error(format!("'{}' object is not sliceable", other.type_name()))),
    }
}

fn set_item(container: &Value, key: Value, value: Value) -> Result<(), Exception> {
    match container {
        Value::List(list) => {
            let mut list = list.borrow_mut();
            let Some(raw) = key.as_index() else {
                return Err(type_error(format!("list indices must be integers, not {}", key.type_name())));
            };
            let index = strings::normalize_index(list.len(), raw)
                .ok_or_else(|| index_error("list assignment index out of range"))?;
            list[index] = value;
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(key, value),
        other => Err(type_error(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

fn set_slice(container: &Value, lower: Option<i64>, upper: Option<i64>, value: Value) -> Result<(), Exception> {
    let Value::List(list) = container else {
        return Err(type_error(format!(
            "'{}' object does not support slice assignment",
            container.type_name()
        )));
    };
    let replacement = value.iterate()?;
    let mut list = list.borrow_mut();
    let (lo, hi) = strings::slice_bounds(list.len(), lower, upper);
    list.splice(lo..hi, replacement);
    Ok(())
}

fn del_item(container: &Value, key: &Value) -> Result<(), Exception> {
    match container {
        Value::List(list) => {
            let mut list = list.borrow_mut();
            let index = sequence_index(list.len(), key, "list")?;
            list.remove(index);
            Ok(())
        }
        Value::Dict(dict) => {
            key.check_hashable()?;
            dict.borrow_mut().remove(key).map(drop).ok_or_else(|| key_error(key))
        }
        other => Err(type_error(format!(
            "'{}' object does not support item deletion",
            other.type_name()
        ))),
    }
}

/// `value.name`
pub(crate) fn get_attribute(value: &Value, name: &str) -> Result<Value, Exception> {
    let found = match value {
        Value::Instance(instance) => match name {
            "args" => Some(Value::tuple(instance.args.clone())),
            "message" => Some(Value::str(instance.message())),
            _ => instance.class.attribute(name),
        },
        Value::Class(class) => match name {
            "__name__" => Some(Value::str(class.name())),
            _ => class.attribute(name),
        },
        Value::Module(id) => builtins::module_export(*id, name).map(Value::from),
        Value::Function(function) if name == "__name__" => Some(Value::str(function.name.as_str())),
        Value::Builtin(id) if name == "__name__" => Some(Value::str(builtins::name(*id))),
        _ => lookup_method(value, name).map(|method| {
            Value::Method(Rc::new(BoundMethod {
                receiver: value.clone(),
                method,
            }))
        }),
    };
    found.ok_or_else(|| attribute_error(value, name))
}
