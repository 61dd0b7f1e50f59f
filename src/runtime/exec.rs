//! Statement execution.

use std::rc::Rc;

use witness_core::lang::errors::ExceptionKind;
use witness_core::lang::symbols::SymbolId;
use witness_core::lang::tokens::TokenId;
use witness_syntax::{Node, query};

use super::builtins::{self, ModuleId};
use super::eval::{part, spelling};
use super::exception::{ExcClass, ExcInstance, Exception, UserClass, import_error, runtime_error, type_error};
use super::namespace::{Namespace, Scope};
use super::ops;
use super::value::{Function, Param, Value};
use super::{Flow, Sandbox};

impl Sandbox<'_> {
    /// Execute one `stmt` node.
    pub(crate) fn exec_stmt(&mut self, stmt: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        let inner = part(stmt, 0)?;
        match inner.symbol() {
            Some(SymbolId::SimpleStmt) => self.exec_simple(inner, scope),
            Some(SymbolId::CompoundStmt) => {
                self.set_line(query::first_line(inner));
                let result = self.exec_compound(part(inner, 0)?, scope);
                self.traced(result)
            }
            _ => Err(runtime_error(format!("cannot execute a {} node", inner.kind().name()))),
        }
    }

    /// Execute a `suite`: an inline `simple_stmt` or an indented block of `stmt`s.
    pub(crate) fn exec_suite(&mut self, suite: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        for child in suite.children() {
            let flow = match child.symbol() {
                Some(SymbolId::SimpleStmt) => self.exec_simple(child, scope)?,
                Some(SymbolId::Stmt) => self.exec_stmt(child, scope)?,
                _ => continue,
            };
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Attach the current call stack to an exception that has none yet.
    fn traced<T>(&self, result: Result<T, Exception>) -> Result<T, Exception> {
        result.map_err(|mut exc| {
            if exc.traceback.is_empty() {
                exc.traceback = self.frames.clone();
            }
            exc
        })
    }

    fn exec_simple(&mut self, simple: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        self.set_line(query::first_line(simple));
        for small in simple.children().iter().filter(|c| c.is(SymbolId::SmallStmt)) {
            let result = self.exec_small(part(small, 0)?, scope);
            let flow = self.traced(result)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_small(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        match node.symbol() {
            Some(SymbolId::ExprStmt) => self.exec_expr_stmt(node, scope)?,
            Some(SymbolId::PrintStmt) => self.exec_print(node, scope)?,
            Some(SymbolId::DelStmt) => self.delete(part(node, 1)?, scope)?,
            Some(SymbolId::PassStmt) => {}
            Some(SymbolId::FlowStmt) => return self.exec_flow(part(node, 0)?, scope),
            Some(SymbolId::ImportStmt) => exec_import(part(node, 0)?, scope)?,
            Some(SymbolId::GlobalStmt) => {
                for name in node.children()[1..].iter().filter_map(Node::as_leaf) {
                    if name.kind == TokenId::Name {
                        scope.declare_global(&name.text);
                    }
                }
            }
            Some(SymbolId::AssertStmt) => {
                if !self.eval(part(node, 1)?, scope)?.truthy() {
                    let args = match node.child(3) {
                        Some(message) => vec![self.eval(message, scope)?],
                        None => Vec::new(),
                    };
                    let class = ExcClass::Builtin(ExceptionKind::AssertionError);
                    return Err(Exception::from_instance(Rc::new(ExcInstance::new(class, args))));
                }
            }
            _ => return Err(runtime_error(format!("cannot execute a {} node", node.kind().name()))),
        }
        Ok(Flow::Normal)
    }

    /// Expression statements, assignments (`a = b = value`) and augmented assignments.
    fn exec_expr_stmt(&mut self, node: &Node, scope: &mut Scope) -> Result<(), Exception> {
        match node.children() {
            [expression] => self.eval(expression, scope).map(drop),
            [target, op, value] if op.is(SymbolId::AugAssign) => {
                let spelling = op.sole_leaf().map(|leaf| leaf.text.as_str()).unwrap_or_default();
                let operator = spelling.strip_suffix('=').unwrap_or(spelling);
                let current = self.eval(target, scope)?;
                let rhs = self.eval(value, scope)?;
                if let (Value::List(list), "+") = (&current, operator) {
                    let extra = rhs.iterate()?;
                    list.borrow_mut().extend(extra);
                    return Ok(());
                }
                let updated = ops::binary(operator, &current, &rhs)?;
                self.assign(target, updated, scope)
            }
            [targets @ .., value] => {
                let value = self.eval(value, scope)?;
                for target in targets.iter().filter(|c| !c.is(TokenId::Equal)) {
                    self.assign(target, value.clone(), scope)?;
                }
                Ok(())
            }
            [] => Ok(()),
        }
    }

    /// `print a, b,`: items separated by single spaces; a trailing comma leaves the line open.
    fn exec_print(&mut self, node: &Node, scope: &Scope) -> Result<(), Exception> {
        let children = &node.children()[1..];
        for expression in children.iter().filter(|c| !c.is(TokenId::Comma)) {
            let text = self.eval(expression, scope)?.to_str();
            if self.softspace {
                self.write_stdout(" ");
            }
            self.write_stdout(&text);
            self.softspace = !text.ends_with(|c: char| c.is_whitespace() && c != ' ');
        }
        if !children.last().is_some_and(|c| c.is(TokenId::Comma)) {
            self.write_stdout("\n");
            self.softspace = false;
        }
        Ok(())
    }

    fn exec_flow(&mut self, node: &Node, scope: &Scope) -> Result<Flow, Exception> {
        match node.symbol() {
            Some(SymbolId::BreakStmt) => Ok(Flow::Break),
            Some(SymbolId::ContinueStmt) => Ok(Flow::Continue),
            Some(SymbolId::ReturnStmt) => {
                let value = match node.child(1) {
                    Some(value) => self.eval(value, scope)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Some(SymbolId::RaiseStmt) => Err(match node.child(1) {
                Some(raised) => {
                    let value = self.eval(raised, scope)?;
                    exception_from_value(value)?
                }
                None => self
                    .handling
                    .last()
                    .cloned()
                    .ok_or_else(|| runtime_error("no active exception to re-raise"))?,
            }),
            _ => Err(runtime_error(format!("cannot execute a {} node", node.kind().name()))),
        }
    }

    fn exec_compound(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        match node.symbol() {
            Some(SymbolId::IfStmt) => self.exec_if(node, scope),
            Some(SymbolId::WhileStmt) => self.exec_while(node, scope),
            Some(SymbolId::ForStmt) => self.exec_for(node, scope),
            Some(SymbolId::TryStmt) => self.exec_try(node, scope),
            Some(SymbolId::FuncDef) => self.exec_def(node, scope).map(|()| Flow::Normal),
            Some(SymbolId::ClassDef) => self.exec_class(node, scope).map(|()| Flow::Normal),
            _ => Err(runtime_error(format!("cannot execute a {} node", node.kind().name()))),
        }
    }

    /// `if test: suite (elif test: suite)* [else: suite]`
    fn exec_if(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        let children = node.children();
        let mut index = 0;
        while let Some(keyword) = children.get(index) {
            if keyword.text() == Some("else") {
                return self.exec_suite(part(node, index + 2)?, scope);
            }
            let condition = part(node, index + 1)?;
            self.set_line(query::first_line(condition));
            if self.eval(condition, scope)?.truthy() {
                return self.exec_suite(part(node, index + 3)?, scope);
            }
            index += 4;
        }
        Ok(Flow::Normal)
    }

    /// `while test: suite [else: suite]`
    fn exec_while(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        let condition = part(node, 1)?;
        let body = part(node, 3)?;
        loop {
            self.set_line(query::first_line(condition));
            if !self.eval(condition, scope)?.truthy() {
                break;
            }
            match self.exec_suite(body, scope)? {
                Flow::Break => return Ok(Flow::Normal),
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Normal | Flow::Continue => {}
            }
        }
        self.exec_else(node, 4, scope)
    }

    /// `for exprlist in testlist: suite [else: suite]`
    fn exec_for(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        let target = part(node, 1)?;
        let values = self.eval(part(node, 3)?, scope)?.iterate()?;
        let body = part(node, 5)?;
        for value in values {
            self.assign(target, value, scope)?;
            match self.exec_suite(body, scope)? {
                Flow::Break => return Ok(Flow::Normal),
                flow @ Flow::Return(_) => return Ok(flow),
                Flow::Normal | Flow::Continue => {}
            }
        }
        self.exec_else(node, 6, scope)
    }

    /// Run the `else` suite starting at child `index`, if present.
    fn exec_else(&mut self, node: &Node, index: usize, scope: &mut Scope) -> Result<Flow, Exception> {
        match node.child(index) {
            Some(keyword) if keyword.text() == Some("else") => self.exec_suite(part(node, index + 2)?, scope),
            _ => Ok(Flow::Normal),
        }
    }

    /// `try` with `except` handlers, `else` and `finally`.
    fn exec_try(&mut self, node: &Node, scope: &mut Scope) -> Result<Flow, Exception> {
        let clauses = TryClauses::split(node)?;
        let outcome = match self.exec_suite(clauses.body, scope) {
            Ok(Flow::Normal) => match clauses.orelse {
                Some(orelse) => self.exec_suite(orelse, scope),
                None => Ok(Flow::Normal),
            },
            Ok(flow) => Ok(flow),
            Err(exc) => self.handle(exc, &clauses.handlers, scope),
        };
        if let Some(finally) = clauses.finally {
            let flow = self.exec_suite(finally, scope)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        outcome
    }

    /// Find the first matching `except` clause and run its suite.
    fn handle(&mut self, exc: Exception, handlers: &[(&Node, &Node)], scope: &mut Scope) -> Result<Flow, Exception> {
        for (clause, suite) in handlers {
            let matched = match clause.child(1) {
                None => true,
                Some(filter) => {
                    let filter = self.eval(filter, scope)?;
                    exception_matches(&exc, &filter)?
                }
            };
            if !matched {
                continue;
            }
            if let Some(name) = clause.child(3).and_then(Node::text) {
                scope.assign(name, Value::Instance(exc.instance.clone()));
            }
            self.handling.push(exc);
            let result = self.exec_suite(suite, scope);
            self.handling.pop();
            return result;
        }
        Err(exc)
    }

    /// `def name(params): suite`
    fn exec_def(&mut self, node: &Node, scope: &Scope) -> Result<(), Exception> {
        let name = part(node, 1)?.text().unwrap_or_default().to_string();
        let mut params = Vec::new();
        if let Some(list) = part(node, 2)?.children().iter().find(|c| c.is(SymbolId::VarArgsList)) {
            let children = list.children();
            for (index, child) in children.iter().enumerate() {
                if !child.is(SymbolId::FpDef) {
                    continue;
                }
                let default = match children.get(index + 1) {
                    Some(equal) if equal.is(TokenId::Equal) => Some(self.eval(part(list, index + 2)?, scope)?),
                    _ => None,
                };
                params.push(Param {
                    name: child.sole_leaf().map(|leaf| leaf.text.clone()).unwrap_or_default(),
                    default,
                });
            }
        }
        let function = Function {
            name: name.clone(),
            params,
            body: part(node, 4)?.clone(),
            globals: scope.globals.clone(),
            filename: self.current_filename(),
        };
        scope.assign(&name, Value::Function(Rc::new(function)));
        Ok(())
    }

    /// `class Name(Base, ...): suite`. Only exception classes can be defined.
    fn exec_class(&mut self, node: &Node, scope: &Scope) -> Result<(), Exception> {
        let name = part(node, 1)?.text().unwrap_or_default().to_string();
        let mut bases = Vec::new();
        let has_base_list = node.child(2).is_some_and(|c| c.is(TokenId::LPar));
        if let Some(list) = node.child(3).filter(|c| has_base_list && !c.is(TokenId::RPar)) {
            for base in self.eval_items(list, scope)? {
                match base {
                    Value::Class(class) => bases.push(class),
                    other => {
                        return Err(type_error(format!(
                            "class {} may only derive from exception classes, not '{}'",
                            name,
                            other.type_name()
                        )));
                    }
                }
            }
        }
        if bases.is_empty() {
            return Err(type_error(format!(
                "class {name} must derive from an exception class"
            )));
        }

        let attrs = Namespace::new();
        let mut body_scope = Scope::new(scope.globals.clone(), attrs.clone());
        let suite = node.children().last().ok_or_else(|| runtime_error("class without a body"))?;
        self.exec_suite(suite, &mut body_scope)?;

        let class = UserClass { name: name.clone(), bases, attrs };
        scope.assign(&name, Value::Class(ExcClass::User(Rc::new(class))));
        Ok(())
    }
}

/// The pieces of a `try_stmt`.
struct TryClauses<'n> {
    body: &'n Node,
    /// `(except_clause, suite)` pairs in source order.
    handlers: Vec<(&'n Node, &'n Node)>,
    orelse: Option<&'n Node>,
    finally: Option<&'n Node>,
}

impl<'n> TryClauses<'n> {
    fn split(node: &'n Node) -> Result<Self, Exception> {
        let children = node.children();
        let mut clauses = TryClauses {
            body: part(node, 2)?,
            handlers: Vec::new(),
            orelse: None,
            finally: None,
        };
        let mut index = 3;
        while let Some(child) = children.get(index) {
            if child.is(SymbolId::ExceptClause) {
                clauses.handlers.push((child, part(node, index + 2)?));
            } else if child.text() == Some("else") {
                clauses.orelse = Some(part(node, index + 2)?);
            } else {
                clauses.finally = Some(part(node, index + 2)?);
            }
            index += 3;
        }
        Ok(clauses)
    }
}

/// The exception a `raise <value>` statement raises.
fn exception_from_value(value: Value) -> Result<Exception, Exception> {
    match value {
        Value::Class(class) => Ok(Exception::from_instance(Rc::new(ExcInstance::new(class, Vec::new())))),
        Value::Instance(instance) => Ok(Exception::from_instance(instance)),
        // Legacy string exceptions.
        Value::Str(message) => Ok(Exception::new(ExceptionKind::Exception, message.to_string())),
        other => Err(type_error(format!(
            "exceptions must derive from Exception, not {}",
            other.type_name()
        ))),
    }
}

/// `import a.b [as c]` and `from a.b import c [as d]`, resolved against the builtin module table.
fn exec_import(node: &Node, scope: &Scope) -> Result<(), Exception> {
    match node.symbol() {
        Some(SymbolId::ImportName) => {
            for item in part(node, 1)?.children().iter().filter(|c| c.is(SymbolId::DottedAsName)) {
                let path = dotted_path(part(item, 0)?);
                let module = import_module(&path)?;
                match item.child(2) {
                    Some(alias) => scope.assign(spelling(alias), Value::Module(module)),
                    // `import a.b` binds `a`.
                    None => scope.assign(path[0], Value::Module(import_module(&path[..1])?)),
                }
            }
        }
        Some(SymbolId::ImportFrom) => {
            let path = dotted_path(part(node, 1)?);
            let module = import_module(&path)?;
            let names = node
                .children()
                .iter()
                .find(|c| c.is(SymbolId::ImportAsNames))
                .ok_or_else(|| runtime_error("malformed import_from node"))?;
            for item in names.children().iter().filter(|c| c.is(SymbolId::ImportAsName)) {
                let name = spelling(part(item, 0)?);
                let export = builtins::module_export(module, name)
                    .ok_or_else(|| import_error(format!("cannot import name {name}")))?;
                let target = item.child(2).map_or(name, spelling);
                scope.assign(target, Value::from(export));
            }
        }
        _ => return Err(runtime_error(format!("cannot execute a {} node", node.kind().name()))),
    }
    Ok(())
}

fn dotted_path(node: &Node) -> Vec<&str> {
    node.children()
        .iter()
        .filter(|c| !c.is(TokenId::Dot))
        .map(spelling)
        .collect()
}

fn import_module(path: &[&str]) -> Result<ModuleId, Exception> {
    builtins::resolve_module(path).ok_or_else(|| import_error(format!("No module named {}", path.join("."))))
}

/// Whether an `except <filter>` clause catches `exc`.
fn exception_matches(exc: &Exception, filter: &Value) -> Result<bool, Exception> {
    match filter {
        Value::Class(class) => Ok(exc.class().is_subclass(class)),
        Value::Tuple(classes) => {
            for class in classes.iter() {
                if exception_matches(exc, class)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Err(type_error(format!(
            "catching '{}' objects that are not exception classes is not allowed",
            other.type_name()
        ))),
    }
}
