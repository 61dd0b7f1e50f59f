//! The execution sandbox: a tree-walking evaluator for the host language.
//!
//! Programs run directly off the concrete syntax tree produced by `witness_syntax`. The sandbox
//! owns no namespaces itself: every entry point takes the [`Scope`] to run in, so the Observer can
//! evaluate a test's source text in exactly the globals and locals the rewritten program handed it.
//!
//! ## Notes
//! - Runtime failures are [`Exception`] values; nothing here panics on user input.
//! - Call depth is bounded by [`SandboxConfig::max_call_depth`], so runaway recursion becomes a
//!   `RuntimeError` instead of a stack overflow. Infinite loops are not interrupted.
//! - The instrumentation hook is shared-borrowed for the lifetime `'h`. Hook calls nest: a
//!   statement the hook runs may reach another instrumented call, which dispatches as usual.

mod builtins;
mod eval;
mod exception;
mod exec;
mod namespace;
mod ops;
mod output;
mod value;

use std::rc::Rc;

use witness_core::lang::errors::ExceptionKind;
use witness_core::lang::symbols::SymbolId;
use witness_syntax::{Node, codec, query};

pub use builtins::{BUILTINS, BuiltinId, Export, METHODS, MODULES, MethodId, ModuleId};
pub use exception::{ExcClass, ExcInstance, Exception, Frame, UserClass};
pub use namespace::{Namespace, Scope};
pub use output::{CaptureBuffer, NullSink, OutputSink, SharedOutput, StdoutRedirect, StdoutSink};
pub use value::{Dict, Function, Value, format_float};

use exception::{runtime_error, type_error};

/// Default bound on nested function calls.
///
/// Lower than CPython's 1000: every host-language call costs several native frames here, and the
/// bound has to hold on a 2 MiB thread stack. Scripts that recurse deeper raise it through
/// [`SandboxConfig::with_max_call_depth`] (`--max-depth` on the command line).
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Filename used in tracebacks for source text handed to the sandbox at run time.
pub const STRING_FILENAME: &str = "<string>";

/// Function name used in tracebacks for module-level code.
pub const MODULE_FUNCTION: &str = "<module>";

/// Sandbox settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Maximum number of active frames (module frames included).
    pub max_call_depth: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl SandboxConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

/// One instrumented call: the arguments of
/// `__witness__.intercept(src, line, globals(), locals(), COMPARING=.., PRINTING=..)`.
#[derive(Debug, Clone)]
pub struct Intercept {
    pub source: String,
    /// Line in the original file, or `-1` when unknown.
    pub line: i64,
    pub globals: Namespace,
    pub locals: Namespace,
    pub comparing: bool,
    pub printing: bool,
}

impl Intercept {
    /// Validate the arguments of a hook call.
    ///
    /// ## Errors
    /// `TypeError` for missing, surplus, or mistyped arguments.
    pub fn from_args(args: Vec<Value>, kwargs: Vec<(String, Value)>) -> Result<Intercept, Exception> {
        let given = args.len();
        let mut args = args.into_iter();
        let (Some(source), Some(line), Some(globals), Some(locals), None) =
            (args.next(), args.next(), args.next(), args.next(), args.next())
        else {
            return Err(type_error(format!(
                "intercept() takes exactly 4 positional arguments ({given} given)"
            )));
        };
        let Value::Str(source) = source else {
            return Err(type_error("intercept() argument 1 must be str"));
        };
        let Some(line) = line.as_index() else {
            return Err(type_error("intercept() argument 2 must be int"));
        };
        let (Value::Namespace(globals), Value::Namespace(locals)) = (globals, locals) else {
            return Err(type_error("intercept() arguments 3 and 4 must be namespaces"));
        };

        let mut call = Intercept {
            source: source.to_string(),
            line,
            globals,
            locals,
            comparing: false,
            printing: false,
        };
        for (key, value) in kwargs {
            match key.as_str() {
                "COMPARING" => call.comparing = value.truthy(),
                "PRINTING" => call.printing = value.truthy(),
                _ => {
                    return Err(type_error(format!(
                        "intercept() got an unexpected keyword argument '{key}'"
                    )));
                }
            }
        }
        Ok(call)
    }

    /// The scope the instrumented statement originally ran in.
    pub fn scope(&self) -> Scope {
        Scope::new(self.globals.clone(), self.locals.clone())
    }
}

/// Receiver of instrumented calls.
///
/// The sandbox is passed back in so the hook can evaluate or execute the statement's source text.
/// That code may call the hook again before the outer call returns, so implementations keep their
/// state behind interior mutability and release any borrow before handing control to the sandbox.
pub trait InterceptHook {
    fn intercept(&self, sandbox: &mut Sandbox<'_>, call: Intercept) -> Result<(), Exception>;
}

/// Loop and function control flow produced by executing a statement.
#[derive(Debug, Clone)]
pub(crate) enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Evaluator state: output sink, call stack, installed hook.
pub struct Sandbox<'h> {
    config: SandboxConfig,
    stdout: SharedOutput,
    hook: Option<&'h dyn InterceptHook>,
    frames: Vec<Frame>,
    /// A `print` with a trailing comma left the line open.
    softspace: bool,
    /// Exceptions being handled by enclosing `except` blocks, innermost last.
    handling: Vec<Exception>,
}

impl<'h> Sandbox<'h> {
    /// A sandbox writing to the process's standard output.
    pub fn new(config: SandboxConfig) -> Self {
        Self::with_output(config, SharedOutput::new(StdoutSink))
    }

    pub fn with_output(config: SandboxConfig, stdout: SharedOutput) -> Self {
        Self {
            config,
            stdout,
            hook: None,
            frames: Vec::new(),
            softspace: false,
            handling: Vec::new(),
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Route `__witness__.intercept(...)` calls to `hook`.
    pub fn install_hook(&mut self, hook: &'h dyn InterceptHook) {
        self.hook = Some(hook);
    }

    /// Swap the standard-output sink, returning the previous one.
    pub(crate) fn replace_stdout(&mut self, sink: SharedOutput) -> SharedOutput {
        self.softspace = false;
        std::mem::replace(&mut self.stdout, sink)
    }

    /// Write to the current standard-output sink.
    pub fn write_stdout(&self, text: &str) {
        self.stdout.emit(text);
    }

    /// Run a parsed `file_input` tree as a module.
    pub fn exec_program(&mut self, program: &Node, scope: &mut Scope, filename: &str) -> Result<(), Exception> {
        let base = self.frames.len();
        self.push_frame(filename.into(), MODULE_FUNCTION.into());
        let result = program
            .children()
            .iter()
            .filter(|child| child.is(SymbolId::Stmt))
            .try_for_each(|statement| self.exec_stmt(statement, scope).map(drop));
        self.finish_entry(base, result)
    }

    /// Parse `source` (with line info) and run it as a module.
    ///
    /// ## Errors
    /// A `SyntaxError` exception if the text does not parse, otherwise whatever the program
    /// raised.
    pub fn run_source(&mut self, source: &str, scope: &mut Scope, filename: &str) -> Result<(), Exception> {
        let program = codec::parse(source, true).map_err(|err| self.syntax_exception(filename, err))?;
        self.exec_program(&program, scope, filename)
    }

    /// Execute statement source text handed over at run time (`exec`).
    pub fn exec_source(&mut self, source: &str, scope: &mut Scope) -> Result<(), Exception> {
        self.run_source(source, scope, STRING_FILENAME)
    }

    /// Evaluate expression source text handed over at run time (`eval`).
    pub fn eval_source(&mut self, source: &str, scope: &Scope) -> Result<Value, Exception> {
        let tree = codec::parse_expression(source, true)
            .map_err(|err| self.syntax_exception(STRING_FILENAME, err))?;
        let base = self.frames.len();
        self.push_frame(STRING_FILENAME.into(), MODULE_FUNCTION.into());
        self.set_line(query::first_line(&tree));
        let result = self.eval(&tree, scope);
        self.finish_entry(base, result)
    }

    fn syntax_exception(&self, filename: &str, err: witness_syntax::SyntaxError) -> Exception {
        let mut exc = Exception::new(ExceptionKind::SyntaxError, err.message.clone());
        exc.traceback.push(Frame {
            filename: filename.into(),
            line: u32::try_from(err.line).ok(),
            function: MODULE_FUNCTION.into(),
        });
        exc
    }

    /// Pop back to `base` frames; trim a propagating exception's traceback to start at the entry
    /// frame.
    fn finish_entry<T>(&mut self, base: usize, result: Result<T, Exception>) -> Result<T, Exception> {
        let result = result.map_err(|mut exc| {
            if exc.traceback.is_empty() {
                exc.traceback = self.frames.clone();
            }
            exc.traceback.drain(..base.min(exc.traceback.len()));
            exc
        });
        self.frames.truncate(base);
        result
    }

    fn push_frame(&mut self, filename: Rc<str>, function: Rc<str>) {
        self.frames.push(Frame {
            filename,
            line: None,
            function,
        });
    }

    fn set_line(&mut self, line: Option<u32>) {
        if let (Some(frame), Some(line)) = (self.frames.last_mut(), line) {
            frame.line = Some(line);
        }
    }

    fn current_filename(&self) -> Rc<str> {
        self.frames
            .last()
            .map_or_else(|| STRING_FILENAME.into(), |frame| frame.filename.clone())
    }

    /// Hand an instrumented call to the installed hook.
    ///
    /// ## Errors
    /// `RuntimeError` when no hook is installed.
    fn dispatch_hook(&mut self, call: Intercept) -> Result<(), Exception> {
        let Some(hook) = self.hook else {
            return Err(runtime_error("no intercept hook is installed"));
        };
        hook.intercept(self, call)
    }

    /// Call any callable value.
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        scope: &Scope,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Value, Exception> {
        match callee {
            Value::Function(function) => self.call_function(function, args, kwargs),
            Value::Builtin(id) => self.call_builtin(*id, scope, args, kwargs),
            Value::Method(bound) => self.call_method(bound, args, kwargs),
            Value::Class(class) => {
                if let Some((key, _)) = kwargs.first() {
                    return Err(type_error(format!(
                        "{}() got an unexpected keyword argument '{}'",
                        class.name(),
                        key
                    )));
                }
                Ok(Value::Instance(Rc::new(ExcInstance::new(class.clone(), args))))
            }
            other => Err(type_error(format!("'{}' object is not callable", other.type_name()))),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Value, Exception> {
        if self.frames.len() >= self.config.max_call_depth {
            return Err(runtime_error("maximum recursion depth exceeded"));
        }
        let locals = bind_arguments(function, args, kwargs)?;
        let mut scope = Scope::new(function.globals.clone(), locals);
        self.push_frame(function.filename.clone(), function.name.as_str().into());
        let flow = self.exec_suite(&function.body, &mut scope);
        self.frames.pop();
        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }
}

/// Bind call arguments to a function's parameters in a fresh local namespace.
fn bind_arguments(function: &Function, args: Vec<Value>, kwargs: Vec<(String, Value)>) -> Result<Namespace, Exception> {
    let params = &function.params;
    let required = params.iter().filter(|p| p.default.is_none()).count();
    let describe = |given: usize| {
        let (qualifier, count) = if required == params.len() {
            ("exactly", params.len())
        } else if given < required {
            ("at least", required)
        } else {
            ("at most", params.len())
        };
        let plural = if count == 1 { "" } else { "s" };
        type_error(format!(
            "{}() takes {} {} argument{} ({} given)",
            function.name, qualifier, count, plural, given
        ))
    };

    let given = args.len() + kwargs.len();
    if args.len() > params.len() {
        return Err(describe(given));
    }
    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(args) {
        *slot = Some(value);
    }
    for (key, value) in kwargs {
        let Some(index) = params.iter().position(|p| p.name == key) else {
            return Err(type_error(format!(
                "{}() got an unexpected keyword argument '{}'",
                function.name, key
            )));
        };
        if slots[index].is_some() {
            return Err(type_error(format!(
                "{}() got multiple values for keyword argument '{}'",
                function.name, key
            )));
        }
        slots[index] = Some(value);
    }

    let locals = Namespace::new();
    for (param, slot) in params.iter().zip(slots) {
        match slot.or_else(|| param.default.clone()) {
            Some(value) => locals.set(param.name.clone(), value),
            None => return Err(describe(given)),
        }
    }
    Ok(locals)
}

#[cfg(test)]
mod tests;
