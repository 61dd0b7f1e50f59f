use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn run_with(config: SandboxConfig, source: &str) -> (Result<(), Exception>, String) {
    let buffer = Rc::new(RefCell::new(CaptureBuffer::new()));
    let mut sandbox = Sandbox::with_output(config, SharedOutput::capture(&buffer));
    let mut scope = Scope::module(Namespace::new());
    let result = sandbox.run_source(source, &mut scope, "t.py");
    let output = buffer.borrow().as_str().to_string();
    (result, output)
}

fn output(source: &str) -> String {
    let (result, output) = run_with(SandboxConfig::default(), source);
    if let Err(exc) = result {
        panic!("program raised: {}", exc.render_traceback());
    }
    output
}

fn raised(source: &str) -> Exception {
    run_with(SandboxConfig::default(), source)
        .0
        .expect_err("program should raise")
}

#[test]
fn arithmetic_and_print() {
    assert_eq!(
        output("print 1 + 2, 7 // 2, -7 % 3, 2 ** 10\nprint 'a' 'b', 3.0 / 2\n"),
        "3 3 2 1024\nab 1.5\n"
    );
}

#[test]
fn print_trailing_comma_keeps_the_line_open() {
    assert_eq!(output("print 'a',\nprint 'b'\nprint\n"), "a b\n\n");
}

#[test]
fn functions_with_defaults_and_keywords() {
    let source = "\
def fact(n, acc=1):
    if n <= 1:
        return acc
    return fact(n - 1, acc * n)
print fact(5), fact(3, acc=2)
";
    assert_eq!(output(source), "120 12\n");
}

#[test]
fn bad_call_arity_is_a_type_error() {
    let exc = raised("def f(a, b):\n    pass\nf(1)\n");
    assert_eq!(exc.to_string(), "TypeError: f() takes exactly 2 arguments (1 given)");
}

#[test]
fn loops_with_break_continue_and_else() {
    let source = "\
total = 0
for i in range(10):
    if i % 2:
        continue
    if i > 6:
        break
    total += i
else:
    total = -1
print total
n = 0
while n < 3:
    n += 1
else:
    print 'done', n
";
    assert_eq!(output(source), "12\ndone 3\n");
}

#[test]
fn user_exception_classes_are_caught_by_base() {
    let source = "\
class AppError(ValueError):
    code = 7
def check(x):
    if x < 0:
        raise AppError('negative', x)
    return x
try:
    check(-1)
except ValueError as e:
    print 'caught', e.args[0], e.code
finally:
    print 'cleanup'
";
    assert_eq!(output(source), "caught negative 7\ncleanup\n");
}

#[test]
fn bare_raise_reraises_the_handled_exception() {
    let exc = raised("try:\n    {}['k']\nexcept KeyError:\n    raise\n");
    assert_eq!(exc.to_string(), "KeyError: 'k'");
}

#[test]
fn uncaught_exception_carries_a_traceback() {
    let exc = raised("def boom():\n    return 1 // 0\nboom()\n");
    assert_eq!(
        exc.render_traceback(),
        "Traceback (most recent call last):\n  File \"t.py\", line 3, in <module>\n  File \"t.py\", line 2, in boom\nZeroDivisionError: integer division or modulo by zero\n"
    );
}

#[test]
fn runaway_recursion_is_a_runtime_error() {
    let config = SandboxConfig::default().with_max_call_depth(10);
    let (result, _) = run_with(config, "def f(n):\n    return f(n + 1)\nf(0)\n");
    let exc = result.expect_err("recursion should be cut off");
    assert_eq!(exc.to_string(), "RuntimeError: maximum recursion depth exceeded");
}

#[test]
fn default_depth_bounds_user_recursion() {
    let source = "\
def depth(n):
    if n == 0:
        return 0
    return depth(n - 1) + 1
";
    assert_eq!(output(&format!("{source}print depth(90)\n")), "90\n");
    let exc = raised(&format!("{source}depth({})\n", DEFAULT_MAX_CALL_DEPTH));
    assert_eq!(exc.to_string(), "RuntimeError: maximum recursion depth exceeded");
}

#[test]
fn imports_bind_builtin_modules_and_members() {
    let source = "\
import pprint
from pprint import pprint as show
import witness.utils
from pytest import (utils,)
show([1, 'a'])
pprint.pprint(None)
print utils.catchException(int, 'x').__name__, witness.utils is utils, pprint
";
    assert_eq!(output(source), "[1, 'a']\nNone\nValueError True <module 'pprint'>\n");
}

#[test]
fn unknown_imports_raise_import_error() {
    assert_eq!(raised("import os\n").to_string(), "ImportError: No module named os");
    assert_eq!(raised("import witness.os\n").to_string(), "ImportError: No module named witness.os");
    assert_eq!(
        raised("from pprint import pformat\n").to_string(),
        "ImportError: cannot import name pformat"
    );
    assert_eq!(
        raised("import pprint\npprint.pformat\n").to_string(),
        "AttributeError: 'module' object has no attribute 'pformat'"
    );
}

#[test]
fn global_statement_rebinds_module_names() {
    let source = "\
count = 0
def bump():
    global count
    count += 1
bump(); bump()
print count
";
    assert_eq!(output(source), "2\n");
}

#[test]
fn containers_and_methods() {
    let source = "\
items = [3, 1, 2]
items.append(5)
d = {'a': 1}
d['b'] = len(items)
print sorted(items), items[1:3], d['b'], 'x,y'.split(',')
a, [b, c] = 1, (2, 3)
print a + b + c
";
    assert_eq!(output(source), "[1, 2, 3, 5] [1, 2] 4 ['x', 'y']\n6\n");
}

#[test]
fn unpacking_mismatch_is_a_value_error() {
    assert_eq!(raised("a, b = 1, 2, 3\n").to_string(), "ValueError: too many values to unpack");
    assert_eq!(raised("a, b = [1]\n").to_string(), "ValueError: need more than 1 value to unpack");
}

#[test]
fn assert_with_message() {
    assert_eq!(raised("assert 1 == 2, 'nope'\n").to_string(), "AssertionError: nope");
    assert_eq!(raised("assert []\n").to_string(), "AssertionError");
}

#[test]
fn catch_exception_returns_the_class() {
    assert_eq!(
        output("print catch_exception(int, 'x').__name__, catch_exception(int, '3')\n"),
        "ValueError None\n"
    );
}

#[test]
fn eval_source_reports_syntax_errors() {
    let mut sandbox = Sandbox::with_output(SandboxConfig::default(), SharedOutput::new(NullSink));
    let scope = Scope::module(Namespace::new());
    let exc = sandbox.eval_source("1 +", &scope).expect_err("should not parse");
    assert!(exc.is(ExceptionKind::SyntaxError));
    let value = sandbox.eval_source("(1, 'a')", &scope).expect("should evaluate");
    assert_eq!(value.repr(), "(1, 'a')");
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<(String, i64, bool, String)>>,
}

impl InterceptHook for Recorder {
    fn intercept(&self, sandbox: &mut Sandbox<'_>, call: Intercept) -> Result<(), Exception> {
        if call.printing {
            let mut scope = call.scope();
            sandbox.exec_source(&call.source, &mut scope)?;
            self.calls
                .borrow_mut()
                .push((call.source.clone(), call.line, call.comparing, String::new()));
            return Ok(());
        }
        let value = sandbox.eval_source(&call.source, &call.scope())?;
        self.calls
            .borrow_mut()
            .push((call.source.clone(), call.line, call.comparing, value.repr()));
        Ok(())
    }
}

fn module_with_hook() -> Scope {
    let namespace = Namespace::new();
    namespace.set("__witness__", Value::Hook);
    Scope::module(namespace)
}

#[test]
fn hook_receives_the_calling_scope() {
    let recorder = Recorder::default();
    {
        let mut sandbox = Sandbox::with_output(SandboxConfig::default(), SharedOutput::new(NullSink));
        sandbox.install_hook(&recorder);
        let mut scope = module_with_hook();
        let source = "\
def f(y):
    __witness__.intercept(\"y * 3\", 5, globals(), locals(), COMPARING=True)
f(2)
";
        sandbox.run_source(source, &mut scope, "t.py").expect("program runs");
    }
    assert_eq!(
        recorder.calls.into_inner(),
        vec![("y * 3".to_string(), 5, true, "6".to_string())]
    );
}

#[test]
fn hook_calls_nest_inside_user_functions() {
    let recorder = Recorder::default();
    let buffer = Rc::new(RefCell::new(CaptureBuffer::new()));
    {
        let mut sandbox = Sandbox::with_output(SandboxConfig::default(), SharedOutput::capture(&buffer));
        sandbox.install_hook(&recorder);
        let mut scope = module_with_hook();
        let source = "\
def greet():
    __witness__.intercept(\"print 'hi'\", 2, globals(), locals(), PRINTING=True)
    return 1
__witness__.intercept(\"greet() == 1\", 4, globals(), locals(), COMPARING=True)
";
        sandbox.run_source(source, &mut scope, "t.py").expect("nested hook call runs");
    }
    assert_eq!(buffer.borrow().as_str(), "hi\n");
    assert_eq!(
        recorder.calls.into_inner(),
        vec![
            ("print 'hi'".to_string(), 2, false, String::new()),
            ("greet() == 1".to_string(), 4, true, "True".to_string()),
        ]
    );
}

#[test]
fn intercept_without_a_hook_fails() {
    let mut sandbox = Sandbox::with_output(SandboxConfig::default(), SharedOutput::new(NullSink));
    let mut scope = module_with_hook();
    let exc = sandbox
        .run_source("__witness__.intercept('x', 1, globals(), locals())\n", &mut scope, "t.py")
        .expect_err("no hook installed");
    assert_eq!(exc.to_string(), "RuntimeError: no intercept hook is installed");
}

#[test]
fn intercept_arguments_are_checked() {
    let globals = Value::Namespace(Namespace::new());
    let args = vec![Value::str("x"), Value::Int(1), globals.clone(), globals];
    let err = Intercept::from_args(args.clone(), vec![("VERBOSE".to_string(), Value::Bool(true))])
        .expect_err("unknown keyword");
    assert_eq!(
        err.to_string(),
        "TypeError: intercept() got an unexpected keyword argument 'VERBOSE'"
    );
    let call = Intercept::from_args(args, vec![("PRINTING".to_string(), Value::Int(1))]).expect("valid call");
    assert!(call.printing);
    assert!(!call.comparing);
    assert!(Intercept::from_args(vec![Value::str("x")], Vec::new()).is_err());
}
