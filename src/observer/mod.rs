//! Executes a rewritten program and turns what the hook sees into a report.
//!
//! An [`Observer`] serves one program run: it is installed as the sandbox's intercept hook,
//! tallies every test the rewritten program hands it, and captures both its own section blocks
//! and the program's output into one buffer. [`Observer::report`] wraps that buffer in summaries.

mod report;
mod tally;

pub use report::{Section, WIDTH, center, executive_heading, h1, h2, h3, percent_label, render, summary};
pub use tally::{Stopwatch, Tally};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use witness_core::lang::symbols::SymbolId;
use witness_syntax::{Node, codec, query};

use crate::interpolator::{HOOK_NAME, InterpolateError, Interpolator};
use crate::runtime::{
    CaptureBuffer, Exception, Intercept, InterceptHook, Namespace, NullSink, OutputSink, Sandbox, SandboxConfig,
    Scope, SharedOutput, StdoutRedirect, Value,
};

/// Settings for one observed run.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    pub hook_name: String,
    /// Filename shown in tracebacks, and used to find the crashing line of the original source.
    pub filename: String,
    /// Embed passing files' reports in an executive summary as well.
    pub embed_passing: bool,
    pub sandbox: SandboxConfig,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            hook_name: HOOK_NAME.to_string(),
            filename: "<test>".to_string(),
            embed_passing: false,
            sandbox: SandboxConfig::default(),
        }
    }
}

impl ObserverConfig {
    pub fn with_hook_name(mut self, hook_name: impl Into<String>) -> Self {
        self.hook_name = hook_name.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_embed_passing(mut self, embed_passing: bool) -> Self {
        self.embed_passing = embed_passing;
        self
    }

    pub fn with_sandbox(mut self, sandbox: SandboxConfig) -> Self {
        self.sandbox = sandbox;
        self
    }
}

/// Where an observer is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Reporting,
}

/// Instrumentation hook and report builder for one program run.
///
/// Hook calls nest when a test or print calls user code that prints, so the counters and the
/// buffer use interior mutability and no borrow is held while the sandbox runs.
#[derive(Debug)]
pub struct Observer {
    config: ObserverConfig,
    tally: Cell<Tally>,
    buffer: Rc<RefCell<CaptureBuffer>>,
    stopwatch: Stopwatch,
    phase: Phase,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(ObserverConfig::default())
    }
}

impl Observer {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            tally: Cell::new(Tally::default()),
            buffer: Rc::new(RefCell::new(CaptureBuffer::new())),
            stopwatch: Stopwatch::default(),
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn tally(&self) -> Tally {
        self.tally.get()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Everything captured so far: section blocks and program output, in order.
    pub fn captured(&self) -> String {
        self.buffer.borrow().as_str().to_string()
    }

    pub fn start_timer(&mut self) {
        self.stopwatch.start();
    }

    pub fn stop_timer(&mut self) {
        self.stopwatch.stop();
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs()
    }

    fn emit(&self, text: &str) {
        self.buffer.borrow_mut().emit(text);
    }

    fn count(&self, bump: impl FnOnce(&mut Tally)) {
        let mut tally = self.tally.get();
        bump(&mut tally);
        self.tally.set(tally);
    }

    /// Run `rewritten` as the whole program with this observer bound under the hook name.
    ///
    /// If the program raises outside any intercepted statement, `original` is re-run on its own
    /// so the crash is reported against the user's real source, and the run ends there.
    #[tracing::instrument(skip_all, fields(filename = %self.config.filename))]
    pub fn run(&mut self, rewritten: &str, original: &str) -> Tally {
        self.phase = Phase::Running;
        let hook_name = self.config.hook_name.clone();
        let filename = self.config.filename.clone();
        let sandbox_config = self.config.sandbox.clone();
        let buffer = Rc::clone(&self.buffer);

        let outcome = {
            let mut sandbox = Sandbox::new(sandbox_config);
            sandbox.install_hook(&*self);
            let mut redirected = StdoutRedirect::install(&mut sandbox, SharedOutput::capture(&buffer));
            let globals = Namespace::new();
            globals.set(hook_name, Value::Hook);
            let mut scope = Scope::module(globals);
            redirected.run_source(rewritten, &mut scope, &filename)
        };

        if let Err(exc) = outcome {
            self.crisis(&exc, original);
        }
        self.tally()
    }

    fn crisis(&self, rewritten_failure: &Exception, original: &str) {
        tracing::warn!(
            filename = %self.config.filename,
            error = %rewritten_failure,
            "rewritten program raised; re-running the original source"
        );
        let mut sandbox = Sandbox::with_output(self.config.sandbox.clone(), SharedOutput::new(NullSink));
        let mut scope = Scope::module(Namespace::new());
        let (text, line, traceback) = match sandbox.run_source(original, &mut scope, &self.config.filename) {
            Err(exc) => {
                let line = exc
                    .traceback
                    .iter()
                    .rev()
                    .find(|frame| *frame.filename == *self.config.filename)
                    .and_then(|frame| frame.line);
                let text = line
                    .and_then(|n| original.lines().nth((n as usize).saturating_sub(1)))
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                (text, line.map_or(-1, i64::from), exc.render_traceback())
            }
            // Only the rewritten program fails; report what it raised.
            Ok(()) => (
                rewritten_failure.to_string(),
                -1,
                rewritten_failure.render_traceback(),
            ),
        };
        self.emit(&h2(Section::Crisis, &text, line));
        self.emit(&traceback);
        self.emit("\n\n");
        self.count(|tally| tally.other_exceptions += 1);
    }

    fn compare(&self, sandbox: &mut Sandbox<'_>, call: &Intercept) {
        let scope = call.scope();
        match sandbox.eval_source(&call.source, &scope) {
            Ok(value) if value.truthy() => self.count(|tally| tally.passes += 1),
            Ok(_) => {
                self.count(|tally| tally.failures += 1);
                self.emit(&h2(Section::Failure, &call.source, call.line));
                for (text, value) in operands(sandbox, &call.source, &scope) {
                    if text != value {
                        self.emit(&h3(&text, &value));
                    }
                }
                self.emit("\n\n");
            }
            Err(exc) => {
                self.count(|tally| tally.exceptions += 1);
                self.emit(&h2(Section::Exception, &call.source, call.line));
                self.emit(&exc.render_traceback());
                self.emit("\n\n");
            }
        }
    }

    fn print(&self, sandbox: &mut Sandbox<'_>, call: &Intercept) {
        self.emit(&h2(Section::Output, &call.source, call.line));
        let mut scope = call.scope();
        if let Err(exc) = sandbox.exec_source(&call.source, &mut scope) {
            self.count(|tally| tally.other_exceptions += 1);
            self.emit(&exc.render_traceback());
        }
        self.emit("\n\n");
    }

    /// Render the full report under `heading`.
    pub fn report(&mut self, heading: &str) -> String {
        self.phase = Phase::Reporting;
        render(heading, &self.tally(), self.elapsed_secs(), &self.captured())
    }
}

impl InterceptHook for Observer {
    fn intercept(&self, sandbox: &mut Sandbox<'_>, call: Intercept) -> Result<(), Exception> {
        if call.comparing {
            self.compare(sandbox, &call);
        }
        if call.printing {
            self.print(sandbox, &call);
        }
        Ok(())
    }
}

/// Text and string value of each direct operand of the first comparison in `source` that has an
/// operator. An operand that raises shows the exception summary as its value.
fn operands(sandbox: &mut Sandbox<'_>, source: &str, scope: &Scope) -> Vec<(String, String)> {
    let Ok(tree) = codec::parse_expression(source, false) else {
        return Vec::new();
    };
    let Some(comparison) = first_comparison(&tree) else {
        return Vec::new();
    };
    comparison
        .children()
        .iter()
        .filter(|child| child.is(SymbolId::Expr))
        .map(|operand| {
            let text = codec::serialize(operand);
            let value = match sandbox.eval_source(&text, scope) {
                Ok(value) => value.to_str(),
                Err(exc) => exc.to_string(),
            };
            (text, value)
        })
        .collect()
}

fn first_comparison(tree: &Node) -> Option<&Node> {
    query::find_all(tree, SymbolId::Comparison)
        .ok()?
        .into_iter()
        .find(|comparison| query::contains(*comparison, SymbolId::CompOp).unwrap_or(false))
}

/// The outcome of testing one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub filename: String,
    pub tally: Tally,
    pub elapsed_secs: f64,
    /// The file's full report, summaries included.
    pub report: String,
    /// Whether an executive summary shows the full report.
    pub embed: bool,
}

/// Rewrite, run, and report one program.
///
/// ## Errors
/// Only rewriting can fail, when `source` does not parse. Everything the program itself does
/// wrong ends up in the report.
pub fn test_source(source: &str, config: ObserverConfig) -> Result<FileReport, InterpolateError> {
    let rewritten = Interpolator::new(config.hook_name.clone()).interpolate(source)?;
    let filename = config.filename.clone();
    let embed_passing = config.embed_passing;
    let mut observer = Observer::new(config);
    observer.start_timer();
    observer.run(&rewritten, source);
    observer.stop_timer();
    let tally = observer.tally();
    Ok(FileReport {
        report: observer.report(&filename),
        filename,
        tally,
        elapsed_secs: observer.elapsed_secs(),
        embed: embed_passing || tally.has_problems(),
    })
}

/// Aggregate of several file reports.
#[derive(Debug, Default)]
pub struct ExecutiveSummary {
    files: usize,
    tally: Tally,
    elapsed_secs: f64,
    body: String,
}

impl ExecutiveSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `file` in, embedding its report when it asks to be.
    pub fn add(&mut self, file: &FileReport) {
        self.files += 1;
        self.tally += file.tally;
        self.elapsed_secs += file.elapsed_secs;
        if file.embed {
            self.body.push_str(&file.report);
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn render(&self) -> String {
        render(&executive_heading(self.files), &self.tally, self.elapsed_secs, &self.body)
    }
}
