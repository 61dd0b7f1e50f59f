//! Standard-output plumbing for the sandbox.
//!
//! Everything a running program writes (`print`, `pprint`) goes through the sandbox's current
//! [`SharedOutput`]. The driver swaps that sink for a capture buffer for the duration of a run with
//! [`StdoutRedirect`].

use std::cell::RefCell;
use std::io::Write as _;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use super::Sandbox;

/// Destination for program output.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Discards everything.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// Writes straight to the process's standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // Nothing sensible to do with a closed stdout; the report is lost either way.
        let _ = stdout.write_all(text.as_bytes());
    }
}

/// Collects output into a string.
#[derive(Debug, Default, Clone)]
pub struct CaptureBuffer {
    buffer: String,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Take the collected text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl OutputSink for CaptureBuffer {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Shared, mutable handle to an output sink.
#[derive(Clone)]
pub struct SharedOutput(pub Rc<RefCell<dyn OutputSink>>);

impl SharedOutput {
    pub fn new<T: OutputSink + 'static>(sink: T) -> Self {
        SharedOutput(Rc::new(RefCell::new(sink)))
    }

    /// Share an existing capture buffer, so the owner can read what was written.
    pub fn capture(buffer: &Rc<RefCell<CaptureBuffer>>) -> Self {
        let sink: Rc<RefCell<dyn OutputSink>> = buffer.clone();
        SharedOutput(sink)
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

impl std::fmt::Debug for SharedOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedOutput")
    }
}

/// Scoped replacement of a sandbox's standard output.
///
/// The previous sink is restored when the guard drops, whether the run finished, raised, or
/// unwound. The guard dereferences to the sandbox so the run happens through it.
pub struct StdoutRedirect<'s, 'h> {
    sandbox: &'s mut Sandbox<'h>,
    previous: Option<SharedOutput>,
}

impl<'s, 'h> StdoutRedirect<'s, 'h> {
    pub fn install(sandbox: &'s mut Sandbox<'h>, sink: SharedOutput) -> Self {
        let previous = sandbox.replace_stdout(sink);
        Self {
            sandbox,
            previous: Some(previous),
        }
    }
}

impl<'h> Deref for StdoutRedirect<'_, 'h> {
    type Target = Sandbox<'h>;

    fn deref(&self) -> &Self::Target {
        self.sandbox
    }
}

impl DerefMut for StdoutRedirect<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sandbox
    }
}

impl Drop for StdoutRedirect<'_, '_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.sandbox.replace_stdout(previous);
        }
    }
}
