//! Error types for the syntax frontend.
//!
//! The lexer and parser collect [`CompileError`]s (message + byte span). The public codec entry
//! points fold those into a single [`SyntaxError`], which renders through `miette` with the
//! offending source line labelled. Tree operations that are not about source text fail with
//! [`TreeError`].

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use witness_core::lang::kinds::Kind;

use crate::cst::Span;

/// A single lexer or parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// Source text that could not be tokenized or parsed.
///
/// Carries the first error for display plus every error that was collected.
#[derive(Error, Diagnostic, Debug, Clone)]
#[error("invalid syntax on line {line}: {message}")]
#[diagnostic(code(witness::syntax))]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line of the first error.
    pub line: usize,
    #[source_code]
    pub src: Arc<NamedSource<String>>,
    #[label("here")]
    pub span: SourceSpan,
    #[help]
    pub help: Option<String>,
    pub errors: Vec<CompileError>,
}

impl SyntaxError {
    /// Build from the collected errors. An empty list yields a generic message at offset 0.
    pub fn from_errors(source: &str, errors: Vec<CompileError>) -> Self {
        let (message, span, help) = match errors.first() {
            Some(first) => (first.message.clone(), first.span, first.hints.first().cloned()),
            None => ("invalid syntax".to_string(), Span::default(), None),
        };
        let start = span.start.min(source.len());
        Self {
            message,
            line: line_of_offset(source, start),
            src: Arc::new(NamedSource::new("<source>", source.to_string())),
            span: SourceSpan::new(start.into(), span.len().max(1).min(source.len() - start)),
            help,
            errors,
        }
    }

    /// Attach a display name (usually the file path) to the source.
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        let text = self.src.inner().clone();
        self.src = Arc::new(NamedSource::new(name, text));
        self
    }
}

/// 1-based line number of a byte offset.
pub fn line_of_offset(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|b| **b == b'\n').count() + 1
}

/// Failures of the tree codec and query operations.
#[derive(Error, Diagnostic, Debug, Clone)]
pub enum TreeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("unknown node kind: {0}")]
    #[diagnostic(code(witness::tree::unknown_kind))]
    UnknownKind(String),

    #[error("expected a stmt node, found {found}")]
    #[diagnostic(code(witness::tree::not_a_statement))]
    NotAStatement { found: Kind },

    #[error("cannot re-parse a tree rooted at {found}")]
    #[diagnostic(code(witness::tree::invalid_root))]
    InvalidRoot { found: Kind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_drives_the_message() {
        let source = "x = 1\ny = )\n";
        let errors = vec![
            CompileError::syntax("unexpected ')'".to_string(), Span::new(10, 11)),
            CompileError::syntax("later".to_string(), Span::new(11, 12)),
        ];
        let err = SyntaxError::from_errors(source, errors);
        assert_eq!(err.line, 2);
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.to_string(), "invalid syntax on line 2: unexpected ')'");
    }

    #[test]
    fn span_is_clamped_to_source() {
        let err = SyntaxError::from_errors("f(1,", vec![CompileError::syntax("eof".into(), Span::new(4, 4))]);
        assert_eq!(err.span.offset(), 4);
        assert_eq!(err.span.len(), 0);
    }

    #[test]
    fn tree_error_wraps_syntax() {
        let err: TreeError = SyntaxError::from_errors("", Vec::new()).into();
        assert!(matches!(err, TreeError::Syntax(_)));
        assert_eq!(err.to_string(), "invalid syntax on line 1: invalid syntax");
    }
}
