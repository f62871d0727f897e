use std::fmt;

use thiserror::Error;

/// Classification of a fatal interpreter failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    EmptyStackAccess,
    UnknownOperator,
    UnsupportedOperandTypes,
    TypeConversionError,
    IndexOutOfRange,
    DivisionByZero,
    UnbalancedSpan,
    EndOfInput,
}

/// Rich diagnostic information surfaced to end users.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the interpreter and its command line front end.
#[derive(Debug, Error)]
pub enum StackGolfError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StackGolfError {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::Diagnostic(Diagnostic::new(kind, message))
    }

    /// The failure kind, if this error came from the interpreter core.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        match self {
            Self::Diagnostic(diagnostic) => Some(diagnostic.kind),
            Self::Io(_) => None,
        }
    }

    pub fn with_note(self, note: impl Into<String>) -> Self {
        match self {
            Self::Diagnostic(diagnostic) => Self::Diagnostic(diagnostic.with_note(note)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackGolfError>;
