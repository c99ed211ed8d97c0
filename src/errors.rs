//! Declassify Error Handling - Unified Encapsulated API
//!
//! Every failure mode of the pipeline is represented by a single
//! [`DeclassifyError`] struct: what went wrong ([`ErrorKind`]), where it
//! happened ([`SourceInfo`]), and how to present it ([`DiagnosticInfo`]).

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Represents source context for error reporting: the file name and the
/// full original text it was read from.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable, e.g. for I/O
    /// failures that occur before any file content has been read.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("// {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

/// The single error type - no wrapper, no variants, just essential data.
#[derive(Debug)]
pub struct DeclassifyError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened (context-specific source information)
    pub source_info: SourceInfo,
    /// How to help (auto-populated based on context)
    pub diagnostic_info: DiagnosticInfo,
}

/// All error types as a clean enum - no duplicate fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Input errors - the requested root is unusable before any file is touched
    #[error("Input error: '{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("Input error: '{}' is not a file or directory", path.display())]
    InvalidPath { path: PathBuf },

    // Parse errors - structural and syntactic issues in one source file
    #[error("Parse error: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Parse error: unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("Parse error: malformed {construct}")]
    MalformedConstruct { construct: String },

    // Render errors - edit buffer invariant violations
    #[error("Render error: conflicting edits: {detail}")]
    EditConflict { detail: String },
    #[error("Render error: edit range {start}..{end} outside token stream of {len} tokens")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    // I/O errors
    #[error("I/O error: failed to read '{}': {detail}", path.display())]
    ReadFailed { path: PathBuf, detail: String },
    #[error("I/O error: failed to write '{}': {detail}", path.display())]
    WriteFailed { path: PathBuf, detail: String },
    #[error("I/O error: failed to walk directory: {detail}")]
    WalkFailed { detail: String },
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error category for exit-code decisions and test assertions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotADirectory { .. } | Self::InvalidPath { .. } => ErrorCategory::Input,

            Self::UnexpectedToken { .. }
            | Self::UnexpectedEof { .. }
            | Self::MalformedConstruct { .. } => ErrorCategory::Parse,

            Self::EditConflict { .. } | Self::EditOutOfBounds { .. } => ErrorCategory::Render,

            Self::ReadFailed { .. } | Self::WriteFailed { .. } | Self::WalkFailed { .. } => {
                ErrorCategory::Io
            }
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::NotADirectory { .. } => "not_a_directory",
            Self::InvalidPath { .. } => "invalid_path",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::MalformedConstruct { .. } => "malformed_construct",
            Self::EditConflict { .. } => "edit_conflict",
            Self::EditOutOfBounds { .. } => "edit_out_of_bounds",
            Self::ReadFailed { .. } => "read_failed",
            Self::WriteFailed { .. } => "write_failed",
            Self::WalkFailed { .. } => "walk_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Parse,
    Render,
    Io,
}

impl std::error::Error for DeclassifyError {}

impl fmt::Display for DeclassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for DeclassifyError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl DeclassifyError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::NotADirectory { .. } => "not a directory".into(),
            ErrorKind::InvalidPath { .. } => "invalid path".into(),
            ErrorKind::UnexpectedToken { .. } => "unexpected token".into(),
            ErrorKind::UnexpectedEof { .. } => "file ends here".into(),
            ErrorKind::MalformedConstruct { .. } => "malformed syntax".into(),
            ErrorKind::EditConflict { .. } => "conflicting edits".into(),
            ErrorKind::EditOutOfBounds { .. } => "edit out of bounds".into(),
            ErrorKind::ReadFailed { .. } => "unreadable file".into(),
            ErrorKind::WriteFailed { .. } => "unwritable file".into(),
            ErrorKind::WalkFailed { .. } => "walk failed".into(),
        }
    }
}

// ============================================================================
// ERROR CREATION CONTEXTS
// ============================================================================

/// Context-aware error creation - each context knows how to create
/// appropriately coded and sourced errors for its phase.
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> DeclassifyError;

    fn unexpected_token(&self, expected: &str, found: &str, span: SourceSpan) -> DeclassifyError {
        self.report(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    fn unexpected_eof(&self, expected: &str, span: SourceSpan) -> DeclassifyError {
        self.report(
            ErrorKind::UnexpectedEof {
                expected: expected.into(),
            },
            span,
        )
    }

    fn malformed(&self, construct: &str, span: SourceSpan) -> DeclassifyError {
        self.report(
            ErrorKind::MalformedConstruct {
                construct: construct.into(),
            },
            span,
        )
    }
}

/// General-purpose error creation context used throughout the pipeline
/// for creating properly contextualized DeclassifyError instances.
pub struct ReportingContext {
    pub source: SourceContext,
    pub phase: String,
}

impl ReportingContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for ReportingContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> DeclassifyError {
        let error_code = format!("declassify::{}::{}", self.phase, kind.code_suffix());

        DeclassifyError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Standalone constructor for errors not tied to a particular source file:
/// input validation, directory walks, write-back, and edit-buffer invariant
/// violations.
pub fn contextless(kind: ErrorKind) -> DeclassifyError {
    let phase = match kind.category() {
        ErrorCategory::Input => "input",
        ErrorCategory::Parse => "parse",
        ErrorCategory::Render => "render",
        ErrorCategory::Io => "io",
    };
    let error_code = format!("declassify::{}::{}", phase, kind.code_suffix());
    DeclassifyError {
        kind,
        source_info: SourceInfo {
            source: SourceContext::default().to_named_source(),
            primary_span: unspanned(),
            phase: phase.into(),
        },
        diagnostic_info: DiagnosticInfo {
            help: None,
            error_code,
        },
    }
}

/// Creates a placeholder span for errors not tied to a specific source code
/// location, such as I/O errors or internal application state failures.
/// This makes the intent of using an empty span explicit and searchable.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a syntax Span to a miette SourceSpan.
pub fn to_source_span(span: crate::syntax::Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a DeclassifyError with full miette diagnostics.
///
/// This provides rich error formatting with source spans and context.
/// Use this for user-facing error display in CLI contexts.
pub fn print_error(error: DeclassifyError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
