//! Refactoring Orchestrator
//!
//! Drives one classifier per file: lex, parse, walk, render, write back.
//! Files are independent - a failure in one is recorded and the batch
//! continues - and nothing is written unless at least one class in the
//! file converted. The metrics pipeline lives here too, sharing the same
//! per-file isolation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::analysis::classifier::{ClassReport, Classifier};
use crate::analysis::metrics::{ClassMetrics, MetricsAnalyzer, MetricsReport};
use crate::analysis::walk;
use crate::ast::CompilationUnit;
use crate::discovery;
use crate::errors::{contextless, ErrorKind, SourceContext};
use crate::syntax::{lexer, parser};
use crate::DeclassifyError;

// ============================================================================
// RUN CONFIGURATION AND RESULTS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct RefactorOptions {
    /// Classify and report without writing any file.
    pub dry_run: bool,
}

/// What one file's refactoring run produced.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub reports: Vec<ClassReport>,
    pub converted: usize,
    pub rewritten: bool,
}

/// A file whose run was abandoned; the file on disk is untouched.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: DeclassifyError,
}

/// Batch totals across all processed files.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub classes_converted: usize,
}

/// Outcome of classifying a single source text.
#[derive(Debug)]
pub struct SourceOutcome {
    pub reports: Vec<ClassReport>,
    pub converted: usize,
    /// Rendered text, present only when at least one class converted.
    pub rendered: Option<String>,
}

// ============================================================================
// PER-FILE PIPELINE
// ============================================================================

/// Classify one source text and render the conversion, if any.
///
/// This is the pure core of the tool: no file system access, no output.
pub fn refactor_source(name: &str, source: &str) -> Result<SourceOutcome, DeclassifyError> {
    let ctx = SourceContext::from_file(name, source);
    let stream = lexer::tokenize(source, &ctx)?;
    let unit = parser::parse(&stream, &ctx)?;

    let mut classifier = Classifier::new(&stream);
    walk(&unit, &mut classifier);
    let outcome = classifier.finish();

    let rendered = if outcome.converted > 0 {
        Some(outcome.rewriter.render()?)
    } else {
        None
    };

    Ok(SourceOutcome {
        reports: outcome.reports,
        converted: outcome.converted,
        rendered,
    })
}

/// Refactor one file on disk, writing back only when something converted.
pub fn refactor_file(path: &Path, options: RefactorOptions) -> Result<FileReport, DeclassifyError> {
    let source = fs::read_to_string(path).map_err(|e| {
        contextless(ErrorKind::ReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    })?;

    let outcome = refactor_source(&path.display().to_string(), &source)?;

    let mut rewritten = false;
    if let Some(text) = &outcome.rendered {
        if !options.dry_run {
            write_atomic(path, text)?;
            rewritten = true;
        }
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        reports: outcome.reports,
        converted: outcome.converted,
        rewritten,
    })
}

/// All-or-nothing write: the rendered text lands in a temporary file next
/// to the target and is renamed over it, so a failed write leaves the
/// original intact.
fn write_atomic(path: &Path, text: &str) -> Result<(), DeclassifyError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));

    let write_failed = |detail: String| {
        contextless(ErrorKind::WriteFailed {
            path: path.to_path_buf(),
            detail,
        })
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
    temp.write_all(text.as_bytes())
        .map_err(|e| write_failed(e.to_string()))?;
    temp.persist(path).map_err(|e| write_failed(e.to_string()))?;
    Ok(())
}

// ============================================================================
// BATCH DRIVER
// ============================================================================

/// Refactor a file or every `.java` file under a directory.
///
/// Per-file parse and render failures are recorded and the batch continues;
/// only an unusable root path is an error. The running conversion total is
/// updated once per completed file.
pub fn refactor_path(path: &Path, options: RefactorOptions) -> Result<BatchReport, DeclassifyError> {
    let files = resolve_root(path)?;

    let mut batch = BatchReport::default();
    for file in files {
        match refactor_file(&file, options) {
            Ok(report) => {
                batch.classes_converted += report.converted;
                batch.files.push(report);
            }
            Err(error) => batch.failures.push(FileFailure { path: file, error }),
        }
    }
    Ok(batch)
}

fn resolve_root(path: &Path) -> Result<Vec<PathBuf>, DeclassifyError> {
    if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else if path.is_dir() {
        discovery::discover_java_files(path)
    } else {
        Err(contextless(ErrorKind::InvalidPath {
            path: path.to_path_buf(),
        }))
    }
}

// ============================================================================
// METRICS PIPELINE
// ============================================================================

/// Outcome of a metrics run over a file or directory.
#[derive(Debug, Default)]
pub struct MetricsAnalysis {
    pub report: MetricsReport,
    pub failures: Vec<FileFailure>,
}

/// Compute per-class metrics for one source text.
pub fn analyze_source(name: &str, source: &str) -> Result<Vec<ClassMetrics>, DeclassifyError> {
    let ctx = SourceContext::from_file(name, source);
    let stream = lexer::tokenize(source, &ctx)?;
    let unit = parser::parse(&stream, &ctx)?;

    let mut analyzer = MetricsAnalyzer::new();
    walk(&unit, &mut analyzer);
    Ok(analyzer.into_classes())
}

/// Compute metrics for a file or every `.java` file under a directory,
/// with the same per-file isolation as the refactoring driver.
pub fn analyze_path(path: &Path) -> Result<MetricsAnalysis, DeclassifyError> {
    let files = resolve_root(path)?;

    let mut analysis = MetricsAnalysis::default();
    for file in files {
        let run = fs::read_to_string(&file)
            .map_err(|e| {
                contextless(ErrorKind::ReadFailed {
                    path: file.clone(),
                    detail: e.to_string(),
                })
            })
            .and_then(|source| analyze_source(&file.display().to_string(), &source));
        match run {
            Ok(classes) => analysis.report.extend(classes),
            Err(error) => analysis.failures.push(FileFailure { path: file, error }),
        }
    }
    Ok(analysis)
}

// ============================================================================
// PARSE-ONLY ENTRY (debugging aid for the `ast` subcommand)
// ============================================================================

/// Parse one file into its declaration tree without classifying it.
pub fn parse_file(path: &Path) -> Result<CompilationUnit, DeclassifyError> {
    let source = fs::read_to_string(path).map_err(|e| {
        contextless(ErrorKind::ReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    })?;
    let ctx = SourceContext::from_file(path.display().to_string(), &source);
    let stream = lexer::tokenize(&source, &ctx)?;
    parser::parse(&stream, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::Eligibility;

    #[test]
    fn refactor_source_reports_without_rendering_when_nothing_converts() {
        let outcome = refactor_source("test.java", "class A { void m() { } }").unwrap();
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.converted, 0);
        assert!(outcome.rendered.is_none());
    }

    #[test]
    fn refactor_source_renders_when_a_class_converts() {
        let outcome =
            refactor_source("test.java", "abstract class A { abstract void m(); }").unwrap();
        assert_eq!(outcome.reports[0].eligibility, Eligibility::Converted);
        assert_eq!(
            outcome.rendered.as_deref(),
            Some("interface A {  void m(); }")
        );
    }

    #[test]
    fn malformed_source_is_a_parse_error() {
        assert!(refactor_source("test.java", "class A {").is_err());
    }
}
