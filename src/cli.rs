//! The Declassify Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::args::{Command, DeclassifyArgs};
use crate::engine::{self, RefactorOptions};
use crate::errors;
use crate::DeclassifyError;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
///
/// Exits non-zero only for input-validation or root-level I/O failures;
/// ordinary classifications and isolated per-file failures exit zero.
pub fn run() {
    let args = DeclassifyArgs::parse();

    let result = match args.command {
        Command::Convert { path, dry_run } => handle_convert(&path, dry_run),
        Command::Metrics { path, json } => handle_metrics(&path, json),
        Command::Ast { file } => handle_ast(&file),
    };

    if let Err(e) = result {
        errors::print_error(e);
        process::exit(1);
    }
}

/// Handles the `convert` subcommand.
fn handle_convert(path: &Path, dry_run: bool) -> Result<(), DeclassifyError> {
    let batch = engine::refactor_path(path, RefactorOptions { dry_run })?;
    output::print_batch(&batch, dry_run);
    Ok(())
}

/// Handles the `metrics` subcommand.
fn handle_metrics(path: &Path, json: bool) -> Result<(), DeclassifyError> {
    let analysis = engine::analyze_path(path)?;
    if json {
        let rendered = serde_json::to_string_pretty(&analysis.report)
            .expect("metrics report serializes to JSON");
        println!("{rendered}");
    } else {
        print!("{}", analysis.report.to_text());
    }
    output::print_failures(&analysis.failures);
    Ok(())
}

/// Handles the `ast` subcommand. A direct request for one file's tree
/// propagates its parse error, unlike the batch drivers.
fn handle_ast(file: &Path) -> Result<(), DeclassifyError> {
    if !file.is_file() {
        return Err(errors::contextless(errors::ErrorKind::InvalidPath {
            path: file.to_path_buf(),
        }));
    }
    let unit = engine::parse_file(file)?;
    println!("{unit:#?}");
    Ok(())
}
