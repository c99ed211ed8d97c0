//! Defines the command-line arguments and subcommands for the Declassify CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "declassify",
    version,
    about = "Finds fully abstract Java classes and rewrites them in place as interfaces."
)]
pub struct DeclassifyArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every class and rewrite the convertible ones in place.
    Convert {
        /// A Java source file, or a directory to scan for .java files.
        #[arg(required = true)]
        path: PathBuf,
        /// Report eligibility without writing any file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Report per-class method and attribute counts.
    Metrics {
        /// A Java source file, or a directory to scan for .java files.
        #[arg(required = true)]
        path: PathBuf,
        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Show the declaration tree for a single source file.
    Ast {
        /// The path to the Java source file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
}
