//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for printing eligibility lines, colorizing
//! output, and reporting skipped files. By centralizing output logic here,
//! we ensure a consistent user experience across all commands.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::analysis::classifier::{ClassReport, Eligibility};
use crate::engine::{BatchReport, FileFailure};

fn stdout_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints one eligibility line per classified class, then the skipped
/// files, then the conversion total.
pub fn print_batch(batch: &BatchReport, dry_run: bool) {
    let mut stdout = StandardStream::stdout(stdout_choice());

    for file in &batch.files {
        for report in &file.reports {
            print_class_report(&mut stdout, report);
        }
    }

    print_failures(&batch.failures);

    let verb = if dry_run { "convertible" } else { "converted" };
    println!("{} class(es) {}.", batch.classes_converted, verb);
}

fn print_class_report(stdout: &mut StandardStream, report: &ClassReport) {
    let color = match report.eligibility {
        Eligibility::Converted => Some(Color::Green),
        Eligibility::NotConvertible => Some(Color::Yellow),
        Eligibility::NotFullyAbstract => None,
    };
    if let Some(color) = color {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }
    println!("{report}");
    let _ = stdout.reset();
}

/// Reports files whose run was abandoned. Their content is untouched on
/// disk, and they never fail the process.
pub fn print_failures(failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    for failure in failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.error);
    }
    let _ = stderr.reset();
}
