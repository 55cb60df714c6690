//! CLI output formatting for every command.
//!
//! Output leads with the member, not the file: each line names who a card
//! belongs to, with the written path as indented context. Failures carry the
//! member's position in the input list so the spreadsheet row can be found.
//!
//! # Output Format
//!
//! ## Cards
//!
//! ```text
//! Cards
//! 001 Ana_Souza
//!     cards/Ana_Souza.pdf
//! Skipped
//! 002 Bia
//!     failed to load front template templates/front.png: ...
//!
//! Wrote 1 card, skipped 1
//! ```
//!
//! ## Batch
//!
//! ```text
//! Batch
//!     cards/all_cards.pdf (4 pages)
//! 001 Ana Souza
//! 002 Caio
//!
//! Included 2 members, skipped 0
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchReport, MemberFailure};
use crate::pipeline::CardsReport;
use crate::types::Side;
use crate::workspace::WorkspaceStatus;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `root` when it lives inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// `1 card`, `2 cards`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn failure_lines(failures: &[MemberFailure], lines: &mut Vec<String>) {
    if failures.is_empty() {
        return;
    }
    lines.push("Skipped".to_string());
    for f in failures {
        lines.push(format!("{} {}", format_index(f.index + 1), f.name));
        lines.push(format!("{}{}", indent(1), f.error));
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Format the result of writing individual cards.
///
/// Successes are numbered in output order; failures keep their input index.
pub fn format_cards_report(report: &CardsReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if report.successes.is_empty() && report.failures.is_empty() {
        lines.push("No members, nothing generated".to_string());
        return lines;
    }

    if !report.successes.is_empty() {
        lines.push("Cards".to_string());
        for (i, path) in report.successes.iter().enumerate() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("{} {}", format_index(i + 1), stem));
            lines.push(format!("{}{}", indent(1), display_path(path, root)));
        }
    }
    failure_lines(&report.failures, &mut lines);

    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, skipped {}",
        plural(report.success_count(), "card"),
        report.failure_count()
    ));
    lines
}

pub fn print_cards_report(report: &CardsReport, root: &Path) {
    for line in format_cards_report(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format the result of a batch run. `None` means there were no members.
pub fn format_batch_report(report: Option<&BatchReport>, root: &Path) -> Vec<String> {
    let Some(report) = report else {
        return vec!["No members, batch document not written".to_string()];
    };

    let mut lines = vec![
        "Batch".to_string(),
        format!(
            "{}{} ({})",
            indent(1),
            display_path(&report.path, root),
            plural(report.page_count, "page")
        ),
    ];
    for (i, name) in report.tally.successes.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), name));
    }
    failure_lines(&report.tally.failures, &mut lines);

    lines.push(String::new());
    lines.push(format!(
        "Included {}, skipped {}",
        plural(report.tally.success_count(), "member"),
        report.tally.failure_count()
    ));
    lines
}

pub fn print_batch_report(report: Option<&BatchReport>, root: &Path) {
    for line in format_batch_report(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Workspace
// ============================================================================

pub fn format_status(status: &WorkspaceStatus, root: &Path) -> Vec<String> {
    let present = |ok: bool| if ok { "present" } else { "missing" };
    vec![
        format!("Workspace {}", root.display()),
        format!("{}front template: {}", indent(1), present(status.front_template)),
        format!("{}back template: {}", indent(1), present(status.back_template)),
        format!("{}photos: {}", indent(1), status.photo_count),
        format!("{}cards: {}", indent(1), status.card_count),
        format!("{}batch document: {}", indent(1), present(status.batch_exists)),
    ]
}

pub fn print_status(status: &WorkspaceStatus, root: &Path) {
    for line in format_status(status, root) {
        println!("{}", line);
    }
}

/// Format the upfront template check.
pub fn format_template_check(missing: &[(Side, PathBuf)], root: &Path) -> Vec<String> {
    if missing.is_empty() {
        return vec!["Templates OK".to_string()];
    }
    let mut lines = vec!["Missing templates".to_string()];
    for (side, path) in missing {
        lines.push(format!("{}{side}: {}", indent(1), display_path(path, root)));
    }
    lines
}

pub fn print_template_check(missing: &[(Side, PathBuf)], root: &Path) {
    for line in format_template_check(missing, root) {
        println!("{}", line);
    }
}

pub fn format_reset(removed: &[PathBuf], root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = removed
        .iter()
        .map(|p| format!("removed {}", display_path(p, root)))
        .collect();
    lines.push(format!("Removed {}", plural(removed.len(), "file")));
    lines
}

pub fn print_reset(removed: &[PathBuf], root: &Path) {
    for line in format_reset(removed, root) {
        println!("{}", line);
    }
}
