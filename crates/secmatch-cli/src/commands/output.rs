//! Shared output formatting for scan reports.

use anyhow::Result;
use secmatch_core::{Report, Severity};
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print a report in the specified format.
///
/// `scan_root` and `root_paths` are only used by the Sonar format.
pub fn print(
    report: &Report,
    format: OutputFormat,
    scan_root: &Path,
    root_paths: &[PathBuf],
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Sonar => println!(
            "{}",
            crate::sonar::render(report, scan_root, root_paths)?
        ),
    }
    Ok(())
}

fn print_text(report: &Report) {
    let (high, medium, low) = report.count_by_severity();

    for issue in &report.issues {
        let severity_indicator = match issue.severity {
            Severity::High => "\x1b[31mhigh\x1b[0m",
            Severity::Medium => "\x1b[33mmedium\x1b[0m",
            Severity::Low => "\x1b[34mlow\x1b[0m",
        };

        println!(
            "[{}] {} at {}:{}:{}",
            issue.code,
            issue.rule,
            issue.location.file.display(),
            issue.location.line,
            issue.location.column,
        );
        println!(
            "  {} (confidence: {}): {}",
            severity_indicator, issue.confidence, issue.message
        );
        if let Some(cwe) = &issue.cwe {
            println!("  = cwe: CWE-{} {}", cwe.id, cwe.url);
        }
        if let Some(help) = &issue.help {
            println!("  = help: {help}");
        }
        println!();
    }

    let summary_color = if high > 0 {
        "\x1b[31m"
    } else if medium > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} high, {} medium, {} low issue(s) in {} unit(s), {} suppressed\x1b[0m",
        summary_color, high, medium, low, report.stats.files, report.stats.nosec
    );
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for issue in &report.issues {
        println!("{issue}");
    }
}
