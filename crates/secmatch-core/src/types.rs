//! Core types for findings and scan results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low impact.
    Low,
    /// Medium impact.
    Medium,
    /// High impact.
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// How sure a rule is that the finding is real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Likely noise.
    Low,
    /// Plausible.
    Medium,
    /// Almost certainly real.
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A CWE weakness reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cwe {
    /// CWE number, e.g. `"338"`.
    pub id: String,
    /// Link to the MITRE entry.
    pub url: String,
}

impl Cwe {
    /// Creates a CWE reference from its number.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            url: format!("https://cwe.mitre.org/data/definitions/{id}.html"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the Go source file.
    pub file: PathBuf,
    /// First line (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// Last line of the flagged construct.
    pub end_line: usize,
}

impl Location {
    /// Creates a single-line location.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: line,
        }
    }

    /// Sets the last line of the range.
    #[must_use]
    pub fn with_end_line(mut self, end_line: usize) -> Self {
        self.end_line = end_line.max(self.line);
        self
    }

    /// Line range as `"12"` or `"12-14"`.
    #[must_use]
    pub fn line_range(&self) -> String {
        if self.end_line > self.line {
            format!("{}-{}", self.line, self.end_line)
        } else {
            self.line.to_string()
        }
    }
}

/// A finding produced by a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g., "G404").
    pub code: String,
    /// Rule name (e.g., "weak-rand").
    pub rule: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Confidence of this finding.
    pub confidence: Confidence,
    /// Weakness reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwe: Option<Cwe>,
    /// Where the finding is.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Issue {
    /// Creates a new issue with high confidence.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            confidence: Confidence::High,
            cwe: None,
            location,
            message: message.into(),
            help: None,
        }
    }

    /// Sets the confidence.
    #[must_use]
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attaches a CWE reference.
    #[must_use]
    pub fn with_cwe(mut self, id: &str) -> Self {
        self.cwe = Some(Cwe::new(id));
        self
    }

    /// Adds a remediation hint.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Units checked.
    pub files: usize,
    /// Issues reported.
    pub found: usize,
    /// Issues suppressed with `#nosec`.
    pub nosec: usize,
}

/// Result of running a scan.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// All issues found.
    pub issues: Vec<Issue>,
    /// Scan counters.
    pub stats: Stats,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts issues by severity as `(high, medium, low)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.issues.iter().filter(|i| i.severity == severity).count();
        (
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        )
    }

    /// Returns issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Checks if any issue meets or exceeds both thresholds.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity, confidence: Confidence) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity >= severity && i.confidence >= confidence)
    }

    /// Sorts issues by file, line, column, then rule code.
    pub fn sort(&mut self) {
        self.issues.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
    }

    /// Adds issues and counters from another report.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.stats.files += other.stats.files;
        self.stats.found += other.stats.found;
        self.stats.nosec += other.stats.nosec;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(severity: Severity) -> Issue {
        Issue::new(
            "G404",
            "weak-rand",
            severity,
            Location::new(PathBuf::from("main.go"), 12, 2),
            "Use of weak random number generator",
        )
    }

    #[test]
    fn display_is_compact_one_liner() {
        insta::assert_snapshot!(
            make_issue(Severity::High).to_string(),
            @"main.go:12:2: high [G404] Use of weak random number generator"
        );
    }

    #[test]
    fn cwe_links_to_mitre() {
        let issue = make_issue(Severity::High).with_cwe("338");
        let cwe = issue.cwe.expect("cwe attached");
        assert_eq!(cwe.url, "https://cwe.mitre.org/data/definitions/338.html");
    }

    #[test]
    fn line_range_spans_multiple_lines() {
        let loc = Location::new(PathBuf::from("a.go"), 3, 1);
        assert_eq!(loc.line_range(), "3");
        assert_eq!(loc.with_end_line(5).line_range(), "3-5");
    }

    #[test]
    fn has_issues_at_respects_both_thresholds() {
        let mut report = Report::new();
        report
            .issues
            .push(make_issue(Severity::Medium).with_confidence(Confidence::Low));

        assert!(report.has_issues_at(Severity::Low, Confidence::Low));
        assert!(!report.has_issues_at(Severity::High, Confidence::Low));
        assert!(!report.has_issues_at(Severity::Low, Confidence::Medium));
    }

    #[test]
    fn count_by_severity_splits_levels() {
        let mut report = Report::new();
        report.issues.push(make_issue(Severity::High));
        report.issues.push(make_issue(Severity::High));
        report.issues.push(make_issue(Severity::Low));
        assert_eq!(report.count_by_severity(), (2, 0, 1));
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert!("critical".parse::<Severity>().is_err());
    }
}
