//! SonarQube external issues report.
//!
//! Produces the generic issue import format:
//!
//! ```json
//! {"issues": [{"engineId": "secmatch", "ruleId": "G404", "primaryLocation": {...},
//!              "type": "VULNERABILITY", "severity": "BLOCKER", "effortMinutes": 5}]}
//! ```
//!
//! Issue paths are resolved against the scan root, then reported relative
//! to the first root path that contains them. Issues outside every root
//! path are dropped. Root paths must be absolute.

use secmatch_core::{Issue, Report, Severity};
use serde::Serialize;
use std::path::{Path, PathBuf};

const ENGINE_ID: &str = "secmatch";
const EFFORT_MINUTES: u32 = 5;

/// Top-level Sonar document.
#[derive(Debug, Serialize)]
pub struct SonarReport {
    /// Converted issues.
    pub issues: Vec<SonarIssue>,
}

/// One Sonar issue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarIssue {
    /// Always `"secmatch"`.
    pub engine_id: &'static str,
    /// Rule code, e.g. `"G404"`.
    pub rule_id: String,
    /// Where the issue is.
    pub primary_location: SonarLocation,
    /// Always `"VULNERABILITY"`.
    #[serde(rename = "type")]
    pub issue_type: &'static str,
    /// Sonar severity.
    pub severity: &'static str,
    /// Estimated remediation effort.
    pub effort_minutes: u32,
}

/// Location of a Sonar issue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarLocation {
    /// Issue message.
    pub message: String,
    /// File path relative to its root path.
    pub file_path: String,
    /// Line range.
    pub text_range: TextRange,
}

/// Line range of a Sonar issue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    /// First line.
    pub start_line: usize,
    /// Last line.
    pub end_line: usize,
}

/// Maps a severity onto Sonar's scale.
#[must_use]
pub fn sonar_severity(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "BLOCKER",
        Severity::Medium => "CRITICAL",
        Severity::Low => "MINOR",
    }
}

/// Converts a report, keeping only issues under one of `root_paths`.
#[must_use]
pub fn generate(report: &Report, scan_root: &Path, root_paths: &[PathBuf]) -> SonarReport {
    let issues = report
        .issues
        .iter()
        .filter_map(|issue| {
            let file = scan_root.join(&issue.location.file);
            let file_path = root_paths
                .iter()
                .find_map(|root| file.strip_prefix(root).ok())?;
            Some(convert(issue, file_path))
        })
        .collect();

    SonarReport { issues }
}

/// Serializes a Sonar report indented with tabs.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(
    report: &Report,
    scan_root: &Path,
    root_paths: &[PathBuf],
) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    generate(report, scan_root, root_paths).serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn convert(issue: &Issue, file_path: &Path) -> SonarIssue {
    SonarIssue {
        engine_id: ENGINE_ID,
        rule_id: issue.code.clone(),
        primary_location: SonarLocation {
            message: issue.message.clone(),
            file_path: file_path.to_string_lossy().replace('\\', "/"),
            text_range: TextRange {
                start_line: issue.location.line,
                end_line: issue.location.end_line,
            },
        },
        issue_type: "VULNERABILITY",
        severity: sonar_severity(issue.severity),
        effort_minutes: EFFORT_MINUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secmatch_core::Location;

    fn issue(file: &str, severity: Severity) -> Issue {
        Issue::new(
            "G404",
            "weak-rand",
            severity,
            Location::new(PathBuf::from(file), 12, 2).with_end_line(13),
            "Use of weak random number generator",
        )
    }

    fn report(issues: Vec<Issue>) -> Report {
        Report {
            issues,
            ..Report::default()
        }
    }

    #[test]
    fn converts_issue_fields() {
        let report = report(vec![issue("cmd/main.go", Severity::High)]);
        let sonar = generate(&report, Path::new("/src/app"), &[PathBuf::from("/src/app")]);
        let value = serde_json::to_value(sonar).expect("serializable");

        assert_eq!(
            value,
            serde_json::json!({
                "issues": [{
                    "engineId": "secmatch",
                    "ruleId": "G404",
                    "primaryLocation": {
                        "message": "Use of weak random number generator",
                        "filePath": "cmd/main.go",
                        "textRange": {"startLine": 12, "endLine": 13}
                    },
                    "type": "VULNERABILITY",
                    "severity": "BLOCKER",
                    "effortMinutes": 5
                }]
            })
        );
    }

    #[test]
    fn drops_issues_outside_root_paths() {
        let report = report(vec![
            issue("main.go", Severity::Low),
            issue("/elsewhere/main.go", Severity::Low),
        ]);
        let sonar = generate(&report, Path::new("/src/app"), &[PathBuf::from("/src/app")]);
        assert_eq!(sonar.issues.len(), 1);
        assert_eq!(sonar.issues[0].primary_location.file_path, "main.go");
    }

    #[test]
    fn first_matching_root_wins() {
        let report = report(vec![issue("/src/app/pkg/util.go", Severity::Medium)]);
        let roots = [PathBuf::from("/src/app"), PathBuf::from("/src/app/pkg")];
        let sonar = generate(&report, Path::new("/src"), &roots);
        assert_eq!(sonar.issues[0].primary_location.file_path, "pkg/util.go");
        assert_eq!(sonar.issues[0].severity, "CRITICAL");
    }

    #[test]
    fn nested_root_path_trims_further() {
        let report = report(vec![issue("services/api/main.go", Severity::Medium)]);
        let sonar = generate(
            &report,
            Path::new("/repo"),
            &[PathBuf::from("/repo/services/api")],
        );
        assert_eq!(sonar.issues[0].primary_location.file_path, "main.go");
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(sonar_severity(Severity::High), "BLOCKER");
        assert_eq!(sonar_severity(Severity::Medium), "CRITICAL");
        assert_eq!(sonar_severity(Severity::Low), "MINOR");
    }

    #[test]
    fn renders_with_tab_indentation() {
        let root = Path::new("/src/app");
        let rendered = render(&report(vec![]), root, &[]).expect("renders");
        assert_eq!(rendered, "{\n\t\"issues\": []\n}");

        let rendered = render(
            &report(vec![issue("main.go", Severity::Low)]),
            root,
            &[root.to_path_buf()],
        )
        .expect("renders");
        assert!(rendered.starts_with("{\n\t\"issues\": [\n\t\t{\n\t\t\t\"engineId\": \"secmatch\","));
    }
}
