//! `#nosec` suppression directives.
//!
//! Supports comments like:
//! ```text
//! // #nosec
//! // #nosec G404 G505 -- seeded for reproducible test data
//! ```
//!
//! A directive applies to the line it sits on and the line after it.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A `//` comment whose text starts with `#nosec`. The leftmost match wins, so
/// a `//` inside an earlier string literal (a URL, say) is skipped over.
#[allow(clippy::expect_used)]
static NOSEC_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//\s*#nosec\b(.*)$").expect("nosec regex compiles"));

/// Result of checking for a suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NosecCheck {
    /// No directive covers the rule.
    Active,
    /// A directive suppresses the rule.
    Suppressed {
        /// Text after `--`, if any.
        justification: Option<String>,
    },
}

impl NosecCheck {
    /// Returns true if suppressed.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }

    /// Returns the justification if suppressed.
    #[must_use]
    pub fn justification(&self) -> Option<&str> {
        match self {
            Self::Suppressed { justification } => justification.as_deref(),
            Self::Active => None,
        }
    }
}

/// Parsed `#nosec` directive.
#[derive(Debug, Clone)]
pub struct NosecDirective {
    /// Rule codes named by the directive. Empty means all rules.
    pub rules: HashSet<String>,
    /// Optional justification.
    pub justification: Option<String>,
}

impl NosecDirective {
    /// Returns true if this directive covers `rule_code`.
    #[must_use]
    pub fn covers(&self, rule_code: &str) -> bool {
        self.rules.is_empty() || self.rules.contains(rule_code)
    }
}

/// Checks source text for a `#nosec` directive covering `rule_code` at `line`.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number of the finding (1-indexed)
/// * `rule_code` - Code of the rule, e.g. `"G404"`
#[must_use]
pub fn check_nosec(content: &str, line: usize, rule_code: &str) -> NosecCheck {
    let lines: Vec<&str> = content.lines().collect();
    check_nosec_with(|n| lines.get(n.checked_sub(1)?).copied(), line, rule_code)
}

/// Like [`check_nosec`], reading source lines (1-indexed) through `line_at`.
#[must_use]
pub fn check_nosec_with<'a>(
    line_at: impl Fn(usize) -> Option<&'a str>,
    line: usize,
    rule_code: &str,
) -> NosecCheck {
    for check_line in [line, line.saturating_sub(1)] {
        if check_line == 0 {
            continue;
        }

        if let Some(directive) = line_at(check_line).and_then(parse_nosec) {
            if directive.covers(rule_code) {
                return NosecCheck::Suppressed {
                    justification: directive.justification,
                };
            }
        }
    }

    NosecCheck::Active
}

/// Parses a `#nosec` directive from the comment part of a line.
fn parse_nosec(line: &str) -> Option<NosecDirective> {
    let directive = NOSEC_COMMENT.captures(line)?.get(1)?.as_str();

    let (rules_part, justification) = match directive.split_once("--") {
        Some((rules, reason)) => {
            let reason = reason.trim();
            (rules, (!reason.is_empty()).then(|| reason.to_string()))
        }
        None => (directive, None),
    };

    let rules = rules_part
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    Some(NosecDirective {
        rules,
        justification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_nosec() {
        let directive = parse_nosec("x := rand.Int() // #nosec").expect("directive");
        assert!(directive.rules.is_empty());
        assert!(directive.covers("G404"));
        assert!(directive.justification.is_none());
    }

    #[test]
    fn test_parse_rules_and_justification() {
        let directive =
            parse_nosec("// #nosec G404, G505 -- test fixtures only").expect("directive");
        assert!(directive.covers("G404"));
        assert!(directive.covers("G505"));
        assert!(!directive.covers("G106"));
        assert_eq!(directive.justification.as_deref(), Some("test fixtures only"));
    }

    #[test]
    fn test_rejects_non_directives() {
        assert!(parse_nosec("x := 1").is_none());
        assert!(parse_nosec("// nosec").is_none());
        assert!(parse_nosec("// #nosecurity").is_none());
    }

    #[test]
    fn test_check_line_above_and_same_line() {
        let content = "func f() {\n\t// #nosec G404\n\tn := rand.Int()\n\tm := rand.Int() // #nosec\n}";

        assert!(check_nosec(content, 3, "G404").is_suppressed());
        assert!(!check_nosec(content, 3, "G106").is_suppressed());
        assert!(check_nosec(content, 4, "G106").is_suppressed());
        assert!(!check_nosec(content, 1, "G404").is_suppressed());
    }

    #[test]
    fn test_directive_after_url_string() {
        let line = r#"resp, _ := http.Get("http://example.com") // #nosec G107"#;
        assert!(check_nosec(line, 1, "G107").is_suppressed());
        assert!(!check_nosec(line, 1, "G404").is_suppressed());

        let line = r#"u := "https://example.com/#nosec" // plain comment"#;
        assert!(parse_nosec(line).is_none());
    }

    #[test]
    fn test_check_out_of_range_line() {
        assert_eq!(check_nosec("", 10, "G404"), NosecCheck::Active);
        assert_eq!(check_nosec("// #nosec", 0, "G404"), NosecCheck::Active);
    }
}
