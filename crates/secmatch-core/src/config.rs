//! Configuration types for secmatch.

use crate::literal::parse_int;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for secmatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Lowest severity that makes the CLI exit non-zero (default: "low").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Whether `#nosec` comments are honored (default: true).
    #[serde(default = "default_true")]
    pub nosec: bool,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule code or name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: None,
            fail_on: None,
            nosec: true,
            analyzer: AnalyzerConfig::default(),
            rules: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Looks up the configuration for a rule by code first, then by name.
    #[must_use]
    pub fn rule(&self, code: &str, name: &str) -> Option<&RuleConfig> {
        self.rules.get(code).or_else(|| self.rules.get(name))
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, code: &str, name: &str) -> bool {
        self.rule(code, name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, code: &str, name: &str) -> Option<Severity> {
        self.rule(code, name).and_then(|c| c.severity)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to scan for unit files (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether `_test.go` units are checked.
    #[serde(default = "default_true")]
    pub include_tests: bool,

    /// Abort on the first unit that fails to load.
    #[serde(default)]
    pub fail_on_load_error: bool,

    /// Maximum number of units checked in parallel.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/vendor/**".to_string(), "**/testdata/**".to_string()],
            include_tests: true,
            fail_on_load_error: false,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an integer option.
    ///
    /// Strings are read with Go integer literal syntax, so file modes can be
    /// written as `"0o600"` or `"0600"`.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.options.get(key)? {
            toml::Value::Integer(i) => Some(*i),
            toml::Value::String(s) => parse_int(s.trim()).ok(),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert!(config.nosec);
        assert!(config.analyzer.include_tests);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "medium"

[analyzer]
root = "./build/units"
exclude = ["**/generated/**"]

[rules.G307]
severity = "high"
mode = "0o600"

[rules.weak-rand]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./build/units"));
        assert_eq!(config.fail_on, Some(Severity::Medium));
        assert!(config.nosec);
        assert!(config.is_rule_enabled("G307", "os-create-perms"));
        assert!(!config.is_rule_enabled("G404", "weak-rand"));
        assert_eq!(
            config.rule_severity("G307", "os-create-perms"),
            Some(Severity::High)
        );

        let rule_config = config.rule("G307", "os-create-perms").expect("G307 configured");
        assert_eq!(rule_config.get_int("mode"), Some(0o600));
    }

    #[test]
    fn test_int_option_forms() {
        let config = Config::parse(
            r#"
[rules.G302]
a = 384
b = "0600"
c = "rw"
"#,
        )
        .expect("Failed to parse");
        let rule = &config.rules["G302"];
        assert_eq!(rule.get_int("a"), Some(384));
        assert_eq!(rule.get_int("b"), Some(384));
        assert_eq!(rule.get_int("c"), None);
        assert_eq!(rule.get_int("missing"), None);
    }
}
