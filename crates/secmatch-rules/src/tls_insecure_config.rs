//! Rule to flag insecure `tls.Config` literals.
//!
//! # Detected Patterns
//!
//! - `tls.Config{InsecureSkipVerify: true}`
//! - `tls.Config{MinVersion: tls.VersionTLS10}` or an integer literal below
//!   the configured minimum
//!
//! # Configuration
//!
//! - `min_version`: lowest acceptable protocol version (default: `0x0303`,
//!   TLS 1.2)

use regex::Regex;
use secmatch_core::ast::{CompositeLit, Ident, Node};
use secmatch_core::literal::literal_int;
use secmatch_core::matcher::{field_value, match_composite_lit, selector_name, try_as};
use secmatch_core::visit::{self, Visit};
use secmatch_core::{Issue, Rule, RuleConfig, Severity, Unit, UnitContext};
use std::sync::LazyLock;
use tracing::debug;

/// Rule code for tls-insecure-config.
pub const CODE: &str = "G402";

/// Rule name for tls-insecure-config.
pub const NAME: &str = "tls-insecure-config";

/// `tls.VersionTLS12`.
pub const DEFAULT_MIN_VERSION: i64 = 0x0303;

#[allow(clippy::expect_used)]
static TLS_CONFIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tls\.Config$").expect("tls.Config regex compiles"));

/// Protocol version constants exported by `crypto/tls`.
const TLS_VERSIONS: &[(&str, i64)] = &[
    ("tls.VersionSSL30", 0x0300),
    ("tls.VersionTLS10", 0x0301),
    ("tls.VersionTLS11", 0x0302),
    ("tls.VersionTLS12", 0x0303),
    ("tls.VersionTLS13", 0x0304),
];

/// Flags `tls.Config` literals that disable verification or allow old
/// protocol versions.
#[derive(Debug, Clone)]
pub struct TlsInsecureConfig {
    /// Lowest acceptable `MinVersion`.
    pub min_version: i64,
    /// Severity level.
    pub severity: Severity,
}

impl Default for TlsInsecureConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsInsecureConfig {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_version: DEFAULT_MIN_VERSION,
            severity: Severity::High,
        }
    }

    /// Applies the options set in a configuration section.
    ///
    /// Keys missing from the section keep their current value.
    #[must_use]
    pub fn with_config(self, config: &RuleConfig) -> Self {
        match config.get_int("min_version") {
            Some(version) => self.min_version(version),
            None => self,
        }
    }

    /// Sets the lowest acceptable protocol version.
    #[must_use]
    pub fn min_version(mut self, version: i64) -> Self {
        self.min_version = version;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for TlsInsecureConfig {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "TLS configuration disables verification or allows old protocol versions"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = TlsVisitor {
            ctx,
            rule: self,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct TlsVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    rule: &'a TlsInsecureConfig,
    issues: Vec<Issue>,
}

impl TlsVisitor<'_> {
    fn report(&mut self, value: &Node, message: String) {
        self.issues.push(
            Issue::new(
                CODE,
                NAME,
                self.rule.severity,
                self.ctx.location(value.pos()),
                message,
            )
            .with_cwe("295"),
        );
    }

    fn check_config(&mut self, lit: &CompositeLit) {
        if let Some(value) = field_value(lit, "InsecureSkipVerify") {
            if try_as::<Ident>(value).is_some_and(|v| v.name == "true") {
                self.report(value, "TLS InsecureSkipVerify set true.".to_string());
            }
        }

        if let Some(value) = field_value(lit, "MinVersion") {
            let minimum = self.rule.min_version;
            if let Some(version) = self.version_of(value).filter(|v| *v < minimum) {
                self.report(
                    value,
                    format!("TLS MinVersion too low: {version:#06x} is below {minimum:#06x}"),
                );
            }
        }
    }

    /// Reads a protocol version from a `tls.VersionXXX` constant or an
    /// integer literal.
    fn version_of(&self, value: &Node) -> Option<i64> {
        if let Some(name) = selector_name(value) {
            return TLS_VERSIONS
                .iter()
                .find(|(constant, _)| *constant == name)
                .map(|(_, version)| *version);
        }
        literal_int(value)
            .map_err(|e| debug!("{}: MinVersion not checked: {}", self.ctx.path.display(), e))
            .ok()
    }
}

impl<'ast> Visit<'ast> for TlsVisitor<'_> {
    fn visit_composite_lit(&mut self, node: &'ast Node, lit: &'ast CompositeLit) {
        if let Some(config) = match_composite_lit(node, &TLS_CONFIG) {
            self.check_config(config);
        }
        visit::visit_composite_lit(self, node, lit);
    }
}
