//! Rule to flag `os.Create` when a stricter file mode is required.
//!
//! `os.Create` always opens with mode `0666` (before umask). This is only a
//! finding when the project requires something stricter, so with default
//! settings the rule reports nothing.
//!
//! # Configuration
//!
//! - `mode`: maximum allowed mode (default: `0o666`)
//!
//! ```toml
//! [rules.G307]
//! mode = "0o600"
//! ```

use crate::file_permissions::is_subset;
use regex::Regex;
use secmatch_core::ast::{CallExpr, Node};
use secmatch_core::matcher::{call_symbol, match_call};
use secmatch_core::visit::{self, Visit};
use secmatch_core::{Issue, Rule, RuleConfig, Severity, Unit, UnitContext};
use std::sync::LazyLock;

/// Rule code for os-create-perms.
pub const CODE: &str = "G307";

/// Rule name for os-create-perms.
pub const NAME: &str = "os-create-perms";

/// Mode `os.Create` opens files with.
pub const CREATE_MODE: i64 = 0o666;

#[allow(clippy::expect_used)]
static OS_CREATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^os\.Create$").expect("os.Create regex compiles"));

/// Flags `os.Create` calls when the configured mode is stricter than `0666`.
#[derive(Debug, Clone)]
pub struct OsCreatePerms {
    /// Highest mode that is not reported.
    pub max_mode: i64,
    /// Severity level.
    pub severity: Severity,
}

impl Default for OsCreatePerms {
    fn default() -> Self {
        Self::new()
    }
}

impl OsCreatePerms {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_mode: CREATE_MODE,
            severity: Severity::Medium,
        }
    }

    /// Applies the options set in a configuration section.
    ///
    /// Keys missing from the section keep their current value.
    #[must_use]
    pub fn with_config(self, config: &RuleConfig) -> Self {
        match config.get_int("mode") {
            Some(mode) => self.max_mode(mode),
            None => self,
        }
    }

    /// Sets the maximum allowed mode.
    #[must_use]
    pub fn max_mode(mut self, mode: i64) -> Self {
        self.max_mode = mode;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for OsCreatePerms {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Poor file permissions used when creating a file with os.Create"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        if is_subset(CREATE_MODE, self.max_mode) {
            return Vec::new();
        }

        let mut visitor = CreateVisitor {
            ctx,
            rule: self,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct CreateVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    rule: &'a OsCreatePerms,
    issues: Vec<Issue>,
}

impl CreateVisitor<'_> {
    /// Confirms a name-matched call really is the standard library's.
    fn is_os_create(&self, node: &Node) -> bool {
        match_call(node, &OS_CREATE).is_some()
            && call_symbol(node, self.ctx.uses).is_some_and(|m| m.symbol.package_path == "os")
    }
}

impl<'ast> Visit<'ast> for CreateVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        if self.is_os_create(node) {
            self.issues.push(
                Issue::new(
                    CODE,
                    NAME,
                    self.rule.severity,
                    self.ctx.location(call.pos),
                    format!(
                        "Expect file permissions to be {:#o} or less, os.Create uses {:#o}",
                        self.rule.max_mode, CREATE_MODE
                    ),
                )
                .with_cwe("276")
                .with_help("Use os.OpenFile with an explicit mode"),
            );
        }
        visit::visit_call(self, node, call);
    }
}
