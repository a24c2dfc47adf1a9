//! Rule to flag overly permissive file modes.
//!
//! # Detected Patterns
//!
//! - `os.Chmod(name, mode)`
//! - `os.OpenFile(name, flag, mode)`
//!
//! where `mode` is an integer literal (optionally wrapped in `os.FileMode`)
//! granting bits outside the configured maximum.
//!
//! # Configuration
//!
//! - `mode`: maximum allowed mode (default: `0o600`)

use secmatch_core::ast::{CallExpr, Node};
use secmatch_core::literal::literal_int;
use secmatch_core::matcher::{match_call_by_package, match_call_by_packages};
use secmatch_core::visit::{self, Visit};
use secmatch_core::{Issue, Rule, RuleConfig, Severity, Unit, UnitContext};
use tracing::debug;

/// Rule code for file-permissions.
pub const CODE: &str = "G302";

/// Rule name for file-permissions.
pub const NAME: &str = "file-permissions";

/// Default maximum mode for files.
pub const DEFAULT_MAX_MODE: i64 = 0o600;

/// Flags `os.Chmod` and `os.OpenFile` calls with permissive modes.
#[derive(Debug, Clone)]
pub struct FilePermissions {
    /// Highest mode that is not reported.
    pub max_mode: i64,
    /// Severity level.
    pub severity: Severity,
}

impl Default for FilePermissions {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePermissions {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_mode: DEFAULT_MAX_MODE,
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

impl Rule for FilePermissions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Poor file permissions used with chmod or when opening a file"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = PermissionsVisitor {
            ctx,
            rule: self,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct PermissionsVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    rule: &'a FilePermissions,
    issues: Vec<Issue>,
}

impl PermissionsVisitor<'_> {
    /// Reads a mode argument, looking through an `os.FileMode(...)` conversion.
    fn mode_of(&self, arg: &Node) -> Option<i64> {
        let arg = match match_call_by_package(arg, self.ctx.uses, "os", "FileMode") {
            Some(conversion) => conversion.call.args.first()?,
            None => arg,
        };
        literal_int(arg)
            .map_err(|e| debug!("{}: mode not checked: {}", self.ctx.path.display(), e))
            .ok()
    }
}

impl<'ast> Visit<'ast> for PermissionsVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        if let Some(m) = match_call_by_packages(node, self.ctx.uses, "os", &["Chmod", "OpenFile"]) {
            let index = if m.symbol.name == "Chmod" { 1 } else { 2 };
            let mode = call.args.get(index).and_then(|arg| self.mode_of(arg));

            if let Some(mode) = mode.filter(|mode| !is_subset(*mode, self.rule.max_mode)) {
                self.issues.push(
                    Issue::new(
                        CODE,
                        NAME,
                        self.rule.severity,
                        self.ctx.location(call.pos),
                        format!(
                            "Expect file permissions to be {:#o} or less, found {:#o}",
                            self.rule.max_mode, mode
                        ),
                    )
                    .with_cwe("276"),
                );
            }
        }
        visit::visit_call(self, node, call);
    }
}

/// Returns true if `mode` grants no bits outside `allowed`.
pub(crate) fn is_subset(mode: i64, allowed: i64) -> bool {
    mode & !allowed == 0
}
