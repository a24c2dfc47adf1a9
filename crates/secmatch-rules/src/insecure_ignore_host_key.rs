//! Rule to forbid disabling SSH host key verification.
//!
//! # Detected Patterns
//!
//! - `ssh.InsecureIgnoreHostKey()` from `golang.org/x/crypto/ssh`
//!
//! The callee is resolved through the unit's symbol table, so renamed
//! imports are caught and local functions of the same name are not.

use secmatch_core::ast::{CallExpr, Node};
use secmatch_core::matcher::match_call_by_package;
use secmatch_core::visit::{self, Visit};
use secmatch_core::{Issue, Rule, Severity, Unit, UnitContext};

/// Rule code for insecure-ignore-host-key.
pub const CODE: &str = "G106";

/// Rule name for insecure-ignore-host-key.
pub const NAME: &str = "insecure-ignore-host-key";

const SSH_PACKAGE: &str = "golang.org/x/crypto/ssh";

/// Flags use of `ssh.InsecureIgnoreHostKey`.
#[derive(Debug, Clone)]
pub struct InsecureIgnoreHostKey {
    /// Severity level.
    pub severity: Severity,
}

impl Default for InsecureIgnoreHostKey {
    fn default() -> Self {
        Self::new()
    }
}

impl InsecureIgnoreHostKey {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Medium,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for InsecureIgnoreHostKey {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Use of ssh InsecureIgnoreHostKey should be audited"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = HostKeyVisitor {
            ctx,
            severity: self.severity,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct HostKeyVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    severity: Severity,
    issues: Vec<Issue>,
}

impl<'ast> Visit<'ast> for HostKeyVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        if match_call_by_package(node, self.ctx.uses, SSH_PACKAGE, "InsecureIgnoreHostKey")
            .is_some()
        {
            self.issues.push(
                Issue::new(
                    CODE,
                    NAME,
                    self.severity,
                    self.ctx.location(call.pos),
                    "Use of ssh InsecureIgnoreHostKey should be audited",
                )
                .with_cwe("322")
                .with_help("Verify host keys with ssh.FixedHostKey or a known_hosts callback"),
            );
        }
        visit::visit_call(self, node, call);
    }
}
