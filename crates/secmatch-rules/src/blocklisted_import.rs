//! Rules to forbid importing weak or dangerous packages.
//!
//! | Code | Import |
//! |------|--------|
//! | G501 | `crypto/md5` |
//! | G502 | `crypto/des` |
//! | G503 | `crypto/rc4` |
//! | G504 | `net/http/cgi` |
//! | G505 | `crypto/sha1` |
//!
//! Each code is a separate [`BlocklistedImport`] instance so it can be
//! enabled, disabled and suppressed on its own.

use secmatch_core::ast::Node;
use secmatch_core::literal::literal_string;
use secmatch_core::visit::Visit;
use secmatch_core::{ImportSpec, Issue, Rule, Severity, Unit, UnitContext};
use tracing::debug;

/// Flags an import of one blocklisted package path.
#[derive(Debug, Clone)]
pub struct BlocklistedImport {
    code: &'static str,
    name: &'static str,
    path: &'static str,
    message: &'static str,
    /// Severity level.
    pub severity: Severity,
}

impl BlocklistedImport {
    const fn new(
        code: &'static str,
        name: &'static str,
        path: &'static str,
        message: &'static str,
    ) -> Self {
        Self {
            code,
            name,
            path,
            message,
            severity: Severity::Medium,
        }
    }

    /// G501: `crypto/md5`.
    #[must_use]
    pub const fn md5() -> Self {
        Self::new(
            "G501",
            "blocklisted-import-md5",
            "crypto/md5",
            "Blocklisted import crypto/md5: weak cryptographic primitive",
        )
    }

    /// G502: `crypto/des`.
    #[must_use]
    pub const fn des() -> Self {
        Self::new(
            "G502",
            "blocklisted-import-des",
            "crypto/des",
            "Blocklisted import crypto/des: weak cryptographic primitive",
        )
    }

    /// G503: `crypto/rc4`.
    #[must_use]
    pub const fn rc4() -> Self {
        Self::new(
            "G503",
            "blocklisted-import-rc4",
            "crypto/rc4",
            "Blocklisted import crypto/rc4: weak cryptographic primitive",
        )
    }

    /// G504: `net/http/cgi`.
    #[must_use]
    pub const fn cgi() -> Self {
        Self::new(
            "G504",
            "blocklisted-import-cgi",
            "net/http/cgi",
            "Blocklisted import net/http/cgi: Go versions < 1.6.3 are vulnerable to Httpoxy attack: (CVE-2016-5386)",
        )
    }

    /// G505: `crypto/sha1`.
    #[must_use]
    pub const fn sha1() -> Self {
        Self::new(
            "G505",
            "blocklisted-import-sha1",
            "crypto/sha1",
            "Blocklisted import crypto/sha1: weak cryptographic primitive",
        )
    }

    /// All blocklisted-import rules.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [Self::md5(), Self::des(), Self::rc4(), Self::cgi(), Self::sha1()]
    }

    /// The package path this instance forbids.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for BlocklistedImport {
    fn name(&self) -> &'static str {
        self.name
    }

    fn code(&self) -> &'static str {
        self.code
    }

    fn description(&self) -> &'static str {
        self.message
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = ImportVisitor {
            ctx,
            rule: self,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct ImportVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    rule: &'a BlocklistedImport,
    issues: Vec<Issue>,
}

impl<'ast> Visit<'ast> for ImportVisitor<'_> {
    fn visit_unit(&mut self, unit: &'ast Unit) {
        for import in &unit.imports {
            self.visit_import(import);
        }
    }

    fn visit_import(&mut self, import: &'ast ImportSpec) {
        let node = Node::BasicLit(import.path.clone());
        let path = match literal_string(&node) {
            Ok(path) => path,
            Err(e) => {
                debug!("{}: import not checked: {}", self.ctx.path.display(), e);
                return;
            }
        };

        if path == self.rule.path {
            self.issues.push(
                Issue::new(
                    self.rule.code,
                    self.rule.name,
                    self.rule.severity,
                    self.ctx.location(import.pos),
                    self.rule.message,
                )
                .with_cwe("327"),
            );
        }
    }
}
