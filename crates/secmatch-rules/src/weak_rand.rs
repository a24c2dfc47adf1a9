//! Rule to forbid `math/rand` as a source of randomness.
//!
//! # Detected Patterns
//!
//! - Package-level generators in `math/rand` and `math/rand/v2`
//!   (`rand.Int`, `rand.Read`, `rand.New`, ...)
//!
//! `crypto/rand` calls with the same names are not flagged.

use secmatch_core::ast::{CallExpr, Node};
use secmatch_core::matcher::match_call_by_packages;
use secmatch_core::visit::{self, Visit};
use secmatch_core::{CallMatch, Confidence, Issue, Rule, Severity, Unit, UnitContext};

/// Rule code for weak-rand.
pub const CODE: &str = "G404";

/// Rule name for weak-rand.
pub const NAME: &str = "weak-rand";

const WEAK_PACKAGES: &[&str] = &["math/rand", "math/rand/v2"];

const WEAK_FUNCS: &[&str] = &[
    "New",
    "NewSource",
    "NewPCG",
    "NewChaCha8",
    "Read",
    "Int",
    "IntN",
    "Intn",
    "Int31",
    "Int31n",
    "Int32",
    "Int32N",
    "Int63",
    "Int63n",
    "Int64",
    "Int64N",
    "Uint32",
    "Uint32N",
    "Uint64",
    "Uint64N",
    "UintN",
    "N",
    "Float32",
    "Float64",
    "ExpFloat64",
    "NormFloat64",
    "Perm",
    "Shuffle",
];

/// Flags use of the non-cryptographic `math/rand` generators.
#[derive(Debug, Clone)]
pub struct WeakRand {
    /// Severity level.
    pub severity: Severity,
}

impl Default for WeakRand {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakRand {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::High,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for WeakRand {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Use of weak random number generator (math/rand instead of crypto/rand)"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = RandVisitor {
            ctx,
            severity: self.severity,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct RandVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    severity: Severity,
    issues: Vec<Issue>,
}

impl<'ast> Visit<'ast> for RandVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        let uses = self.ctx.uses;
        let weak = WEAK_PACKAGES
            .iter()
            .find_map(|package| match_call_by_packages(node, uses, package, WEAK_FUNCS));

        if let Some(CallMatch { symbol, .. }) = weak {
            self.issues.push(
                Issue::new(
                    CODE,
                    NAME,
                    self.severity,
                    self.ctx.location(call.pos),
                    format!(
                        "Use of weak random number generator ({}.{})",
                        symbol.package_path, symbol.name
                    ),
                )
                .with_confidence(Confidence::Medium)
                .with_cwe("338")
                .with_help("Use crypto/rand for security-sensitive values"),
            );
        }
        visit::visit_call(self, node, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secmatch_core::ast::build::{call, ident, other, selector};
    use secmatch_core::{Context, NodeId, Symbol, SymbolKind};
    use std::path::Path;

    fn check_unit(unit: &Unit) -> Vec<Issue> {
        let ctx = UnitContext::new(unit, Path::new("."));
        WeakRand::new().check(&ctx, unit)
    }

    fn rand_unit(package_path: &str, func: &str) -> Unit {
        Unit::new("main.go", "main")
            .with_decl(other(
                "ExprStmt",
                vec![call(selector(ident(1, "rand"), ident(2, func)), vec![])],
            ))
            .with_uses(
                Context::new()
                    .with_use(NodeId(2), Symbol::new(package_path, func, SymbolKind::Func)),
            )
    }

    #[test]
    fn test_detects_math_rand() {
        let issues = check_unit(&rand_unit("math/rand", "Intn"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert!(issues[0].message.contains("math/rand.Intn"));
    }

    #[test]
    fn test_detects_math_rand_v2() {
        assert_eq!(check_unit(&rand_unit("math/rand/v2", "IntN")).len(), 1);
    }

    #[test]
    fn test_allows_crypto_rand() {
        assert!(check_unit(&rand_unit("crypto/rand", "Read")).is_empty());
    }

    #[test]
    fn test_ignores_unlisted_functions() {
        assert!(check_unit(&rand_unit("math/rand", "Seed")).is_empty());
    }
}
