//! Rule trait for defining security rules.

use crate::context::UnitContext;
use crate::types::{Issue, Severity};
use crate::unit::Unit;

/// A per-unit security rule.
///
/// Rules receive the unit's syntax tree and resolution table and usually
/// walk the tree with a [`Visit`](crate::Visit) implementation, calling the
/// [`matcher`](crate::matcher) and [`literal`](crate::literal) primitives
/// at each node.
///
/// # Example
///
/// ```ignore
/// use secmatch_core::{Issue, Rule, Severity, Unit, UnitContext, Visit};
///
/// pub struct NoUnsafePointer;
///
/// impl Rule for NoUnsafePointer {
///     fn name(&self) -> &'static str { "unsafe-pointer" }
///     fn code(&self) -> &'static str { "G103" }
///
///     fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
///         let mut visitor = UnsafeVisitor::new(ctx);
///         visitor.visit_unit(unit);
///         visitor.issues
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "weak-rand").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "G404").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for issues from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    /// Checks a single unit and returns any issues found.
    ///
    /// Literal extraction failures inside a rule are non-matches, never
    /// errors: a rule must not abort the scan.
    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &UnitContext, _unit: &Unit) -> Vec<Issue> {
            vec![Issue::new(
                self.code(),
                self.name(),
                self.default_severity(),
                Location::new(ctx.path.to_path_buf(), 1, 1),
                "Test issue",
            )]
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "T001");
        assert_eq!(rule.default_severity(), Severity::Medium);

        let unit = Unit::new("main.go", "main");
        let ctx = UnitContext::new(&unit, std::path::Path::new("."));
        assert_eq!(rule.check(&ctx, &unit).len(), 1);
    }
}
