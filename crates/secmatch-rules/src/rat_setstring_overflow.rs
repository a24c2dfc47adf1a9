//! Rule to flag `big.Rat.SetString` calls (CVE-2022-23772).
//!
//! # Rationale
//!
//! Before Go 1.17.7, `(*big.Rat).SetString` could be driven into unbounded
//! memory use by an input with a huge exponent, e.g. `"1e-9223372036854775808"`.
//! Untrusted input must not reach it on affected toolchains.
//!
//! # Detected Patterns
//!
//! - Any call resolving to `math/big.(Rat).SetString`, reported with medium
//!   confidence.
//! - A string literal argument whose exponent does not fit in 32 bits,
//!   reported with high confidence.
//!
//! `SetString` on `big.Int` and `big.Float` is not flagged.

use secmatch_core::ast::{CallExpr, Node};
use secmatch_core::literal::literal_string;
use secmatch_core::matcher::match_call_by_package;
use secmatch_core::visit::{self, Visit};
use secmatch_core::{Confidence, Issue, Rule, Severity, Unit, UnitContext};
use tracing::debug;

/// Rule code for rat-setstring-overflow.
pub const CODE: &str = "G113";

/// Rule name for rat-setstring-overflow.
pub const NAME: &str = "rat-setstring-overflow";

/// Flags `big.Rat.SetString`, with high confidence on overflowing literals.
#[derive(Debug, Clone)]
pub struct RatSetStringOverflow {
    /// Severity level.
    pub severity: Severity,
}

impl Default for RatSetStringOverflow {
    fn default() -> Self {
        Self::new()
    }
}

impl RatSetStringOverflow {
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

impl Rule for RatSetStringOverflow {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Potential uncontrolled memory consumption in Rat.SetString (CVE-2022-23772)"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = RatVisitor {
            ctx,
            severity: self.severity,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

struct RatVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    severity: Severity,
    issues: Vec<Issue>,
}

impl RatVisitor<'_> {
    fn confidence(&self, call: &CallExpr) -> Confidence {
        let Some(arg) = call.args.first() else {
            return Confidence::Medium;
        };
        match literal_string(arg) {
            Ok(text) if exponent_overflows(&text) => Confidence::High,
            Ok(_) => Confidence::Medium,
            Err(e) => {
                debug!("{}: argument not checked: {}", self.ctx.path.display(), e);
                Confidence::Medium
            }
        }
    }
}

impl<'ast> Visit<'ast> for RatVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        let is_rat = match_call_by_package(node, self.ctx.uses, "math/big", "SetString")
            .is_some_and(|m| m.symbol.receiver.as_deref() == Some("Rat"));

        if is_rat {
            self.issues.push(
                Issue::new(
                    CODE,
                    NAME,
                    self.severity,
                    self.ctx.location(call.pos),
                    "Potential uncontrolled memory consumption in Rat.SetString (CVE-2022-23772)",
                )
                .with_confidence(self.confidence(call))
                .with_cwe("190")
                .with_help("Upgrade to Go 1.17.7 or later, or validate the input length and exponent"),
            );
        }
        visit::visit_call(self, node, call);
    }
}

/// Returns true if `text` carries an exponent outside the 32-bit range.
fn exponent_overflows(text: &str) -> bool {
    let body = text.trim().trim_start_matches(['+', '-']);
    let markers: &[char] = if body.starts_with("0x") || body.starts_with("0X") {
        &['p', 'P']
    } else {
        &['e', 'E']
    };

    let Some((_, exponent)) = body.split_once(markers) else {
        return false;
    };
    let (negative, digits) = match exponent.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, exponent.strip_prefix('+').unwrap_or(exponent)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return false;
    }

    // Exponents are always decimal; leading zeros do not switch to octal.
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return false;
    }
    match digits.parse::<i64>() {
        Ok(value) => i32::try_from(if negative { -value } else { value }).is_err(),
        Err(_) => true,
    }
}
