//! Integration test: unit discovery, rule execution and suppression via Analyzer.

use secmatch_core::ast::CallExpr;
use secmatch_core::matcher::match_call_by_package;
use secmatch_core::visit::{self, Visit};
use secmatch_core::{
    Analyzer, AnalyzerError, CallMatch, Config, Issue, Node, Rule, Severity, Unit, UnitContext,
};
use std::path::Path;

/// Flags calls resolving to `math/rand.Read`.
struct RandRead;

struct RandReadVisitor<'a> {
    ctx: &'a UnitContext<'a>,
    issues: Vec<Issue>,
}

impl<'ast> Visit<'ast> for RandReadVisitor<'_> {
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        if let Some(CallMatch { call, .. }) =
            match_call_by_package(node, self.ctx.uses, "math/rand", "Read")
        {
            self.issues.push(Issue::new(
                "T404",
                "rand-read",
                Severity::Medium,
                self.ctx.location(call.pos),
                "math/rand.Read",
            ));
        }
        visit::visit_call(self, node, call);
    }
}

impl Rule for RandRead {
    fn name(&self) -> &'static str {
        "rand-read"
    }

    fn code(&self) -> &'static str {
        "T404"
    }

    fn check(&self, ctx: &UnitContext, unit: &Unit) -> Vec<Issue> {
        let mut visitor = RandReadVisitor {
            ctx,
            issues: Vec::new(),
        };
        visitor.visit_unit(unit);
        visitor.issues
    }
}

const RAND_UNIT: &str = r#"{
    "path": "main.go",
    "package": "main",
    "decls": [
        {"node": "Other", "label": "FuncDecl", "children": [
            {"node": "Call",
             "fun": {"node": "Selector",
                     "base": {"node": "Ident", "id": 1, "name": "rand"},
                     "sel": {"id": 2, "name": "Read"}},
             "pos": {"line": 4, "column": 2}},
            {"node": "Call",
             "fun": {"node": "Selector",
                     "base": {"node": "Ident", "id": 3, "name": "rand"},
                     "sel": {"id": 4, "name": "Read"}},
             "pos": {"line": 5, "column": 2}}
        ]}
    ],
    "uses": [
        {"site": 2, "symbol": {"package_path": "math/rand", "name": "Read", "kind": "func"}},
        {"site": 4, "symbol": {"package_path": "math/rand", "name": "Read", "kind": "func"}}
    ],
    "source": "package main\n\nfunc main() {\n\trand.Read(b)\n\trand.Read(b) // #nosec T404\n}\n"
}"#;

fn write_unit(dir: &Path, name: &str, json: &str) {
    std::fs::create_dir_all(dir).expect("create unit dir");
    std::fs::write(dir.join(name), json).expect("write unit file");
}

#[test]
fn discovers_units_and_honors_nosec() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_unit(tmp.path(), "main.unit.json", RAND_UNIT);
    write_unit(tmp.path(), "README.md", "not a unit");

    let analyzer = Analyzer::builder()
        .root(tmp.path())
        .rule(RandRead)
        .build()
        .expect("analyzer should build");
    let report = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].location.line, 4);
    assert_eq!(report.stats.files, 1);
    assert_eq!(report.stats.found, 1);
    assert_eq!(report.stats.nosec, 1);
}

#[test]
fn nosec_can_be_disabled() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_unit(tmp.path(), "main.unit.json", RAND_UNIT);

    let config = Config {
        nosec: false,
        ..Config::default()
    };
    let report = Analyzer::builder()
        .root(tmp.path())
        .config(config)
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.stats.nosec, 0);
}

#[test]
fn excluded_directories_are_skipped() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_unit(&tmp.path().join("vendor/lib"), "lib.unit.json", RAND_UNIT);

    let report = Analyzer::builder()
        .root(tmp.path())
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(report.stats.files, 0);
    assert!(report.issues.is_empty());
}

#[test]
fn broken_units_are_skipped_unless_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_unit(tmp.path(), "a.unit.json", RAND_UNIT);
    write_unit(tmp.path(), "b.unit.json", "{ not json");

    let lenient = Analyzer::builder()
        .root(tmp.path())
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("broken unit should be skipped");
    assert_eq!(lenient.stats.files, 1);

    let strict = Analyzer::builder()
        .root(tmp.path())
        .rule(RandRead)
        .fail_on_load_error(true)
        .build()
        .expect("analyzer should build")
        .analyze();
    assert!(matches!(strict, Err(AnalyzerError::Unit(_))));
}

#[test]
fn disabled_rule_and_severity_override() {
    let disabled = Config::parse("[rules.rand-read]\nenabled = false\n").expect("config");
    let unit = Unit::from_json(Path::new("main.unit.json"), RAND_UNIT).expect("unit");

    let report = Analyzer::builder()
        .root(".")
        .config(disabled)
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze_units(std::slice::from_ref(&unit))
        .expect("analysis should succeed");
    assert!(report.issues.is_empty());

    let raised = Config::parse("[rules.T404]\nseverity = \"high\"\n").expect("config");
    let report = Analyzer::builder()
        .root(".")
        .config(raised)
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze_units(&[unit])
        .expect("analysis should succeed");
    assert_eq!(report.issues[0].severity, Severity::High);
}

#[test]
fn test_units_can_be_excluded() {
    let unit = Unit::from_json(Path::new("x.unit.json"), RAND_UNIT).expect("unit");
    let mut test_unit = unit.clone();
    test_unit.path = "main_test.go".into();

    let config = Config::parse("[analyzer]\ninclude_tests = false\nparallelism = 2\n")
        .expect("config");
    let report = Analyzer::builder()
        .root(".")
        .config(config)
        .rule(RandRead)
        .build()
        .expect("analyzer should build")
        .analyze_units(&[unit, test_unit])
        .expect("analysis should succeed");

    assert_eq!(report.stats.files, 1);
    assert!(report
        .issues
        .iter()
        .all(|i| i.location.file == Path::new("main.go")));
}
