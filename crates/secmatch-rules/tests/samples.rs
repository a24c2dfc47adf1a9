//! Integration test: built-in rules over serialized sample units.
//!
//! Each sample is the unit a front end would emit for a small Go program.

use secmatch_core::{Analyzer, Config, Report, Unit};
use secmatch_rules::Preset;
use std::path::Path;

fn run(config: Config, unit_json: &str) -> Report {
    let unit = Unit::from_json(Path::new("sample.unit.json"), unit_json).expect("valid sample");
    let preset = config
        .preset
        .as_deref()
        .map_or(Ok(Preset::Recommended), str::parse)
        .expect("valid preset");

    let mut builder = Analyzer::builder().root(".");
    for rule in preset.rules_with(&config) {
        builder = builder.rule_box(rule);
    }
    builder
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze_units(&[unit])
        .expect("analysis should succeed")
}

fn codes(report: &Report) -> Vec<&str> {
    report.issues.iter().map(|i| i.code.as_str()).collect()
}

const G106_SAMPLE: &str = r#"{
    "path": "main.go",
    "package": "main",
    "imports": [{"path": {"kind": "STRING", "value": "\"golang.org/x/crypto/ssh\""}, "pos": {"line": 4, "column": 2}}],
    "decls": [
        {"node": "Other", "label": "FuncDecl", "children": [
            {"node": "Other", "label": "AssignStmt", "children": [
                {"node": "Ident", "id": 1, "name": "_"},
                {"node": "Call",
                 "fun": {"node": "Selector",
                         "base": {"node": "Ident", "id": 2, "name": "ssh"},
                         "sel": {"id": 3, "name": "InsecureIgnoreHostKey"}},
                 "pos": {"line": 8, "column": 8}}
            ]}
        ]}
    ],
    "uses": [
        {"site": 2, "symbol": {"package_path": "golang.org/x/crypto/ssh", "name": "ssh", "kind": "package"}},
        {"site": 3, "symbol": {"package_path": "golang.org/x/crypto/ssh", "name": "InsecureIgnoreHostKey", "kind": "func"}}
    ]
}"#;

const G113_SAMPLE: &str = r#"{
    "path": "main.go",
    "package": "main",
    "imports": [
        {"path": {"kind": "STRING", "value": "\"math/big\""}},
        {"path": {"kind": "STRING", "value": "\"fmt\""}}
    ],
    "decls": [
        {"node": "Other", "label": "FuncDecl", "children": [
            {"node": "Other", "label": "ExprStmt", "children": [
                {"node": "Call",
                 "fun": {"node": "Selector",
                         "base": {"node": "Ident", "id": 1, "name": "r"},
                         "sel": {"id": 2, "name": "SetString"}},
                 "args": [{"node": "BasicLit", "kind": "STRING", "value": "\"13e-9223372036854775808\""}],
                 "pos": {"line": 10, "column": 2}}
            ]},
            {"node": "Call",
             "fun": {"node": "Selector",
                     "base": {"node": "Ident", "id": 3, "name": "fmt"},
                     "sel": {"id": 4, "name": "Println"}},
             "args": [{"node": "Ident", "id": 5, "name": "r"}],
             "pos": {"line": 12, "column": 2}}
        ]}
    ],
    "uses": [
        {"site": 2, "symbol": {"package_path": "math/big", "name": "SetString", "kind": "func", "receiver": "Rat"}},
        {"site": 4, "symbol": {"package_path": "fmt", "name": "Println", "kind": "func"}}
    ]
}"#;

const G307_SAMPLE: &str = r#"{
    "path": "main.go",
    "package": "main",
    "imports": [
        {"path": {"kind": "STRING", "value": "\"fmt\""}},
        {"path": {"kind": "STRING", "value": "\"os\""}}
    ],
    "decls": [
        {"node": "Other", "label": "FuncDecl", "children": [
            {"node": "Other", "label": "AssignStmt", "children": [
                {"node": "Call",
                 "fun": {"node": "Selector",
                         "base": {"node": "Ident", "id": 1, "name": "os"},
                         "sel": {"id": 2, "name": "Create"}},
                 "args": [{"node": "BasicLit", "kind": "STRING", "value": "\"/tmp/dat2\""}],
                 "pos": {"line": 15, "column": 13}}
            ]}
        ]}
    ],
    "uses": [
        {"site": 2, "symbol": {"package_path": "os", "name": "Create", "kind": "func"}}
    ]
}"#;

const G504_SAMPLE: &str = r#"{
    "path": "main.go",
    "package": "main",
    "imports": [
        {"path": {"kind": "STRING", "value": "\"net/http/cgi\""}, "pos": {"line": 4, "column": 2}},
        {"path": {"kind": "STRING", "value": "\"net/http\""}, "pos": {"line": 5, "column": 2}}
    ],
    "decls": [],
    "uses": []
}"#;

#[test]
fn g106_insecure_ignore_host_key() {
    let report = run(Config::default(), G106_SAMPLE);
    assert_eq!(codes(&report), ["G106"]);
}

#[test]
fn g113_rat_set_string_overflow() {
    let report = run(Config::default(), G113_SAMPLE);
    assert_eq!(codes(&report), ["G113"]);
    insta::assert_snapshot!(
        report.issues[0].to_string(),
        @"main.go:10:2: high [G113] Potential uncontrolled memory consumption in Rat.SetString (CVE-2022-23772)"
    );
}

#[test]
fn g307_default_mode_is_clean() {
    let report = run(Config::default(), G307_SAMPLE);
    assert!(report.issues.is_empty());
}

#[test]
fn g307_configured_mode_reports_create() {
    let config = Config::parse("[rules.G307]\nmode = \"0o600\"\n").expect("config");
    let report = run(config, G307_SAMPLE);
    assert_eq!(codes(&report), ["G307"]);
    assert_eq!(report.issues[0].location.line, 15);
}

#[test]
fn g504_blocklisted_cgi_import() {
    let report = run(Config::default(), G504_SAMPLE);
    assert_eq!(codes(&report), ["G504"]);
    assert_eq!(report.issues[0].location.line, 4);
}

#[test]
fn minimal_preset_skips_g113() {
    let config = Config::parse("preset = \"minimal\"\n").expect("config");
    let report = run(config, G113_SAMPLE);
    assert!(report.issues.is_empty());
}
