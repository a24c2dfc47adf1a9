//! # secmatch-core
//!
//! Core matching framework for security linting of Go compilation units.
//!
//! Units are parsed and type-checked by an external front end and handed
//! over as JSON. This crate provides:
//!
//! - [`ast`] node model and [`semantic`] use-site resolution table
//! - [`matcher`] primitives for recognizing calls and composite literals
//! - [`literal`] extraction of Go integer, float, rune and string literals
//! - [`Visit`] for walking unit trees
//! - [`Rule`] trait for per-unit security rules
//! - [`Analyzer`] for discovering units and running rules in parallel
//! - [`Issue`] and [`Report`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use secmatch_core::{Analyzer, Rule, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/units")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = analyzer.analyze()?;
//! for issue in &report.issues {
//!     println!("{issue}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod types;
mod unit;

pub mod ast;
pub mod literal;
pub mod matcher;
pub mod semantic;
pub mod visit;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use ast::{LitKind, Node, NodeId, Pos};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::UnitContext;
pub use literal::LiteralError;
pub use matcher::CallMatch;
pub use rule::{Rule, RuleBox};
pub use semantic::{Context, Symbol, SymbolKind};
pub use types::{Confidence, Cwe, Issue, Location, Report, Severity, Stats};
pub use unit::{ImportSpec, Unit, UnitError, UNIT_FILE_SUFFIX};
pub use utils::nosec::{check_nosec, check_nosec_with, NosecCheck};
pub use visit::Visit;
