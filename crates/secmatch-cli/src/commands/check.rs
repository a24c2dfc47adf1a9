//! Check command implementation.

use anyhow::{Context, Result};
use secmatch_core::{Analyzer, Config, Confidence, RuleBox, Severity};
use secmatch_rules::{rule_by_id, Preset};
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::OutputFormat;

/// Options for the check command.
pub struct CheckOptions {
    /// Directory to scan for unit files, overriding `analyzer.root`.
    pub path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule codes or names to run instead of the preset.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Lowest severity that fails the run.
    pub fail_on: Option<Severity>,
    /// Ignore `#nosec` comments.
    pub no_nosec: bool,
    /// Root paths for Sonar file paths.
    pub root_paths: Vec<PathBuf>,
}

/// Runs the check command.
///
/// Returns `true` if the run should fail.
pub fn run(options: CheckOptions, config_path: Option<&Path>) -> Result<bool> {
    let search_from = options.path.as_deref().unwrap_or(Path::new("."));
    let resolved = config_resolver::load(search_from, config_path)?;
    if let Some(path) = resolved.source.path() {
        tracing::info!("Loaded config from {}", path.display());
    }
    let mut config = resolved.config;
    if options.no_nosec {
        config.nosec = false;
    }

    let rules = select_rules(&config, options.rules.as_deref())?;
    let fail_on = options.fail_on.or(config.fail_on).unwrap_or(Severity::Low);

    let mut builder = Analyzer::builder().config(config);
    if let Some(path) = &options.path {
        builder = builder.root(path);
    }
    for pattern in options.exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let report = analyzer.analyze().context("Analysis failed")?;

    let root_paths = sonar_roots(options.root_paths, analyzer.root())?;
    super::output::print(&report, options.format, analyzer.root(), &root_paths)?;

    Ok(report.has_issues_at(fail_on, Confidence::Low))
}

/// Makes `--root-path` values absolute, defaulting to the scan root.
fn sonar_roots(root_paths: Vec<PathBuf>, scan_root: &Path) -> Result<Vec<PathBuf>> {
    if root_paths.is_empty() {
        return Ok(vec![scan_root.to_path_buf()]);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(root_paths.into_iter().map(|root| cwd.join(root)).collect())
}

/// Picks the explicit rule list if given, otherwise the configured preset.
fn select_rules(config: &Config, filter: Option<&str>) -> Result<Vec<RuleBox>> {
    if let Some(filter) = filter {
        let mut rules = Vec::new();
        for id in filter.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            match rule_by_id(id, config) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!("Unknown rule: {}", id),
            }
        }
        return Ok(rules);
    }

    let preset = match config.preset.as_deref() {
        Some(name) => name
            .parse::<Preset>()
            .map_err(anyhow::Error::msg)
            .context("Invalid preset in configuration")?,
        None => Preset::Recommended,
    };
    Ok(preset.rules_with(config))
}
