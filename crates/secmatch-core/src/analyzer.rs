//! Core analyzer for orchestrating rule execution over units.

use crate::config::Config;
use crate::context::UnitContext;
use crate::rule::{Rule, RuleBox};
use crate::types::{Issue, Report};
use crate::unit::{Unit, UnitError, UNIT_FILE_SUFFIX};
use crate::utils::nosec::check_nosec_with;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A unit file could not be loaded.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Directory traversal error.
    #[error("Failed to walk {root}: {source}")]
    Walk {
        /// Root being walked.
        root: PathBuf,
        /// Underlying error.
        source: walkdir::Error,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_load_error: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to scan for unit files.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether a unit that fails to load aborts the scan.
    #[must_use]
    pub fn fail_on_load_error(mut self, fail: bool) -> Self {
        self.fail_on_load_error = Some(fail);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut patterns = self.exclude_patterns;
        patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let fail_on_load_error = self
            .fail_on_load_error
            .unwrap_or(config.analyzer.fail_on_load_error);

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude,
            config,
            fail_on_load_error,
        })
    }
}

/// The main analyzer that runs rules over compilation units.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    fail_on_load_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Discovers, loads and checks every unit file under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, or if a unit fails to load and
    /// `fail_on_load_error` is set.
    pub fn analyze(&self) -> Result<Report, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_units()?;
        info!("Found {} unit file(s)", files.len());

        let loaded: Vec<Result<Unit, UnitError>> = self.in_pool(|| {
            files.par_iter().map(|path| Unit::from_file(path)).collect()
        })?;

        let mut units = Vec::with_capacity(loaded.len());
        for result in loaded {
            match result {
                Ok(unit) => units.push(unit),
                Err(e) if !self.fail_on_load_error => {
                    warn!("Skipping {}: {}", e.path().display(), e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.analyze_units(&units)
    }

    /// Checks already-loaded units.
    ///
    /// Units are independent and are checked in parallel.
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be created.
    pub fn analyze_units(&self, units: &[Unit]) -> Result<Report, AnalyzerError> {
        let partials: Vec<Report> = self.in_pool(|| {
            units
                .par_iter()
                .filter(|unit| self.config.analyzer.include_tests || !unit.is_test())
                .map(|unit| self.check_unit(unit))
                .collect()
        })?;

        let mut report = Report::new();
        for partial in partials {
            report.extend(partial);
        }
        report.sort();

        info!(
            "Analysis complete: {} issue(s) in {} unit(s), {} suppressed",
            report.stats.found, report.stats.files, report.stats.nosec
        );

        Ok(report)
    }

    /// Runs every enabled rule over one unit.
    fn check_unit(&self, unit: &Unit) -> Report {
        debug!("Checking: {}", unit.path.display());

        let ctx = UnitContext::new(unit, &self.root);
        let mut report = Report::new();
        report.stats.files = 1;

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.code(), rule.name()) {
                debug!("Skipping disabled rule: {}", rule.code());
                continue;
            }

            for issue in rule.check(&ctx, unit) {
                if self.is_suppressed(&ctx, &issue) {
                    debug!(
                        "Suppressed {} at {}:{}",
                        issue.code,
                        issue.location.file.display(),
                        issue.location.line
                    );
                    report.stats.nosec += 1;
                    continue;
                }
                report
                    .issues
                    .push(self.apply_severity_override(rule.as_ref(), issue));
            }
        }

        report.stats.found = report.issues.len();
        report
    }

    fn is_suppressed(&self, ctx: &UnitContext, issue: &Issue) -> bool {
        self.config.nosec
            && check_nosec_with(|n| ctx.line(n), issue.location.line, &issue.code).is_suppressed()
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, rule: &dyn Rule, mut issue: Issue) -> Issue {
        if let Some(severity) = self.config.rule_severity(rule.code(), rule.name()) {
            issue.severity = severity;
        }
        issue
    }

    /// Runs `op` on a dedicated pool when parallelism is configured.
    fn in_pool<T, F>(&self, op: F) -> Result<T, AnalyzerError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.config.analyzer.parallelism {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }

    /// Discovers all unit files to analyze.
    fn discover_units(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| AnalyzerError::Walk {
                root: self.root.clone(),
                source,
            })?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || !path.to_string_lossy().ends_with(UNIT_FILE_SUFFIX)
            {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.exclude.iter().any(|pattern| {
            if pattern.matches(&path_str) {
                return true;
            }
            // Also check as substring for patterns like "**/vendor/**"
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && path_str.contains(&normalized)
        })
    }
}
