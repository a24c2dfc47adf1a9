//! Locating and loading `secmatch.toml`.
//!
//! Unit files usually live in a build directory below the Go module, so the
//! project lookup walks up from the scanned directory:
//!
//! 1. `--config` flag (explicit path, never falls back)
//! 2. `secmatch.toml` or `.secmatch.toml` in the scanned directory or any
//!    parent, stopping after the first directory holding `go.mod`
//! 3. `$SECMATCH_CONFIG_DIR/config.toml`, else `~/.secmatch/config.toml`
//! 4. Defaults
//!
//! A relative `analyzer.root` in a project or explicit config is taken
//! relative to the config file, not the working directory.

use anyhow::{Context, Result};
use secmatch_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag.
    Explicit(PathBuf),
    /// Found next to the units or in a parent directory.
    Project(PathBuf),
    /// Global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

/// A loaded configuration and the file it came from.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Parsed configuration, with `analyzer.root` already rebased.
    pub config: Config,
    /// Where it was found.
    pub source: ConfigSource,
}

const PROJECT_CONFIG_NAMES: &[&str] = &["secmatch.toml", ".secmatch.toml"];
const GLOBAL_CONFIG_NAME: &str = "config.toml";
const MODULE_MARKER: &str = "go.mod";

/// Finds and loads the configuration for a scan of `scan_dir`.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed.
pub fn load(scan_dir: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig> {
    load_with(scan_dir, explicit, global_config_dir())
}

fn load_with(
    scan_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    let source = resolve(scan_dir, explicit, global_dir);
    let Some(path) = source.path() else {
        return Ok(ResolvedConfig {
            config: Config::default(),
            source,
        });
    };

    let mut config = Config::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    if !matches!(source, ConfigSource::Global(_)) && config.analyzer.root.is_relative() {
        if let Some(dir) = path.parent() {
            config.analyzer.root = dir.join(&config.analyzer.root);
        }
    }

    Ok(ResolvedConfig { config, source })
}

fn resolve(scan_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(scan_dir) {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn find_project_config(scan_dir: &Path) -> Option<PathBuf> {
    for dir in scan_dir.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(MODULE_MARKER).is_file() {
            break;
        }
    }
    None
}

/// `$SECMATCH_CONFIG_DIR`, else `~/.secmatch`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SECMATCH_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".secmatch"))
}
