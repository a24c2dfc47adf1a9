//! Context handed to rules for each unit.

use crate::ast::Pos;
use crate::semantic::Context;
use crate::types::Location;
use crate::unit::Unit;
use std::path::{Path, PathBuf};

/// Per-unit context provided to rules.
///
/// Carries the resolution table alongside file metadata so rules can call
/// the semantic matchers and build [`Location`]s without touching the unit
/// structure directly.
#[derive(Debug, Clone)]
pub struct UnitContext<'a> {
    /// Path of the Go source file.
    pub path: &'a Path,
    /// Path relative to the scan root.
    pub relative_path: PathBuf,
    /// Whether this is a `_test.go` file.
    pub is_test: bool,
    /// Package clause name.
    pub package: &'a str,
    /// Source text, when the front end supplied it.
    pub source: Option<&'a str>,
    /// Use-site resolution table.
    pub uses: &'a Context,
}

impl<'a> UnitContext<'a> {
    /// Creates a context for `unit`, relativizing its path against `root`.
    #[must_use]
    pub fn new(unit: &'a Unit, root: &Path) -> Self {
        let relative_path = unit
            .path
            .strip_prefix(root)
            .map_or_else(|_| unit.path.clone(), Path::to_path_buf);

        Self {
            path: &unit.path,
            relative_path,
            is_test: unit.is_test(),
            package: &unit.package,
            source: unit.source.as_deref(),
            uses: &unit.uses,
        }
    }

    /// Builds a location in this unit from a node position.
    ///
    /// The file is the root-relative path; units outside the root keep
    /// their own path.
    #[must_use]
    pub fn location(&self, pos: Pos) -> Location {
        Location::new(self.relative_path.clone(), pos.line, pos.column)
    }

    /// Returns the source line (1-indexed), if source text is available.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&'a str> {
        let index = line.checked_sub(1)?;
        self.source?.lines().nth(index)
    }
}
