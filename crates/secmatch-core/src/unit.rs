//! Compilation units as delivered by the front end.

use crate::ast::{BasicLit, Ident, Node, Pos};
use crate::semantic::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File suffix the analyzer looks for when discovering units.
pub const UNIT_FILE_SUFFIX: &str = ".unit.json";

/// One import declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Local name (`cgi` in `import cgi "net/http/cgi"`), if any.
    #[serde(default)]
    pub name: Option<Ident>,
    /// Import path as a `STRING` literal, quotes included.
    pub path: BasicLit,
    /// Position of the import.
    #[serde(default)]
    pub pos: Pos,
}

/// A parsed and resolved compilation unit (one Go source file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Path of the Go source file this unit was produced from.
    pub path: PathBuf,
    /// Package clause name.
    pub package: String,
    /// Import declarations.
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations.
    #[serde(default)]
    pub decls: Vec<Node>,
    /// Use-site resolution table.
    #[serde(default)]
    pub uses: Context,
    /// Original source text, used for `#nosec` lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Error loading a unit file.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The file could not be read.
    #[error("Failed to read unit {path}: {source}")]
    Io {
        /// Unit file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not a valid unit document.
    #[error("Invalid unit {path}: {source}")]
    Json {
        /// Unit file path.
        path: PathBuf,
        /// Deserialization error.
        source: serde_json::Error,
    },
}

impl UnitError {
    /// Path of the unit file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

impl Unit {
    /// Creates an empty unit for `path` in package `package`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            imports: Vec::new(),
            decls: Vec::new(),
            uses: Context::new(),
            source: None,
        }
    }

    /// Adds a declaration.
    #[must_use]
    pub fn with_decl(mut self, decl: Node) -> Self {
        self.decls.push(decl);
        self
    }

    /// Adds an import of `path` (unquoted).
    #[must_use]
    pub fn with_import(mut self, path: &str) -> Self {
        self.imports.push(ImportSpec {
            name: None,
            path: BasicLit {
                kind: crate::ast::LitKind::String,
                value: format!("{path:?}"),
                pos: Pos::default(),
            },
            pos: Pos::default(),
        });
        self
    }

    /// Sets the resolution table.
    #[must_use]
    pub fn with_uses(mut self, uses: Context) -> Self {
        self.uses = uses;
        self
    }

    /// Sets the source text.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Parses a unit from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::Json`] if the document is malformed.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, UnitError> {
        serde_json::from_str(json).map_err(|source| UnitError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads a unit from a `.unit.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, UnitError> {
        let json = std::fs::read_to_string(path).map_err(|source| UnitError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    /// Returns true if this unit is a Go test file.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"))
    }
}
