//! Resolved symbols and the per-unit use-site table.

use crate::ast::{Ident, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of a declared entity, mirroring Go's object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Constant.
    Const,
    /// Variable, parameter or struct field.
    Var,
    /// Named type.
    Type,
    /// Function or method.
    Func,
    /// Imported package name.
    Package,
    /// Predeclared function (`len`, `make`, ...).
    Builtin,
    /// Statement label.
    Label,
    /// The predeclared `nil`.
    Nil,
}

/// A declared entity that a use site resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Import path of the declaring package, empty for universe scope.
    #[serde(default)]
    pub package_path: String,
    /// Declared name.
    pub name: String,
    /// Entity kind.
    pub kind: SymbolKind,
    /// Receiver base type for methods (`Rat` for `(*big.Rat).SetString`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl Symbol {
    /// Creates a symbol without a receiver.
    #[must_use]
    pub fn new(package_path: impl Into<String>, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            package_path: package_path.into(),
            name: name.into(),
            kind,
            receiver: None,
        }
    }

    /// Sets the method receiver type.
    #[must_use]
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Returns true if this symbol is `package_path.name`.
    ///
    /// Universe-scope symbols (`len`, `make`) belong to no package and never
    /// match, not even an empty `package_path`.
    #[must_use]
    pub fn is(&self, package_path: &str, name: &str) -> bool {
        !self.package_path.is_empty() && self.package_path == package_path && self.name == name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.receiver, self.package_path.is_empty()) {
            (Some(recv), _) => write!(f, "({}.{recv}).{}", self.package_path, self.name),
            (None, true) => write!(f, "{}", self.name),
            (None, false) => write!(f, "{}.{}", self.package_path, self.name),
        }
    }
}

/// Resolution table for one compilation unit.
///
/// Only successfully resolved use sites are present; a missing entry means
/// the identifier is unresolved, which is routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    /// Use site to resolved symbol.
    #[serde(with = "uses_as_list")]
    pub uses: HashMap<NodeId, Symbol>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolved use site.
    #[must_use]
    pub fn with_use(mut self, site: NodeId, symbol: Symbol) -> Self {
        self.uses.insert(site, symbol);
        self
    }

    /// Looks up the symbol an identifier refers to.
    #[must_use]
    pub fn symbol_of(&self, ident: &Ident) -> Option<&Symbol> {
        self.uses.get(&ident.id)
    }

    /// Number of resolved use sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uses.len()
    }

    /// Returns true if nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }
}

/// JSON object keys must be strings, so the table travels as a list of
/// `{"site": id, "symbol": {...}}` entries.
mod uses_as_list {
    use super::{NodeId, Symbol};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        site: NodeId,
        symbol: Symbol,
    }

    pub fn serialize<S: Serializer>(
        uses: &HashMap<NodeId, Symbol>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<Entry> = uses
            .iter()
            .map(|(site, symbol)| Entry {
                site: *site,
                symbol: symbol.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.site);
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<NodeId, Symbol>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.site, e.symbol)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::ident;

    #[test]
    fn unresolved_site_is_absent() {
        let ctx = Context::new().with_use(NodeId(2), Symbol::new("math/rand", "Read", SymbolKind::Func));
        assert!(ctx.symbol_of(&ident(1, "rand")).is_none());
        assert_eq!(
            ctx.symbol_of(&ident(2, "Read")).map(|s| s.name.as_str()),
            Some("Read")
        );
    }

    #[test]
    fn uses_roundtrip_as_entry_list() {
        let json = r#"[{"site": 4, "symbol": {"package_path": "os", "name": "Create", "kind": "func"}}]"#;
        let ctx: Context = serde_json::from_str(json).expect("valid context json");
        assert_eq!(ctx.len(), 1);
        assert!(ctx.uses[&NodeId(4)].is("os", "Create"));
    }

    #[test]
    fn universe_scope_never_matches_a_package() {
        let len = Symbol::new("", "len", SymbolKind::Builtin);
        assert!(!len.is("", "len"));
        assert!(Symbol::new("os", "Create", SymbolKind::Func).is("os", "Create"));
    }

    #[test]
    fn display_includes_receiver() {
        let sym = Symbol::new("math/big", "SetString", SymbolKind::Func).with_receiver("Rat");
        assert_eq!(sym.to_string(), "(math/big.Rat).SetString");
        assert_eq!(
            Symbol::new("", "len", SymbolKind::Builtin).to_string(),
            "len"
        );
    }
}
