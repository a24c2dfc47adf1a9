//! Syntax node model consumed by the matchers.
//!
//! Trees are produced by an external Go front end and deserialized from
//! JSON. The core never builds or mutates them; it only reads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an identifier node within one unit.
///
/// Assigned by the front end. The semantic [`Context`](crate::Context) is
/// keyed by these ids, so they must be unique per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source position of a node (1-indexed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Line number.
    pub line: usize,
    /// Column number.
    pub column: usize,
}

impl Pos {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Kind tag of a basic literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LitKind {
    /// Integer literal (`42`, `0x10`, `0o600`).
    Int,
    /// Floating-point literal (`1.5`, `1e9`, `0x1p-2`).
    Float,
    /// Imaginary literal (`2i`).
    Imag,
    /// Rune literal (`'a'`).
    Char,
    /// String literal, interpreted or raw.
    String,
}

impl fmt::Display for LitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Float => write!(f, "FLOAT"),
            Self::Imag => write!(f, "IMAG"),
            Self::Char => write!(f, "CHAR"),
            Self::String => write!(f, "STRING"),
        }
    }
}

/// An identifier, e.g. `rand` or `Read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    /// Use-site identity.
    pub id: NodeId,
    /// Identifier text.
    pub name: String,
    /// Position of the identifier.
    #[serde(default)]
    pub pos: Pos,
}

/// A qualified reference `base.sel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorExpr {
    /// Expression left of the dot.
    pub base: Box<Node>,
    /// Selected identifier. For qualified calls this is the use site.
    pub sel: Ident,
    /// Position of the expression.
    #[serde(default)]
    pub pos: Pos,
}

/// A call `fun(args...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Callee expression.
    pub fun: Box<Node>,
    /// Call arguments.
    #[serde(default)]
    pub args: Vec<Node>,
    /// Position of the call.
    #[serde(default)]
    pub pos: Pos,
}

/// A composite literal `T{elts...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeLit {
    /// Type expression (`tls.Config`).
    #[serde(rename = "type")]
    pub ty: Box<Node>,
    /// Elements, usually [`KeyValueExpr`] for struct literals.
    #[serde(default)]
    pub elts: Vec<Node>,
    /// Position of the literal.
    #[serde(default)]
    pub pos: Pos,
}

/// A `key: value` element inside a composite literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueExpr {
    /// Field or key expression.
    pub key: Box<Node>,
    /// Value expression.
    pub value: Box<Node>,
    /// Position of the element.
    #[serde(default)]
    pub pos: Pos,
}

/// A basic literal token with its raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicLit {
    /// Literal kind.
    pub kind: LitKind,
    /// Raw token text, quotes included.
    pub value: String,
    /// Position of the token.
    #[serde(default)]
    pub pos: Pos,
}

/// Any construct the model does not describe in detail.
///
/// Statements, blocks and declarations arrive as `Other` so that the calls
/// and literals nested inside them are still reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherNode {
    /// Front-end label, e.g. `"AssignStmt"`.
    pub label: String,
    /// Child nodes in source order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Position of the construct.
    #[serde(default)]
    pub pos: Pos,
}

/// A syntax node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum Node {
    /// Identifier.
    Ident(Ident),
    /// Selector expression.
    Selector(SelectorExpr),
    /// Call expression.
    Call(CallExpr),
    /// Composite literal.
    CompositeLit(CompositeLit),
    /// Key/value element.
    KeyValue(KeyValueExpr),
    /// Basic literal.
    BasicLit(BasicLit),
    /// Anything else.
    Other(OtherNode),
}

impl Node {
    /// Returns the source position of this node.
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Self::Ident(n) => n.pos,
            Self::Selector(n) => n.pos,
            Self::Call(n) => n.pos,
            Self::CompositeLit(n) => n.pos,
            Self::KeyValue(n) => n.pos,
            Self::BasicLit(n) => n.pos,
            Self::Other(n) => n.pos,
        }
    }

    /// Short description of the node variant, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(_) => "identifier".to_string(),
            Self::Selector(_) => "selector expression".to_string(),
            Self::Call(_) => "call expression".to_string(),
            Self::CompositeLit(_) => "composite literal".to_string(),
            Self::KeyValue(_) => "key/value expression".to_string(),
            Self::BasicLit(lit) => format!("{} literal", lit.kind),
            Self::Other(other) => other.label.clone(),
        }
    }
}

impl From<Ident> for Node {
    fn from(value: Ident) -> Self {
        Self::Ident(value)
    }
}

impl From<SelectorExpr> for Node {
    fn from(value: SelectorExpr) -> Self {
        Self::Selector(value)
    }
}

impl From<CallExpr> for Node {
    fn from(value: CallExpr) -> Self {
        Self::Call(value)
    }
}

impl From<CompositeLit> for Node {
    fn from(value: CompositeLit) -> Self {
        Self::CompositeLit(value)
    }
}

impl From<KeyValueExpr> for Node {
    fn from(value: KeyValueExpr) -> Self {
        Self::KeyValue(value)
    }
}

impl From<BasicLit> for Node {
    fn from(value: BasicLit) -> Self {
        Self::BasicLit(value)
    }
}

impl From<OtherNode> for Node {
    fn from(value: OtherNode) -> Self {
        Self::Other(value)
    }
}

/// Compact constructors for building trees by hand.
///
/// Front ends deserialize units from JSON; these helpers exist for tests
/// and for embedding callers that assemble small trees in code.
pub mod build {
    use super::{
        BasicLit, CallExpr, CompositeLit, Ident, KeyValueExpr, LitKind, Node, NodeId, OtherNode,
        Pos, SelectorExpr,
    };

    /// Identifier with the given id.
    #[must_use]
    pub fn ident(id: u32, name: &str) -> Ident {
        Ident {
            id: NodeId(id),
            name: name.to_string(),
            pos: Pos::default(),
        }
    }

    /// `base.sel` where `base` is an identifier.
    #[must_use]
    pub fn selector(base: Ident, sel: Ident) -> Node {
        selector_on(base.into(), sel)
    }

    /// `base.sel` over an arbitrary base expression.
    #[must_use]
    pub fn selector_on(base: Node, sel: Ident) -> Node {
        Node::Selector(SelectorExpr {
            base: Box::new(base),
            sel,
            pos: Pos::default(),
        })
    }

    /// `fun(args...)`.
    #[must_use]
    pub fn call(fun: Node, args: Vec<Node>) -> Node {
        Node::Call(CallExpr {
            fun: Box::new(fun),
            args,
            pos: Pos::default(),
        })
    }

    /// `ty{elts...}`.
    #[must_use]
    pub fn composite(ty: Node, elts: Vec<Node>) -> Node {
        Node::CompositeLit(CompositeLit {
            ty: Box::new(ty),
            elts,
            pos: Pos::default(),
        })
    }

    /// `key: value`.
    #[must_use]
    pub fn key_value(key: Node, value: Node) -> Node {
        Node::KeyValue(KeyValueExpr {
            key: Box::new(key),
            value: Box::new(value),
            pos: Pos::default(),
        })
    }

    /// Basic literal with raw text.
    #[must_use]
    pub fn lit(kind: LitKind, value: &str) -> Node {
        Node::BasicLit(BasicLit {
            kind,
            value: value.to_string(),
            pos: Pos::default(),
        })
    }

    /// Opaque container.
    #[must_use]
    pub fn other(label: &str, children: Vec<Node>) -> Node {
        Node::Other(OtherNode {
            label: label.to_string(),
            children,
            pos: Pos::default(),
        })
    }

    /// Sets the position of a node, returning it.
    #[must_use]
    pub fn at(mut node: Node, line: usize, column: usize) -> Node {
        let pos = Pos::new(line, column);
        match &mut node {
            Node::Ident(n) => n.pos = pos,
            Node::Selector(n) => n.pos = pos,
            Node::Call(n) => n.pos = pos,
            Node::CompositeLit(n) => n.pos = pos,
            Node::KeyValue(n) => n.pos = pos,
            Node::BasicLit(n) => n.pos = pos,
            Node::Other(n) => n.pos = pos,
        }
        node
    }
}
