//! Structural and semantic matching primitives.
//!
//! Every rule is assembled from these functions. A mismatch is never an
//! error: each matcher returns `None` and chains short-circuit with `?`.
//!
//! Two tiers are available and deliberately kept apart:
//!
//! - [`match_call`] / [`match_composite_lit`] compare a regex against the
//!   dotted name as written (`rand.Read`). Cheap, no type information, but
//!   can over-match.
//! - [`match_call_by_package`] resolves the callee through the
//!   [`Context`] and compares declaration identity. Precise, but only as
//!   good as the front end's resolution.

use crate::ast::{BasicLit, CallExpr, CompositeLit, Ident, KeyValueExpr, Node, OtherNode, SelectorExpr};
use crate::semantic::{Context, Symbol};
use regex::Regex;

/// A node variant that [`try_as`] can project onto.
pub trait Shape {
    /// Returns the node as `Self` if its variant matches.
    fn project(node: &Node) -> Option<&Self>;
}

macro_rules! impl_shape {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn project(node: &Node) -> Option<&Self> {
                    match node {
                        Node::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_shape! {
    Ident => Ident,
    Selector => SelectorExpr,
    Call => CallExpr,
    CompositeLit => CompositeLit,
    KeyValue => KeyValueExpr,
    BasicLit => BasicLit,
    Other => OtherNode,
}

/// Reinterprets `node` as shape `T`, or `None` if the variant differs.
///
/// ```
/// use secmatch_core::ast::{build, CallExpr, Ident, Node};
/// use secmatch_core::matcher::try_as;
///
/// let node: Node = build::ident(1, "x").into();
/// assert!(try_as::<Ident>(&node).is_some());
/// assert!(try_as::<CallExpr>(&node).is_none());
/// ```
#[must_use]
pub fn try_as<T: Shape>(node: &Node) -> Option<&T> {
    T::project(node)
}

/// Composes `"Base.Selector"` from a selector whose base is an identifier.
///
/// Returns `None` for anything else, including selectors over calls
/// (`f().X`) or nested selectors (`a.b.C`).
#[must_use]
pub fn selector_name(node: &Node) -> Option<String> {
    let selector = try_as::<SelectorExpr>(node)?;
    let base = try_as::<Ident>(&selector.base)?;
    Some(format!("{}.{}", base.name, selector.sel.name))
}

/// Matches a call whose qualified callee name contains a match for `pattern`.
///
/// The search is unanchored; anchor the pattern to get exact matches.
#[must_use]
pub fn match_call<'a>(node: &'a Node, pattern: &Regex) -> Option<&'a CallExpr> {
    let call = try_as::<CallExpr>(node)?;
    let name = selector_name(&call.fun)?;
    pattern.is_match(&name).then_some(call)
}

/// Matches a composite literal whose qualified type name contains a match
/// for `pattern`.
#[must_use]
pub fn match_composite_lit<'a>(node: &'a Node, pattern: &Regex) -> Option<&'a CompositeLit> {
    let lit = try_as::<CompositeLit>(node)?;
    let name = selector_name(&lit.ty)?;
    pattern.is_match(&name).then_some(lit)
}

/// A call together with the symbol its callee resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallMatch<'a> {
    /// The matched call.
    pub call: &'a CallExpr,
    /// Resolved callee declaration.
    pub symbol: &'a Symbol,
}

/// Returns the identifier that names the callee of `call`.
///
/// For `f(x)` this is `f`; for `pkg.F(x)` or `v.M(x)` it is the selected
/// identifier, which is where the front end records the use.
#[must_use]
pub fn callee_ident(call: &CallExpr) -> Option<&Ident> {
    match call.fun.as_ref() {
        Node::Ident(ident) => Some(ident),
        Node::Selector(selector) => Some(&selector.sel),
        _ => None,
    }
}

/// Resolves a call node to its callee's declared symbol.
#[must_use]
pub fn call_symbol<'a>(node: &'a Node, ctx: &'a Context) -> Option<CallMatch<'a>> {
    let call = try_as::<CallExpr>(node)?;
    let symbol = ctx.symbol_of(callee_ident(call)?)?;
    Some(CallMatch { call, symbol })
}

/// Matches a call resolving to exactly `package_path.name`.
///
/// ```
/// use secmatch_core::ast::build::{call, ident, selector};
/// use secmatch_core::matcher::match_call_by_package;
/// use secmatch_core::{Context, NodeId, Symbol, SymbolKind};
///
/// let node = call(selector(ident(1, "rand"), ident(2, "Read")), vec![]);
/// let ctx = Context::new().with_use(NodeId(2), Symbol::new("math/rand", "Read", SymbolKind::Func));
///
/// assert!(match_call_by_package(&node, &ctx, "math/rand", "Read").is_some());
/// assert!(match_call_by_package(&node, &ctx, "crypto/rand", "Read").is_none());
/// ```
#[must_use]
pub fn match_call_by_package<'a>(
    node: &'a Node,
    ctx: &'a Context,
    package_path: &str,
    name: &str,
) -> Option<CallMatch<'a>> {
    call_symbol(node, ctx).filter(|m| m.symbol.is(package_path, name))
}

/// Matches a call resolving to any of `names` declared in `package_path`.
#[must_use]
pub fn match_call_by_packages<'a>(
    node: &'a Node,
    ctx: &'a Context,
    package_path: &str,
    names: &[&str],
) -> Option<CallMatch<'a>> {
    call_symbol(node, ctx).filter(|m| names.iter().any(|name| m.symbol.is(package_path, name)))
}

/// Finds the value of field `key` in a struct composite literal.
#[must_use]
pub fn field_value<'a>(lit: &'a CompositeLit, key: &str) -> Option<&'a Node> {
    lit.elts.iter().find_map(|elt| {
        let kv = try_as::<KeyValueExpr>(elt)?;
        let field = try_as::<Ident>(&kv.key)?;
        (field.name == key).then_some(kv.value.as_ref())
    })
}
