//! Depth-first traversal of syntax trees.
//!
//! Modeled on `syn::visit`: override the `visit_*` hooks you care about and
//! call the matching free function to keep descending.
//!
//! ```ignore
//! struct CallCounter(usize);
//!
//! impl<'ast> Visit<'ast> for CallCounter {
//!     fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
//!         self.0 += 1;
//!         visit::visit_call(self, node, call);
//!     }
//! }
//! ```

use crate::ast::{CallExpr, CompositeLit, Node};
use crate::unit::{ImportSpec, Unit};

/// Syntax tree visitor.
///
/// Every hook receives the enclosing [`Node`] as well as the typed payload
/// where there is one, since the matcher primitives take `&Node`.
pub trait Visit<'ast> {
    /// Visits a whole unit: imports first, then declarations.
    fn visit_unit(&mut self, unit: &'ast Unit) {
        visit_unit(self, unit);
    }

    /// Visits one import.
    fn visit_import(&mut self, _import: &'ast ImportSpec) {}

    /// Visits any node. Dispatches to the typed hooks.
    fn visit_node(&mut self, node: &'ast Node) {
        visit_node(self, node);
    }

    /// Visits a call expression.
    fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
        visit_call(self, node, call);
    }

    /// Visits a composite literal.
    fn visit_composite_lit(&mut self, node: &'ast Node, lit: &'ast CompositeLit) {
        visit_composite_lit(self, node, lit);
    }
}

/// Default traversal for a unit.
pub fn visit_unit<'ast, V>(v: &mut V, unit: &'ast Unit)
where
    V: Visit<'ast> + ?Sized,
{
    for import in &unit.imports {
        v.visit_import(import);
    }
    for decl in &unit.decls {
        v.visit_node(decl);
    }
}

/// Default traversal for a node.
pub fn visit_node<'ast, V>(v: &mut V, node: &'ast Node)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Node::Ident(_) | Node::BasicLit(_) => {}
        Node::Selector(selector) => v.visit_node(&selector.base),
        Node::Call(call) => v.visit_call(node, call),
        Node::CompositeLit(lit) => v.visit_composite_lit(node, lit),
        Node::KeyValue(kv) => {
            v.visit_node(&kv.key);
            v.visit_node(&kv.value);
        }
        Node::Other(other) => {
            for child in &other.children {
                v.visit_node(child);
            }
        }
    }
}

/// Default traversal for a call: callee, then arguments.
pub fn visit_call<'ast, V>(v: &mut V, _node: &'ast Node, call: &'ast CallExpr)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_node(&call.fun);
    for arg in &call.args {
        v.visit_node(arg);
    }
}

/// Default traversal for a composite literal: type, then elements.
pub fn visit_composite_lit<'ast, V>(v: &mut V, _node: &'ast Node, lit: &'ast CompositeLit)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_node(&lit.ty);
    for elt in &lit.elts {
        v.visit_node(elt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::LitKind;

    #[derive(Default)]
    struct Collector {
        calls: usize,
        composites: usize,
        nodes: usize,
    }

    impl<'ast> Visit<'ast> for Collector {
        fn visit_node(&mut self, node: &'ast Node) {
            self.nodes += 1;
            visit_node(self, node);
        }

        fn visit_call(&mut self, node: &'ast Node, call: &'ast CallExpr) {
            self.calls += 1;
            visit_call(self, node, call);
        }

        fn visit_composite_lit(&mut self, node: &'ast Node, lit: &'ast CompositeLit) {
            self.composites += 1;
            visit_composite_lit(self, node, lit);
        }
    }

    #[test]
    fn reaches_calls_nested_in_opaque_nodes() {
        // f(g(1), T{k: h()})
        let tree = other(
            "ExprStmt",
            vec![call(
                ident(1, "f").into(),
                vec![
                    call(ident(2, "g").into(), vec![lit(LitKind::Int, "1")]),
                    composite(
                        ident(3, "T").into(),
                        vec![key_value(
                            ident(4, "k").into(),
                            call(ident(5, "h").into(), vec![]),
                        )],
                    ),
                ],
            )],
        );

        let mut collector = Collector::default();
        collector.visit_node(&tree);

        assert_eq!(collector.calls, 3);
        assert_eq!(collector.composites, 1);
        // other, f(), f, g(), g, 1, T{}, T, kv, k, h(), h
        assert_eq!(collector.nodes, 12);
    }
}
