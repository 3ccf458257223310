//! Ordering of directed wires.
//!
//! A wire depends on the wires feeding the inputs its source reads. A child
//! output reads an input when its expression reaches the input through
//! parameters only; variables break the chain because they are integrated
//! state.

use indexmap::{IndexMap, IndexSet};
use ported_expr::Expression;
use ported_ir::{Connection, Name, PortRef};
use tracing::trace;

use crate::{
    CompileError,
    qualify::QualifiedChild,
    util::{Scope, Stack},
};

/// Returns the connections in an order where every wire comes after the
/// wires it depends on.
///
/// # Errors
///
/// Returns [`CompileError::CyclicWire`] if the wires depend on each other.
pub fn resolution_order<'a, E: Expression>(
    connections: &'a [Connection],
    children: &IndexMap<Name, QualifiedChild<E>>,
    scope: &Scope,
) -> Result<Vec<&'a Connection>, CompileError> {
    let graph = WireGraph::new(connections, children);

    let mut stack = Stack::new();
    let mut visited = IndexSet::new();
    let mut order = Vec::with_capacity(connections.len());

    for index in 0..connections.len() {
        graph.visit(index, scope, &mut stack, &mut visited, &mut order)?;
    }

    Ok(order.into_iter().map(|index| &connections[index]).collect())
}

struct WireGraph<'a> {
    connections: &'a [Connection],
    feeders: IndexMap<(Name, Name), usize>,
    feedthrough: IndexMap<Name, IndexMap<Name, IndexSet<Name>>>,
}

impl<'a> WireGraph<'a> {
    fn new<E: Expression>(
        connections: &'a [Connection],
        children: &IndexMap<Name, QualifiedChild<E>>,
    ) -> Self {
        let mut feeders = IndexMap::new();
        for (index, connection) in connections.iter().enumerate() {
            for destination in connection.destinations() {
                if let PortRef::Child { child, port } = destination {
                    feeders.insert((child.clone(), port.clone()), index);
                }
            }
        }

        let feedthrough = children
            .iter()
            .map(|(name, child)| (name.clone(), child.feedthrough()))
            .collect();

        Self {
            connections,
            feeders,
            feedthrough,
        }
    }

    fn dependencies(&self, index: usize) -> Vec<usize> {
        let PortRef::Child { child, port } = self.connections[index].source() else {
            return vec![];
        };

        let Some(inputs) = self
            .feedthrough
            .get(child)
            .and_then(|outputs| outputs.get(port))
        else {
            return vec![];
        };

        inputs
            .iter()
            .filter_map(|input| self.feeders.get(&(child.clone(), input.clone())).copied())
            .collect()
    }

    fn visit(
        &self,
        index: usize,
        scope: &Scope,
        stack: &mut Stack<PortRef>,
        visited: &mut IndexSet<usize>,
        order: &mut Vec<usize>,
    ) -> Result<(), CompileError> {
        if visited.contains(&index) {
            return Ok(());
        }

        let source = self.connections[index].source();
        if let Some(cycle) = stack.find_circular_dependency(source) {
            let cycle = cycle.iter().map(|port| scope.qualify(port)).collect();
            return Err(CompileError::cyclic_wire(cycle));
        }

        stack.push(source.clone());
        for dependency in self.dependencies(index) {
            self.visit(dependency, scope, stack, visited, order)?;
        }
        stack.pop();

        trace!(source = %source, position = order.len(), "ordered directed wire");
        visited.insert(index);
        order.push(index);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ported_expr::Expr;
    use ported_ir::{CompositeObject, FunctionalObject, Port, VariableObject};

    use super::*;
    use crate::test::{
        TestContext,
        helper::{compile_ok, name},
    };

    fn qualified_children(
        composite: &CompositeObject,
    ) -> IndexMap<Name, QualifiedChild<Expr>> {
        composite
            .children()
            .iter()
            .map(|(child_name, child)| {
                let compiled = compile_ok(child.clone());
                let qualified = QualifiedChild::new(child_name, compiled, &TestContext::new());
                (child_name.clone(), qualified)
            })
            .collect()
    }

    fn chain() -> CompositeObject {
        let first = FunctionalObject::new("f", [("y", Expr::var("a") + 1.0)])
            .expect("object should be valid");
        let second = FunctionalObject::new("g", [("y", Expr::var("a") * 2.0)])
            .expect("object should be valid");

        CompositeObject::<Expr>::new("model")
            .and_then(|model| model.with_port(Port::input("a")))
            .and_then(|model| model.with_port(Port::output("y")))
            .and_then(|model| model.with_child(first))
            .and_then(|model| model.with_child(second))
            .and_then(|model| model.with_directed_wire(("g.y", "y")))
            .and_then(|model| model.with_directed_wire(("f.y", "g.a")))
            .and_then(|model| model.with_directed_wire(("a", "f.a")))
            .expect("model should be valid")
    }

    #[test]
    fn wires_are_ordered_after_their_dependencies() {
        // create the model
        let model = chain();
        let children = qualified_children(&model);

        // order the wires
        let scope = Scope::root(&name("model"));
        let order = resolution_order(model.connections(), &children, &scope)
            .expect("wires should be acyclic");

        // check the order
        let sources: Vec<String> = order.iter().map(|wire| wire.source().to_string()).collect();
        assert_eq!(sources, vec!["a", "f.y", "g.y"]);
    }

    #[test]
    fn instantaneous_loops_are_cycles() {
        // create two children feeding each other
        let first = FunctionalObject::new("f", [("y", Expr::var("a") + 1.0)])
            .expect("object should be valid");
        let second = FunctionalObject::new("g", [("y", Expr::var("a") * 2.0)])
            .expect("object should be valid");
        let model = CompositeObject::<Expr>::new("model")
            .and_then(|model| model.with_child(first))
            .and_then(|model| model.with_child(second))
            .and_then(|model| model.with_directed_wire(("f.y", "g.a")))
            .and_then(|model| model.with_directed_wire(("g.y", "f.a")))
            .expect("model should be valid");
        let children = qualified_children(&model);

        // order the wires
        let scope = Scope::root(&name("model"));
        let error = resolution_order(model.connections(), &children, &scope)
            .expect_err("wires should be cyclic");

        // check the error
        assert_eq!(
            error,
            CompileError::cyclic_wire(vec![
                "model.f.y".to_string(),
                "model.g.y".to_string(),
                "model.f.y".to_string(),
            ])
        );
    }

    #[test]
    fn loops_through_variables_are_not_cycles() {
        // create a feedback loop through an integrator
        let integrator = VariableObject::builder("i")
            .assignment(("x", Expr::var("u")))
            .variable_port("x")
            .build()
            .expect("object should be valid");
        let gain = FunctionalObject::new("g", [("y", -Expr::var("a"))])
            .expect("object should be valid");
        let model = CompositeObject::<Expr>::new("model")
            .and_then(|model| model.with_child(integrator))
            .and_then(|model| model.with_child(gain))
            .and_then(|model| model.with_directed_wire(("i.x", "g.a")))
            .and_then(|model| model.with_directed_wire(("g.y", "i.u")))
            .expect("model should be valid");
        let children = qualified_children(&model);

        // order the wires
        let scope = Scope::root(&name("model"));
        let order = resolution_order(model.connections(), &children, &scope)
            .expect("wires should be acyclic");

        // check the order
        assert_eq!(order.len(), 2);
    }
}
