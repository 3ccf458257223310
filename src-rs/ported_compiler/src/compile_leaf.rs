//! Compilation of variable and functional objects.

use indexmap::{IndexMap, IndexSet};
use ported_expr::{Expression, Symbol};
use ported_ir::{
    CompiledObject, CompiledParts, FunctionalObject, Name, PortKind, Ports, VariableObject,
};
use tracing::{debug, instrument};

use crate::{CompileContext, CompileError, util::Scope};

/// Compiles a variable object.
///
/// Exposed variables become variable ports and the others internal
/// variables. Every free symbol that is not an input port must be global.
#[instrument(skip_all, fields(object = %scope))]
pub fn compile_variable<E: Expression>(
    object: &VariableObject<E>,
    scope: &Scope,
    context: &impl CompileContext,
) -> Result<CompiledObject<E>, CompileError> {
    check_global_symbols(&object.global_symbols(), scope, context)?;

    let mut variable_ports = IndexMap::new();
    let mut internal_variables = IndexMap::new();
    for assignment in object.assignments() {
        let target = assignment.target();
        match port_name(object.ports(), target, PortKind::Variable) {
            Some(name) => {
                variable_ports.insert(name.clone(), assignment.expression().clone());
            }
            None => {
                internal_variables.insert(target.clone(), assignment.expression().clone());
            }
        }
    }

    let mut lookup = port_lookup(object.ports());
    for variable in object.variables() {
        lookup.insert(variable.to_string(), variable.clone());
    }

    debug!(
        variable_ports = variable_ports.len(),
        internal_variables = internal_variables.len(),
        "compiled variable object"
    );

    Ok(CompiledObject::from_parts(CompiledParts {
        name: object.name().clone(),
        input_ports: input_ports(object.ports()),
        output_ports: IndexMap::new(),
        variable_ports,
        internal_parameters: IndexMap::new(),
        default_parameters: IndexSet::new(),
        internal_variables,
        lookup,
    }))
}

/// Compiles a functional object.
///
/// Every assignment target is an output port.
#[instrument(skip_all, fields(object = %scope))]
pub fn compile_functional<E: Expression>(
    object: &FunctionalObject<E>,
    scope: &Scope,
    context: &impl CompileContext,
) -> Result<CompiledObject<E>, CompileError> {
    check_global_symbols(&object.global_symbols(), scope, context)?;

    let mut output_ports = IndexMap::new();
    for assignment in object.assignments() {
        if let Some(name) = port_name(object.ports(), assignment.target(), PortKind::Output) {
            output_ports.insert(name.clone(), assignment.expression().clone());
        }
    }

    debug!(output_ports = output_ports.len(), "compiled functional object");

    Ok(CompiledObject::from_parts(CompiledParts {
        name: object.name().clone(),
        input_ports: input_ports(object.ports()),
        output_ports,
        variable_ports: IndexMap::new(),
        internal_parameters: IndexMap::new(),
        default_parameters: IndexSet::new(),
        internal_variables: IndexMap::new(),
        lookup: port_lookup(object.ports()),
    }))
}

fn check_global_symbols(
    symbols: &IndexSet<Symbol>,
    scope: &Scope,
    context: &impl CompileContext,
) -> Result<(), CompileError> {
    for symbol in symbols {
        if context.global_symbol(symbol.as_str()).is_none() {
            return Err(CompileError::unresolved_dependency(scope.qualify(symbol)));
        }
    }

    Ok(())
}

fn port_name<'a, E>(ports: &'a Ports<E>, symbol: &Symbol, kind: PortKind) -> Option<&'a Name> {
    ports
        .iter()
        .find(|(name, port)| port.kind() == kind && name.as_str() == symbol.as_str())
        .map(|(name, _)| name)
}

fn input_ports<E: Clone>(ports: &Ports<E>) -> IndexMap<Name, Option<E>> {
    ports
        .of_kind(PortKind::Input)
        .map(|(name, port)| (name.clone(), port.default().cloned()))
        .collect()
}

fn port_lookup<E>(ports: &Ports<E>) -> IndexMap<String, Symbol> {
    ports
        .iter()
        .map(|(name, _)| (name.to_string(), name.to_symbol()))
        .collect()
}

#[cfg(test)]
mod tests {
    use ported_expr::Expr;

    use super::*;
    use crate::test::TestContext;

    fn scope(name: &str) -> Scope {
        Scope::root(&Name::parse(name).expect("name should be valid"))
    }

    #[test]
    fn variable_object_splits_exposed_and_internal_variables() {
        // create the object
        let object = VariableObject::builder("osc")
            .assignments([
                ("x", Expr::var("v")),
                ("v", -Expr::var("k") * Expr::var("x")),
            ])
            .variable_port("x")
            .build()
            .expect("object should be valid");

        // compile it
        let compiled = compile_variable(&object, &scope("osc"), &TestContext::new())
            .expect("compilation should succeed");

        // check the result
        assert_eq!(
            compiled.variable_ports().keys().map(Name::as_str).collect::<Vec<_>>(),
            vec!["x"]
        );
        assert_eq!(
            compiled.internal_variables().keys().collect::<Vec<_>>(),
            vec![&Symbol::new("v")]
        );
        assert_eq!(
            compiled.input_ports().keys().map(Name::as_str).collect::<Vec<_>>(),
            vec!["k"]
        );
        assert_eq!(compiled.symbol_for("v"), Some(&Symbol::new("v")));
    }

    #[test]
    fn functional_object_keeps_input_defaults() {
        // create the object
        let object = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a") * Expr::var("k")))
            .input_with_default("k", 2.0)
            .build()
            .expect("object should be valid");

        // compile it
        let compiled = compile_functional(&object, &scope("f"), &TestContext::new())
            .expect("compilation should succeed");

        // check the result
        assert_eq!(compiled.input_ports().get("a"), Some(&None));
        assert_eq!(compiled.input_ports().get("k"), Some(&Some(Expr::literal(2.0))));
        assert_eq!(
            compiled.output_ports().get("y"),
            Some(&(Expr::var("a") * Expr::var("k")))
        );
        assert!(compiled.internal_parameters().is_empty());
    }

    #[test]
    fn global_symbols_must_be_known() {
        // create an object that reads `T` without an input port
        let object = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("T") * Expr::var("g")))
            .derive_inputs(false)
            .input("g")
            .build()
            .expect("object should be valid");

        // compile it with and without the time symbol
        let unknown = compile_functional(
            &object,
            &scope("f"),
            &TestContext::new().with_time_symbol("t"),
        );
        let known = compile_functional(&object, &scope("f"), &TestContext::new());

        // check the results
        assert_eq!(
            unknown,
            Err(CompileError::unresolved_dependency("f.T".to_string()))
        );
        known.expect("the time symbol should resolve");
    }
}
