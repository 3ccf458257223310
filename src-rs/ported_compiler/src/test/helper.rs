//! Helpers for building and inspecting compiled objects in tests.

use indexmap::IndexMap;
use ported_expr::{EvalContext, Expr, Expression, Symbol};
use ported_ir::{CompiledObject, Name, PortedObject};

use crate::{compile, test::TestContext};

pub fn name(name: &str) -> Name {
    Name::parse(name).expect("name should be valid")
}

pub fn compile_ok(object: impl Into<PortedObject>) -> CompiledObject {
    compile(&object.into(), &TestContext::new()).expect("compilation should succeed")
}

/// Returns every parameter of the compiled object, including output ports,
/// keyed by its symbol.
pub fn parameters(compiled: &CompiledObject) -> IndexMap<Symbol, Expr> {
    let (_, parameters) = compiled.assignments();
    parameters
        .into_iter()
        .map(|assignment| (assignment.target().clone(), assignment.expression().clone()))
        .collect()
}

/// Returns every variable of the compiled object, including variable ports,
/// keyed by its symbol.
pub fn variables(compiled: &CompiledObject) -> IndexMap<Symbol, Expr> {
    let (variables, _) = compiled.assignments();
    variables
        .into_iter()
        .map(|assignment| (assignment.target().clone(), assignment.expression().clone()))
        .collect()
}

/// Replaces every parameter in `expr` by its definition until only
/// variables, inputs and globals remain.
pub fn inline_parameters(expr: &Expr, parameters: &IndexMap<Symbol, Expr>) -> Expr {
    let mut expr = expr.clone();

    for _ in 0..=parameters.len() {
        let next = expr.substitute_all(parameters);
        if next == expr {
            break;
        }
        expr = next;
    }

    expr
}

/// Evaluates `expr` after inlining the parameters of `compiled`.
pub fn evaluate(compiled: &CompiledObject, expr: &Expr, values: &[(&str, f64)]) -> f64 {
    let expr = inline_parameters(expr, &parameters(compiled));
    let mut context = EvalContext::new();
    for (symbol, value) in values {
        context.set_value(Symbol::new(symbol), *value);
    }

    context.eval(&expr).expect("evaluation should succeed")
}
