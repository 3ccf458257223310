//! Qualification of compiled children.

use indexmap::{IndexMap, IndexSet};
use ported_expr::{Expression, Symbol};
use ported_ir::{CompiledObject, Name};

use crate::CompileContext;

/// A compiled child whose owned symbols are prefixed by the child's name.
///
/// Global symbols stay unqualified. Ports keep their local names as keys
/// and carry the qualified symbol they stand for.
#[derive(Debug, Clone)]
pub struct QualifiedChild<E> {
    pub inputs: IndexMap<Name, (Symbol, Option<E>)>,
    pub outputs: IndexMap<Name, (Symbol, E)>,
    pub variables: IndexMap<Name, (Symbol, E)>,
    pub internal_parameters: IndexMap<Symbol, E>,
    pub default_parameters: IndexSet<Symbol>,
    pub internal_variables: IndexMap<Symbol, E>,
    pub lookup: IndexMap<String, Symbol>,
}

impl<E: Expression> QualifiedChild<E> {
    /// Qualifies a compiled child.
    ///
    /// An input port named after the time symbol or a system parameter
    /// reads that global, so references to it keep the global symbol. A wire
    /// into such a port leaves them untouched.
    pub fn new(name: &Name, compiled: CompiledObject<E>, context: &impl CompileContext) -> Self {
        let globals: IndexSet<Symbol> = compiled
            .input_ports()
            .keys()
            .filter(|input| context.global_symbol(input.as_str()).is_some())
            .map(Name::to_symbol)
            .collect();
        let renames: IndexMap<Symbol, Symbol> = compiled
            .owned_symbols()
            .filter(|symbol| !globals.contains(symbol))
            .map(|symbol| {
                let qualified = symbol.prefixed(name.as_str());
                (symbol, qualified)
            })
            .collect();
        let rename = |symbol: &Symbol| {
            renames
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| symbol.clone())
        };
        let rename_expr = |expr: &E| expr.rename_symbols(&renames);

        let parts = compiled.into_parts();

        let port = |port: &Name| port.to_symbol().prefixed(name.as_str());

        Self {
            inputs: parts
                .input_ports
                .iter()
                .map(|(input, default)| {
                    let default = default.as_ref().map(rename_expr);
                    (input.clone(), (port(input), default))
                })
                .collect(),
            outputs: parts
                .output_ports
                .iter()
                .map(|(output, expr)| (output.clone(), (port(output), rename_expr(expr))))
                .collect(),
            variables: parts
                .variable_ports
                .iter()
                .map(|(variable, rhs)| (variable.clone(), (port(variable), rename_expr(rhs))))
                .collect(),
            internal_parameters: parts
                .internal_parameters
                .iter()
                .map(|(symbol, expr)| (rename(symbol), rename_expr(expr)))
                .collect(),
            default_parameters: parts.default_parameters.iter().map(rename).collect(),
            internal_variables: parts
                .internal_variables
                .iter()
                .map(|(symbol, rhs)| (rename(symbol), rename_expr(rhs)))
                .collect(),
            lookup: parts
                .lookup
                .iter()
                .map(|(path, symbol)| (format!("{name}.{path}"), rename(symbol)))
                .collect(),
        }
    }

    /// Returns the output ports whose expressions depend on each input port
    /// without passing through a variable.
    pub fn feedthrough(&self) -> IndexMap<Name, IndexSet<Name>> {
        let inputs: IndexMap<&Symbol, &Name> = self
            .inputs
            .iter()
            .map(|(name, (symbol, _))| (symbol, name))
            .collect();
        let parameters: IndexMap<&Symbol, &E> = self
            .internal_parameters
            .iter()
            .chain(self.outputs.values().map(|(symbol, expr)| (symbol, expr)))
            .collect();

        let mut feedthrough = IndexMap::new();
        for (output, (_, expr)) in &self.outputs {
            let mut reached = IndexSet::new();
            let mut visited = IndexSet::new();
            let mut pending: Vec<Symbol> = expr.free_symbols().into_iter().collect();

            while let Some(symbol) = pending.pop() {
                if !visited.insert(symbol.clone()) {
                    continue;
                }

                if let Some(input) = inputs.get(&symbol) {
                    reached.insert((*input).clone());
                } else if let Some(definition) = parameters.get(&symbol) {
                    pending.extend(definition.free_symbols());
                }
            }

            feedthrough.insert(output.clone(), reached);
        }

        feedthrough
    }
}

#[cfg(test)]
mod tests {
    use ported_expr::Expr;
    use ported_ir::{CompositeObject, FunctionalObject, Port, ReservedNames, VariableObject};

    use super::*;
    use crate::test::{
        TestContext,
        helper::{compile_ok, name},
    };

    #[test]
    fn owned_symbols_are_prefixed_and_globals_are_not() {
        // create and compile the child
        let child = VariableObject::builder("osc")
            .assignment(("x", Expr::var("T") * Expr::var("k") * Expr::var("x")))
            .expose_variables()
            .reserved(&ReservedNames::new().with_names(["T"]))
            .build()
            .expect("object should be valid");
        let compiled = compile_ok(child);

        // qualify it
        let qualified = QualifiedChild::new(&name("f"), compiled, &TestContext::new());

        // check the result
        let (symbol, rhs) = &qualified.variables["x"];
        assert_eq!(symbol, &Symbol::new("f.x"));
        assert_eq!(rhs, &(Expr::var("T") * Expr::var("f.k") * Expr::var("f.x")));
        assert_eq!(qualified.inputs["k"].0, Symbol::new("f.k"));
        assert_eq!(qualified.lookup.get("f.k"), Some(&Symbol::new("f.k")));
        assert_eq!(qualified.lookup.get("f.x"), Some(&Symbol::new("f.x")));
    }

    #[test]
    fn inputs_named_after_globals_keep_the_global_symbol() {
        // create and compile a child reading `g`
        let child = FunctionalObject::new("fall", [("v", Expr::var("g") * Expr::var("t"))])
            .expect("object should be valid");
        let compiled = compile_ok(child);

        // qualify it with `g` registered as a system parameter
        let context = TestContext::new().with_system_parameters(["g"]);
        let qualified = QualifiedChild::new(&name("f"), compiled, &context);

        // check the result
        let (symbol, expr) = &qualified.outputs["v"];
        assert_eq!(symbol, &Symbol::new("f.v"));
        assert_eq!(expr, &(Expr::var("g") * Expr::var("f.t")));
        assert_eq!(qualified.inputs["g"].0, Symbol::new("f.g"));
        assert_eq!(qualified.lookup.get("f.g"), Some(&Symbol::new("g")));
    }

    #[test]
    fn feedthrough_follows_internal_parameters() {
        // create a composite whose output depends on `a` through an inner child
        let inner = FunctionalObject::new("g", [("y", Expr::var("a") * 2.0)])
            .expect("object should be valid");
        let composite = CompositeObject::<Expr>::new("h")
            .and_then(|composite| composite.with_port(Port::input("a")))
            .and_then(|composite| composite.with_port(Port::input("b")))
            .and_then(|composite| composite.with_port(Port::output("y")))
            .and_then(|composite| composite.with_child(inner))
            .and_then(|composite| composite.with_directed_wire(("a", "g.a")))
            .and_then(|composite| composite.with_directed_wire(("g.y", "y")))
            .expect("composite should be valid");

        // a second output that only reads the unrelated input `b`
        let compiled = compile_ok(composite);
        let mut parts = compiled.into_parts();
        parts.output_ports.insert(name("z"), Expr::var("b"));
        let compiled = CompiledObject::from_parts(parts);

        // qualify it
        let feedthrough =
            QualifiedChild::new(&name("h"), compiled, &TestContext::new()).feedthrough();

        // check the result
        assert_eq!(
            feedthrough["y"].iter().map(Name::as_str).collect::<Vec<_>>(),
            vec!["a"]
        );
        assert_eq!(
            feedthrough["z"].iter().map(Name::as_str).collect::<Vec<_>>(),
            vec!["b"]
        );
    }
}
