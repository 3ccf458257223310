use indexmap::{IndexMap, IndexSet};
use ported_expr::{Expr, Symbol};

use crate::{Assignment, Name, PortKind};

/// The pieces of a compiled object.
///
/// Port symbols are the port names themselves. Every other symbol is
/// qualified by the path of the child it came from, so `f.g.x` is the
/// variable `x` of child `g` of child `f`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledParts<E = Expr> {
    /// The name of the compiled object.
    pub name: Name,
    /// Input ports and their default values.
    pub input_ports: IndexMap<Name, Option<E>>,
    /// Output ports and the parameter expressions they expose.
    pub output_ports: IndexMap<Name, E>,
    /// Variable ports and the right-hand sides they expose.
    pub variable_ports: IndexMap<Name, E>,
    /// Parameters that are not exposed.
    pub internal_parameters: IndexMap<Symbol, E>,
    /// Internal parameters that were materialized from input defaults.
    pub default_parameters: IndexSet<Symbol>,
    /// Variables that are not exposed.
    pub internal_variables: IndexMap<Symbol, E>,
    /// Compiled symbol of every port and assignment target, keyed by its
    /// path relative to this object.
    pub lookup: IndexMap<String, Symbol>,
}

/// A flattened ported object.
///
/// A compiled object exposes only the ports of the object it was compiled
/// from; everything else has been resolved into internal assignments over
/// globally unique symbols. It can be used as a child of a composite, and
/// compiling it again returns it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledObject<E = Expr> {
    parts: CompiledParts<E>,
}

impl<E> CompiledObject<E> {
    /// Creates a compiled object from its parts.
    #[must_use]
    pub const fn from_parts(parts: CompiledParts<E>) -> Self {
        Self { parts }
    }

    /// Returns the parts of the compiled object.
    #[must_use]
    pub fn into_parts(self) -> CompiledParts<E> {
        self.parts
    }

    /// Returns the name of the object.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.parts.name
    }

    /// Returns the input ports and their default values.
    #[must_use]
    pub const fn input_ports(&self) -> &IndexMap<Name, Option<E>> {
        &self.parts.input_ports
    }

    /// Returns the output ports and their expressions.
    #[must_use]
    pub const fn output_ports(&self) -> &IndexMap<Name, E> {
        &self.parts.output_ports
    }

    /// Returns the variable ports and their right-hand sides.
    #[must_use]
    pub const fn variable_ports(&self) -> &IndexMap<Name, E> {
        &self.parts.variable_ports
    }

    /// Returns the internal parameters.
    #[must_use]
    pub const fn internal_parameters(&self) -> &IndexMap<Symbol, E> {
        &self.parts.internal_parameters
    }

    /// Returns the internal parameters that came from input defaults.
    #[must_use]
    pub const fn default_parameters(&self) -> &IndexSet<Symbol> {
        &self.parts.default_parameters
    }

    /// Returns the internal variables.
    #[must_use]
    pub const fn internal_variables(&self) -> &IndexMap<Symbol, E> {
        &self.parts.internal_variables
    }

    /// Returns the lookup table from relative paths to compiled symbols.
    #[must_use]
    pub const fn lookup(&self) -> &IndexMap<String, Symbol> {
        &self.parts.lookup
    }

    /// Returns the compiled symbol for a path such as `f.mu`.
    #[must_use]
    pub fn symbol_for(&self, path: &str) -> Option<&Symbol> {
        self.parts.lookup.get(path)
    }

    /// Returns the kind of the port with the given name.
    #[must_use]
    pub fn port_kind(&self, name: &str) -> Option<PortKind> {
        if self.parts.input_ports.contains_key(name) {
            Some(PortKind::Input)
        } else if self.parts.output_ports.contains_key(name) {
            Some(PortKind::Output)
        } else if self.parts.variable_ports.contains_key(name) {
            Some(PortKind::Variable)
        } else {
            None
        }
    }

    /// Returns the names of the input ports that have no default value.
    pub fn required_inputs(&self) -> impl Iterator<Item = &Name> {
        self.parts
            .input_ports
            .iter()
            .filter(|(_, default)| default.is_none())
            .map(|(name, _)| name)
    }

    /// Returns every symbol the object owns: input port symbols and the
    /// targets of all assignments.
    pub fn owned_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        let ports = self
            .parts
            .input_ports
            .keys()
            .chain(self.parts.output_ports.keys())
            .chain(self.parts.variable_ports.keys())
            .map(Name::to_symbol);
        let internals = self
            .parts
            .internal_parameters
            .keys()
            .chain(self.parts.internal_variables.keys())
            .cloned();

        ports.chain(internals)
    }

    /// Returns every assignment of the object, split into differential and
    /// parameter assignments.
    #[must_use]
    pub fn assignments(&self) -> (Vec<Assignment<E>>, Vec<Assignment<E>>)
    where
        E: Clone,
    {
        let differential = self
            .parts
            .variable_ports
            .iter()
            .map(|(name, rhs)| (name.to_symbol(), rhs))
            .chain(
                self.parts
                    .internal_variables
                    .iter()
                    .map(|(symbol, rhs)| (symbol.clone(), rhs)),
            )
            .map(|(symbol, rhs)| Assignment::differential(symbol, rhs.clone()))
            .collect();

        let parameter = self
            .parts
            .output_ports
            .iter()
            .map(|(name, expr)| (name.to_symbol(), expr))
            .chain(
                self.parts
                    .internal_parameters
                    .iter()
                    .map(|(symbol, expr)| (symbol.clone(), expr)),
            )
            .map(|(symbol, expr)| Assignment::parameter(symbol, expr.clone()))
            .collect();

        (differential, parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(name: &str) -> Name {
        Name::parse(name).expect("name should be valid")
    }

    fn compiled() -> CompiledObject {
        let mut input_ports = IndexMap::new();
        input_ports.insert(name("a"), None);
        input_ports.insert(name("k"), Some(Expr::literal(2.0)));

        let mut output_ports = IndexMap::new();
        output_ports.insert(name("y"), Expr::var("a") * Expr::var("k"));

        let mut internal_variables = IndexMap::new();
        internal_variables.insert(Symbol::new("f.x"), -Expr::var("f.x"));

        CompiledObject::from_parts(CompiledParts {
            name: name("model"),
            input_ports,
            output_ports,
            variable_ports: IndexMap::new(),
            internal_parameters: IndexMap::new(),
            default_parameters: IndexSet::new(),
            internal_variables,
            lookup: IndexMap::new(),
        })
    }

    #[test]
    fn port_kinds_and_required_inputs() {
        let object = compiled();

        assert_eq!(object.port_kind("a"), Some(PortKind::Input));
        assert_eq!(object.port_kind("y"), Some(PortKind::Output));
        assert_eq!(object.port_kind("f.x"), None);
        assert_eq!(
            object.required_inputs().map(Name::as_str).collect::<Vec<_>>(),
            vec!["a"]
        );
    }

    #[test]
    fn assignments_split_by_kind() {
        let (differential, parameter) = compiled().assignments();

        assert_eq!(differential.len(), 1);
        assert_eq!(differential[0].target(), &Symbol::new("f.x"));
        assert_eq!(parameter.len(), 1);
        assert_eq!(parameter[0].target(), &Symbol::new("y"));
    }
}
