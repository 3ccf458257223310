use indexmap::IndexSet;
use ported_expr::{Expr, Expression, Symbol};

use crate::{
    Assignment, AssignmentEntry, AssignmentKind, ConfigurationError, Name, Port, PortKind, Ports,
    ReservedNames,
    variable::{collect_assignments, derive_input_ports, free_symbols},
};

/// A leaf object holding parameter assignments.
///
/// Every assignment target is exposed as an output port. Target symbols and
/// free symbols are disjoint, so no assignment depends on a value the object
/// itself defines.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalObject<E = Expr> {
    name: Name,
    ports: Ports<E>,
    assignments: Vec<Assignment<E>>,
}

impl<E> FunctionalObject<E> {
    /// Creates a functional object whose ports are all derived from its
    /// assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid, a symbol is assigned twice, or
    /// an assignment depends on a symbol the object defines.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ported_expr::Expr;
    /// use ported_ir::{FunctionalObject, PortKind};
    ///
    /// let f = FunctionalObject::new("f", [("y", Expr::var("a") + Expr::var("b"))])
    ///     .expect("object should be valid");
    ///
    /// assert_eq!(f.ports().kind("a"), Some(PortKind::Input));
    /// assert_eq!(f.ports().kind("y"), Some(PortKind::Output));
    /// ```
    pub fn new<A: Into<AssignmentEntry<E>>>(
        name: impl Into<String>,
        assignments: impl IntoIterator<Item = A>,
    ) -> Result<Self, ConfigurationError>
    where
        E: Expression,
    {
        Self::builder(name).assignments(assignments).build()
    }

    /// Returns a builder for a functional object.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> FunctionalObjectBuilder<E>
    where
        E: Expression,
    {
        FunctionalObjectBuilder::new(name)
    }

    /// Returns the symbols used by the assignments.
    #[must_use]
    pub fn free_symbols(&self) -> IndexSet<Symbol>
    where
        E: Expression,
    {
        free_symbols(&self.assignments)
    }

    /// Returns the free symbols that are not exposed as input ports.
    ///
    /// These must resolve to global symbols when the object is compiled.
    #[must_use]
    pub fn global_symbols(&self) -> IndexSet<Symbol>
    where
        E: Expression,
    {
        self.free_symbols()
            .into_iter()
            .filter(|symbol| !self.ports.contains(symbol.as_str()))
            .collect()
    }

    /// Returns the name of the object.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the ports of the object.
    #[must_use]
    pub const fn ports(&self) -> &Ports<E> {
        &self.ports
    }

    /// Returns the parameter assignments of the object.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment<E>] {
        &self.assignments
    }
}

/// Builder for [`FunctionalObject`].
#[derive(Debug, Clone)]
pub struct FunctionalObjectBuilder<E = Expr> {
    name: String,
    entries: Vec<AssignmentEntry<E>>,
    ports: Vec<Port<E>>,
    derive_inputs: bool,
    reserved: ReservedNames,
}

impl<E: Expression> FunctionalObjectBuilder<E> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: vec![],
            ports: vec![],
            derive_inputs: true,
            reserved: ReservedNames::new(),
        }
    }

    /// Adds an assignment, given as a pair or as an [`AssignmentEntry`].
    #[must_use]
    pub fn assignment(mut self, entry: impl Into<AssignmentEntry<E>>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// Adds several assignments.
    #[must_use]
    pub fn assignments<A: Into<AssignmentEntry<E>>>(
        mut self,
        entries: impl IntoIterator<Item = A>,
    ) -> Self {
        self.entries.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Adds an explicit port.
    #[must_use]
    pub fn port(mut self, port: Port<E>) -> Self {
        self.ports.push(port);
        self
    }

    /// Adds an explicit input port without a default value.
    #[must_use]
    pub fn input(self, name: impl Into<String>) -> Self {
        self.port(Port::input(name))
    }

    /// Adds an explicit input port with a default value.
    #[must_use]
    pub fn input_with_default(self, name: impl Into<String>, default: impl Into<E>) -> Self {
        self.port(Port::input_with_default(name, default))
    }

    /// Sets whether undeclared free symbols become input ports.
    ///
    /// Enabled by default. When disabled, undeclared free symbols are global
    /// references that must resolve when the object is compiled.
    #[must_use]
    pub const fn derive_inputs(mut self, derive_inputs: bool) -> Self {
        self.derive_inputs = derive_inputs;
        self
    }

    /// Sets the names that are never derived as input ports.
    #[must_use]
    pub fn reserved(mut self, reserved: &ReservedNames) -> Self {
        self.reserved = reserved.clone();
        self
    }

    /// Validates the assignments and ports and builds the object.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid, a symbol is assigned twice, an
    /// assignment depends on a symbol the object defines, or an explicit
    /// port does not match a symbol of the assignments.
    pub fn build(self) -> Result<FunctionalObject<E>, ConfigurationError> {
        let name = Name::parse(&self.name)?;

        let assignments = collect_assignments(&name, self.entries, AssignmentKind::Parameter)?;
        let targets: IndexSet<Symbol> = assignments
            .iter()
            .map(|assignment| assignment.target().clone())
            .collect();
        let free = free_symbols(&assignments);

        let circular: Vec<String> = targets
            .intersection(&free)
            .map(ToString::to_string)
            .collect();
        if !circular.is_empty() {
            return Err(ConfigurationError::circular_definition(
                name.to_string(),
                circular,
            ));
        }

        let mut ports = Ports::new();
        for port in self.ports {
            let symbol = Symbol::new(port.name());
            let is_backed = match port.kind() {
                PortKind::Input => free.contains(&symbol),
                PortKind::Output => targets.contains(&symbol),
                PortKind::Variable => {
                    return Err(ConfigurationError::unsupported_port_kind(
                        name.to_string(),
                        port.name().to_string(),
                        port.kind(),
                    ));
                }
            };

            if !is_backed {
                return Err(ConfigurationError::unbacked_port(
                    name.to_string(),
                    port.name().to_string(),
                    port.kind(),
                ));
            }

            ports.insert(port, &name)?;
        }

        for target in &targets {
            if !ports.contains(target.as_str()) {
                ports.insert(Port::output(target.as_str()), &name)?;
            }
        }

        if self.derive_inputs {
            derive_input_ports(&mut ports, &free, &self.reserved, &name)?;
        }

        Ok(FunctionalObject {
            name,
            ports,
            assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_inputs_and_outputs() {
        // create the object
        let f = FunctionalObject::new("f", [("y", Expr::var("a") + Expr::var("b"))])
            .expect("object should be valid");

        // check the ports
        let inputs: Vec<_> = f
            .ports()
            .of_kind(PortKind::Input)
            .map(|(name, _)| name.as_str())
            .collect();
        let outputs: Vec<_> = f
            .ports()
            .of_kind(PortKind::Output)
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(inputs, vec!["a", "b"]);
        assert_eq!(outputs, vec!["y"]);
    }

    #[test]
    fn explicit_input_keeps_its_default() {
        let f = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a") * Expr::var("k")))
            .input_with_default("k", 2.0)
            .build()
            .expect("object should be valid");

        let k = f.ports().get("k").expect("port k should exist");
        assert_eq!(k.default(), Some(&Expr::literal(2.0)));
        assert_eq!(f.ports().kind("a"), Some(PortKind::Input));
    }

    #[test]
    fn rejects_circular_definition() {
        let result = FunctionalObject::new("f", [("y", Expr::var("y") + 1.0)]);

        assert_eq!(
            result,
            Err(ConfigurationError::circular_definition(
                "f".to_string(),
                vec!["y".to_string()]
            ))
        );
    }

    #[test]
    fn rejects_one_step_circular_definition_between_siblings() {
        let result = FunctionalObject::new(
            "f",
            [("y", Expr::var("z") + 1.0), ("z", Expr::var("a") * 2.0)],
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::CircularDefinition { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_assignment() {
        let result = FunctionalObject::new("f", [("y", Expr::var("a")), ("y", Expr::var("b"))]);

        assert_eq!(
            result,
            Err(ConfigurationError::duplicate_assignment(
                "f".to_string(),
                "y".to_string()
            ))
        );
    }

    #[test]
    fn rejects_unbacked_input_port() {
        let result = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a")))
            .input("b")
            .build();

        assert_eq!(
            result,
            Err(ConfigurationError::unbacked_port(
                "f".to_string(),
                "b".to_string(),
                PortKind::Input
            ))
        );
    }

    #[test]
    fn rejects_variable_port() {
        let result = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a")))
            .port(Port::variable("y"))
            .build();

        assert!(matches!(
            result,
            Err(ConfigurationError::UnsupportedPortKind { .. })
        ));
    }

    #[test]
    fn reserved_names_stay_global() {
        let reserved = ReservedNames::new().with_names(["T"]);

        let f = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a") * Expr::var("T")))
            .reserved(&reserved)
            .build()
            .expect("object should be valid");

        assert!(!f.ports().contains("T"));
        assert_eq!(
            f.global_symbols().into_iter().collect::<Vec<_>>(),
            vec![Symbol::new("T")]
        );
    }

    #[test]
    fn without_derivation_undeclared_symbols_are_global() {
        let f = FunctionalObject::builder("f")
            .assignment(("y", Expr::var("a") + Expr::var("g")))
            .input("a")
            .derive_inputs(false)
            .build()
            .expect("object should be valid");

        assert_eq!(f.ports().kind("a"), Some(PortKind::Input));
        assert!(!f.ports().contains("g"));
        assert!(f.global_symbols().contains(&Symbol::new("g")));
    }

    #[test]
    fn record_and_pair_entries_are_equivalent() {
        let from_pair = FunctionalObject::new("f", [("y", Expr::var("a"))])
            .expect("object should be valid");
        let from_record = FunctionalObject::new(
            "f",
            [AssignmentEntry {
                target: "y".to_string(),
                expression: Expr::var("a"),
            }],
        )
        .expect("object should be valid");

        assert_eq!(from_pair, from_record);
    }
}
