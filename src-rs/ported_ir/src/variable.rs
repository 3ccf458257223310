use indexmap::IndexSet;
use ported_expr::{Expr, Expression, Symbol};

use crate::{
    Assignment, AssignmentEntry, AssignmentKind, ConfigurationError, Name, Port, PortKind, Ports,
    ReservedNames,
};

/// A leaf object holding differential assignments.
///
/// Each assignment defines the time derivative of one variable. Variables
/// may appear in the right-hand sides of any assignment of the object.
/// Variables are kept internal unless they are exposed as variable ports.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableObject<E = Expr> {
    name: Name,
    ports: Ports<E>,
    assignments: Vec<Assignment<E>>,
}

impl<E> VariableObject<E> {
    /// Creates a variable object that exposes every variable as a variable
    /// port and derives its input ports.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid or a variable is assigned twice.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ported_expr::Expr;
    /// use ported_ir::{PortKind, VariableObject};
    ///
    /// let growth = VariableObject::exposed("growth", [("x", Expr::var("r") * Expr::var("x"))])
    ///     .expect("object should be valid");
    ///
    /// assert_eq!(growth.ports().kind("x"), Some(PortKind::Variable));
    /// assert_eq!(growth.ports().kind("r"), Some(PortKind::Input));
    /// ```
    pub fn exposed<A: Into<AssignmentEntry<E>>>(
        name: impl Into<String>,
        assignments: impl IntoIterator<Item = A>,
    ) -> Result<Self, ConfigurationError>
    where
        E: Expression,
    {
        Self::builder(name)
            .assignments(assignments)
            .expose_variables()
            .build()
    }

    /// Returns a builder for a variable object.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> VariableObjectBuilder<E>
    where
        E: Expression,
    {
        VariableObjectBuilder::new(name)
    }

    /// Returns the symbols used by the assignments that are not variables.
    #[must_use]
    pub fn free_symbols(&self) -> IndexSet<Symbol>
    where
        E: Expression,
    {
        let variables: IndexSet<&Symbol> = self.variables().collect();
        free_symbols(&self.assignments)
            .into_iter()
            .filter(|symbol| !variables.contains(symbol))
            .collect()
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

    /// Returns the differential assignments of the object.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment<E>] {
        &self.assignments
    }

    /// Returns the variables defined by the object.
    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.assignments.iter().map(Assignment::target)
    }
}

/// Builder for [`VariableObject`].
#[derive(Debug, Clone)]
pub struct VariableObjectBuilder<E = Expr> {
    name: String,
    entries: Vec<AssignmentEntry<E>>,
    ports: Vec<Port<E>>,
    expose_variables: bool,
    derive_inputs: bool,
    reserved: ReservedNames,
}

impl<E: Expression> VariableObjectBuilder<E> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: vec![],
            ports: vec![],
            expose_variables: false,
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

    /// Exposes one variable as a variable port.
    #[must_use]
    pub fn variable_port(self, name: impl Into<String>) -> Self {
        self.port(Port::variable(name))
    }

    /// Exposes every variable that is not already exposed as a variable port.
    #[must_use]
    pub const fn expose_variables(mut self) -> Self {
        self.expose_variables = true;
        self
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
    /// Returns an error if a name is invalid, a variable is assigned twice,
    /// or an explicit port does not match a symbol of the assignments.
    pub fn build(self) -> Result<VariableObject<E>, ConfigurationError> {
        let name = Name::parse(&self.name)?;

        let assignments = collect_assignments(&name, self.entries, AssignmentKind::Differential)?;
        let variables: IndexSet<Symbol> = assignments
            .iter()
            .map(|assignment| assignment.target().clone())
            .collect();
        let free: IndexSet<Symbol> = free_symbols(&assignments)
            .into_iter()
            .filter(|symbol| !variables.contains(symbol))
            .collect();

        let mut ports = Ports::new();
        for port in self.ports {
            let symbol = Symbol::new(port.name());
            let is_backed = match port.kind() {
                PortKind::Input => free.contains(&symbol),
                PortKind::Variable => variables.contains(&symbol),
                PortKind::Output => {
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

        if self.expose_variables {
            for variable in &variables {
                if !ports.contains(variable.as_str()) {
                    ports.insert(Port::variable(variable.as_str()), &name)?;
                }
            }
        }

        if self.derive_inputs {
            derive_input_ports(&mut ports, &free, &self.reserved, &name)?;
        }

        Ok(VariableObject {
            name,
            ports,
            assignments,
        })
    }
}

/// Converts entries into assignments of one kind, rejecting duplicates.
pub fn collect_assignments<E>(
    object: &Name,
    entries: Vec<AssignmentEntry<E>>,
    kind: AssignmentKind,
) -> Result<Vec<Assignment<E>>, ConfigurationError> {
    let mut targets = IndexSet::new();
    let mut assignments = Vec::with_capacity(entries.len());

    for entry in entries {
        let target = Name::parse(&entry.target)?;

        if !targets.insert(target.clone()) {
            return Err(ConfigurationError::duplicate_assignment(
                object.to_string(),
                target.to_string(),
            ));
        }

        let assignment = match kind {
            AssignmentKind::Differential => {
                Assignment::differential(target.to_symbol(), entry.expression)
            }
            AssignmentKind::Parameter => {
                Assignment::parameter(target.to_symbol(), entry.expression)
            }
        };
        assignments.push(assignment);
    }

    Ok(assignments)
}

/// Returns the union of the free symbols of every assignment expression.
pub fn free_symbols<E: Expression>(assignments: &[Assignment<E>]) -> IndexSet<Symbol> {
    assignments
        .iter()
        .flat_map(|assignment| assignment.expression().free_symbols())
        .collect()
}

/// Adds an input port for every free symbol that has no port and is not reserved.
pub fn derive_input_ports<E>(
    ports: &mut Ports<E>,
    free: &IndexSet<Symbol>,
    reserved: &ReservedNames,
    object: &Name,
) -> Result<(), ConfigurationError> {
    for symbol in free {
        if ports.contains(symbol.as_str()) || reserved.contains(symbol.as_str()) {
            continue;
        }

        ports.insert(Port::input(symbol.as_str()), object)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic() -> VariableObjectBuilder<Expr> {
        VariableObject::builder("logistic").assignment((
            "x",
            Expr::var("r") * Expr::var("x") * (1.0 - Expr::var("x") / Expr::var("k")),
        ))
    }

    #[test]
    fn variables_are_internal_unless_exposed() {
        // create the object without exposing variables
        let hidden = logistic().build().expect("object should be valid");

        // check the ports
        assert!(!hidden.ports().contains("x"));
        assert_eq!(hidden.ports().kind("r"), Some(PortKind::Input));
        assert_eq!(hidden.ports().kind("k"), Some(PortKind::Input));

        // create the object exposing variables
        let exposed = logistic()
            .expose_variables()
            .build()
            .expect("object should be valid");

        assert_eq!(exposed.ports().kind("x"), Some(PortKind::Variable));
    }

    #[test]
    fn variables_may_depend_on_each_other() {
        let predator_prey = VariableObject::exposed(
            "lv",
            [
                ("x", Expr::var("a") * Expr::var("x") - Expr::var("x") * Expr::var("y")),
                ("y", Expr::var("x") * Expr::var("y") - Expr::var("b") * Expr::var("y")),
            ],
        )
        .expect("object should be valid");

        let free: Vec<_> = predator_prey.free_symbols().into_iter().collect();
        assert_eq!(free, vec![Symbol::new("a"), Symbol::new("b")]);
    }

    #[test]
    fn chosen_variable_ports() {
        let object = VariableObject::builder("pair")
            .assignments([("x", Expr::var("y")), ("y", -Expr::var("x"))])
            .variable_port("x")
            .build()
            .expect("object should be valid");

        assert_eq!(object.ports().kind("x"), Some(PortKind::Variable));
        assert!(!object.ports().contains("y"));
    }

    #[test]
    fn rejects_variable_port_without_assignment() {
        let result = logistic().variable_port("z").build();

        assert_eq!(
            result,
            Err(ConfigurationError::unbacked_port(
                "logistic".to_string(),
                "z".to_string(),
                PortKind::Variable
            ))
        );
    }

    #[test]
    fn rejects_output_port() {
        let result = logistic().port(Port::output("x")).build();

        assert!(matches!(
            result,
            Err(ConfigurationError::UnsupportedPortKind { .. })
        ));
    }

    #[test]
    fn rejects_invalid_object_name() {
        let result = VariableObject::<Expr>::builder("a.b").build();

        assert_eq!(
            result,
            Err(ConfigurationError::invalid_name("a.b".to_string()))
        );
    }
}
