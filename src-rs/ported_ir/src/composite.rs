use indexmap::{IndexMap, IndexSet};
use ported_expr::Expr;

use crate::{
    Aggregation, ConfigurationError, Connection, DirectedWire, Name, Port, PortKind, PortRef,
    PortedObject, Ports, VariableWire,
};

/// An object composed of children and the wires connecting them.
///
/// A composite owns its children exclusively. Wires refer to ports by
/// qualified name rather than by reference, so the model is a plain tree.
/// Every wire is validated against the current ports and children when it
/// is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeObject<E = Expr> {
    name: Name,
    ports: Ports<E>,
    children: IndexMap<Name, PortedObject<E>>,
    connections: Vec<Connection>,
    aggregations: Vec<Aggregation>,
}

impl<E> CompositeObject<E> {
    /// Creates an empty composite object.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            name: Name::parse(name)?,
            ports: Ports::new(),
            children: IndexMap::new(),
            connections: vec![],
            aggregations: vec![],
        })
    }

    /// Returns the name of the object.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the object's own ports.
    #[must_use]
    pub const fn ports(&self) -> &Ports<E> {
        &self.ports
    }

    /// Returns the children in insertion order.
    #[must_use]
    pub const fn children(&self) -> &IndexMap<Name, PortedObject<E>> {
        &self.children
    }

    /// Returns the child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&PortedObject<E>> {
        self.children.get(name)
    }

    /// Returns the directed wires.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns the variable aggregation wires.
    #[must_use]
    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    /// Adds a port to the object.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already used by a port or
    /// an internal identification.
    pub fn add_port(&mut self, port: Port<E>) -> Result<(), ConfigurationError> {
        let is_identification = self
            .aggregations
            .iter()
            .any(|aggregation| aggregation.identification().as_str() == port.name());
        if is_identification {
            return Err(ConfigurationError::duplicate_port(
                self.name.to_string(),
                port.name().to_string(),
            ));
        }

        self.ports.insert(port, &self.name)
    }

    /// Adds a child to the object.
    ///
    /// # Errors
    ///
    /// Returns an error if a child with the same name already exists.
    pub fn add_child(
        &mut self,
        child: impl Into<PortedObject<E>>,
    ) -> Result<(), ConfigurationError> {
        let child = child.into();
        let name = child.name().clone();

        if self.children.contains_key(&name) {
            return Err(ConfigurationError::duplicate_child(
                self.name.to_string(),
                name.to_string(),
            ));
        }

        self.children.insert(name, child);
        Ok(())
    }

    /// Adds a directed wire, given as a pair or as a [`DirectedWire`].
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is malformed or missing, the source
    /// is not an own input or a child output or variable port, a destination
    /// is not a child input or an own output port, a destination already
    /// receives a wire, or the wire points at more than one own output.
    pub fn add_directed_wire(
        &mut self,
        wire: impl Into<DirectedWire>,
    ) -> Result<(), ConfigurationError> {
        let wire = wire.into();

        let source = PortRef::parse(&self.name, &wire.source)?;
        let source_kind = self.port_kind(&source)?;
        let is_valid_source = match source {
            PortRef::Own(_) => source_kind == PortKind::Input,
            PortRef::Child { .. } => source_kind != PortKind::Input,
        };
        if !is_valid_source {
            return Err(ConfigurationError::invalid_wire_source(
                self.name.to_string(),
                source.to_string(),
            ));
        }

        if wire.destinations.is_empty() {
            return Err(ConfigurationError::empty_wire(
                self.name.to_string(),
                source.to_string(),
            ));
        }

        let wired: IndexSet<&PortRef> = self
            .connections
            .iter()
            .flat_map(Connection::destinations)
            .collect();

        let mut destinations = IndexSet::new();
        for destination in &wire.destinations {
            let destination = PortRef::parse(&self.name, destination)?;
            let destination_kind = self.port_kind(&destination)?;
            let is_valid_destination = match destination {
                PortRef::Own(_) => destination_kind == PortKind::Output,
                PortRef::Child { .. } => destination_kind == PortKind::Input,
            };
            if !is_valid_destination {
                return Err(ConfigurationError::invalid_wire_destination(
                    self.name.to_string(),
                    destination.to_string(),
                ));
            }

            if wired.contains(&destination) || !destinations.insert(destination.clone()) {
                return Err(ConfigurationError::multiple_incoming_wires(
                    self.name.to_string(),
                    destination.to_string(),
                ));
            }
        }

        let own_outputs = destinations
            .iter()
            .filter(|destination| destination.child().is_none())
            .count();
        if own_outputs > 1 {
            return Err(ConfigurationError::multiple_output_destinations(
                self.name.to_string(),
                source.to_string(),
            ));
        }

        self.connections
            .push(Connection::new(source, destinations.into_iter().collect()));
        Ok(())
    }

    /// Adds a variable aggregation wire, given as a tuple or as a
    /// [`VariableWire`].
    ///
    /// # Errors
    ///
    /// Returns an error if the wire has no children, a child reference is
    /// not a child variable port, a port is already aggregated, the
    /// destination is not an own variable port, or the identification
    /// clashes with a port or another identification.
    pub fn add_variable_wire(
        &mut self,
        wire: impl Into<VariableWire>,
    ) -> Result<(), ConfigurationError> {
        let wire = wire.into();

        if wire.children.is_empty() {
            return Err(ConfigurationError::empty_aggregation(self.name.to_string()));
        }

        let aggregated: IndexSet<(&Name, &Name)> = self
            .aggregations
            .iter()
            .flat_map(Aggregation::children)
            .map(|(child, port)| (child, port))
            .collect();

        let mut children = Vec::with_capacity(wire.children.len());
        for reference in &wire.children {
            let reference = PortRef::parse(&self.name, reference)?;
            let kind = self.port_kind(&reference)?;

            let (child, port) = match reference {
                PortRef::Child { child, port } if kind == PortKind::Variable => (child, port),
                PortRef::Own(_) | PortRef::Child { .. } => {
                    return Err(ConfigurationError::non_variable_aggregation(
                        self.name.to_string(),
                        reference.to_string(),
                    ));
                }
            };

            let is_duplicate = aggregated.contains(&(&child, &port))
                || children.contains(&(child.clone(), port.clone()));
            if is_duplicate {
                return Err(ConfigurationError::duplicate_aggregation(
                    self.name.to_string(),
                    format!("{child}.{port}"),
                ));
            }

            children.push((child, port));
        }

        let (destination, identification) = match (&wire.destination, &wire.identification) {
            (Some(destination), _) => {
                let destination = self.aggregation_destination(destination)?;
                (Some(destination.clone()), destination)
            }
            (None, Some(identification)) => (None, self.internal_identification(identification)?),
            (None, None) => {
                return Err(ConfigurationError::missing_identification(
                    self.name.to_string(),
                ));
            }
        };

        self.aggregations
            .push(Aggregation::new(children, destination, identification));
        Ok(())
    }

    /// Adds several wires at once.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::add_directed_wire`] or
    /// [`Self::add_variable_wire`].
    pub fn add_wires<D: Into<DirectedWire>, V: Into<VariableWire>>(
        &mut self,
        directed: impl IntoIterator<Item = D>,
        variable: impl IntoIterator<Item = V>,
    ) -> Result<(), ConfigurationError> {
        for wire in variable {
            self.add_variable_wire(wire)?;
        }

        for wire in directed {
            self.add_directed_wire(wire)?;
        }

        Ok(())
    }

    /// Adds a port and returns the object.
    ///
    /// # Errors
    ///
    /// See [`Self::add_port`].
    pub fn with_port(mut self, port: Port<E>) -> Result<Self, ConfigurationError> {
        self.add_port(port)?;
        Ok(self)
    }

    /// Adds a child and returns the object.
    ///
    /// # Errors
    ///
    /// See [`Self::add_child`].
    pub fn with_child(
        mut self,
        child: impl Into<PortedObject<E>>,
    ) -> Result<Self, ConfigurationError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Adds a directed wire and returns the object.
    ///
    /// # Errors
    ///
    /// See [`Self::add_directed_wire`].
    pub fn with_directed_wire(
        mut self,
        wire: impl Into<DirectedWire>,
    ) -> Result<Self, ConfigurationError> {
        self.add_directed_wire(wire)?;
        Ok(self)
    }

    /// Adds a variable aggregation wire and returns the object.
    ///
    /// # Errors
    ///
    /// See [`Self::add_variable_wire`].
    pub fn with_variable_wire(
        mut self,
        wire: impl Into<VariableWire>,
    ) -> Result<Self, ConfigurationError> {
        self.add_variable_wire(wire)?;
        Ok(self)
    }

    /// Looks up the kind of a referenced port.
    fn port_kind(&self, reference: &PortRef) -> Result<PortKind, ConfigurationError> {
        let kind = match reference {
            PortRef::Own(port) => self.ports.kind(port.as_str()),
            PortRef::Child { child, port } => {
                let child = self.children.get(child).ok_or_else(|| {
                    ConfigurationError::missing_child(self.name.to_string(), reference.to_string())
                })?;
                child.port_kind(port.as_str())
            }
        };

        kind.ok_or_else(|| {
            ConfigurationError::missing_port(self.name.to_string(), reference.to_string())
        })
    }

    fn aggregation_destination(&self, destination: &str) -> Result<Name, ConfigurationError> {
        let reference = PortRef::parse(&self.name, destination)?;
        let kind = self.port_kind(&reference)?;

        let port = match reference {
            PortRef::Own(port) if kind == PortKind::Variable => port,
            PortRef::Own(_) | PortRef::Child { .. } => {
                return Err(ConfigurationError::invalid_aggregation_destination(
                    self.name.to_string(),
                    reference.to_string(),
                ));
            }
        };

        let is_taken = self
            .aggregations
            .iter()
            .any(|aggregation| aggregation.identification() == &port);
        if is_taken {
            return Err(ConfigurationError::duplicate_aggregation(
                self.name.to_string(),
                port.to_string(),
            ));
        }

        Ok(port)
    }

    fn internal_identification(&self, identification: &str) -> Result<Name, ConfigurationError> {
        let identification = Name::parse(identification)?;

        let is_taken = self.ports.contains(identification.as_str())
            || self
                .aggregations
                .iter()
                .any(|aggregation| aggregation.identification() == &identification);
        if is_taken {
            return Err(ConfigurationError::identification_collision(
                self.name.to_string(),
                identification.to_string(),
            ));
        }

        Ok(identification)
    }
}

#[cfg(test)]
mod tests {
    use crate::{FunctionalObject, VariableObject};

    use super::*;

    fn adder() -> FunctionalObject {
        FunctionalObject::new("f", [("y", Expr::var("a") + Expr::var("b"))])
            .expect("object should be valid")
    }

    fn decay(name: &str) -> VariableObject {
        VariableObject::exposed(name, [("x", -Expr::var("k") * Expr::var("x"))])
            .expect("object should be valid")
    }

    fn model() -> CompositeObject {
        CompositeObject::new("model")
            .and_then(|model| model.with_child(adder()))
            .and_then(|model| model.with_child(decay("d1")))
            .and_then(|model| model.with_child(decay("d2")))
            .and_then(|model| model.with_port(Port::input("a")))
            .and_then(|model| model.with_port(Port::output("y")))
            .and_then(|model| model.with_port(Port::variable("z")))
            .expect("model should be valid")
    }

    #[test]
    fn accepts_valid_wires() {
        // create the model
        let mut model = model();

        // add the wires
        model
            .add_wires(
                [("a", vec!["f.a", "f.b"]), ("f.y", vec!["y", "d1.k"])],
                [(["d1.x", "d2.x"], "z")],
            )
            .expect("wires should be valid");

        // check the wires
        assert_eq!(model.connections().len(), 2);
        assert_eq!(model.aggregations().len(), 1);
        assert_eq!(model.aggregations()[0].identification().as_str(), "z");
    }

    #[test]
    fn rejects_duplicate_child() {
        let result = model().with_child(adder());

        assert_eq!(
            result,
            Err(ConfigurationError::duplicate_child(
                "model".to_string(),
                "f".to_string()
            ))
        );
    }

    #[test]
    fn rejects_missing_references() {
        let mut model = model();

        assert_eq!(
            model.add_directed_wire(("a", "g.a")),
            Err(ConfigurationError::missing_child(
                "model".to_string(),
                "g.a".to_string()
            ))
        );
        assert_eq!(
            model.add_directed_wire(("a", "f.c")),
            Err(ConfigurationError::missing_port(
                "model".to_string(),
                "f.c".to_string()
            ))
        );
    }

    #[test]
    fn rejects_invalid_sources_and_destinations() {
        let mut model = model();

        // an own output cannot be a source
        assert!(matches!(
            model.add_directed_wire(("y", "f.a")),
            Err(ConfigurationError::InvalidWireSource { .. })
        ));

        // a child input cannot be a source
        assert!(matches!(
            model.add_directed_wire(("f.a", "d1.k")),
            Err(ConfigurationError::InvalidWireSource { .. })
        ));

        // an own input cannot be a destination
        assert!(matches!(
            model.add_directed_wire(("f.y", "a")),
            Err(ConfigurationError::InvalidWireDestination { .. })
        ));

        // a child output cannot be a destination
        assert!(matches!(
            model.add_directed_wire(("a", "f.y")),
            Err(ConfigurationError::InvalidWireDestination { .. })
        ));
    }

    #[test]
    fn rejects_second_incoming_wire() {
        let mut model = model();
        model
            .add_directed_wire(("a", "f.a"))
            .expect("first wire should be valid");

        let result = model.add_directed_wire(("d1.x", "f.a"));

        assert_eq!(
            result,
            Err(ConfigurationError::multiple_incoming_wires(
                "model".to_string(),
                "f.a".to_string()
            ))
        );
    }

    #[test]
    fn rejects_multiple_output_destinations() {
        let mut model = model()
            .with_port(Port::output("w"))
            .expect("port should be valid");

        let result = model.add_directed_wire(("f.y", ["y", "w"]));

        assert!(matches!(
            result,
            Err(ConfigurationError::MultipleOutputDestinations { .. })
        ));
    }

    #[test]
    fn rejects_non_variable_aggregation() {
        let mut model = model();

        let result = model.add_variable_wire((["d1.x", "f.y"], "z"));

        assert_eq!(
            result,
            Err(ConfigurationError::non_variable_aggregation(
                "model".to_string(),
                "f.y".to_string()
            ))
        );
    }

    #[test]
    fn rejects_double_aggregation() {
        let mut model = model();
        model
            .add_variable_wire((["d1.x"], "z"))
            .expect("first wire should be valid");

        let reused_child = model.add_variable_wire(VariableWire::internal(["d1.x", "d2.x"], "w"));
        let reused_destination = model.add_variable_wire((["d2.x"], "z"));

        assert!(matches!(
            reused_child,
            Err(ConfigurationError::DuplicateAggregation { .. })
        ));
        assert!(matches!(
            reused_destination,
            Err(ConfigurationError::DuplicateAggregation { .. })
        ));
    }

    #[test]
    fn rejects_colliding_identification() {
        let mut model = model();

        let result = model.add_variable_wire(VariableWire::internal(["d1.x"], "a"));

        assert_eq!(
            result,
            Err(ConfigurationError::identification_collision(
                "model".to_string(),
                "a".to_string()
            ))
        );
    }

    #[test]
    fn identifications_reserve_port_names() {
        let mut model = model();
        model
            .add_variable_wire(VariableWire::internal(["d1.x"], "w"))
            .expect("wire should be valid");

        let result = model.add_port(Port::variable("w"));

        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicatePort { .. })
        ));
    }
}
