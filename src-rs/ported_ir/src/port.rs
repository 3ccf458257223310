use std::fmt;

use indexmap::IndexMap;
use ported_expr::Expr;

use crate::{ConfigurationError, Name};

/// The kind of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Exposes a free symbol whose value is supplied from outside.
    Input,
    /// Exposes the value of a parameter assignment.
    Output,
    /// Exposes the right-hand side of a differential assignment.
    Variable,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// A named, typed interface point of a ported object.
#[derive(Debug, Clone, PartialEq)]
pub struct Port<E = Expr> {
    name: String,
    kind: PortKind,
    default: Option<E>,
}

impl<E> Port<E> {
    /// Creates a port of any kind, with an optional default value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DefaultOnNonInput`] if a default value is
    /// given to an output or variable port.
    pub fn new(
        name: impl Into<String>,
        kind: PortKind,
        default: Option<E>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();

        if default.is_some() && kind != PortKind::Input {
            return Err(ConfigurationError::default_on_non_input(name, kind));
        }

        Ok(Self {
            name,
            kind,
            default,
        })
    }

    /// Creates an input port without a default value.
    #[must_use]
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Input,
            default: None,
        }
    }

    /// Creates an input port with a default value.
    #[must_use]
    pub fn input_with_default(name: impl Into<String>, default: impl Into<E>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Input,
            default: Some(default.into()),
        }
    }

    /// Creates an output port.
    #[must_use]
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Output,
            default: None,
        }
    }

    /// Creates a variable port.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Variable,
            default: None,
        }
    }

    /// Returns the name of the port.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of the port.
    #[must_use]
    pub const fn kind(&self) -> PortKind {
        self.kind
    }

    /// Returns the default value of the port, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&E> {
        self.default.as_ref()
    }
}

/// The ports of one object, unique by name across all kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Ports<E = Expr> {
    ports: IndexMap<Name, Port<E>>,
}

impl<E> Ports<E> {
    /// Creates an empty port collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ports: IndexMap::new(),
        }
    }

    /// Adds a port owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the port name is invalid or already used.
    pub fn insert(&mut self, port: Port<E>, owner: &Name) -> Result<(), ConfigurationError> {
        let name = Name::parse(port.name())?;

        if self.ports.contains_key(&name) {
            return Err(ConfigurationError::duplicate_port(
                owner.to_string(),
                name.to_string(),
            ));
        }

        self.ports.insert(name, port);
        Ok(())
    }

    /// Returns the port with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Port<E>> {
        self.ports.get(name)
    }

    /// Returns the kind of the port with the given name.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<PortKind> {
        self.get(name).map(Port::kind)
    }

    /// Returns `true` if a port with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    /// Returns an iterator over the ports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Port<E>)> {
        self.ports.iter()
    }

    /// Returns an iterator over the ports of one kind.
    pub fn of_kind(&self, kind: PortKind) -> impl Iterator<Item = (&Name, &Port<E>)> {
        self.ports.iter().filter(move |(_, port)| port.kind() == kind)
    }

    /// Returns the number of ports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Returns `true` if there are no ports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl<E> Default for Ports<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_on_input_ports() {
        let input = Port::new("r", PortKind::Input, Some(Expr::literal(0.1)));
        let output = Port::new("y", PortKind::Output, Some(Expr::literal(0.1)));

        input.expect("input ports should accept defaults");
        assert_eq!(
            output,
            Err(ConfigurationError::default_on_non_input(
                "y".to_string(),
                PortKind::Output
            ))
        );
    }

    #[test]
    fn port_names_are_unique_across_kinds() {
        let owner = Name::parse("f").expect("name should be valid");
        let mut ports = Ports::<Expr>::new();

        ports
            .insert(Port::input("a"), &owner)
            .expect("first port should be accepted");
        let result = ports.insert(Port::output("a"), &owner);

        assert_eq!(
            result,
            Err(ConfigurationError::duplicate_port(
                "f".to_string(),
                "a".to_string()
            ))
        );
    }
}
