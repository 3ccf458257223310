//! Wires connecting the ports of a composite object and its children.

use std::fmt;

use ported_shared::HIERARCHY_SEPARATOR;

use crate::{ConfigurationError, Name};

/// A reference to a port, relative to a composite object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortRef {
    /// A port of the composite itself.
    Own(Name),
    /// A port of a direct child of the composite.
    Child {
        /// The child's name.
        child: Name,
        /// The port's name within the child.
        port: Name,
    },
}

impl PortRef {
    /// Parses a reference of the form `port` or `child.port`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidReference`] if the reference is
    /// empty or reaches deeper than a direct child.
    pub fn parse(object: &Name, reference: &str) -> Result<Self, ConfigurationError> {
        let invalid =
            || ConfigurationError::invalid_reference(object.to_string(), reference.to_string());

        match reference.split_once(HIERARCHY_SEPARATOR) {
            None => Name::parse(reference).map(Self::Own).map_err(|_| invalid()),
            Some((child, port)) => {
                let child = Name::parse(child).map_err(|_| invalid())?;
                let port = Name::parse(port).map_err(|_| invalid())?;
                Ok(Self::Child { child, port })
            }
        }
    }

    /// Returns the child name if the reference points into a child.
    #[must_use]
    pub const fn child(&self) -> Option<&Name> {
        match self {
            Self::Own(_) => None,
            Self::Child { child, .. } => Some(child),
        }
    }

    /// Returns the port name.
    #[must_use]
    pub const fn port(&self) -> &Name {
        match self {
            Self::Own(port) | Self::Child { port, .. } => port,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Own(port) => write!(f, "{port}"),
            Self::Child { child, port } => write!(f, "{child}{HIERARCHY_SEPARATOR}{port}"),
        }
    }
}

/// A directed wire as supplied by a model author.
///
/// The source value is substituted into every destination. Wires can be
/// written as this record or as a `(source, destination)` or
/// `(source, destinations)` pair; all forms are interchangeable.
///
/// ```rust
/// use ported_ir::DirectedWire;
///
/// let pair: DirectedWire = ("a", ["f.a", "g.a"]).into();
/// let record = DirectedWire {
///     source: "a".to_string(),
///     destinations: vec!["f.a".to_string(), "g.a".to_string()],
/// };
///
/// assert_eq!(pair, record);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedWire {
    /// The source port reference.
    pub source: String,
    /// The destination port references.
    pub destinations: Vec<String>,
}

impl From<(&str, &str)> for DirectedWire {
    fn from((source, destination): (&str, &str)) -> Self {
        Self {
            source: source.to_string(),
            destinations: vec![destination.to_string()],
        }
    }
}

impl From<(&str, Vec<&str>)> for DirectedWire {
    fn from((source, destinations): (&str, Vec<&str>)) -> Self {
        Self {
            source: source.to_string(),
            destinations: destinations.into_iter().map(ToString::to_string).collect(),
        }
    }
}

impl<const N: usize> From<(&str, [&str; N])> for DirectedWire {
    fn from((source, destinations): (&str, [&str; N])) -> Self {
        Self {
            source: source.to_string(),
            destinations: destinations.into_iter().map(ToString::to_string).collect(),
        }
    }
}

/// A variable aggregation wire as supplied by a model author.
///
/// The differential equations behind the child variable ports are summed
/// under one shared variable. The result is exposed at `destination`, an own
/// variable port, or kept internal under `identification` when no
/// destination is given. A destination takes precedence over an
/// identification.
///
/// ```rust
/// use ported_ir::VariableWire;
///
/// let pair: VariableWire = (["a.x", "b.x"], "z").into();
/// let record = VariableWire {
///     children: vec!["a.x".to_string(), "b.x".to_string()],
///     destination: Some("z".to_string()),
///     identification: None,
/// };
///
/// assert_eq!(pair, record);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableWire {
    /// The child variable port references.
    pub children: Vec<String>,
    /// The own variable port exposing the result.
    pub destination: Option<String>,
    /// The internal name of the result when it is not exposed.
    pub identification: Option<String>,
}

impl VariableWire {
    /// Creates a wire aggregating `children` into an internal variable.
    #[must_use]
    pub fn internal<S: AsRef<str>>(
        children: impl IntoIterator<Item = S>,
        identification: impl Into<String>,
    ) -> Self {
        Self {
            children: children
                .into_iter()
                .map(|child| child.as_ref().to_string())
                .collect(),
            destination: None,
            identification: Some(identification.into()),
        }
    }
}

impl From<(Vec<&str>, &str)> for VariableWire {
    fn from((children, destination): (Vec<&str>, &str)) -> Self {
        Self {
            children: children.into_iter().map(ToString::to_string).collect(),
            destination: Some(destination.to_string()),
            identification: None,
        }
    }
}

impl<const N: usize> From<([&str; N], &str)> for VariableWire {
    fn from((children, destination): ([&str; N], &str)) -> Self {
        Self {
            children: children.into_iter().map(ToString::to_string).collect(),
            destination: Some(destination.to_string()),
            identification: None,
        }
    }
}

impl<const N: usize> From<([&str; N], Option<&str>, &str)> for VariableWire {
    fn from((children, destination, identification): ([&str; N], Option<&str>, &str)) -> Self {
        Self {
            children: children.into_iter().map(ToString::to_string).collect(),
            destination: destination.map(ToString::to_string),
            identification: Some(identification.to_string()),
        }
    }
}

/// A validated directed wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    source: PortRef,
    destinations: Vec<PortRef>,
}

impl Connection {
    /// Creates a connection from already validated references.
    #[must_use]
    pub const fn new(source: PortRef, destinations: Vec<PortRef>) -> Self {
        Self {
            source,
            destinations,
        }
    }

    /// Returns the source port.
    #[must_use]
    pub const fn source(&self) -> &PortRef {
        &self.source
    }

    /// Returns the destination ports.
    #[must_use]
    pub fn destinations(&self) -> &[PortRef] {
        &self.destinations
    }
}

/// A validated variable aggregation wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    children: Vec<(Name, Name)>,
    destination: Option<Name>,
    identification: Name,
}

impl Aggregation {
    /// Creates an aggregation from already validated references.
    #[must_use]
    pub const fn new(
        children: Vec<(Name, Name)>,
        destination: Option<Name>,
        identification: Name,
    ) -> Self {
        Self {
            children,
            destination,
            identification,
        }
    }

    /// Returns the aggregated child variable ports as `(child, port)` pairs.
    #[must_use]
    pub fn children(&self) -> &[(Name, Name)] {
        &self.children
    }

    /// Returns the own variable port exposing the result, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<&Name> {
        self.destination.as_ref()
    }

    /// Returns the name of the aggregated variable.
    #[must_use]
    pub const fn identification(&self) -> &Name {
        &self.identification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> Name {
        Name::parse("model").expect("name should be valid")
    }

    #[test]
    fn parse_own_and_child_references() {
        let own = PortRef::parse(&object(), "a").expect("reference should parse");
        let child = PortRef::parse(&object(), "f.a").expect("reference should parse");

        assert_eq!(own.child(), None);
        assert_eq!(own.port().as_str(), "a");
        assert_eq!(child.child().map(Name::as_str), Some("f"));
        assert_eq!(child.to_string(), "f.a");
    }

    #[test]
    fn parse_rejects_grandchild_references() {
        let result = PortRef::parse(&object(), "f.g.a");

        assert_eq!(
            result,
            Err(ConfigurationError::invalid_reference(
                "model".to_string(),
                "f.g.a".to_string()
            ))
        );
    }

    #[test]
    fn wire_forms_are_interchangeable() {
        let single: DirectedWire = ("f.y", "y").into();
        let list: DirectedWire = ("f.y", vec!["y"]).into();

        assert_eq!(single, list);

        let internal = VariableWire::internal(["a.x", "b.x"], "z");
        let triple: VariableWire = (["a.x", "b.x"], None, "z").into();

        assert_eq!(internal, triple);
    }
}
