//! Errors raised while constructing ported objects and attaching wires.

use std::fmt;

use ported_shared::error::{AsPortedError, Context};

use crate::PortKind;

/// A malformed port, assignment, child or wire.
///
/// Configuration errors are raised eagerly, as soon as the offending item is
/// constructed or attached. Every variant records the object it was raised
/// in, so messages can name the offending item by its qualified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A name is empty or contains the hierarchy separator.
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// A port name is used twice in the same object.
    DuplicatePort {
        /// The object owning the port.
        object: String,
        /// The duplicated port name.
        port: String,
    },
    /// A child name is used twice in the same composite.
    DuplicateChild {
        /// The composite owning the children.
        object: String,
        /// The duplicated child name.
        child: String,
    },
    /// Two assignments in the same object define the same symbol.
    DuplicateAssignment {
        /// The object owning the assignments.
        object: String,
        /// The doubly defined symbol.
        target: String,
    },
    /// A default value was given to a port that is not an input port.
    DefaultOnNonInput {
        /// The port name.
        port: String,
        /// The kind of the port.
        kind: PortKind,
    },
    /// A port kind is not allowed on this kind of object.
    UnsupportedPortKind {
        /// The object the port was added to.
        object: String,
        /// The port name.
        port: String,
        /// The kind of the port.
        kind: PortKind,
    },
    /// An explicitly requested port has no matching symbol in the object's
    /// assignments.
    UnbackedPort {
        /// The object the port was added to.
        object: String,
        /// The port name.
        port: String,
        /// The kind of the port.
        kind: PortKind,
    },
    /// Functional assignments define symbols that are also used as inputs.
    CircularDefinition {
        /// The functional object.
        object: String,
        /// The symbols that are both defined and used.
        symbols: Vec<String>,
    },
    /// A port reference could not be parsed.
    InvalidReference {
        /// The composite the reference was used in.
        object: String,
        /// The reference as written.
        reference: String,
    },
    /// A port reference names a child that does not exist.
    MissingChild {
        /// The composite the reference was used in.
        object: String,
        /// The reference as written.
        reference: String,
    },
    /// A port reference names a port that does not exist.
    MissingPort {
        /// The composite the reference was used in.
        object: String,
        /// The reference as written.
        reference: String,
    },
    /// A directed wire starts at a port that cannot be a source.
    InvalidWireSource {
        /// The composite owning the wire.
        object: String,
        /// The source reference.
        reference: String,
    },
    /// A directed wire ends at a port that cannot be a destination.
    InvalidWireDestination {
        /// The composite owning the wire.
        object: String,
        /// The destination reference.
        reference: String,
    },
    /// A directed wire has no destinations.
    EmptyWire {
        /// The composite owning the wire.
        object: String,
        /// The source reference.
        source: String,
    },
    /// A port already receives a directed wire.
    MultipleIncomingWires {
        /// The composite owning the wires.
        object: String,
        /// The destination reference.
        reference: String,
    },
    /// A directed wire points at more than one of the composite's own output ports.
    MultipleOutputDestinations {
        /// The composite owning the wire.
        object: String,
        /// The source reference.
        source: String,
    },
    /// A variable wire has no child ports.
    EmptyAggregation {
        /// The composite owning the wire.
        object: String,
    },
    /// A variable wire aggregates a port that is not a child variable port.
    NonVariableAggregation {
        /// The composite owning the wire.
        object: String,
        /// The offending reference.
        reference: String,
    },
    /// A variable wire ends at something other than an own variable port.
    InvalidAggregationDestination {
        /// The composite owning the wire.
        object: String,
        /// The destination reference.
        reference: String,
    },
    /// A variable port is aggregated, or aggregated into, more than once.
    DuplicateAggregation {
        /// The composite owning the wires.
        object: String,
        /// The port aggregated twice.
        reference: String,
    },
    /// A variable wire has neither a destination port nor an identification.
    MissingIdentification {
        /// The composite owning the wire.
        object: String,
    },
    /// An internal identification clashes with a port or another identification.
    IdentificationCollision {
        /// The composite owning the wire.
        object: String,
        /// The clashing identification.
        identification: String,
    },
}

impl ConfigurationError {
    /// Creates an error for an invalid name.
    #[must_use]
    pub const fn invalid_name(name: String) -> Self {
        Self::InvalidName { name }
    }

    /// Creates an error for a duplicated port name.
    #[must_use]
    pub const fn duplicate_port(object: String, port: String) -> Self {
        Self::DuplicatePort { object, port }
    }

    /// Creates an error for a duplicated child name.
    #[must_use]
    pub const fn duplicate_child(object: String, child: String) -> Self {
        Self::DuplicateChild { object, child }
    }

    /// Creates an error for a doubly defined symbol.
    #[must_use]
    pub const fn duplicate_assignment(object: String, target: String) -> Self {
        Self::DuplicateAssignment { object, target }
    }

    /// Creates an error for a default value on a non-input port.
    #[must_use]
    pub const fn default_on_non_input(port: String, kind: PortKind) -> Self {
        Self::DefaultOnNonInput { port, kind }
    }

    /// Creates an error for a port kind the object does not support.
    #[must_use]
    pub const fn unsupported_port_kind(object: String, port: String, kind: PortKind) -> Self {
        Self::UnsupportedPortKind { object, port, kind }
    }

    /// Creates an error for an explicit port with no backing symbol.
    #[must_use]
    pub const fn unbacked_port(object: String, port: String, kind: PortKind) -> Self {
        Self::UnbackedPort { object, port, kind }
    }

    /// Creates an error for a circular functional definition.
    #[must_use]
    pub const fn circular_definition(object: String, symbols: Vec<String>) -> Self {
        Self::CircularDefinition { object, symbols }
    }

    /// Creates an error for an unparsable port reference.
    #[must_use]
    pub const fn invalid_reference(object: String, reference: String) -> Self {
        Self::InvalidReference { object, reference }
    }

    /// Creates an error for a reference to a missing child.
    #[must_use]
    pub const fn missing_child(object: String, reference: String) -> Self {
        Self::MissingChild { object, reference }
    }

    /// Creates an error for a reference to a missing port.
    #[must_use]
    pub const fn missing_port(object: String, reference: String) -> Self {
        Self::MissingPort { object, reference }
    }

    /// Creates an error for an invalid directed wire source.
    #[must_use]
    pub const fn invalid_wire_source(object: String, reference: String) -> Self {
        Self::InvalidWireSource { object, reference }
    }

    /// Creates an error for an invalid directed wire destination.
    #[must_use]
    pub const fn invalid_wire_destination(object: String, reference: String) -> Self {
        Self::InvalidWireDestination { object, reference }
    }

    /// Creates an error for a directed wire without destinations.
    #[must_use]
    pub const fn empty_wire(object: String, source: String) -> Self {
        Self::EmptyWire { object, source }
    }

    /// Creates an error for a port receiving a second directed wire.
    #[must_use]
    pub const fn multiple_incoming_wires(object: String, reference: String) -> Self {
        Self::MultipleIncomingWires { object, reference }
    }

    /// Creates an error for a directed wire with several own output destinations.
    #[must_use]
    pub const fn multiple_output_destinations(object: String, source: String) -> Self {
        Self::MultipleOutputDestinations { object, source }
    }

    /// Creates an error for a variable wire without child ports.
    #[must_use]
    pub const fn empty_aggregation(object: String) -> Self {
        Self::EmptyAggregation { object }
    }

    /// Creates an error for aggregating a port that is not a child variable port.
    #[must_use]
    pub const fn non_variable_aggregation(object: String, reference: String) -> Self {
        Self::NonVariableAggregation { object, reference }
    }

    /// Creates an error for an invalid variable wire destination.
    #[must_use]
    pub const fn invalid_aggregation_destination(object: String, reference: String) -> Self {
        Self::InvalidAggregationDestination { object, reference }
    }

    /// Creates an error for a variable port aggregated more than once.
    #[must_use]
    pub const fn duplicate_aggregation(object: String, reference: String) -> Self {
        Self::DuplicateAggregation { object, reference }
    }

    /// Creates an error for a variable wire with nowhere to put its result.
    #[must_use]
    pub const fn missing_identification(object: String) -> Self {
        Self::MissingIdentification { object }
    }

    /// Creates an error for a clashing internal identification.
    #[must_use]
    pub const fn identification_collision(object: String, identification: String) -> Self {
        Self::IdentificationCollision {
            object,
            identification,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name } => write!(f, "invalid name `{name}`"),
            Self::DuplicatePort { object, port } => {
                write!(f, "port `{object}.{port}` is defined more than once")
            }
            Self::DuplicateChild { object, child } => {
                write!(f, "child `{object}.{child}` is defined more than once")
            }
            Self::DuplicateAssignment { object, target } => {
                write!(f, "symbol `{object}.{target}` is assigned more than once")
            }
            Self::DefaultOnNonInput { port, kind } => {
                write!(f, "{kind} port `{port}` cannot have a default value")
            }
            Self::UnsupportedPortKind { object, port, kind } => {
                write!(f, "`{object}` cannot have {kind} port `{port}`")
            }
            Self::UnbackedPort { object, port, kind } => write!(
                f,
                "{kind} port `{object}.{port}` does not match any symbol of its assignments"
            ),
            Self::CircularDefinition { object, symbols } => write!(
                f,
                "functional object `{object}` defines symbols it also depends on: {}",
                symbols.join(", ")
            ),
            Self::InvalidReference { object, reference } => {
                write!(f, "invalid port reference `{reference}` in `{object}`")
            }
            Self::MissingChild { object, reference } => {
                write!(f, "port reference `{object}.{reference}` names an unknown child")
            }
            Self::MissingPort { object, reference } => {
                write!(f, "port `{object}.{reference}` does not exist")
            }
            Self::InvalidWireSource { object, reference } => write!(
                f,
                "port `{object}.{reference}` cannot be the source of a directed wire"
            ),
            Self::InvalidWireDestination { object, reference } => write!(
                f,
                "port `{object}.{reference}` cannot be the destination of a directed wire"
            ),
            Self::EmptyWire { object, source } => {
                write!(f, "directed wire from `{object}.{source}` has no destinations")
            }
            Self::MultipleIncomingWires { object, reference } => write!(
                f,
                "port `{object}.{reference}` already receives a directed wire"
            ),
            Self::MultipleOutputDestinations { object, source } => write!(
                f,
                "directed wire from `{object}.{source}` points at more than one output port"
            ),
            Self::EmptyAggregation { object } => {
                write!(f, "variable wire in `{object}` has no child ports")
            }
            Self::NonVariableAggregation { object, reference } => write!(
                f,
                "`{object}.{reference}` is not a variable port of a child and cannot be aggregated"
            ),
            Self::InvalidAggregationDestination { object, reference } => write!(
                f,
                "`{object}.{reference}` is not a variable port of `{object}`"
            ),
            Self::DuplicateAggregation { object, reference } => write!(
                f,
                "variable port `{object}.{reference}` is used by more than one variable wire"
            ),
            Self::MissingIdentification { object } => write!(
                f,
                "variable wire in `{object}` needs a destination port or an identification"
            ),
            Self::IdentificationCollision {
                object,
                identification,
            } => write!(
                f,
                "identification `{object}.{identification}` is already used in `{object}`"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl AsPortedError for ConfigurationError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::InvalidName { .. } => vec![Context::help(
                "names must be non-empty and must not contain `.`",
            )],
            Self::DefaultOnNonInput { .. } => {
                vec![Context::note("only input ports can have default values")]
            }
            Self::CircularDefinition { .. } => vec![Context::help(
                "use a variable object if a quantity should depend on itself",
            )],
            Self::InvalidWireSource { .. } => vec![Context::note(
                "a directed wire starts at an own input port or at a child output or variable port",
            )],
            Self::InvalidWireDestination { .. } => vec![Context::note(
                "a directed wire ends at child input ports or at an own output port",
            )],
            Self::MultipleIncomingWires { .. } => vec![Context::note(
                "a port can receive at most one directed wire, but a wire can have many destinations",
            )],
            Self::DuplicateAggregation { .. } => vec![Context::note(
                "aggregating the same variable along two wires adds its contribution twice",
            )],
            Self::DuplicatePort { .. }
            | Self::DuplicateChild { .. }
            | Self::DuplicateAssignment { .. }
            | Self::UnsupportedPortKind { .. }
            | Self::UnbackedPort { .. }
            | Self::InvalidReference { .. }
            | Self::MissingChild { .. }
            | Self::MissingPort { .. }
            | Self::EmptyWire { .. }
            | Self::MultipleOutputDestinations { .. }
            | Self::EmptyAggregation { .. }
            | Self::NonVariableAggregation { .. }
            | Self::InvalidAggregationDestination { .. }
            | Self::MissingIdentification { .. }
            | Self::IdentificationCollision { .. } => vec![],
        }
    }
}
