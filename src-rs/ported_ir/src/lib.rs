#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Model representation for the ported-object model compiler

mod assignment;
mod compiled;
mod composite;
mod error;
mod functional;
mod name;
mod object;
mod port;
mod reserved;
mod variable;
mod wire;

pub use assignment::{Assignment, AssignmentEntry, AssignmentKind};
pub use compiled::{CompiledObject, CompiledParts};
pub use composite::CompositeObject;
pub use error::ConfigurationError;
pub use functional::{FunctionalObject, FunctionalObjectBuilder};
pub use name::Name;
pub use object::PortedObject;
pub use port::{Port, PortKind, Ports};
pub use reserved::ReservedNames;
pub use variable::{VariableObject, VariableObjectBuilder};
pub use wire::{Aggregation, Connection, DirectedWire, PortRef, VariableWire};
