use ported_expr::Expr;

use crate::{CompiledObject, CompositeObject, FunctionalObject, Name, PortKind, VariableObject};

/// Any object that can appear in a model tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PortedObject<E = Expr> {
    /// A leaf holding differential assignments.
    Variable(VariableObject<E>),
    /// A leaf holding parameter assignments.
    Functional(FunctionalObject<E>),
    /// An object composed of wired children.
    Composite(CompositeObject<E>),
    /// An object that has already been compiled.
    Compiled(CompiledObject<E>),
}

impl<E> PortedObject<E> {
    /// Returns the name of the object.
    #[must_use]
    pub const fn name(&self) -> &Name {
        match self {
            Self::Variable(object) => object.name(),
            Self::Functional(object) => object.name(),
            Self::Composite(object) => object.name(),
            Self::Compiled(object) => object.name(),
        }
    }

    /// Returns the kind of the port with the given name.
    #[must_use]
    pub fn port_kind(&self, name: &str) -> Option<PortKind> {
        match self {
            Self::Variable(object) => object.ports().kind(name),
            Self::Functional(object) => object.ports().kind(name),
            Self::Composite(object) => object.ports().kind(name),
            Self::Compiled(object) => object.port_kind(name),
        }
    }
}

impl<E> From<VariableObject<E>> for PortedObject<E> {
    fn from(object: VariableObject<E>) -> Self {
        Self::Variable(object)
    }
}

impl<E> From<FunctionalObject<E>> for PortedObject<E> {
    fn from(object: FunctionalObject<E>) -> Self {
        Self::Functional(object)
    }
}

impl<E> From<CompositeObject<E>> for PortedObject<E> {
    fn from(object: CompositeObject<E>) -> Self {
        Self::Composite(object)
    }
}

impl<E> From<CompiledObject<E>> for PortedObject<E> {
    fn from(object: CompiledObject<E>) -> Self {
        Self::Compiled(object)
    }
}
