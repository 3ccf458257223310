use std::fmt;

use ported_expr::Expr;

/// Where the value of a parameter comes from, which decides whether it can
/// be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Defined by an assignment of a functional object. Fixed.
    Functional,
    /// Materialized from the default value of an input port.
    Default,
    /// A top-level input port without a default. Must be set before the
    /// system can be evaluated.
    Required,
    /// Set explicitly on the compiled system.
    Override,
}

impl ParameterKind {
    /// Returns `true` if the parameter value can be replaced.
    #[must_use]
    pub const fn is_settable(self) -> bool {
        match self {
            Self::Default | Self::Required | Self::Override => true,
            Self::Functional => false,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Functional => write!(f, "functional"),
            Self::Default => write!(f, "default"),
            Self::Required => write!(f, "required"),
            Self::Override => write!(f, "override"),
        }
    }
}

/// A parameter of a compiled system.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<E = Expr> {
    kind: ParameterKind,
    value: Option<E>,
}

impl<E> Parameter<E> {
    /// Creates a parameter with a value.
    #[must_use]
    pub const fn assigned(kind: ParameterKind, value: E) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    /// Creates a required parameter without a value.
    #[must_use]
    pub const fn required() -> Self {
        Self {
            kind: ParameterKind::Required,
            value: None,
        }
    }

    /// Returns the kind of the parameter.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Returns the value of the parameter, or `None` if it is still required.
    #[must_use]
    pub const fn value(&self) -> Option<&E> {
        self.value.as_ref()
    }

    /// Returns `true` if the parameter has no value yet.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.value.is_none()
    }

    /// Replaces the value, turning the parameter into an override.
    pub fn set(&mut self, value: E) {
        self.kind = ParameterKind::Override;
        self.value = Some(value);
    }
}
