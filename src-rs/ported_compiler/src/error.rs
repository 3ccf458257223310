//! Errors raised while compiling ported objects.

use std::fmt;

use ported_expr::Symbol;
use ported_shared::error::{AsPortedError, Context};

/// An error that aborts compilation.
///
/// Paths are qualified from the root object being compiled, for example
/// `model.f_drag.mu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A port or free symbol has no value after wiring, defaults and global
    /// names have been considered.
    UnresolvedDependency {
        /// The qualified path of the unresolved port or symbol.
        path: String,
    },
    /// The directed wires of a composite form a dependency cycle.
    CyclicWire {
        /// The qualified ports along the cycle, starting and ending with the
        /// same port.
        cycle: Vec<String>,
    },
    /// Two definitions produced the same symbol.
    NameCollision {
        /// The symbol defined twice.
        symbol: Symbol,
        /// The qualified path of the object where the collision happened.
        object: String,
    },
}

impl CompileError {
    /// Creates an error for an unresolved port or symbol.
    #[must_use]
    pub const fn unresolved_dependency(path: String) -> Self {
        Self::UnresolvedDependency { path }
    }

    /// Creates an error for a cycle of directed wires.
    #[must_use]
    pub const fn cyclic_wire(cycle: Vec<String>) -> Self {
        Self::CyclicWire { cycle }
    }

    /// Creates an error for a symbol defined twice.
    #[must_use]
    pub const fn name_collision(symbol: Symbol, object: String) -> Self {
        Self::NameCollision { symbol, object }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedDependency { path } => {
                write!(f, "unresolved dependency `{path}`")
            }
            Self::CyclicWire { cycle } => {
                write!(f, "directed wires form a cycle: {}", cycle.join(" -> "))
            }
            Self::NameCollision { symbol, object } => {
                write!(f, "symbol `{symbol}` is defined more than once in `{object}`")
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl AsPortedError for CompileError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::UnresolvedDependency { .. } => vec![
                Context::help("connect the port with a directed wire or give it a default value"),
                Context::note("the time symbol and system parameters are resolved globally"),
            ],
            Self::CyclicWire { .. } => vec![Context::help(
                "break the cycle with a variable object, whose outputs do not depend on its inputs instantaneously",
            )],
            Self::NameCollision { .. } => vec![Context::note(
                "ports, identifications and qualified child symbols share one namespace",
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_wire_message_lists_the_cycle() {
        let error = CompileError::cyclic_wire(vec![
            "model.f.y".to_string(),
            "model.g.y".to_string(),
            "model.f.y".to_string(),
        ]);

        assert_eq!(
            error.message(),
            "directed wires form a cycle: model.f.y -> model.g.y -> model.f.y"
        );
        assert_eq!(error.context().len(), 1);
    }

    #[test]
    fn unresolved_dependency_names_the_path() {
        let error = CompileError::unresolved_dependency("model.f_drag.mu".to_string());

        assert_eq!(error.to_string(), "unresolved dependency `model.f_drag.mu`");
    }
}
