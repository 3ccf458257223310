//! Utility types for the compiler.

use std::fmt;

use ported_ir::Name;
use ported_shared::qualified_path;
pub use ported_shared::stack::Stack;

/// The path from the root object to the object being compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    path: Vec<Name>,
}

impl Scope {
    /// Creates the scope of the root object.
    #[must_use]
    pub fn root(name: &Name) -> Self {
        Self {
            path: vec![name.clone()],
        }
    }

    /// Creates the scope of a child of this scope's object.
    #[must_use]
    pub fn child(&self, name: &Name) -> Self {
        let mut path = self.path.clone();
        path.push(name.clone());
        Self { path }
    }

    /// Qualifies a path relative to this scope's object.
    #[must_use]
    pub fn qualify(&self, relative: impl fmt::Display) -> String {
        let relative = relative.to_string();
        qualified_path(
            self.path
                .iter()
                .map(Name::as_str)
                .chain(std::iter::once(relative.as_str())),
        )
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&qualified_path(self.path.iter().map(Name::as_str)))
    }
}
