//! Symbols appearing in expressions.

use std::{borrow::Borrow, fmt};

use ported_shared::HIERARCHY_SEPARATOR;

/// An identifier for a quantity in an expression.
///
/// Symbols compare by their full name. Within a compiled system every symbol
/// name is qualified by the path of the object that owns it (for example
/// `model.f.a`), which is what makes compiled symbols globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string or string-like type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ported_expr::Symbol;
    ///
    /// let x = Symbol::new("x");
    /// assert_eq!(x.as_str(), "x");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_string())
    }

    /// Returns the name of this symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns this symbol qualified by `prefix`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ported_expr::Symbol;
    ///
    /// let a = Symbol::new("g.a");
    /// assert_eq!(a.prefixed("f"), Symbol::new("f.g.a"));
    /// ```
    #[must_use]
    pub fn prefixed(&self, prefix: &str) -> Self {
        Self(format!("{prefix}{HIERARCHY_SEPARATOR}{}", self.0))
    }

    /// Returns `true` if the symbol is qualified by at least one object name.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.0.contains(HIERARCHY_SEPARATOR)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(name)
    }
}
