use std::{borrow::Borrow, fmt};

use ported_expr::Symbol;
use ported_shared::HIERARCHY_SEPARATOR;

use crate::ConfigurationError;

/// The name of a ported object, child or port.
///
/// Names are unique only within their owning object. They are non-empty and
/// never contain the hierarchy separator, so joining names with `.` always
/// yields an unambiguous qualified path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Parses a name, rejecting empty names and names containing `.`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidName`] if the name is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ported_ir::Name;
    ///
    /// assert!(Name::parse("mu").is_ok());
    /// assert!(Name::parse("f.mu").is_err());
    /// ```
    pub fn parse(name: impl AsRef<str>) -> Result<Self, ConfigurationError> {
        let name = name.as_ref();

        if name.is_empty() || name.contains(HIERARCHY_SEPARATOR) {
            return Err(ConfigurationError::invalid_name(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the symbol with the same name.
    #[must_use]
    pub fn to_symbol(&self) -> Symbol {
        Symbol::new(&self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_separator_and_empty() {
        assert_eq!(
            Name::parse("a.b"),
            Err(ConfigurationError::invalid_name("a.b".to_string()))
        );
        assert_eq!(
            Name::parse(""),
            Err(ConfigurationError::invalid_name(String::new()))
        );
    }

    #[test]
    fn name_converts_to_symbol() {
        let name = Name::parse("mu").expect("name should be valid");

        assert_eq!(name.to_symbol(), Symbol::new("mu"));
    }
}
