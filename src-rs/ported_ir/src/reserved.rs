use indexmap::IndexSet;

/// Symbol names that are interpreted by the surrounding system rather than
/// exposed as input ports.
///
/// Leaf objects never derive an input port for a reserved name. A reserved
/// symbol stays a global reference and is resolved when the model is
/// compiled, typically to the time symbol or to a system parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedNames(IndexSet<String>);

impl ReservedNames {
    /// Creates an empty set of reserved names.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Adds names to the set.
    #[must_use]
    pub fn with_names<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.extend(names);
        self
    }

    /// Adds names to the set.
    pub fn extend<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.0
            .extend(names.into_iter().map(|name| name.as_ref().to_string()));
    }

    /// Returns `true` if `name` is reserved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns an iterator over the reserved names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
