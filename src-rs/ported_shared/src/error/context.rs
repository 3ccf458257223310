/// Represents different types of contextual information that can be associated with errors.
///
/// The `Context` enum attaches additional information to error messages,
/// helping users understand where an error occurred in a model hierarchy
/// and how to resolve it.
///
/// # Examples
///
/// ```rust
/// use ported_shared::error::Context;
///
/// let note = Context::Note("port `f.a` belongs to child `f`".to_string());
/// let help = Context::Help("give the port a default value or wire it".to_string());
///
/// let contexts = vec![note, help];
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error.
    ///
    /// Notes provide supplementary details, such as which object or wire
    /// the error was found in.
    Note(String),

    /// Helpful suggestions for resolving the error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ported_shared::error::Context;
    ///
    /// let help = Context::Help("wire the port or register a system parameter named `r`".to_string());
    /// ```
    Help(String),
}

impl Context {
    /// Creates a note context item.
    #[must_use]
    pub fn note(message: impl Into<String>) -> Self {
        Self::Note(message.into())
    }

    /// Creates a help context item.
    #[must_use]
    pub fn help(message: impl Into<String>) -> Self {
        Self::Help(message.into())
    }
}
