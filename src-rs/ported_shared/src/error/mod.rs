//! Errors for the ported-object model compiler

mod context;
mod traits;

use std::fmt;

pub use context::Context;
pub use traits::AsPortedError;

/// Unified error representation
///
/// This struct represents errors in a format suitable for display to users.
/// It includes the stage that produced the error, a human-readable message,
/// and any context items attached by the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortedError {
    /// The stage that produced the error, such as `construction` or `compile`
    stage: &'static str,
    /// Human-readable error message
    message: String,
    /// Optional context information
    context: Vec<Context>,
}

impl PortedError {
    /// Creates a new `PortedError` from an error that implements `AsPortedError`
    ///
    /// # Arguments
    ///
    /// * `error` - The error that implements `AsPortedError`
    /// * `stage` - The stage that produced the error
    ///
    /// # Returns
    ///
    /// Returns a new `PortedError` with the error message and context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ported_shared::error::{AsPortedError, PortedError};
    ///
    /// struct SimpleError(String);
    ///
    /// impl AsPortedError for SimpleError {
    ///     fn message(&self) -> String {
    ///         self.0.clone()
    ///     }
    /// }
    ///
    /// let error = SimpleError("something went wrong".to_string());
    /// let ported_error = PortedError::from_error(&error, "compile");
    ///
    /// assert_eq!(ported_error.message(), "something went wrong");
    /// ```
    pub fn from_error(error: &impl AsPortedError, stage: &'static str) -> Self {
        Self {
            stage,
            message: error.message(),
            context: error.context(),
        }
    }

    /// Returns the stage that produced the error.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        self.stage
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context items attached to the error.
    #[must_use]
    pub fn context(&self) -> &[Context] {
        &self.context
    }
}

impl fmt::Display for PortedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.stage, self.message)?;

        for context in &self.context {
            match context {
                Context::Note(note) => write!(f, "\n  = note: {note}")?,
                Context::Help(help) => write!(f, "\n  = help: {help}")?,
            }
        }

        Ok(())
    }
}

impl std::error::Error for PortedError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestError;

    impl AsPortedError for TestError {
        fn message(&self) -> String {
            "port `f.a` is not connected".to_string()
        }

        fn context(&self) -> Vec<Context> {
            vec![
                Context::note("found while compiling `model`"),
                Context::help("wire the port"),
            ]
        }
    }

    #[test]
    fn from_error_collects_message_and_context() {
        let error = PortedError::from_error(&TestError, "compile");

        assert_eq!(error.stage(), "compile");
        assert_eq!(error.message(), "port `f.a` is not connected");
        assert_eq!(error.context().len(), 2);
    }

    #[test]
    fn display_renders_context_lines() {
        let error = PortedError::from_error(&TestError, "compile");

        let rendered = error.to_string();

        assert_eq!(
            rendered,
            "compile error: port `f.a` is not connected\n  = note: found while compiling `model`\n  = help: wire the port"
        );
    }
}
