use crate::error::Context;

/// Trait for types that can be converted to ported-object error messages.
///
/// This trait provides a standardized interface for error types to expose
/// their error message and associated context. Every error type of the
/// compiler implements it so that errors from any stage can be reported
/// the same way.
pub trait AsPortedError {
    /// Returns the primary error message.
    ///
    /// This should be a concise, user-friendly description of what went wrong,
    /// including the fully qualified path of the offending port or object.
    fn message(&self) -> String;

    /// Returns additional context information about the error.
    ///
    /// Returns an empty vector if no context is available.
    fn context(&self) -> Vec<Context> {
        vec![]
    }
}
