use ported_expr::Symbol;

/// A trait for the global names a model may refer to.
///
/// Global names are never qualified by the object they appear in. An
/// unconnected input port whose name is global is bound to the global
/// symbol instead of its default value.
pub trait CompileContext {
    /// Returns the symbol of the independent time variable.
    fn time_symbol(&self) -> &Symbol;

    /// Checks if the given name is a registered system parameter.
    ///
    /// # Arguments
    ///
    /// * `name` - The name to check
    ///
    /// # Returns
    ///
    /// Returns `true` if the name refers to a system parameter, `false` otherwise.
    fn has_system_parameter(&self, name: &str) -> bool;

    /// Returns the global symbol named `name`, if there is one.
    fn global_symbol(&self, name: &str) -> Option<Symbol> {
        if self.time_symbol().as_str() == name {
            Some(self.time_symbol().clone())
        } else if self.has_system_parameter(name) {
            Some(Symbol::new(name))
        } else {
            None
        }
    }
}
