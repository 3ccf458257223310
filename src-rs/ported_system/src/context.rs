use indexmap::IndexMap;
use ported_compiler::CompileContext;
use ported_expr::{Arity, Callable, Expr, Expression, Function, FunctionMap, Symbol, std_functions};
use ported_ir::{Name, PortedObject, ReservedNames};
use tracing::{debug, instrument};

use crate::{CompiledSystem, SystemError, system};

/// The default name of the time symbol.
pub const DEFAULT_TIME_SYMBOL: &str = "T";

/// The global configuration a model is compiled against.
///
/// Holds the time symbol, the system parameters, the utility functions that
/// expressions may call, and the names that leaf objects must never derive
/// as input ports.
#[derive(Debug, Clone)]
pub struct SystemContext<E = Expr> {
    time_symbol: Symbol,
    reserved_names: ReservedNames,
    system_parameters: IndexMap<Symbol, E>,
    utility_functions: FunctionMap,
}

impl<E: Expression> SystemContext<E> {
    /// Creates a context with the time symbol `T`, no system parameters and
    /// no utility functions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_symbol: Symbol::new(DEFAULT_TIME_SYMBOL),
            reserved_names: ReservedNames::new(),
            system_parameters: IndexMap::new(),
            utility_functions: FunctionMap::new(),
        }
    }

    /// Sets the name of the time symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or names a system parameter.
    pub fn with_time_symbol(mut self, name: &str) -> Result<Self, SystemError> {
        let symbol = Name::parse(name)?.to_symbol();
        if self.system_parameters.contains_key(&symbol) {
            return Err(SystemError::name_in_use(name.to_string()));
        }

        self.time_symbol = symbol;
        Ok(self)
    }

    /// Adds names that leaf objects must not derive as input ports.
    #[must_use]
    pub fn with_reserved_names<S: AsRef<str>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.reserved_names.extend(names);
        self
    }

    /// Adds a system parameter. See [`Self::add_system_parameter`].
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter cannot be added.
    pub fn with_system_parameter(
        mut self,
        name: &str,
        value: impl Into<E>,
    ) -> Result<Self, SystemError> {
        self.add_system_parameter(name, value)?;
        Ok(self)
    }

    /// Adds a system parameter.
    ///
    /// A system parameter is constant or depends only on time and on system
    /// parameters added before it. Its stored value is expanded so that it
    /// refers to time only.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already used, or if the
    /// value depends on anything other than time and earlier system
    /// parameters.
    pub fn add_system_parameter(
        &mut self,
        name: &str,
        value: impl Into<E>,
    ) -> Result<(), SystemError> {
        let parameter = Name::parse(name)?.to_symbol();
        if self.is_name_in_use(name) {
            return Err(SystemError::name_in_use(name.to_string()));
        }

        let value = value.into();
        for symbol in value.free_symbols() {
            if symbol != self.time_symbol && !self.system_parameters.contains_key(&symbol) {
                return Err(SystemError::system_parameter_dependency(parameter, symbol));
            }
        }

        let value = value.substitute_all(&self.system_parameters);
        debug!(parameter = %parameter, value = %value, "registered system parameter");
        self.system_parameters.insert(parameter, value);

        Ok(())
    }

    /// Adds a utility function that expressions may call.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or is already used by a
    /// standard function, another utility function, a system parameter or
    /// the time symbol.
    pub fn with_utility_function(
        mut self,
        name: &str,
        arity: Arity,
        function: impl Function + 'static,
    ) -> Result<Self, SystemError> {
        Name::parse(name)?;
        if self.is_name_in_use(name) || std_functions().contains_key(name) {
            return Err(SystemError::name_in_use(name.to_string()));
        }

        debug!(function = name, %arity, "registered utility function");
        self.utility_functions
            .insert(name.to_string(), Callable::new(arity, function));

        Ok(self)
    }

    /// Returns the expanded values of the system parameters.
    #[must_use]
    pub const fn system_parameters(&self) -> &IndexMap<Symbol, E> {
        &self.system_parameters
    }

    /// Returns the registered utility functions.
    #[must_use]
    pub const fn utility_functions(&self) -> &FunctionMap {
        &self.utility_functions
    }

    /// Returns the standard functions together with the utility functions.
    #[must_use]
    pub fn functions(&self) -> FunctionMap {
        let mut functions = std_functions();
        functions.extend(
            self.utility_functions
                .iter()
                .map(|(name, callable)| (name.clone(), callable.clone())),
        );
        functions
    }

    /// Returns the names leaf objects must not derive as input ports: the
    /// time symbol, the system parameters and any explicitly reserved names.
    ///
    /// Pass the result to the leaf builders so that references to global
    /// names stay global.
    #[must_use]
    pub fn reserved_names(&self) -> ReservedNames {
        let mut reserved = self.reserved_names.clone();
        reserved.extend([self.time_symbol.as_str()]);
        reserved.extend(self.system_parameters.keys().map(Symbol::as_str));
        reserved
    }

    /// Compiles a ported object into a system.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation fails, an expression calls an unknown
    /// function, or a symbol defined by the model clashes with the time
    /// symbol or a system parameter.
    #[instrument(skip_all, fields(object = %object.name()))]
    pub fn compile(&self, object: &PortedObject<E>) -> Result<CompiledSystem<E>, SystemError> {
        let compiled = ported_compiler::compile(object, self)?;
        system::build(self, compiled)
    }

    fn is_name_in_use(&self, name: &str) -> bool {
        self.time_symbol.as_str() == name
            || self.system_parameters.contains_key(name)
            || self.utility_functions.contains_key(name)
    }
}

impl<E: Expression> Default for SystemContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CompileContext for SystemContext<E> {
    fn time_symbol(&self) -> &Symbol {
        &self.time_symbol
    }

    fn has_system_parameter(&self, name: &str) -> bool {
        self.system_parameters.contains_key(name)
    }
}
