//! Errors raised by the system driver.

use std::fmt;

use ported_compiler::CompileError;
use ported_expr::{EvalError, Symbol};
use ported_ir::ConfigurationError;
use ported_shared::error::{AsPortedError, Context, PortedError};

use crate::ParameterKind;

/// An error raised while configuring a system context, compiling a model
/// against it, or using the compiled system.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemError {
    /// A name given to the context is malformed.
    Configuration(ConfigurationError),
    /// Compiling the model failed.
    Compile(CompileError),
    /// A name is already used by the time symbol, a system parameter or a
    /// function.
    NameInUse {
        /// The name.
        name: String,
    },
    /// A system parameter depends on something other than time and earlier
    /// system parameters.
    SystemParameterDependency {
        /// The system parameter.
        parameter: Symbol,
        /// The offending symbol.
        symbol: Symbol,
    },
    /// An expression calls a function that is neither standard nor a
    /// registered utility function.
    UnknownFunction {
        /// The function name.
        name: String,
    },
    /// A readable path does not refer to any compiled symbol.
    UnknownPath {
        /// The path.
        path: String,
    },
    /// A path refers to a symbol that is not a parameter.
    NotAParameter {
        /// The path.
        path: String,
    },
    /// A path refers to a symbol that is not a variable.
    NotAVariable {
        /// The path.
        path: String,
    },
    /// A parameter that is defined by the model was given a new value.
    FixedParameter {
        /// The path.
        path: String,
        /// The kind of the parameter.
        kind: ParameterKind,
    },
    /// A parameter value refers to something other than time and system
    /// parameters.
    InvalidParameterValue {
        /// The path of the parameter.
        path: String,
        /// The offending symbol.
        symbol: Symbol,
    },
    /// Parameters depend on each other in a cycle.
    CyclicParameters {
        /// The parameters along the cycle, starting and ending with the
        /// same parameter.
        cycle: Vec<Symbol>,
    },
    /// Parameters or initial values are missing.
    Incomplete {
        /// Parameters without a value.
        required_parameters: Vec<Symbol>,
        /// Variables without an initial value.
        missing_initial_values: Vec<Symbol>,
    },
    /// Numeric evaluation failed.
    Eval(EvalError),
}

impl SystemError {
    /// Creates an error for a name that is already used.
    #[must_use]
    pub const fn name_in_use(name: String) -> Self {
        Self::NameInUse { name }
    }

    /// Creates an error for a system parameter with a forbidden dependency.
    #[must_use]
    pub const fn system_parameter_dependency(parameter: Symbol, symbol: Symbol) -> Self {
        Self::SystemParameterDependency { parameter, symbol }
    }

    /// Creates an error for a call to an unknown function.
    #[must_use]
    pub const fn unknown_function(name: String) -> Self {
        Self::UnknownFunction { name }
    }

    /// Creates an error for an unknown path.
    #[must_use]
    pub const fn unknown_path(path: String) -> Self {
        Self::UnknownPath { path }
    }

    /// Creates an error for a path that is not a parameter.
    #[must_use]
    pub const fn not_a_parameter(path: String) -> Self {
        Self::NotAParameter { path }
    }

    /// Creates an error for a path that is not a variable.
    #[must_use]
    pub const fn not_a_variable(path: String) -> Self {
        Self::NotAVariable { path }
    }

    /// Creates an error for overriding a fixed parameter.
    #[must_use]
    pub const fn fixed_parameter(path: String, kind: ParameterKind) -> Self {
        Self::FixedParameter { path, kind }
    }

    /// Creates an error for a parameter value with a forbidden symbol.
    #[must_use]
    pub const fn invalid_parameter_value(path: String, symbol: Symbol) -> Self {
        Self::InvalidParameterValue { path, symbol }
    }

    /// Creates an error for cyclic parameter dependencies.
    #[must_use]
    pub const fn cyclic_parameters(cycle: Vec<Symbol>) -> Self {
        Self::CyclicParameters { cycle }
    }

    /// Creates an error for missing parameters or initial values.
    #[must_use]
    pub const fn incomplete(
        required_parameters: Vec<Symbol>,
        missing_initial_values: Vec<Symbol>,
    ) -> Self {
        Self::Incomplete {
            required_parameters,
            missing_initial_values,
        }
    }

    /// Returns the stage that produced the error.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "construction",
            Self::Compile(_) => "compile",
            Self::Eval(_) => "evaluation",
            Self::NameInUse { .. }
            | Self::SystemParameterDependency { .. }
            | Self::UnknownFunction { .. }
            | Self::UnknownPath { .. }
            | Self::NotAParameter { .. }
            | Self::NotAVariable { .. }
            | Self::FixedParameter { .. }
            | Self::InvalidParameterValue { .. }
            | Self::CyclicParameters { .. }
            | Self::Incomplete { .. } => "system",
        }
    }

    /// Converts the error into a displayable report.
    #[must_use]
    pub fn report(&self) -> PortedError {
        PortedError::from_error(self, self.stage())
    }
}

fn join(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|symbol| format!("`{symbol}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(error) => write!(f, "{error}"),
            Self::Compile(error) => write!(f, "{error}"),
            Self::NameInUse { name } => write!(f, "the name `{name}` is already in use"),
            Self::SystemParameterDependency { parameter, symbol } => write!(
                f,
                "system parameter `{parameter}` depends on `{symbol}`, which is neither time nor a system parameter"
            ),
            Self::UnknownFunction { name } => write!(f, "function `{name}` is not defined"),
            Self::UnknownPath { path } => write!(f, "no symbol is known for `{path}`"),
            Self::NotAParameter { path } => write!(f, "`{path}` is not a parameter"),
            Self::NotAVariable { path } => write!(f, "`{path}` is not a variable"),
            Self::FixedParameter { path, kind } => {
                write!(f, "the value of {kind} parameter `{path}` is fixed")
            }
            Self::InvalidParameterValue { path, symbol } => write!(
                f,
                "the value of parameter `{path}` cannot refer to `{symbol}`"
            ),
            Self::CyclicParameters { cycle } => {
                let cycle = cycle
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                write!(f, "parameters depend on each other: {cycle}")
            }
            Self::Incomplete {
                required_parameters,
                missing_initial_values,
            } => {
                write!(f, "the system is incomplete")?;
                if !required_parameters.is_empty() {
                    write!(f, "; parameters without a value: {}", join(required_parameters))?;
                }
                if !missing_initial_values.is_empty() {
                    write!(
                        f,
                        "; variables without an initial value: {}",
                        join(missing_initial_values)
                    )?;
                }
                Ok(())
            }
            Self::Eval(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for SystemError {}

impl From<ConfigurationError> for SystemError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<CompileError> for SystemError {
    fn from(error: CompileError) -> Self {
        Self::Compile(error)
    }
}

impl From<EvalError> for SystemError {
    fn from(error: EvalError) -> Self {
        Self::Eval(error)
    }
}

impl AsPortedError for SystemError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::Configuration(error) => error.context(),
            Self::Compile(error) => error.context(),
            Self::Eval(error) => error.context(),
            Self::SystemParameterDependency { .. } => vec![Context::note(
                "system parameters are constant or depend only on time and earlier system parameters",
            )],
            Self::FixedParameter { .. } => vec![Context::note(
                "only defaults, required inputs and earlier overrides can be set",
            )],
            Self::InvalidParameterValue { .. } => vec![Context::help(
                "parameter values may depend only on time and system parameters",
            )],
            Self::UnknownPath { .. } => vec![Context::help(
                "paths are qualified by child names, for example `model.f_drag.mu`",
            )],
            Self::NameInUse { .. }
            | Self::UnknownFunction { .. }
            | Self::NotAParameter { .. }
            | Self::NotAVariable { .. }
            | Self::CyclicParameters { .. }
            | Self::Incomplete { .. } => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_what_is_missing() {
        let error = SystemError::incomplete(vec![Symbol::new("a")], vec![Symbol::new("f.x")]);

        assert_eq!(
            error.to_string(),
            "the system is incomplete; parameters without a value: `a`; variables without an initial value: `f.x`"
        );
    }

    #[test]
    fn compile_errors_keep_their_context() {
        let error = SystemError::from(CompileError::unresolved_dependency("model.f.a".to_string()));

        assert_eq!(error.message(), "unresolved dependency `model.f.a`");
        assert_eq!(error.context().len(), 2);
    }

    #[test]
    fn reports_name_their_stage() {
        let error = SystemError::fixed_parameter("f.y".to_string(), ParameterKind::Functional);

        let report = error.report();

        assert_eq!(report.stage(), "system");
        assert_eq!(
            report.to_string(),
            "system error: the value of functional parameter `f.y` is fixed\n  = note: only defaults, required inputs and earlier overrides can be set"
        );
    }
}
