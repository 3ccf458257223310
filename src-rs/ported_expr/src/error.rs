//! Errors raised while evaluating expressions.

use std::fmt;

use ported_shared::error::{AsPortedError, Context};

use crate::{Arity, Symbol};

/// An error raised while evaluating an expression numerically.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The expression refers to a symbol with no value.
    UndefinedSymbol {
        /// The symbol without a value.
        symbol: Symbol,
    },
    /// The expression calls a function that is not registered.
    UndefinedFunction {
        /// The name of the function.
        name: String,
    },
    /// A function was called with the wrong number of arguments.
    ArityMismatch {
        /// The name of the function.
        name: String,
        /// The number of arguments the function accepts.
        expected: Arity,
        /// The number of arguments supplied.
        found: usize,
    },
    /// A function rejected its arguments.
    InvalidArgument {
        /// The name of the function.
        name: String,
        /// Why the arguments were rejected.
        reason: String,
    },
}

impl EvalError {
    /// Creates an error for a symbol with no value.
    #[must_use]
    pub const fn undefined_symbol(symbol: Symbol) -> Self {
        Self::UndefinedSymbol { symbol }
    }

    /// Creates an error for a call to an unregistered function.
    #[must_use]
    pub const fn undefined_function(name: String) -> Self {
        Self::UndefinedFunction { name }
    }

    /// Creates an error for a call with the wrong number of arguments.
    #[must_use]
    pub const fn arity_mismatch(name: String, expected: Arity, found: usize) -> Self {
        Self::ArityMismatch {
            name,
            expected,
            found,
        }
    }

    /// Creates an error for a function that rejected its arguments.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedSymbol { symbol } => write!(f, "symbol `{symbol}` has no value"),
            Self::UndefinedFunction { name } => write!(f, "function `{name}` is not defined"),
            Self::ArityMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "function `{name}` expects {expected} but was given {found}"
            ),
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument to `{name}`: {reason}")
            }
        }
    }
}

impl std::error::Error for EvalError {}

impl AsPortedError for EvalError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::UndefinedSymbol { .. } => vec![Context::help(
                "set an initial value or a parameter value for the symbol",
            )],
            Self::UndefinedFunction { .. } => {
                vec![Context::help("register the function as a utility function")]
            }
            Self::ArityMismatch { .. } | Self::InvalidArgument { .. } => vec![],
        }
    }
}
