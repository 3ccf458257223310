//! Callable functions available to expressions during evaluation.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::EvalError;

/// A function that can be called from an expression.
pub trait Function: Send + Sync {
    /// Calls the function with the given arguments and returns the result.
    ///
    /// The number of arguments has already been checked against the
    /// function's [`Arity`] when this is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the function rejects its arguments.
    fn call(&self, args: &[f64]) -> Result<f64, EvalError>;
}

impl<F: Fn(&[f64]) -> Result<f64, EvalError> + Send + Sync> Function for F {
    fn call(&self, args: &[f64]) -> Result<f64, EvalError> {
        self(args)
    }
}

/// The number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// This many arguments or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns `true` if a call with `count` arguments is accepted.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(expected) => count == expected,
            Self::AtLeast(minimum) => count >= minimum,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(1) => write!(f, "1 argument"),
            Self::Exactly(count) => write!(f, "{count} arguments"),
            Self::AtLeast(1) => write!(f, "at least 1 argument"),
            Self::AtLeast(count) => write!(f, "at least {count} arguments"),
        }
    }
}

/// A named function together with the number of arguments it accepts.
#[derive(Clone)]
pub struct Callable {
    arity: Arity,
    function: Arc<dyn Function>,
}

impl Callable {
    /// Creates a new callable from a function and its arity.
    pub fn new(arity: Arity, function: impl Function + 'static) -> Self {
        Self {
            arity,
            function: Arc::new(function),
        }
    }

    /// Returns the number of arguments the callable accepts.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Calls the function after checking the argument count.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ArityMismatch`] if the argument count is not
    /// accepted, or any error produced by the function itself.
    pub fn call(&self, name: &str, args: &[f64]) -> Result<f64, EvalError> {
        if !self.arity.accepts(args.len()) {
            return Err(EvalError::arity_mismatch(
                name.to_string(),
                self.arity,
                args.len(),
            ));
        }

        self.function.call(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Functions available during evaluation, keyed by name.
pub type FunctionMap = IndexMap<String, Callable>;

/// The standard math functions:
/// - `sin` - sine
/// - `cos` - cosine
/// - `tan` - tangent
/// - `exp` - exponential
/// - `ln` - natural logarithm
/// - `sqrt` - square root
/// - `abs` - absolute value
/// - `min` - minimum
/// - `max` - maximum
#[must_use]
pub fn std_functions() -> FunctionMap {
    [
        ("sin", Callable::new(Arity::Exactly(1), fns::sin)),
        ("cos", Callable::new(Arity::Exactly(1), fns::cos)),
        ("tan", Callable::new(Arity::Exactly(1), fns::tan)),
        ("exp", Callable::new(Arity::Exactly(1), fns::exp)),
        ("ln", Callable::new(Arity::Exactly(1), fns::ln)),
        ("sqrt", Callable::new(Arity::Exactly(1), fns::sqrt)),
        ("abs", Callable::new(Arity::Exactly(1), fns::abs)),
        ("min", Callable::new(Arity::AtLeast(1), fns::min)),
        ("max", Callable::new(Arity::AtLeast(1), fns::max)),
    ]
    .into_iter()
    .map(|(name, callable)| (name.to_string(), callable))
    .collect()
}

mod fns {
    use crate::EvalError;

    // arity is checked by `Callable::call` before these run

    pub fn sin(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0].sin())
    }

    pub fn cos(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0].cos())
    }

    pub fn tan(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0].tan())
    }

    pub fn exp(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0].exp())
    }

    pub fn ln(args: &[f64]) -> Result<f64, EvalError> {
        if args[0] <= 0.0 {
            return Err(EvalError::invalid_argument(
                "ln",
                format!("logarithm of non-positive value {}", args[0]),
            ));
        }
        Ok(args[0].ln())
    }

    pub fn sqrt(args: &[f64]) -> Result<f64, EvalError> {
        if args[0] < 0.0 {
            return Err(EvalError::invalid_argument(
                "sqrt",
                format!("square root of negative value {}", args[0]),
            ));
        }
        Ok(args[0].sqrt())
    }

    pub fn abs(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0].abs())
    }

    pub fn min(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_functions_apply_their_math() {
        let functions = std_functions();

        let sqrt = functions.get("sqrt").expect("sqrt should exist");
        let max = functions.get("max").expect("max should exist");

        let root = sqrt.call("sqrt", &[9.0]).expect("sqrt should succeed");
        let largest = max.call("max", &[1.0, 4.0, 2.0]).expect("max should succeed");

        assert!((root - 3.0).abs() < 1e-12);
        assert!((largest - 4.0).abs() < 1e-12);
    }

    #[test]
    fn callable_rejects_wrong_arity() {
        let functions = std_functions();
        let sin = functions.get("sin").expect("sin should exist");

        let result = sin.call("sin", &[1.0, 2.0]);

        assert_eq!(
            result,
            Err(EvalError::arity_mismatch("sin".to_string(), Arity::Exactly(1), 2))
        );
    }

    #[test]
    fn ln_rejects_non_positive_values() {
        let functions = std_functions();
        let ln = functions.get("ln").expect("ln should exist");

        let result = ln.call("ln", &[0.0]);

        assert!(matches!(result, Err(EvalError::InvalidArgument { .. })));
    }

    #[test]
    fn closures_are_functions() {
        let double = Callable::new(Arity::Exactly(1), |args: &[f64]| -> Result<f64, EvalError> {
            Ok(args[0] * 2.0)
        });

        let result = double.call("double", &[2.5]).expect("call should succeed");

        assert!((result - 5.0).abs() < 1e-12);
    }
}
