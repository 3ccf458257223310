//! Numeric evaluation of expressions.

use indexmap::IndexMap;

use crate::{
    EvalError, Expr, Symbol,
    expr::UnaryOp,
    function::{FunctionMap, std_functions},
};

/// Symbol values and callable functions used to evaluate an [`Expr`].
#[derive(Debug, Clone)]
pub struct EvalContext {
    values: IndexMap<Symbol, f64>,
    functions: FunctionMap,
}

impl EvalContext {
    /// Creates a context with no symbol values and the standard math functions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
            functions: std_functions(),
        }
    }

    /// Adds functions to the context, replacing any with the same name.
    #[must_use]
    pub fn with_functions(mut self, functions: FunctionMap) -> Self {
        self.functions.extend(functions);
        self
    }

    /// Adds a symbol value to the context.
    #[must_use]
    pub fn with_value(mut self, symbol: impl Into<Symbol>, value: f64) -> Self {
        self.set_value(symbol, value);
        self
    }

    /// Sets the value of a symbol, replacing any previous value.
    pub fn set_value(&mut self, symbol: impl Into<Symbol>, value: f64) {
        self.values.insert(symbol.into(), value);
    }

    /// Returns the value of a symbol, if it has one.
    #[must_use]
    pub fn value(&self, symbol: &Symbol) -> Option<f64> {
        self.values.get(symbol).copied()
    }

    /// Evaluates an expression in this context.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression refers to a symbol without a value,
    /// calls an unknown function, or calls a function with bad arguments.
    pub fn eval(&self, expr: &Expr) -> Result<f64, EvalError> {
        match expr {
            Expr::BinaryOp { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Ok(op.apply(left, right))
            }
            Expr::UnaryOp {
                op: UnaryOp::Neg,
                expr,
            } => Ok(-self.eval(expr)?),
            Expr::FunctionCall { name, args } => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| EvalError::undefined_function(name.clone()))?;

                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;

                function.call(name, &args)
            }
            Expr::Variable(symbol) => self
                .value(symbol)
                .ok_or_else(|| EvalError::undefined_symbol(symbol.clone())),
            Expr::Literal { value } => Ok(*value),
        }
    }
}

/// An expression that can be evaluated to a number.
pub trait Evaluate {
    /// Evaluates the expression in the given context.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated in the context.
    fn evaluate(&self, context: &EvalContext) -> Result<f64, EvalError>;
}

impl Evaluate for Expr {
    fn evaluate(&self, context: &EvalContext) -> Result<f64, EvalError> {
        context.eval(self)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
