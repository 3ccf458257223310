//! A concrete expression tree implementing [`Expression`].

use std::{fmt, ops};

use indexmap::{IndexMap, IndexSet};

use crate::{Expression, Symbol};

/// Expression tree for arithmetic over symbols, constants and function calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Binary operation combining two expressions with an operator.
    BinaryOp {
        /// The binary operator to apply.
        op: BinaryOp,
        /// The left-hand operand.
        left: Box<Expr>,
        /// The right-hand operand.
        right: Box<Expr>,
    },
    /// Unary operation applied to a single expression.
    UnaryOp {
        /// The unary operator to apply.
        op: UnaryOp,
        /// The operand expression.
        expr: Box<Expr>,
    },
    /// Function call with a name and argument list.
    FunctionCall {
        /// The name of the function to call.
        name: String,
        /// The arguments to pass to the function.
        args: Vec<Expr>,
    },
    /// Symbol reference.
    Variable(Symbol),
    /// Constant literal value.
    Literal {
        /// The literal value.
        value: f64,
    },
}

impl Expr {
    /// Creates a binary operation expression.
    #[must_use]
    pub fn binary_op(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a unary operation expression.
    #[must_use]
    pub fn unary_op(op: UnaryOp, expr: Self) -> Self {
        Self::UnaryOp {
            op,
            expr: Box::new(expr),
        }
    }

    /// Creates a function call expression.
    #[must_use]
    pub fn function_call(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Creates a symbol reference.
    #[must_use]
    pub fn var(name: impl AsRef<str>) -> Self {
        Self::Variable(Symbol::new(name))
    }

    /// Creates a literal expression.
    #[must_use]
    pub const fn literal(value: f64) -> Self {
        Self::Literal { value }
    }

    /// Raises this expression to the power `exponent`.
    #[must_use]
    pub fn pow(self, exponent: impl Into<Self>) -> Self {
        Self::binary_op(BinaryOp::Pow, self, exponent.into())
    }

    /// Binding strength used when printing; higher binds tighter.
    const fn precedence(&self) -> u8 {
        match self {
            Self::BinaryOp { op, .. } => op.precedence(),
            Self::UnaryOp { .. } => 3,
            Self::Literal { value } if value.is_sign_negative() => 3,
            Self::FunctionCall { .. } | Self::Variable(_) | Self::Literal { .. } => 5,
        }
    }

    fn collect_free_symbols(&self, symbols: &mut IndexSet<Symbol>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                left.collect_free_symbols(symbols);
                right.collect_free_symbols(symbols);
            }
            Self::UnaryOp { expr, .. } => expr.collect_free_symbols(symbols),
            Self::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_free_symbols(symbols);
                }
            }
            Self::Variable(symbol) => {
                symbols.insert(symbol.clone());
            }
            Self::Literal { .. } => {}
        }
    }

    fn collect_called_functions(&self, functions: &mut IndexSet<String>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                left.collect_called_functions(functions);
                right.collect_called_functions(functions);
            }
            Self::UnaryOp { expr, .. } => expr.collect_called_functions(functions),
            Self::FunctionCall { name, args } => {
                functions.insert(name.clone());
                for arg in args {
                    arg.collect_called_functions(functions);
                }
            }
            Self::Variable(_) | Self::Literal { .. } => {}
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: `a + b`
    Add,
    /// Subtraction: `a - b`
    Sub,
    /// Multiplication: `a * b`
    Mul,
    /// Division: `a / b`
    Div,
    /// Exponentiation: `a ^ b`
    Pow,
}

impl BinaryOp {
    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    /// Applies the operator to two numbers.
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
            Self::Pow => left.powf(right),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation: `-a`
    Neg,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryOp { op, left, right } => {
                let precedence = op.precedence();
                // `^` groups to the right, everything else to the left
                let (left_parens, right_parens) = if *op == BinaryOp::Pow {
                    (
                        left.precedence() <= precedence,
                        right.precedence() < precedence,
                    )
                } else {
                    (
                        left.precedence() < precedence,
                        right.precedence() <= precedence,
                    )
                };

                left.fmt_operand(f, left_parens)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_operand(f, right_parens)
            }
            Self::UnaryOp {
                op: UnaryOp::Neg,
                expr,
            } => {
                write!(f, "-")?;
                expr.fmt_operand(f, expr.precedence() <= 3)
            }
            Self::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Variable(symbol) => write!(f, "{symbol}"),
            Self::Literal { value } => write!(f, "{value}"),
        }
    }
}

impl Expression for Expr {
    fn symbol(symbol: Symbol) -> Self {
        Self::Variable(symbol)
    }

    fn constant(value: f64) -> Self {
        Self::literal(value)
    }

    fn sum(terms: Vec<Self>) -> Self {
        terms
            .into_iter()
            .reduce(|sum, term| Self::binary_op(BinaryOp::Add, sum, term))
            .unwrap_or(Self::literal(0.0))
    }

    fn free_symbols(&self) -> IndexSet<Symbol> {
        let mut symbols = IndexSet::new();
        self.collect_free_symbols(&mut symbols);
        symbols
    }

    fn substitute_all(&self, substitutions: &IndexMap<Symbol, Self>) -> Self {
        if substitutions.is_empty() {
            return self.clone();
        }

        match self {
            Self::BinaryOp { op, left, right } => Self::binary_op(
                *op,
                left.substitute_all(substitutions),
                right.substitute_all(substitutions),
            ),
            Self::UnaryOp { op, expr } => Self::unary_op(*op, expr.substitute_all(substitutions)),
            Self::FunctionCall { name, args } => Self::function_call(
                name.clone(),
                args.iter()
                    .map(|arg| arg.substitute_all(substitutions))
                    .collect(),
            ),
            Self::Variable(symbol) => substitutions
                .get(symbol)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Literal { .. } => self.clone(),
        }
    }

    fn called_functions(&self) -> IndexSet<String> {
        let mut functions = IndexSet::new();
        self.collect_called_functions(&mut functions);
        functions
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::literal(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Self::Variable(symbol)
    }
}

impl ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self {
        Self::unary_op(UnaryOp::Neg, self)
    }
}

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Into<Expr>> ops::$trait<T> for Expr {
            type Output = Self;

            fn $method(self, rhs: T) -> Self {
                Self::binary_op($op, self, rhs.into())
            }
        }

        impl ops::$trait<Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary_op($op, Expr::literal(self), rhs)
            }
        }
    };
}

impl_binary_operator!(Add, add, BinaryOp::Add);
impl_binary_operator!(Sub, sub, BinaryOp::Sub);
impl_binary_operator!(Mul, mul, BinaryOp::Mul);
impl_binary_operator!(Div, div, BinaryOp::Div);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_symbols_in_order_of_occurrence() {
        let expr = Expr::var("b") * Expr::var("a") + Expr::var("b");

        let symbols = expr.free_symbols();

        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            vec![Symbol::new("b"), Symbol::new("a")]
        );
    }

    #[test]
    fn function_names_are_not_free_symbols() {
        let expr = Expr::function_call("sin", vec![Expr::var("x")]);

        assert_eq!(expr.free_symbols().len(), 1);
        assert!(expr.called_functions().contains("sin"));
    }

    #[test]
    fn substitution_is_simultaneous() {
        // swap a and b
        let expr = Expr::var("a") - Expr::var("b");
        let mut substitutions = IndexMap::new();
        substitutions.insert(Symbol::new("a"), Expr::var("b"));
        substitutions.insert(Symbol::new("b"), Expr::var("a"));

        let swapped = expr.substitute_all(&substitutions);

        assert_eq!(swapped, Expr::var("b") - Expr::var("a"));
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        let expr = Expr::var("x") * Expr::var("x");

        let substituted = expr.substitute(&Symbol::new("x"), &(Expr::var("y") + 1.0));

        assert_eq!(substituted.to_string(), "(y + 1) * (y + 1)");
    }

    #[test]
    fn sum_of_no_terms_is_zero() {
        assert_eq!(Expr::sum(vec![]), Expr::literal(0.0));
    }

    #[test]
    fn display_uses_minimal_parentheses() {
        let expr = 0.1 * Expr::var("z") - 2.0 * Expr::var("z").pow(2.0);
        assert_eq!(expr.to_string(), "0.1 * z - 2 * z ^ 2");

        let expr = Expr::var("a") - (Expr::var("b") - Expr::var("c"));
        assert_eq!(expr.to_string(), "a - (b - c)");

        let expr = -(Expr::var("m") * Expr::var("x"));
        assert_eq!(expr.to_string(), "-(m * x)");

        let expr = Expr::var("x").pow(Expr::var("y").pow(2.0));
        assert_eq!(expr.to_string(), "x ^ y ^ 2");
    }
}
