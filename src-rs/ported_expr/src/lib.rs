#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Symbolic expressions for the ported-object model compiler

pub mod error;
pub mod eval;
pub mod expr;
pub mod expression;
pub mod function;
pub mod symbol;

pub use error::EvalError;
pub use eval::{EvalContext, Evaluate};
pub use expr::{BinaryOp, Expr, UnaryOp};
pub use expression::Expression;
pub use function::{Arity, Callable, Function, FunctionMap, std_functions};
pub use symbol::Symbol;
