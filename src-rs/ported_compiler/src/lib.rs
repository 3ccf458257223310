#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Compiler for hierarchies of ported objects

use ported_expr::Expression;
use ported_ir::{CompiledObject, PortedObject};

mod compile_composite;
mod compile_leaf;
mod context;
mod error;
mod qualify;
mod symbol_table;
mod util;
mod wiring;

#[cfg(test)]
mod test;

pub use context::CompileContext;
pub use error::CompileError;

use crate::util::Scope;

/// Compiles a ported object into a flat compiled object.
///
/// The object is not modified. Compiling an already compiled object returns
/// a copy of it.
///
/// # Errors
///
/// Returns an error if an input or output port cannot be resolved, the
/// directed wires of a composite form a cycle, or two symbols collide after
/// qualification.
pub fn compile<E: Expression>(
    object: &PortedObject<E>,
    context: &impl CompileContext,
) -> Result<CompiledObject<E>, CompileError> {
    let scope = Scope::root(object.name());
    compile_object(object, &scope, context)
}

fn compile_object<E: Expression>(
    object: &PortedObject<E>,
    scope: &Scope,
    context: &impl CompileContext,
) -> Result<CompiledObject<E>, CompileError> {
    match object {
        PortedObject::Variable(object) => compile_leaf::compile_variable(object, scope, context),
        PortedObject::Functional(object) => {
            compile_leaf::compile_functional(object, scope, context)
        }
        PortedObject::Composite(object) => {
            compile_composite::compile_composite(object, scope, context)
        }
        PortedObject::Compiled(object) => Ok(object.clone()),
    }
}
