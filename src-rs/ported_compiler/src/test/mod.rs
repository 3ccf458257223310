//! Test utilities for the compiler.

mod context;
pub mod helper;

pub use context::TestContext;
