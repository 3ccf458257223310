#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Driver that compiles ported objects into simulation-ready systems

mod context;
mod error;
mod parameter;
mod readable;
mod system;

pub use context::{DEFAULT_TIME_SYMBOL, SystemContext};
pub use error::SystemError;
pub use parameter::{Parameter, ParameterKind};
pub use readable::{ReadableStyle, ReadableSymbols};
pub use system::CompiledSystem;
