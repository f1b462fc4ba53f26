//! Core module model, value model, and instruction interpreter for a small
//! object-oriented stack-machine IR.
//!
//! A [`module::Module`] is produced elsewhere (this crate has no textual
//! parser or binary reader) and handed to [`interp::Interpreter`] as
//! already-built, serializable data. From there the interpreter owns
//! everything needed to run it: class lookup, the evaluation stack, static
//! storage, overload resolution, and the bridge to native host functions.

pub mod error;
pub mod frame;
pub mod host;
pub mod instr;
pub mod interp;
pub mod module;
pub mod object;
pub mod overload;
pub mod statics;
pub mod value;

pub use error::{VmError, VmResult};
pub use interp::{Interpreter, InterpreterConfig};
pub use module::{ClassId, ClassRegistry, Module};
pub use value::Value;
