//! Host bridge for `objectir`: the `System.*` classes a module can call
//! into without shipping its own instruction-level implementation —
//! console output, math, strings, conversions, and the generic
//! collections (spec.md §4.5's native-method bridge, concretely staffed).

mod collections;
mod console;
mod convert;
mod math;
mod register;
mod string_fns;
mod support;

pub use register::register_all;
