//! The host-function bridge: how a native (non-IR) implementation gets
//! invoked for a method whose body is `MethodBody::Native` (spec.md §4.5).

use std::collections::HashMap;

use crate::error::{VmError, VmResult};
use crate::interp::Interpreter;
use crate::value::Value;

/// A native method implementation. Receives the bound `this` (absent for a
/// static method), the already-evaluated argument list in declaration
/// order, and the owning interpreter so a host function can itself invoke
/// virtual calls back into IR code (e.g. a collection's native `ForEach`
/// calling a user delegate).
pub type NativeFn = Box<dyn Fn(Option<Value>, &[Value], &mut Interpreter) -> VmResult<Value>>;

/// Native implementations, keyed by the same normalized signature string
/// used for overload resolution: `DeclaringType.Name(t1,t2,...)` (spec.md
/// §4.5).
#[derive(Default)]
pub struct HostRegistry {
    functions: HashMap<String, NativeFn>,
}

impl std::fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostRegistry")
            .field("registered", &self.functions.len())
            .finish()
    }
}

/// Build the normalized signature key a native method is registered and
/// looked up under.
pub fn signature_key(declaring_type: &str, name: &str, parameter_types: &[String]) -> String {
    format!("{declaring_type}.{name}({})", parameter_types.join(","))
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, signature: impl Into<String>, f: NativeFn) {
        self.functions.insert(signature.into(), f);
    }

    pub fn is_registered(&self, signature: &str) -> bool {
        self.functions.contains_key(signature)
    }

    pub fn invoke(
        &self,
        signature: &str,
        this: Option<Value>,
        args: &[Value],
        interp: &mut Interpreter,
    ) -> VmResult<Value> {
        let f = self
            .functions
            .get(signature)
            .ok_or_else(|| VmError::not_found(format!("native method '{signature}' not registered")))?;
        f(this, args, interp)
    }
}
