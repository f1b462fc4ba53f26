//! The interpreter: owns the class registry, static storage, the overload
//! cache, and the native-function bridge, and drives the main dispatch loop
//! (spec.md §4.3).

mod branch;
mod control;
mod dispatch;

pub use control::Signal;

use crate::error::{VmError, VmResult};
use crate::frame::CallStack;
use crate::host::HostRegistry;
use crate::instr::Instr;
use crate::module::ClassRegistry;
use crate::overload::{CallKind, MethodRef, OverloadCache};
use crate::statics::StaticFieldStore;
use crate::value::Value;

/// Tunables that don't belong to any one module. Mirrors the teacher's
/// plain config struct rather than reaching for a configuration crate —
/// there's exactly one knob-holder and no layered sources to merge.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Call-stack depth at which a `call`/`callvirt`/`newobj` raises
    /// `RecursionLimit` instead of pushing another frame.
    pub recursion_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            recursion_limit: 4096,
        }
    }
}

#[derive(Debug)]
pub struct Interpreter {
    pub registry: ClassRegistry,
    pub statics: StaticFieldStore,
    pub overload_cache: OverloadCache,
    pub host: HostRegistry,
    pub config: InterpreterConfig,
    call_stack: CallStack,
    /// Completed console output lines; a test harness reads this instead of
    /// capturing stdout.
    pub output: Vec<String>,
    /// Text written by `Console.Write` that hasn't been terminated by a
    /// `Console.WriteLine` yet.
    pub pending_output: String,
}

impl Interpreter {
    pub fn new(registry: ClassRegistry, host: HostRegistry, config: InterpreterConfig) -> Self {
        let mut statics = StaticFieldStore::new();
        for i in 0..registry.len() {
            let class_id = crate::module::ClassId(i);
            let class = registry.get(class_id);
            let qualified = class.qualified_name();
            for field in class.fields.iter().filter(|f| f.is_static) {
                statics.declare(&qualified, &field.name);
            }
        }
        Interpreter {
            registry,
            statics,
            overload_cache: OverloadCache::new(),
            host,
            config,
            call_stack: CallStack::new(),
            output: Vec::new(),
            pending_output: String::new(),
        }
    }

    /// Append to the pending line without terminating it (`Console.Write`).
    pub fn write_pending(&mut self, text: &str) {
        self.pending_output.push_str(text);
    }

    /// Terminate the pending line, appending `text` first, and push it onto
    /// `output` (`Console.WriteLine`).
    pub fn write_line(&mut self, text: &str) {
        self.pending_output.push_str(text);
        self.output.push(std::mem::take(&mut self.pending_output));
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Resolve and run `target` (spec.md §4.4 for the lookup, §4.3 for the
    /// call itself).
    pub fn call(&mut self, target: &crate::overload::CallTarget, kind: CallKind, this: Option<Value>, args: Vec<Value>) -> VmResult<Value> {
        if kind == CallKind::Instance {
            match &this {
                Some(Value::Null) | None => {
                    return Err(VmError::not_found(format!(
                        "callvirt on a null instance calling '{}'",
                        target.name
                    )))
                }
                _ => {}
            }
        }

        let declaring_type = match (&kind, &this) {
            (CallKind::Instance, Some(Value::Object(obj))) => {
                self.registry.get(obj.class_id()).qualified_name()
            }
            _ => target.declaring_type.clone(),
        };
        let retargeted = crate::overload::CallTarget {
            declaring_type,
            ..target.clone()
        };

        let method_ref = self.overload_cache.resolve(&self.registry, &retargeted, kind)?;
        self.invoke(method_ref, this, args)
    }

    /// Invoke an already-resolved method. Used directly by `newobj`
    /// (constructor dispatch bypasses overload resolution on a runtime
    /// instance since there's no `this` yet) as well as by `call`/`callvirt`.
    pub fn invoke(&mut self, method_ref: MethodRef, this: Option<Value>, args: Vec<Value>) -> VmResult<Value> {
        if self.call_stack.depth() >= self.config.recursion_limit {
            return Err(VmError::RecursionLimit(self.config.recursion_limit));
        }

        let is_native = {
            let class = self.registry.get(method_ref.class_id);
            class.methods[method_ref.method_index].is_native()
        };

        if is_native {
            return self.invoke_native(method_ref, this, &args);
        }

        let frame = {
            let class = self.registry.get(method_ref.class_id);
            let method = &class.methods[method_ref.method_index];
            crate::frame::CallFrame::new(method_ref.class_id, method_ref.method_index, method, this, args)
        };
        let instructions: Vec<Instr> = {
            let class = self.registry.get(method_ref.class_id);
            class.methods[method_ref.method_index].instructions().to_vec()
        };

        self.call_stack.push(frame);
        let outcome = self.exec_block(&instructions);
        self.call_stack.pop();

        match outcome? {
            Signal::Return(v) => Ok(v),
            Signal::Normal => Ok(Value::Null),
            Signal::Break => Err(VmError::malformed_operand("break outside of a loop")),
            Signal::Continue => Err(VmError::malformed_operand("continue outside of a loop")),
            Signal::Throw(v) => Err(VmError::host(format!(
                "unhandled exception: {}",
                v.to_display_string()
            ))),
        }
    }

    fn invoke_native(&mut self, method_ref: MethodRef, this: Option<Value>, args: &[Value]) -> VmResult<Value> {
        let signature = {
            let class = self.registry.get(method_ref.class_id);
            let method = &class.methods[method_ref.method_index];
            crate::host::signature_key(&class.qualified_name(), &method.name, &method.parameter_type_names())
        };
        let host = std::mem::take(&mut self.host);
        let result = host.invoke(&signature, this, args, self);
        self.host = host;
        result
    }

    /// Locate and run the module's entry point: a static method named
    /// `Main` taking either no arguments or a single `string[]`.
    pub fn run_main(&mut self, declaring_type: &str, args: Vec<Value>) -> VmResult<Value> {
        let class_id = self
            .registry
            .resolve(declaring_type)
            .ok_or_else(|| VmError::not_found(format!("entry-point type '{declaring_type}' not found")))?;
        let method_index = self
            .registry
            .get(class_id)
            .methods
            .iter()
            .position(|m| m.name == "Main" && m.is_static)
            .ok_or_else(|| VmError::not_found(format!("no static 'Main' on '{declaring_type}'")))?;
        self.invoke(MethodRef { class_id, method_index }, None, args)
    }

    pub(crate) fn current_frame_mut(&mut self) -> Option<&mut crate::frame::CallFrame> {
        self.call_stack.current_mut()
    }

    pub(crate) fn current_frame_or_err(&self) -> VmResult<&crate::frame::CallFrame> {
        self.call_stack
            .current()
            .ok_or_else(|| VmError::stack_underflow("no active call frame"))
    }

    pub(crate) fn current_frame_mut_or_err(&mut self) -> VmResult<&mut crate::frame::CallFrame> {
        self.call_stack
            .current_mut()
            .ok_or_else(|| VmError::stack_underflow("no active call frame"))
    }

    /// Read a named field off an object value, used both by `ldfld` and by
    /// the `Condition::Expression(ValueExpr::Field(..))` shorthand.
    pub(crate) fn read_field(&self, this: &Value, name: &str) -> VmResult<Value> {
        match this {
            Value::Object(obj) => obj
                .get_field(name)
                .ok_or_else(|| VmError::not_found(format!("field '{name}'"))),
            Value::Null => Err(VmError::not_found(format!(
                "field access on null instance for '{name}'"
            ))),
            other => Err(VmError::type_mismatch(format!(
                "expected an object, found {}",
                other.type_name()
            ))),
        }
    }
}
