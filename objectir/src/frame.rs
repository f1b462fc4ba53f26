//! Call frames and the call stack (spec.md §3, §4.3).

use std::collections::HashMap;

use crate::error::{VmError, VmResult};
use crate::module::{ClassId, Method};
use crate::value::Value;

/// A frame's lifecycle while the interpreter's main loop drives it.
/// `Running` executes one instruction at a time; `Returning` unwinds back to
/// the caller with a return value; `Unwinding` propagates a thrown value
/// looking for a `try`/`catch` boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameState {
    Running,
    Returning(Value),
    Unwinding(Value),
}

/// One activation of a method: its instruction pointer, evaluation stack,
/// arguments (`this` counted separately from positional args), and named
/// locals.
#[derive(Debug)]
pub struct CallFrame {
    pub class_id: ClassId,
    pub method_index: usize,
    pub ip: usize,
    pub stack: Vec<Value>,
    pub this: Option<Value>,
    pub args: HashMap<String, Value>,
    pub locals: HashMap<String, Value>,
    pub state: FrameState,
}

impl CallFrame {
    pub fn new(
        class_id: ClassId,
        method_index: usize,
        method: &Method,
        this: Option<Value>,
        positional_args: Vec<Value>,
    ) -> Self {
        let mut args = HashMap::with_capacity(method.parameters.len());
        for (param, value) in method.parameters.iter().zip(positional_args) {
            args.insert(param.name.clone(), value);
        }
        let locals = method
            .locals
            .iter()
            .map(|l| (l.name.clone(), Value::Null))
            .collect();
        CallFrame {
            class_id,
            method_index,
            ip: 0,
            stack: Vec::new(),
            this,
            args,
            locals,
            state: FrameState::Running,
        }
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> VmResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| VmError::stack_underflow("pop on empty evaluation stack"))
    }

    pub fn peek(&self) -> VmResult<&Value> {
        self.stack
            .last()
            .ok_or_else(|| VmError::stack_underflow("peek on empty evaluation stack"))
    }

    pub fn get_local(&self, name: &str) -> VmResult<Value> {
        self.locals
            .get(name)
            .cloned()
            .ok_or_else(|| VmError::not_found(format!("local '{name}' not declared")))
    }

    pub fn set_local(&mut self, name: &str, value: Value) -> VmResult<()> {
        if !self.locals.contains_key(name) {
            return Err(VmError::not_found(format!("local '{name}' not declared")));
        }
        self.locals.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get_arg(&self, name: &str) -> VmResult<Value> {
        if name == "this" {
            return self
                .this
                .clone()
                .ok_or_else(|| VmError::not_found("'this' is unset in a static method"));
        }
        self.args
            .get(name)
            .cloned()
            .ok_or_else(|| VmError::not_found(format!("argument '{name}' not declared")))
    }

    pub fn set_arg(&mut self, name: &str, value: Value) -> VmResult<()> {
        if name == "this" {
            self.this = Some(value);
            return Ok(());
        }
        if !self.args.contains_key(name) {
            return Err(VmError::not_found(format!("argument '{name}' not declared")));
        }
        self.args.insert(name.to_string(), value);
        Ok(())
    }
}

/// The interpreter's LIFO call stack, one frame per active method
/// activation.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: CallFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    pub fn current(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut CallFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Method, MethodBody, Parameter, Primitive, TypeReference};

    fn sample_method() -> Method {
        Method {
            name: "Test".to_string(),
            return_type: TypeReference::void(),
            parameters: vec![Parameter {
                name: "x".to_string(),
                type_ref: TypeReference::Primitive(Primitive::Int32),
            }],
            locals: vec![],
            body: MethodBody::Instructions {
                instructions: vec![],
                label_map: Default::default(),
            },
            is_static: true,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            is_constructor: false,
        }
    }

    #[test]
    fn frame_binds_positional_args_by_name() {
        let method = sample_method();
        let frame = CallFrame::new(ClassId(0), 0, &method, None, vec![Value::Int32(7)]);
        assert_eq!(frame.get_arg("x").unwrap(), Value::Int32(7));
    }

    #[test]
    fn pop_on_empty_stack_underflows() {
        let method = sample_method();
        let mut frame = CallFrame::new(ClassId(0), 0, &method, None, vec![Value::Int32(7)]);
        assert!(matches!(frame.pop(), Err(VmError::StackUnderflow(_))));
    }

    #[test]
    fn this_is_special_cased_separately_from_args() {
        let method = sample_method();
        let mut frame = CallFrame::new(
            ClassId(0),
            0,
            &method,
            Some(Value::Int32(1)),
            vec![Value::Int32(7)],
        );
        assert_eq!(frame.get_arg("this").unwrap(), Value::Int32(1));
        frame.set_arg("this", Value::Int32(2)).unwrap();
        assert_eq!(frame.get_arg("this").unwrap(), Value::Int32(2));
    }

    #[test]
    fn call_stack_is_lifo() {
        let method = sample_method();
        let mut stack = CallStack::new();
        stack.push(CallFrame::new(ClassId(0), 0, &method, None, vec![Value::Int32(1)]));
        stack.push(CallFrame::new(ClassId(0), 0, &method, None, vec![Value::Int32(2)]));
        assert_eq!(stack.depth(), 2);
        let top = stack.pop().unwrap();
        assert_eq!(top.get_arg("x").unwrap(), Value::Int32(2));
        assert_eq!(stack.depth(), 1);
    }
}
