//! Flat (non-structured) opcode execution: the bulk of spec.md §4.2's
//! instruction list. Structured control flow (`if`/`while`/`try`) and
//! labeled branches delegate to `control.rs` / `branch.rs` respectively but
//! are dispatched from here, alongside everything else.

use std::collections::HashMap;

use crate::error::{VmError, VmResult};
use crate::instr::{CompareOp, ConstValue, Instr};
use crate::module::{ClassId, Field, Primitive, TypeReference};
use crate::object::{ArrayRef, ObjectRef};
use crate::overload::{CallKind, CallTarget};
use crate::value::Value;

use super::control::{Signal, Step};
use super::Interpreter;

/// The zero value a freshly allocated field of this type starts out as.
fn default_value_for(type_ref: &TypeReference) -> Value {
    match type_ref {
        TypeReference::Primitive(Primitive::Bool) => Value::Bool(false),
        TypeReference::Primitive(Primitive::Int8)
        | TypeReference::Primitive(Primitive::UInt8)
        | TypeReference::Primitive(Primitive::Int16)
        | TypeReference::Primitive(Primitive::UInt16)
        | TypeReference::Primitive(Primitive::Int32)
        | TypeReference::Primitive(Primitive::UInt32) => Value::Int32(0),
        TypeReference::Primitive(Primitive::Int64) | TypeReference::Primitive(Primitive::UInt64) => {
            Value::Int64(0)
        }
        TypeReference::Primitive(Primitive::Float32) => Value::Float32(0.0),
        TypeReference::Primitive(Primitive::Float64) => Value::Float64(0.0),
        _ => Value::Null,
    }
}

impl Interpreter {
    pub(super) fn exec_one(&mut self, instr: &Instr, label_map: &HashMap<String, usize>) -> VmResult<Step> {
        match instr {
            Instr::Nop | Instr::Label(_) => Ok(Step::Advance),

            Instr::Dup => {
                let top = self.current_frame_mut_or_err()?.peek()?.clone();
                self.current_frame_mut_or_err()?.push(top);
                Ok(Step::Advance)
            }
            Instr::Pop => {
                self.current_frame_mut_or_err()?.pop()?;
                Ok(Step::Advance)
            }

            Instr::LdStr(s) => self.push_and_advance(Value::string(s.clone())),
            Instr::Ldc(c) => {
                let v = match c {
                    ConstValue::Null => Value::Null,
                    ConstValue::Bool(b) => Value::Bool(*b),
                    ConstValue::Int32(n) => Value::Int32(*n),
                    ConstValue::Int64(n) => Value::Int64(*n),
                    ConstValue::Float32(n) => Value::Float32(*n),
                    ConstValue::Float64(n) => Value::Float64(*n),
                };
                self.push_and_advance(v)
            }

            Instr::LdLoc(name) => {
                let v = self.current_frame_or_err()?.get_local(name)?;
                self.push_and_advance(v)
            }
            Instr::StLoc(name) => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                self.current_frame_mut_or_err()?.set_local(name, v)?;
                Ok(Step::Advance)
            }
            Instr::LdArg(name) => {
                let v = self.current_frame_or_err()?.get_arg(name)?;
                self.push_and_advance(v)
            }
            Instr::StArg(name) => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                self.current_frame_mut_or_err()?.set_arg(name, v)?;
                Ok(Step::Advance)
            }

            Instr::LdFld(name) => {
                let this = self.field_receiver()?;
                let v = self.read_field(&this, name)?;
                self.push_and_advance(v)
            }
            Instr::StFld(name) => {
                let value = self.current_frame_mut_or_err()?.pop()?;
                let this = self.field_receiver()?;
                match &this {
                    Value::Object(obj) => obj.set_field(name, value),
                    Value::Null => return Err(VmError::not_found(format!("field access on null instance for '{name}'"))),
                    other => return Err(VmError::type_mismatch(format!("expected an object, found {}", other.type_name()))),
                }
                Ok(Step::Advance)
            }
            Instr::LdSFld { declaring_type, field } => {
                let v = self.statics.get(declaring_type, field)?;
                self.push_and_advance(v)
            }
            Instr::StSFld { declaring_type, field } => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                self.statics.set(declaring_type, field, v)?;
                Ok(Step::Advance)
            }

            Instr::Add => self.binary_arith(|a, b| a.checked_add(b), |a, b| a + b),
            Instr::Sub => self.binary_arith(|a, b| a.checked_sub(b), |a, b| a - b),
            Instr::Mul => self.binary_arith(|a, b| a.checked_mul(b), |a, b| a * b),
            Instr::Div => self.binary_div_rem(true),
            Instr::Rem => self.binary_div_rem(false),
            Instr::Neg => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                let negated = match v {
                    Value::Int32(n) => Value::Int32(-n),
                    Value::Int64(n) => Value::Int64(-n),
                    Value::Float32(n) => Value::Float32(-n),
                    Value::Float64(n) => Value::Float64(-n),
                    other => return Err(VmError::type_mismatch(format!("cannot negate {}", other.type_name()))),
                };
                self.push_and_advance(negated)
            }
            Instr::Not => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                self.push_and_advance(Value::Bool(!v.to_bool()))
            }

            Instr::Ceq | Instr::Cne | Instr::Clt | Instr::Cle | Instr::Cgt | Instr::Cge => {
                let b = self.current_frame_mut_or_err()?.pop()?;
                let a = self.current_frame_mut_or_err()?.pop()?;
                let op = match instr {
                    Instr::Ceq => CompareOp::Eq,
                    Instr::Cne => CompareOp::Ne,
                    Instr::Clt => CompareOp::Lt,
                    Instr::Cle => CompareOp::Le,
                    Instr::Cgt => CompareOp::Gt,
                    Instr::Cge => CompareOp::Ge,
                    _ => unreachable!(),
                };
                let result = self.compare(op, &a, &b)?;
                self.push_and_advance(Value::Bool(result))
            }

            Instr::NewObj(target) => self.exec_new_obj(target),
            Instr::NewArr(elem_type) => {
                let _len = self.current_frame_mut_or_err()?.pop()?;
                let arr = ArrayRef::new(elem_type.clone());
                self.push_and_advance(Value::Array(arr))
            }
            Instr::LdElem => {
                let index = self.current_frame_mut_or_err()?.pop()?.to_i64()?;
                let arr = self.current_frame_mut_or_err()?.pop()?;
                match arr {
                    Value::Array(a) => {
                        let v = if index < 0 { Value::Null } else { a.get(index as usize) };
                        self.push_and_advance(v)
                    }
                    other => Err(VmError::type_mismatch(format!("expected an array, found {}", other.type_name()))),
                }
            }
            Instr::StElem => {
                let value = self.current_frame_mut_or_err()?.pop()?;
                let index = self.current_frame_mut_or_err()?.pop()?.to_i64()?;
                let arr = self.current_frame_mut_or_err()?.pop()?;
                match arr {
                    Value::Array(a) if index >= 0 => {
                        a.set(index as usize, value);
                        Ok(Step::Advance)
                    }
                    Value::Array(_) => Err(VmError::type_mismatch("negative array index")),
                    other => Err(VmError::type_mismatch(format!("expected an array, found {}", other.type_name()))),
                }
            }
            Instr::CastClass(type_ref) => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                if v.is_null() || self.value_is_instance_of(&v, type_ref) {
                    self.push_and_advance(v)
                } else {
                    Err(VmError::type_mismatch(format!(
                        "cannot cast {} to {}",
                        v.type_name(),
                        type_ref.normalized_name()
                    )))
                }
            }
            Instr::IsInst(type_ref) => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                let result = !v.is_null() && self.value_is_instance_of(&v, type_ref);
                self.push_and_advance(if result { v } else { Value::Null })
            }

            Instr::Call(target) => self.exec_call(target, CallKind::Static),
            Instr::CallVirt(target) => self.exec_call(target, CallKind::Instance),
            Instr::Ret => {
                let frame = self.current_frame_mut_or_err()?;
                let v = frame.stack.pop().unwrap_or(Value::Null);
                Ok(Step::Emit(Signal::Return(v)))
            }

            Instr::If { condition, then_block, else_block } => self.exec_if(condition, then_block, else_block),
            Instr::While { condition, body } => self.exec_while(condition, body),
            Instr::Break => Ok(Step::Emit(Signal::Break)),
            Instr::Continue => Ok(Step::Emit(Signal::Continue)),
            Instr::Try { body, catch, finally } => self.exec_try(body, catch, finally),
            Instr::Throw => {
                let v = self.current_frame_mut_or_err()?.pop()?;
                Ok(Step::Emit(Signal::Throw(v)))
            }

            Instr::Br(label) => Ok(Step::Jump(self.resolve_label(label_map, label)?)),
            Instr::BrTrue(label) => self.conditional_jump(label_map, label, true),
            Instr::BrFalse(label) => self.conditional_jump(label_map, label, false),
            Instr::Beq(label) => self.comparison_jump(label_map, label, CompareOp::Eq),
            Instr::Bne(label) => self.comparison_jump(label_map, label, CompareOp::Ne),
            Instr::Bgt(label) => self.comparison_jump(label_map, label, CompareOp::Gt),
            Instr::Bge(label) => self.comparison_jump(label_map, label, CompareOp::Ge),
            Instr::Blt(label) => self.comparison_jump(label_map, label, CompareOp::Lt),
            Instr::Ble(label) => self.comparison_jump(label_map, label, CompareOp::Le),
        }
    }

    /// `ldfld`/`stfld` use whichever object the stack top names, falling
    /// back to `this` if the top isn't an object (spec.md §4.2).
    fn field_receiver(&mut self) -> VmResult<Value> {
        let top_is_object = matches!(self.current_frame_or_err()?.stack.last(), Some(Value::Object(_)));
        if top_is_object {
            self.current_frame_mut_or_err()?.pop()
        } else {
            self.current_frame_or_err()?.get_arg("this")
        }
    }

    fn push_and_advance(&mut self, value: Value) -> VmResult<Step> {
        self.current_frame_mut_or_err()?.push(value);
        Ok(Step::Advance)
    }

    fn conditional_jump(&mut self, label_map: &HashMap<String, usize>, label: &str, when: bool) -> VmResult<Step> {
        let v = self.current_frame_mut_or_err()?.pop()?;
        if v.to_bool() == when {
            Ok(Step::Jump(self.resolve_label(label_map, label)?))
        } else {
            Ok(Step::Advance)
        }
    }

    fn comparison_jump(&mut self, label_map: &HashMap<String, usize>, label: &str, op: CompareOp) -> VmResult<Step> {
        let b = self.current_frame_mut_or_err()?.pop()?;
        let a = self.current_frame_mut_or_err()?.pop()?;
        if self.compare(op, &a, &b)? {
            Ok(Step::Jump(self.resolve_label(label_map, label)?))
        } else {
            Ok(Step::Advance)
        }
    }

    /// `add`/`sub`/`mul`: widens to float if either operand is floating-point
    /// *or a string* (a string operand coerces through `to_f64`, i.e. it's
    /// parsed, never concatenated — concatenation lives in the host bridge
    /// as `System.String.Concat`), otherwise stays in the integer domain —
    /// `int32` if both operands were `int32`, `int64` otherwise.
    fn binary_arith(
        &mut self,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> VmResult<Step> {
        let b = self.current_frame_mut_or_err()?.pop()?;
        let a = self.current_frame_mut_or_err()?.pop()?;
        if Value::either_is_float(&a, &b) || matches!(a, Value::Str(_)) || matches!(b, Value::Str(_)) {
            let result = float_op(a.to_f64()?, b.to_f64()?);
            return self.push_and_advance(Value::Float64(result));
        }
        let both_i32 = matches!(a, Value::Int32(_)) && matches!(b, Value::Int32(_));
        let result = int_op(a.to_i64()?, b.to_i64()?)
            .ok_or_else(|| VmError::type_mismatch("integer overflow"))?;
        let v = if both_i32 { Value::Int32(result as i32) } else { Value::Int64(result) };
        self.push_and_advance(v)
    }

    fn binary_div_rem(&mut self, is_div: bool) -> VmResult<Step> {
        let b = self.current_frame_mut_or_err()?.pop()?;
        let a = self.current_frame_mut_or_err()?.pop()?;
        if Value::either_is_float(&a, &b) {
            let x = a.to_f64()?;
            let y = b.to_f64()?;
            let result = if is_div { x / y } else { x % y };
            return self.push_and_advance(Value::Float64(result));
        }
        let x = a.to_i64()?;
        let y = b.to_i64()?;
        if y == 0 {
            return Err(VmError::DivisionByZero);
        }
        let result = if is_div { x / y } else { x % y };
        let both_i32 = matches!(a, Value::Int32(_)) && matches!(b, Value::Int32(_));
        let v = if both_i32 { Value::Int32(result as i32) } else { Value::Int64(result) };
        self.push_and_advance(v)
    }

    fn exec_call(&mut self, target: &CallTarget, kind: CallKind) -> VmResult<Step> {
        let n = target.parameter_types.len();
        let mut args = Vec::with_capacity(n);
        {
            let frame = self.current_frame_mut_or_err()?;
            for _ in 0..n {
                args.push(frame.pop()?);
            }
        }
        args.reverse();
        let this = if kind == CallKind::Instance {
            Some(self.current_frame_mut_or_err()?.pop()?)
        } else {
            None
        };

        let result = self.call(target, kind, this, args)?;
        let is_void = crate::overload::normalize_type_name(&target.return_type) == "void";
        if !is_void {
            self.current_frame_mut_or_err()?.push(result);
        }
        Ok(Step::Advance)
    }

    fn exec_new_obj(&mut self, target: &CallTarget) -> VmResult<Step> {
        let class_id = self
            .registry
            .resolve(&target.declaring_type)
            .ok_or_else(|| VmError::not_found(format!("type '{}' not found", target.declaring_type)))?;

        let n = target.parameter_types.len();
        let mut args = Vec::with_capacity(n);
        {
            let frame = self.current_frame_mut_or_err()?;
            for _ in 0..n {
                args.push(frame.pop()?);
            }
        }
        args.reverse();

        let requested: Vec<String> = target
            .parameter_types
            .iter()
            .map(|t| crate::overload::normalize_type_name(t))
            .collect();
        let ctor_index = self.find_constructor(class_id, &requested)?;

        let fields = self.default_fields_for(class_id);
        let obj = ObjectRef::new(class_id, fields);

        if let Some(method_index) = ctor_index {
            self.invoke(
                crate::overload::MethodRef { class_id, method_index },
                Some(Value::Object(obj.clone())),
                args,
            )?;
        } else if !args.is_empty() {
            return Err(VmError::no_matching_overload(format!(
                "no constructor on '{}' matches ({})",
                target.declaring_type,
                requested.join(", ")
            )));
        }

        self.push_and_advance(Value::Object(obj))
    }

    /// Constructors aren't inherited, so resolution only looks at the
    /// declaring class's own methods, never its ancestry.
    fn find_constructor(&self, class_id: ClassId, requested: &[String]) -> VmResult<Option<usize>> {
        let class = self.registry.get(class_id);
        let ctors: Vec<usize> = class
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_constructor)
            .map(|(i, _)| i)
            .collect();
        if ctors.is_empty() {
            return Ok(None);
        }
        if requested.is_empty() {
            return match ctors.as_slice() {
                [only] => Ok(Some(*only)),
                _ => Err(VmError::ambiguous_overload(format!(
                    "'{}' has multiple constructors, provide parameterTypes",
                    class.qualified_name()
                ))),
            };
        }
        let matches: Vec<usize> = ctors
            .iter()
            .copied()
            .filter(|&i| class.methods[i].parameter_type_names() == requested)
            .collect();
        match matches.as_slice() {
            [only] => Ok(Some(*only)),
            [] => {
                let same_arity: Vec<usize> = ctors
                    .iter()
                    .copied()
                    .filter(|&i| class.methods[i].parameters.len() == requested.len())
                    .collect();
                match same_arity.as_slice() {
                    [only] => Ok(Some(*only)),
                    _ => Err(VmError::no_matching_overload(format!(
                        "no constructor on '{}' matches ({})",
                        class.qualified_name(),
                        requested.join(", ")
                    ))),
                }
            }
            _ => Err(VmError::ambiguous_overload(format!(
                "multiple constructors on '{}' match ({})",
                class.qualified_name(),
                requested.join(", ")
            ))),
        }
    }

    fn default_fields_for(&self, class_id: ClassId) -> std::collections::HashMap<String, Value> {
        let mut fields = std::collections::HashMap::new();
        let ancestry = self.registry.ancestry(class_id);
        for cid in ancestry.into_iter().rev() {
            for f in self.registry.get(cid).fields.iter().filter(|f: &&Field| !f.is_static) {
                fields.insert(f.name.clone(), default_value_for(&f.type_ref));
            }
        }
        fields
    }
}
