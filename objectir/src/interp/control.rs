//! Structured control flow: block execution, `if`/`while`/`try`, and the
//! `break`/`continue`/`return`/`throw` signals that thread through them
//! (spec.md §9's frame and loop state machines).

use std::collections::HashMap;

use crate::error::VmResult;
use crate::instr::{Block, CompareOp, Condition, Instr, ValueExpr};
use crate::value::Value;

use super::Interpreter;

/// What a block's execution produced, once it stops short of running off
/// the end normally.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Normal,
    Return(Value),
    Break,
    Continue,
    Throw(Value),
}

/// What one instruction did to the instruction pointer of the block it
/// executed in.
pub(super) enum Step {
    Advance,
    Jump(usize),
    Emit(Signal),
}

impl Interpreter {
    /// Run a flat sequence of instructions as one scope. Builds a label map
    /// scoped to this block — `br`/`brtrue`/... inside a block can only
    /// target labels declared in that same block.
    pub(super) fn exec_block(&mut self, block: &[Instr]) -> VmResult<Signal> {
        let label_map = crate::instr::build_label_map(block);
        let mut ip = 0usize;
        loop {
            if ip >= block.len() {
                return Ok(Signal::Normal);
            }
            match self.exec_one(&block[ip], &label_map)? {
                Step::Advance => ip += 1,
                Step::Jump(target) => ip = target,
                Step::Emit(signal) => return Ok(signal),
            }
        }
    }

    pub(super) fn exec_if(
        &mut self,
        condition: &Condition,
        then_block: &Block,
        else_block: &Option<Block>,
    ) -> VmResult<Step> {
        let taken = self.eval_condition(condition)?;
        let signal = if taken {
            self.exec_block(then_block)?
        } else if let Some(else_block) = else_block {
            self.exec_block(else_block)?
        } else {
            Signal::Normal
        };
        Ok(match signal {
            Signal::Normal => Step::Advance,
            other => Step::Emit(other),
        })
    }

    pub(super) fn exec_while(&mut self, condition: &Condition, body: &Block) -> VmResult<Step> {
        loop {
            if !self.eval_condition(condition)? {
                return Ok(Step::Advance);
            }
            match self.exec_block(body)? {
                Signal::Normal | Signal::Continue => continue,
                Signal::Break => return Ok(Step::Advance),
                other @ (Signal::Return(_) | Signal::Throw(_)) => return Ok(Step::Emit(other)),
            }
        }
    }

    /// A raised `VmError` — not just the explicit `throw` opcode's
    /// `Signal::Throw` — walks the catch list (spec.md §4.3/§9's
    /// unwinding rule): `exec_block` failing with `Err` inside `body`,
    /// `catch`, or `finally` is converted into the same catchable signal an
    /// explicit `throw` would have produced.
    pub(super) fn exec_try(
        &mut self,
        body: &Block,
        catch: &Option<crate::instr::CatchClause>,
        finally: &Option<Block>,
    ) -> VmResult<Step> {
        let mut signal = self.run_catchable(body);

        if let Signal::Throw(value) = &signal {
            if let Some(catch) = catch {
                let matches = match &catch.exception_type {
                    None => true,
                    Some(expected) => self.value_is_instance_of(value, expected),
                };
                if matches {
                    if let Some(var) = &catch.variable {
                        if let Some(frame) = self.current_frame_mut() {
                            let _ = frame.set_local(var, value.clone());
                        }
                    }
                    signal = self.run_catchable(&catch.body);
                }
            }
        }

        if let Some(finally_block) = finally {
            match self.run_catchable(finally_block) {
                Signal::Normal => {}
                overriding => signal = overriding,
            }
        }

        Ok(match signal {
            Signal::Normal => Step::Advance,
            other => Step::Emit(other),
        })
    }

    /// Run a block, turning a propagated `VmError` into `Signal::Throw`
    /// instead of letting it escape `exec_try` directly.
    fn run_catchable(&mut self, block: &Block) -> Signal {
        match self.exec_block(block) {
            Ok(signal) => signal,
            Err(err) => Signal::Throw(Value::string(err.to_string())),
        }
    }

    pub(super) fn eval_condition(&mut self, condition: &Condition) -> VmResult<bool> {
        match condition {
            Condition::Empty => Ok(true),
            Condition::Expression(expr) => Ok(self.eval_value_expr(expr)?.to_bool()),
            Condition::Binary { op, left, right } => {
                let l = self.eval_value_expr(left)?;
                let r = self.eval_value_expr(right)?;
                self.compare(*op, &l, &r)
            }
            Condition::Block(block) => match self.exec_block(block)? {
                Signal::Normal => {
                    let frame = self.current_frame_mut_or_err()?;
                    Ok(frame.pop().map(|v| v.to_bool()).unwrap_or(false))
                }
                _ => Ok(false),
            },
        }
    }

    pub(super) fn compare(&self, op: CompareOp, l: &Value, r: &Value) -> VmResult<bool> {
        use CompareOp::*;
        if matches!(op, Eq | Ne) {
            let eq = values_equal(l, r);
            return Ok(if matches!(op, Eq) { eq } else { !eq });
        }
        if Value::either_is_float(l, r) || matches!(l, Value::Str(_)) {
            if let (Value::Str(a), Value::Str(b)) = (l, r) {
                return Ok(match op {
                    Lt => a < b,
                    Le => a <= b,
                    Gt => a > b,
                    Ge => a >= b,
                    Eq | Ne => unreachable!(),
                });
            }
            let a = l.to_f64()?;
            let b = r.to_f64()?;
            return Ok(match op {
                Lt => a < b,
                Le => a <= b,
                Gt => a > b,
                Ge => a >= b,
                Eq | Ne => unreachable!(),
            });
        }
        let a = l.to_i64()?;
        let b = r.to_i64()?;
        Ok(match op {
            Lt => a < b,
            Le => a <= b,
            Gt => a > b,
            Ge => a >= b,
            Eq | Ne => unreachable!(),
        })
    }

    pub(super) fn eval_value_expr(&mut self, expr: &ValueExpr) -> VmResult<Value> {
        match expr {
            ValueExpr::Local(name) => self.current_frame_or_err()?.get_local(name),
            ValueExpr::Arg(name) => self.current_frame_or_err()?.get_arg(name),
            ValueExpr::Field(name) => {
                let this = self.current_frame_or_err()?.get_arg("this")?;
                self.read_field(&this, name)
            }
            ValueExpr::StaticField { declaring_type, name } => {
                self.statics.get(declaring_type, name)
            }
            ValueExpr::ConstInt(n) => Ok(Value::Int64(*n)),
            ValueExpr::ConstFloat(n) => Ok(Value::Float64(*n)),
            ValueExpr::ConstBool(b) => Ok(Value::Bool(*b)),
            ValueExpr::ConstStr(s) => Ok(Value::string(s.clone())),
            ValueExpr::ConstNull => Ok(Value::Null),
        }
    }

    pub(super) fn value_is_instance_of(&self, value: &Value, expected: &crate::module::TypeReference) -> bool {
        match (value, expected) {
            (Value::Object(obj), crate::module::TypeReference::Class(name)) => {
                match self.registry.resolve(name) {
                    Some(expected_id) => self.registry.ancestry(obj.class_id()).contains(&expected_id),
                    None => false,
                }
            }
            _ => true,
        }
    }
}

/// `ceq` value equality (spec.md §4.1): primitives by value, strings by
/// content, objects/arrays by reference identity, `null` equals only
/// `null`.
pub(super) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        _ if a.is_numeric() && b.is_numeric() => {
            if Value::either_is_float(a, b) {
                a.to_f64().ok() == b.to_f64().ok()
            } else {
                a.to_i64().ok() == b.to_i64().ok()
            }
        }
        _ => a == b,
    }
}

#[allow(dead_code)]
pub(super) type LabelMap = HashMap<String, usize>;
