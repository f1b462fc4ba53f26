//! The runtime value model: what can sit on the evaluation stack, in a
//! local, or in a field (spec.md §4.1).

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::{VmError, VmResult};
use crate::object::{ArrayRef, ObjectRef};

/// A stack/local/field value. Numeric coercions between the four numeric
/// kinds happen explicitly at use-site (arithmetic, comparisons, `convert`
/// host calls) rather than being baked into this type — `Value` itself never
/// silently reinterprets bits.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Str(Rc<str>),
    Object(ObjectRef),
    Array(ArrayRef),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int32(_) | Value::Int64(_) | Value::Float32(_) | Value::Float64(_)
        )
    }

    /// The type name used in `TypeMismatch` messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }

    /// Truthiness coercion used by `brtrue`/`brfalse` and `if`/`while`
    /// conditions (spec.md §4.1): booleans by their value, numbers by
    /// non-zero, strings by non-empty, `null` is false, objects/arrays are
    /// always true.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int32(n) => *n != 0,
            Value::Int64(n) => *n != 0,
            Value::Float32(n) => *n != 0.0,
            Value::Float64(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Object(_) | Value::Array(_) => true,
        }
    }

    /// Widen to `i64` for integer arithmetic and comparisons. Booleans
    /// coerce as `0`/`1`; floats truncate; `null` coerces to `0`; strings
    /// parse as signed decimal integers; anything else, or a string that
    /// fails to parse, is a `TypeMismatch`.
    pub fn to_i64(&self) -> VmResult<i64> {
        match self {
            Value::Null => Ok(0),
            Value::Int32(n) => Ok(*n as i64),
            Value::Int64(n) => Ok(*n),
            Value::Bool(b) => Ok(*b as i64),
            Value::Float32(n) => Ok(*n as i64),
            Value::Float64(n) => Ok(*n as i64),
            Value::Str(s) => s.trim().parse().map_err(|_| {
                VmError::type_mismatch(format!("cannot parse '{s}' as an integer"))
            }),
            other => Err(VmError::type_mismatch(format!(
                "expected a number, found {}",
                other.type_name()
            ))),
        }
    }

    /// Widen to `f64` for floating-point arithmetic and comparisons. `null`
    /// coerces to `0.0`; strings parse as decimal floats; a string that
    /// fails to parse is a `TypeMismatch`.
    pub fn to_f64(&self) -> VmResult<f64> {
        match self {
            Value::Null => Ok(0.0),
            Value::Int32(n) => Ok(*n as f64),
            Value::Int64(n) => Ok(*n as f64),
            Value::Float32(n) => Ok(*n as f64),
            Value::Float64(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => s.trim().parse().map_err(|_| {
                VmError::type_mismatch(format!("cannot parse '{s}' as a float"))
            }),
            other => Err(VmError::type_mismatch(format!(
                "expected a number, found {}",
                other.type_name()
            ))),
        }
    }

    /// Render for string concatenation / `ToString`-style host calls.
    /// `null` renders as the empty string, matching the host `console`
    /// bridge's behavior for an unset field.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int32(n) => n.to_string(),
            Value::Int64(n) => n.to_string(),
            Value::Float32(n) => n.to_string(),
            Value::Float64(n) => n.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Object(_) => "object".to_string(),
            Value::Array(a) => format!("array[{}]", a.len()),
        }
    }

    /// Returns whether both operands carry a floating-point representation,
    /// which decides whether `add`/`sub`/... promote to float arithmetic or
    /// stay in the integer domain (spec.md §4.1).
    pub fn either_is_float(a: &Value, b: &Value) -> bool {
        matches!(a, Value::Float32(_) | Value::Float64(_))
            || matches!(b, Value::Float32(_) | Value::Float64(_))
    }
}

/// Structural equality by bit pattern for floats (so `Value` can satisfy
/// `Eq`/`Hash` for use as a hashed-set/keyed-mapping key, spec.md §4.1),
/// reference identity for objects/arrays, content equality otherwise. This
/// is stricter than `ceq`'s numeric-cross-widening equality (see
/// `interp::control::values_equal`), which stays the VM-level comparison
/// opcode uses.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int32(n) => n.hash(state),
            Value::Int64(n) => n.hash(state),
            Value::Float32(n) => n.to_bits().hash(state),
            Value::Float64(n) => n.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Object(o) => o.hash(state),
            Value::Array(a) => a.hash(state),
        }
    }
}
