//! `System.Convert`: explicit conversions between the primitive value
//! kinds, for the coercions §4.1 leaves to host code rather than baking
//! into arithmetic.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;
use objectir::VmError;

use crate::support::{native_class, native_method};

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let object_ty = || TypeReference::Primitive(Primitive::Object);
    let class = native_class(
        "Convert",
        "System",
        vec![
            native_method("ToInt32", &[("value", object_ty())], TypeReference::Primitive(Primitive::Int32), true),
            native_method("ToInt64", &[("value", object_ty())], TypeReference::Primitive(Primitive::Int64), true),
            native_method("ToDouble", &[("value", object_ty())], TypeReference::Primitive(Primitive::Float64), true),
            native_method("ToBoolean", &[("value", object_ty())], TypeReference::Primitive(Primitive::Bool), true),
            native_method("ToString", &[("value", object_ty())], TypeReference::Primitive(Primitive::String), true),
        ],
    );
    registry.register_class(class);

    host.register(
        "System.Convert.ToInt32(object)",
        Box::new(|_this, args, _interp| {
            let v = args.first().ok_or_else(|| VmError::malformed_operand("missing argument"))?;
            Ok(Value::Int32(v.to_i64()? as i32))
        }),
    );
    host.register(
        "System.Convert.ToInt64(object)",
        Box::new(|_this, args, _interp| {
            let v = args.first().ok_or_else(|| VmError::malformed_operand("missing argument"))?;
            Ok(Value::Int64(v.to_i64()?))
        }),
    );
    host.register(
        "System.Convert.ToDouble(object)",
        Box::new(|_this, args, _interp| {
            let v = args.first().ok_or_else(|| VmError::malformed_operand("missing argument"))?;
            Ok(Value::Float64(v.to_f64()?))
        }),
    );
    host.register(
        "System.Convert.ToBoolean(object)",
        Box::new(|_this, args, _interp| {
            let v = args.first().ok_or_else(|| VmError::malformed_operand("missing argument"))?;
            Ok(Value::Bool(v.to_bool()))
        }),
    );
    host.register(
        "System.Convert.ToString(object)",
        Box::new(|_this, args, _interp| {
            let v = args.first().ok_or_else(|| VmError::malformed_operand("missing argument"))?;
            Ok(Value::string(v.to_display_string()))
        }),
    );
}
