//! `System.String` instance methods. `this` here is a bare `Value::Str`,
//! not a heap object — strings never go through `newobj`, so these natives
//! bind directly to whatever string value `callvirt` passed as `this`.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;
use objectir::{VmError, VmResult};

use crate::support::{native_class, native_method};

fn this_str(this: Option<Value>) -> VmResult<std::rc::Rc<str>> {
    match this {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(VmError::type_mismatch(format!(
            "expected a string instance, found {}",
            other.type_name()
        ))),
        None => Err(VmError::not_found("string method called without an instance")),
    }
}

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let string_ty = || TypeReference::Primitive(Primitive::String);
    let int_ty = || TypeReference::Primitive(Primitive::Int32);
    let bool_ty = || TypeReference::Primitive(Primitive::Bool);

    let class = native_class(
        "String",
        "System",
        vec![
            native_method("Length", &[], int_ty(), false),
            native_method("ToUpper", &[], string_ty(), false),
            native_method("ToLower", &[], string_ty(), false),
            native_method("Contains", &[("value", string_ty())], bool_ty(), false),
            native_method("Concat", &[("value", string_ty())], string_ty(), false),
            native_method("Substring", &[("start", int_ty())], string_ty(), false),
            native_method("Trim", &[], string_ty(), false),
            native_method("IsNullOrEmpty", &[("value", string_ty())], bool_ty(), true),
        ],
    );
    registry.register_class(class);

    host.register(
        "System.String.Length()",
        Box::new(|this, _args, _interp| Ok(Value::Int32(this_str(this)?.chars().count() as i32))),
    );
    host.register(
        "System.String.ToUpper()",
        Box::new(|this, _args, _interp| Ok(Value::string(this_str(this)?.to_uppercase()))),
    );
    host.register(
        "System.String.ToLower()",
        Box::new(|this, _args, _interp| Ok(Value::string(this_str(this)?.to_lowercase()))),
    );
    host.register(
        "System.String.Contains(string)",
        Box::new(|this, args, _interp| {
            let haystack = this_str(this)?;
            let needle = args.first().map(Value::to_display_string).unwrap_or_default();
            Ok(Value::Bool(haystack.contains(&needle)))
        }),
    );
    host.register(
        "System.String.Concat(string)",
        Box::new(|this, args, _interp| {
            let base = this_str(this)?;
            let suffix = args.first().map(Value::to_display_string).unwrap_or_default();
            Ok(Value::string(format!("{base}{suffix}")))
        }),
    );
    host.register(
        "System.String.Substring(int32)",
        Box::new(|this, args, _interp| {
            let s = this_str(this)?;
            let start = args.first().map(Value::to_i64).transpose()?.unwrap_or(0).max(0) as usize;
            Ok(Value::string(s.chars().skip(start).collect::<String>()))
        }),
    );
    host.register(
        "System.String.Trim()",
        Box::new(|this, _args, _interp| Ok(Value::string(this_str(this)?.trim().to_string()))),
    );
    host.register(
        "System.String.IsNullOrEmpty(string)",
        Box::new(|_this, args, _interp| {
            let empty = match args.first() {
                None | Some(Value::Null) => true,
                Some(Value::Str(s)) => s.is_empty(),
                Some(other) => return Err(VmError::type_mismatch(format!(
                    "expected a string, found {}",
                    other.type_name()
                ))),
            };
            Ok(Value::Bool(empty))
        }),
    );
}
