//! `System.Collections.Generic.Map`: key/value association backed by two
//! parallel arrays, `_keys` and `_values`, with key lookups going through a
//! real `HashMap<Value, usize>` view built from a snapshot of `_keys` rather
//! than a linear scan.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;
use objectir::VmError;

use crate::support::{native_class, native_constructor, native_method};

const KEYS: &str = "_keys";
const VALUES: &str = "_values";

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let object_ty = || TypeReference::Primitive(Primitive::Object);
    let int_ty = || TypeReference::Primitive(Primitive::Int32);
    let bool_ty = || TypeReference::Primitive(Primitive::Bool);

    let mut class = native_class(
        "Map",
        "System.Collections.Generic",
        vec![
            native_method("Set", &[("key", object_ty()), ("value", object_ty())], TypeReference::void(), false),
            native_method("Get", &[("key", object_ty())], object_ty(), false),
            native_method("ContainsKey", &[("key", object_ty())], bool_ty(), false),
            native_method("Remove", &[("key", object_ty())], bool_ty(), false),
            native_method("Count", &[], int_ty(), false),
            native_method("Clear", &[], TypeReference::void(), false),
        ],
    );
    class.methods.push(native_constructor(&[]));
    registry.register_class(class);

    host.register(
        "System.Collections.Generic.Map.ctor()",
        Box::new(|this, _args, _interp| {
            super::init_backing_array(&this, KEYS)?;
            super::init_backing_array(&this, VALUES)?;
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.Map.Set(object,object)",
        Box::new(|this, args, _interp| {
            let keys = super::backing_array(&this, KEYS)?;
            let values = super::backing_array(&this, VALUES)?;
            let key = args.first().cloned().unwrap_or(Value::Null);
            let value = args.get(1).cloned().unwrap_or(Value::Null);
            match super::snapshot_index(&keys).get(&key) {
                Some(&index) => values.set(index, value),
                None => {
                    keys.push(key);
                    values.push(value);
                }
            }
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.Map.Get(object)",
        Box::new(|this, args, _interp| {
            let keys = super::backing_array(&this, KEYS)?;
            let values = super::backing_array(&this, VALUES)?;
            let key = args.first().cloned().unwrap_or(Value::Null);
            match super::snapshot_index(&keys).get(&key) {
                Some(&index) => Ok(values.get(index)),
                None => Err(VmError::not_found("key not present in map")),
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Map.ContainsKey(object)",
        Box::new(|this, args, _interp| {
            let keys = super::backing_array(&this, KEYS)?;
            let key = args.first().cloned().unwrap_or(Value::Null);
            Ok(Value::Bool(super::snapshot_index(&keys).contains_key(&key)))
        }),
    );
    host.register(
        "System.Collections.Generic.Map.Remove(object)",
        Box::new(|this, args, _interp| {
            let keys = super::backing_array(&this, KEYS)?;
            let values = super::backing_array(&this, VALUES)?;
            let key = args.first().cloned().unwrap_or(Value::Null);
            match super::snapshot_index(&keys).get(&key) {
                Some(&index) => {
                    keys.remove(index);
                    values.remove(index);
                    Ok(Value::Bool(true))
                }
                None => Ok(Value::Bool(false)),
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Map.Count()",
        Box::new(|this, _args, _interp| {
            let keys = super::backing_array(&this, KEYS)?;
            Ok(Value::Int32(keys.len() as i32))
        }),
    );
    host.register(
        "System.Collections.Generic.Map.Clear()",
        Box::new(|this, _args, _interp| {
            super::backing_array(&this, KEYS)?.clear();
            super::backing_array(&this, VALUES)?.clear();
            Ok(Value::Null)
        }),
    );
}
