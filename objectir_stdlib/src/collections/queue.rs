//! `System.Collections.Generic.Queue`: FIFO, backed by `_items` where
//! index 0 is the front of the queue.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;
use objectir::VmError;

use crate::support::{native_class, native_constructor, native_method};

const FIELD: &str = "_items";

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let object_ty = || TypeReference::Primitive(Primitive::Object);
    let int_ty = || TypeReference::Primitive(Primitive::Int32);
    let bool_ty = || TypeReference::Primitive(Primitive::Bool);

    let mut class = native_class(
        "Queue",
        "System.Collections.Generic",
        vec![
            native_method("Enqueue", &[("item", object_ty())], TypeReference::void(), false),
            native_method("Dequeue", &[], object_ty(), false),
            native_method("Peek", &[], object_ty(), false),
            native_method("Count", &[], int_ty(), false),
            native_method("Contains", &[("item", object_ty())], bool_ty(), false),
            native_method("Remove", &[("item", object_ty())], bool_ty(), false),
            native_method("Clear", &[], TypeReference::void(), false),
        ],
    );
    class.methods.push(native_constructor(&[]));
    registry.register_class(class);

    host.register(
        "System.Collections.Generic.Queue.ctor()",
        Box::new(|this, _args, _interp| {
            super::init_backing_array(&this, FIELD)?;
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Enqueue(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            arr.push(args.first().cloned().unwrap_or(Value::Null));
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Dequeue()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            if arr.is_empty() {
                Err(VmError::not_found("Dequeue on an empty queue"))
            } else {
                Ok(arr.remove(0))
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Peek()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            if arr.is_empty() {
                Err(VmError::not_found("Peek on an empty queue"))
            } else {
                Ok(arr.get(0))
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Count()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            Ok(Value::Int32(arr.len() as i32))
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Contains(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let item = args.first().cloned().unwrap_or(Value::Null);
            Ok(Value::Bool(super::snapshot_index(&arr).contains_key(&item)))
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Remove(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let item = args.first().cloned().unwrap_or(Value::Null);
            match super::snapshot_index(&arr).get(&item) {
                Some(&index) => {
                    arr.remove(index);
                    Ok(Value::Bool(true))
                }
                None => Ok(Value::Bool(false)),
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Queue.Clear()",
        Box::new(|this, _args, _interp| {
            super::backing_array(&this, FIELD)?.clear();
            Ok(Value::Null)
        }),
    );
}
