//! `System.Collections.Generic.List`: a resizable, index-addressable
//! sequence backed by a single `_items` array field.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, Primitive, TypeReference};
use objectir::value::Value;

use crate::support::{native_class, native_constructor, native_method};

const FIELD: &str = "_items";

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let object_ty = || TypeReference::Primitive(Primitive::Object);
    let int_ty = || TypeReference::Primitive(Primitive::Int32);
    let bool_ty = || TypeReference::Primitive(Primitive::Bool);

    let mut class = native_class(
        "List",
        "System.Collections.Generic",
        vec![
            native_method("Add", &[("item", object_ty())], TypeReference::void(), false),
            native_method("Get", &[("index", int_ty())], object_ty(), false),
            native_method("Set", &[("index", int_ty()), ("item", object_ty())], TypeReference::void(), false),
            native_method("Count", &[], int_ty(), false),
            native_method("RemoveAt", &[("index", int_ty())], object_ty(), false),
            native_method("Contains", &[("item", object_ty())], bool_ty(), false),
            native_method("Remove", &[("item", object_ty())], bool_ty(), false),
            native_method("Clear", &[], TypeReference::void(), false),
        ],
    );
    class.methods.push(native_constructor(&[]));
    registry.register_class(class);

    host.register(
        "System.Collections.Generic.List.ctor()",
        Box::new(|this, _args, _interp| {
            super::init_backing_array(&this, FIELD)?;
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.List.Add(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            arr.push(args.first().cloned().unwrap_or(Value::Null));
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.List.Get(int32)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let index = args.first().map(Value::to_i64).transpose()?.unwrap_or(0).max(0) as usize;
            Ok(arr.get(index))
        }),
    );
    host.register(
        "System.Collections.Generic.List.Set(int32,object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let index = args.first().map(Value::to_i64).transpose()?.unwrap_or(0).max(0) as usize;
            arr.set(index, args.get(1).cloned().unwrap_or(Value::Null));
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.List.Count()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            Ok(Value::Int32(arr.len() as i32))
        }),
    );
    host.register(
        "System.Collections.Generic.List.RemoveAt(int32)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let index = args.first().map(Value::to_i64).transpose()?.unwrap_or(0).max(0) as usize;
            Ok(arr.remove(index))
        }),
    );
    host.register(
        "System.Collections.Generic.List.Contains(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let item = args.first().cloned().unwrap_or(Value::Null);
            Ok(Value::Bool(super::snapshot_index(&arr).contains_key(&item)))
        }),
    );
    host.register(
        "System.Collections.Generic.List.Remove(object)",
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
        "System.Collections.Generic.List.Clear()",
        Box::new(|this, _args, _interp| {
            super::backing_array(&this, FIELD)?.clear();
            Ok(Value::Null)
        }),
    );
}
