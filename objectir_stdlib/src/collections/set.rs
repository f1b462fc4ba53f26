//! `System.Collections.Generic.Set`: unordered, deduplicated membership
//! backed by `_items`, with a real `HashSet<Value>` built from a snapshot
//! for each membership check (`Value`'s `Hash`/`Eq` impls exist precisely
//! so a hashed-set collection can do this instead of a linear scan).

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
        "Set",
        "System.Collections.Generic",
        vec![
            native_method("Add", &[("item", object_ty())], bool_ty(), false),
            native_method("Contains", &[("item", object_ty())], bool_ty(), false),
            native_method("Remove", &[("item", object_ty())], bool_ty(), false),
            native_method("Count", &[], int_ty(), false),
            native_method("Clear", &[], TypeReference::void(), false),
        ],
    );
    class.methods.push(native_constructor(&[]));
    registry.register_class(class);

    host.register(
        "System.Collections.Generic.Set.ctor()",
        Box::new(|this, _args, _interp| {
            super::init_backing_array(&this, FIELD)?;
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Collections.Generic.Set.Add(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let item = args.first().cloned().unwrap_or(Value::Null);
            if super::snapshot_set(&arr).contains(&item) {
                Ok(Value::Bool(false))
            } else {
                arr.push(item);
                Ok(Value::Bool(true))
            }
        }),
    );
    host.register(
        "System.Collections.Generic.Set.Contains(object)",
        Box::new(|this, args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            let item = args.first().cloned().unwrap_or(Value::Null);
            Ok(Value::Bool(super::snapshot_set(&arr).contains(&item)))
        }),
    );
    host.register(
        "System.Collections.Generic.Set.Remove(object)",
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
        "System.Collections.Generic.Set.Count()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            Ok(Value::Int32(arr.len() as i32))
        }),
    );
    host.register(
        "System.Collections.Generic.Set.Clear()",
        Box::new(|this, _args, _interp| {
            let arr = super::backing_array(&this, FIELD)?;
            arr.clear();
            Ok(Value::Null)
        }),
    );
}
