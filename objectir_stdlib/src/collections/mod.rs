//! Host-backed collection classes. Each wraps a `Value::Array` held in a
//! plain instance field (`_items`, or `_keys`/`_values` for `Map`),
//! initialized by a native constructor the same way any other native
//! method receives `this` — `newobj` allocates the object before invoking
//! the constructor, so the constructor sees `this = Some(Value::Object(_))`
//! and can populate its own fields.

mod list;
mod map;
mod queue;
mod set;
mod stack;

use std::collections::{HashMap, HashSet};

use objectir::host::HostRegistry;
use objectir::module::ClassRegistry;
use objectir::value::Value;
use objectir::object::ArrayRef;
use objectir::module::TypeReference;
use objectir::{VmError, VmResult};

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    list::register(registry, host);
    stack::register(registry, host);
    queue::register(registry, host);
    set::register(registry, host);
    map::register(registry, host);
}

/// Extract the bound instance object, for a native collection method.
fn this_obj(this: Option<Value>) -> VmResult<objectir::object::ObjectRef> {
    match this {
        Some(Value::Object(obj)) => Ok(obj),
        Some(other) => Err(VmError::type_mismatch(format!(
            "expected a collection instance, found {}",
            other.type_name()
        ))),
        None => Err(VmError::not_found("collection method called without an instance")),
    }
}

/// Read a named `Value::Array` field off the bound instance.
fn backing_array(this: &Option<Value>, field: &str) -> VmResult<ArrayRef> {
    let obj = this_obj(this.clone())?;
    match obj.get_field(field) {
        Some(Value::Array(arr)) => Ok(arr),
        _ => Err(VmError::not_found(format!("missing backing field '{field}'"))),
    }
}

/// Build a fresh, empty backing array and store it under `field` on the
/// freshly-allocated `this`, for use inside a native constructor.
fn init_backing_array(this: &Option<Value>, field: &str) -> VmResult<()> {
    let obj = this_obj(this.clone())?;
    obj.set_field(field, Value::Array(ArrayRef::new(TypeReference::Primitive(objectir::module::Primitive::Object))));
    Ok(())
}

/// A real hash-set view of an array-backed collection's current contents,
/// for O(1) membership checks (`Set`) instead of a `Vec`-linear scan —
/// `Value` carries `Hash`/`Eq` precisely so collections can do this.
fn snapshot_set(arr: &ArrayRef) -> HashSet<Value> {
    arr.snapshot().into_iter().collect()
}

/// A value -> index view of an array-backed collection's current contents,
/// for O(1) key lookups (`Map`, and `Contains`/`Remove` on `List`/`Queue`/
/// `Stack`).
fn snapshot_index(arr: &ArrayRef) -> HashMap<Value, usize> {
    arr.snapshot().into_iter().enumerate().map(|(i, v)| (v, i)).collect()
}
