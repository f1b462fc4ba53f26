//! Static field storage: one process-wide slot per `(declaring type, field
//! name)` pair, lifetime tied to the interpreter instance that owns it
//! (spec.md §4.3's `ldsfld`/`stsfld`).

use std::collections::HashMap;

use crate::error::{VmError, VmResult};
use crate::value::Value;

#[derive(Debug, Default)]
pub struct StaticFieldStore {
    slots: HashMap<(String, String), Value>,
}

impl StaticFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a static field's backing slot, defaulting to `null`. Called
    /// once per static field when a module is registered; `ldsfld` on a
    /// field that was never declared this way is a `NotFound`, not an
    /// implicit zero-value.
    pub fn declare(&mut self, declaring_type: &str, field_name: &str) {
        self.slots
            .entry((declaring_type.to_string(), field_name.to_string()))
            .or_insert(Value::Null);
    }

    pub fn get(&self, declaring_type: &str, field_name: &str) -> VmResult<Value> {
        self.slots
            .get(&(declaring_type.to_string(), field_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                VmError::not_found(format!("static field '{declaring_type}.{field_name}'"))
            })
    }

    pub fn set(&mut self, declaring_type: &str, field_name: &str, value: Value) -> VmResult<()> {
        let key = (declaring_type.to_string(), field_name.to_string());
        if !self.slots.contains_key(&key) {
            return Err(VmError::not_found(format!(
                "static field '{declaring_type}.{field_name}'"
            )));
        }
        self.slots.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_field_defaults_to_null() {
        let mut store = StaticFieldStore::new();
        store.declare("Counter", "total");
        assert_eq!(store.get("Counter", "total").unwrap(), Value::Null);
    }

    #[test]
    fn undeclared_field_is_not_found() {
        let store = StaticFieldStore::new();
        assert!(matches!(store.get("Counter", "total"), Err(VmError::NotFound(_))));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut store = StaticFieldStore::new();
        store.declare("Counter", "total");
        store.set("Counter", "total", Value::Int32(5)).unwrap();
        assert_eq!(store.get("Counter", "total").unwrap(), Value::Int32(5));
    }
}
