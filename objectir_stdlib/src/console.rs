//! `System.Console`: the one output channel the runtime exposes. Writes
//! land in `Interpreter::output` rather than directly on stdout, so a test
//! (or an embedding host) can inspect what a program printed without
//! capturing a real file descriptor.

use objectir::host::HostRegistry;
use objectir::module::{ClassRegistry, TypeReference};
use objectir::value::Value;

use crate::support::{native_class, native_method};

pub fn register(registry: &mut ClassRegistry, host: &mut HostRegistry) {
    let class = native_class(
        "Console",
        "System",
        vec![
            native_method("WriteLine", &[("value", TypeReference::Primitive(objectir::module::Primitive::Object))], TypeReference::void(), true),
            native_method("Write", &[("value", TypeReference::Primitive(objectir::module::Primitive::Object))], TypeReference::void(), true),
        ],
    );
    registry.register_class(class);

    host.register(
        "System.Console.WriteLine(object)",
        Box::new(|_this, args, interp| {
            let text = args.first().map(Value::to_display_string).unwrap_or_default();
            interp.write_line(&text);
            Ok(Value::Null)
        }),
    );
    host.register(
        "System.Console.Write(object)",
        Box::new(|_this, args, interp| {
            let text = args.first().map(Value::to_display_string).unwrap_or_default();
            interp.write_pending(&text);
            Ok(Value::Null)
        }),
    );
}
