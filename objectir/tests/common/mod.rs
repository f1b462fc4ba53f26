//! Shared scaffolding for integration tests: a minimal `System.Console`
//! native binding (the core crate has no stdlib dependency of its own, so
//! each test harness that wants visible output wires up its own copy) plus
//! helpers for building a single-class `Program` module.

use objectir::host::HostRegistry;
use objectir::module::{ClassDef, ClassRegistry, Field, Method, MethodBody, Module, Parameter, Primitive, TypeKind, TypeReference};
use objectir::value::Value;
use objectir::{Interpreter, InterpreterConfig};

pub fn console_class() -> ClassDef {
    ClassDef {
        kind: TypeKind::Class,
        simple_name: "Console".to_string(),
        namespace: Some("System".to_string()),
        base_class: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![Method {
            name: "WriteLine".to_string(),
            return_type: TypeReference::void(),
            parameters: vec![Parameter {
                name: "value".to_string(),
                type_ref: TypeReference::Primitive(Primitive::Object),
            }],
            locals: vec![],
            body: MethodBody::Native,
            is_static: true,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            is_constructor: false,
        }],
        is_abstract: false,
        is_sealed: true,
    }
}

pub fn register_console(host: &mut HostRegistry) {
    host.register(
        "System.Console.WriteLine(object)",
        Box::new(|_this, args, interp| {
            let text = args.first().map(Value::to_display_string).unwrap_or_default();
            interp.write_line(&text);
            Ok(Value::Null)
        }),
    );
}

pub fn math_class() -> ClassDef {
    ClassDef {
        kind: TypeKind::Class,
        simple_name: "Math".to_string(),
        namespace: Some("System".to_string()),
        base_class: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![Method {
            name: "Sqrt".to_string(),
            return_type: TypeReference::Primitive(Primitive::Float64),
            parameters: vec![Parameter {
                name: "x".to_string(),
                type_ref: TypeReference::Primitive(Primitive::Float64),
            }],
            locals: vec![],
            body: MethodBody::Native,
            is_static: true,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            is_constructor: false,
        }],
        is_abstract: false,
        is_sealed: true,
    }
}

pub fn register_math(host: &mut HostRegistry) {
    host.register(
        "System.Math.Sqrt(float64)",
        Box::new(|_this, args, _interp| {
            let x = args.first().map(Value::to_f64).transpose()?.unwrap_or(0.0);
            Ok(Value::Float64(x.sqrt()))
        }),
    );
}

pub fn main_class(name: &str, main_method: Method, extra_fields: Vec<Field>) -> ClassDef {
    ClassDef {
        kind: TypeKind::Class,
        simple_name: name.to_string(),
        namespace: None,
        base_class: None,
        interfaces: vec![],
        fields: extra_fields,
        methods: vec![main_method],
        is_abstract: false,
        is_sealed: false,
    }
}

pub fn void_main(instructions: Vec<objectir::instr::Instr>, locals: Vec<objectir::module::LocalVariable>) -> Method {
    Method {
        name: "Main".to_string(),
        return_type: TypeReference::void(),
        parameters: vec![],
        locals,
        body: MethodBody::Instructions {
            label_map: objectir::instr::build_label_map(&instructions),
            instructions,
        },
        is_static: true,
        is_virtual: false,
        is_override: false,
        is_abstract: false,
        is_constructor: false,
    }
}

/// Build an interpreter for a module containing `classes` plus the console
/// binding, and run `Program.Main()`. Returns the interpreter (so a test can
/// inspect `output`) and the `Main` result.
pub fn run_program(classes: Vec<ClassDef>) -> (Interpreter, Result<Value, objectir::VmError>) {
    let mut registry = ClassRegistry::new();
    registry.register_module(Module {
        name: "test".to_string(),
        version: "0.0.0".to_string(),
        types: classes,
    });
    registry.register_class(console_class());
    registry.register_class(math_class());

    let mut host = HostRegistry::new();
    register_console(&mut host);
    register_math(&mut host);

    let mut interp = Interpreter::new(registry, host, InterpreterConfig::default());
    let result = interp.run_main("Program", vec![]);
    (interp, result)
}
