//! Scenarios S1, S2, S5 from the specification's worked examples, plus
//! virtual dispatch across an override.

mod common;

use objectir::instr::{ConstValue, Instr};
use objectir::module::{ClassDef, Method, MethodBody, TypeKind, TypeReference};
use objectir::overload::CallTarget;
use objectir::{Interpreter, InterpreterConfig};

fn call_target(declaring_type: &str, name: &str, return_type: &str, params: &[&str]) -> CallTarget {
    CallTarget {
        declaring_type: declaring_type.to_string(),
        name: name.to_string(),
        return_type: return_type.to_string(),
        parameter_types: params.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn s1_hello_prints_one_line() {
    let main = common::void_main(
        vec![
            Instr::LdStr("Hello from Text IR!".to_string()),
            Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
            Instr::Ret,
        ],
        vec![],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program]);
    result.unwrap();
    assert_eq!(interp.output, vec!["Hello from Text IR!".to_string()]);
}

#[test]
fn s2_arithmetic_prints_sum() {
    let main = common::void_main(
        vec![
            Instr::Ldc(ConstValue::Int32(2)),
            Instr::Ldc(ConstValue::Int32(3)),
            Instr::Add,
            Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
            Instr::Ret,
        ],
        vec![],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program]);
    result.unwrap();
    assert_eq!(interp.output, vec!["5".to_string()]);
}

#[test]
fn s5_static_call_with_overload_prints_sqrt() {
    let main = common::void_main(
        vec![
            Instr::Ldc(ConstValue::Float64(5.2)),
            Instr::Call(call_target("System.Math", "Sqrt", "float64", &["float64"])),
            Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
            Instr::Ret,
        ],
        vec![],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program]);
    result.unwrap();
    assert_eq!(interp.output.len(), 1);
    assert_ne!(interp.output[0], "");
    assert_ne!(interp.output[0], "null");
    let parsed: f64 = interp.output[0].parse().expect("numeric formatting");
    assert!((parsed - 5.2f64.sqrt()).abs() < 1e-9);
}

/// A derived class overriding a virtual method: `callvirt` against a
/// base-typed reference should still run the derived body.
#[test]
fn callvirt_dispatches_to_the_runtime_type() {
    let speak_body = |text: &str| MethodBody::Instructions {
        instructions: vec![
            Instr::LdStr(text.to_string()),
            Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
            Instr::Ret,
        ],
        label_map: Default::default(),
    };

    let base = ClassDef {
        kind: TypeKind::Class,
        simple_name: "Animal".to_string(),
        namespace: None,
        base_class: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![Method {
            name: "Speak".to_string(),
            return_type: TypeReference::void(),
            parameters: vec![],
            locals: vec![],
            body: speak_body("..."),
            is_static: false,
            is_virtual: true,
            is_override: false,
            is_abstract: false,
            is_constructor: false,
        }],
        is_abstract: false,
        is_sealed: false,
    };
    let derived = ClassDef {
        kind: TypeKind::Class,
        simple_name: "Dog".to_string(),
        namespace: None,
        base_class: Some("Animal".to_string()),
        interfaces: vec![],
        fields: vec![],
        methods: vec![Method {
            name: "Speak".to_string(),
            return_type: TypeReference::void(),
            parameters: vec![],
            locals: vec![],
            body: speak_body("Woof"),
            is_static: false,
            is_virtual: true,
            is_override: true,
            is_abstract: false,
            is_constructor: false,
        }],
        is_abstract: false,
        is_sealed: false,
    };

    let main = common::void_main(
        vec![
            Instr::NewObj(call_target("Dog", "ctor", "void", &[])),
            Instr::CallVirt(CallTarget {
                declaring_type: "Animal".to_string(),
                name: "Speak".to_string(),
                return_type: "void".to_string(),
                parameter_types: vec![],
            }),
            Instr::Ret,
        ],
        vec![],
    );
    let program = common::main_class("Program", main, vec![]);

    let mut registry = objectir::module::ClassRegistry::new();
    registry.register_class(base);
    registry.register_class(derived);
    registry.register_class(program);
    registry.register_class(common::console_class());

    let mut host = objectir::host::HostRegistry::new();
    common::register_console(&mut host);

    let mut interp = Interpreter::new(registry, host, InterpreterConfig::default());
    interp.run_main("Program", vec![]).unwrap();
    assert_eq!(interp.output, vec!["Woof".to_string()]);
}

#[test]
fn div_by_zero_raises_without_printing() {
    let main = common::void_main(
        vec![
            Instr::Ldc(ConstValue::Int32(1)),
            Instr::Ldc(ConstValue::Int32(0)),
            Instr::Div,
            Instr::Ret,
        ],
        vec![],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program]);
    assert!(matches!(result, Err(objectir::VmError::DivisionByZero)));
    assert!(interp.output.is_empty());
}
