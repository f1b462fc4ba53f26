//! Exercises the host-backed classes through a real `Interpreter`, driving
//! them the way a module author would: `newobj`/`call`/`callvirt` against
//! the registered signatures, never the native closures directly.

use objectir::instr::{ConstValue, Instr};
use objectir::module::{ClassDef, ClassRegistry, LocalVariable, Method, MethodBody, Module, TypeKind, TypeReference};
use objectir::overload::CallTarget;
use objectir::{Interpreter, InterpreterConfig};

fn target(declaring_type: &str, name: &str, return_type: &str, params: &[&str]) -> CallTarget {
    CallTarget {
        declaring_type: declaring_type.to_string(),
        name: name.to_string(),
        return_type: return_type.to_string(),
        parameter_types: params.iter().map(|s| s.to_string()).collect(),
    }
}

fn write_line(args: &str) -> Instr {
    Instr::Call(target("System.Console", "WriteLine", "void", &[args]))
}

fn run(instructions: Vec<Instr>, locals: Vec<LocalVariable>) -> Interpreter {
    let main = Method {
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
    };
    let program = ClassDef {
        kind: TypeKind::Class,
        simple_name: "Program".to_string(),
        namespace: None,
        base_class: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![main],
        is_abstract: false,
        is_sealed: false,
    };

    let mut registry = ClassRegistry::new();
    registry.register_module(Module {
        name: "test".to_string(),
        version: "0.0.0".to_string(),
        types: vec![program],
    });
    let mut host = objectir::host::HostRegistry::new();
    objectir_stdlib::register_all(&mut registry, &mut host);

    let mut interp = Interpreter::new(registry, host, InterpreterConfig::default());
    interp.run_main("Program", vec![]).unwrap();
    interp
}

fn local(name: &str, class: &str) -> LocalVariable {
    LocalVariable {
        name: name.to_string(),
        type_ref: TypeReference::Class(class.to_string()),
    }
}

#[test]
fn console_write_then_write_line_joins_into_one_line() {
    let interp = run(
        vec![
            Instr::LdStr("a".to_string()),
            Instr::Call(target("System.Console", "Write", "void", &["object"])),
            Instr::LdStr("b".to_string()),
            write_line("object"),
            Instr::Ret,
        ],
        vec![],
    );
    assert_eq!(interp.output, vec!["ab".to_string()]);
}

#[test]
fn math_sqrt_prints_four() {
    let interp = run(
        vec![
            Instr::Ldc(ConstValue::Float64(16.0)),
            Instr::Call(target("System.Math", "Sqrt", "float64", &["float64"])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![],
    );
    assert_eq!(interp.output, vec!["4".to_string()]);
}

#[test]
fn string_to_upper_and_contains() {
    let interp = run(
        vec![
            Instr::LdStr("hello world".to_string()),
            Instr::CallVirt(target("System.String", "ToUpper", "string", &[])),
            write_line("object"),
            Instr::LdStr("hello world".to_string()),
            Instr::LdStr("wor".to_string()),
            Instr::CallVirt(target("System.String", "Contains", "bool", &["string"])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![],
    );
    assert_eq!(interp.output, vec!["HELLO WORLD".to_string(), "true".to_string()]);
}

#[test]
fn convert_to_int32_truncates_a_float() {
    let interp = run(
        vec![
            Instr::Ldc(ConstValue::Float64(9.7)),
            Instr::Call(target("System.Convert", "ToInt32", "int32", &["object"])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![],
    );
    assert_eq!(interp.output, vec!["9".to_string()]);
}

#[test]
fn list_add_get_count_round_trip() {
    let interp = run(
        vec![
            Instr::NewObj(target("System.Collections.Generic.List", "ctor", "void", &[])),
            Instr::StLoc("lst".to_string()),
            Instr::LdLoc("lst".to_string()),
            Instr::Ldc(ConstValue::Int32(10)),
            Instr::CallVirt(target("System.Collections.Generic.List", "Add", "void", &["object"])),
            Instr::LdLoc("lst".to_string()),
            Instr::Ldc(ConstValue::Int32(20)),
            Instr::CallVirt(target("System.Collections.Generic.List", "Add", "void", &["object"])),
            Instr::LdLoc("lst".to_string()),
            Instr::CallVirt(target("System.Collections.Generic.List", "Count", "int32", &[])),
            write_line("object"),
            Instr::LdLoc("lst".to_string()),
            Instr::Ldc(ConstValue::Int32(0)),
            Instr::CallVirt(target("System.Collections.Generic.List", "Get", "object", &["int32"])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![local("lst", "System.Collections.Generic.List")],
    );
    assert_eq!(interp.output, vec!["2".to_string(), "10".to_string()]);
}

#[test]
fn set_add_dedups_by_value_equality() {
    let interp = run(
        vec![
            Instr::NewObj(target("System.Collections.Generic.Set", "ctor", "void", &[])),
            Instr::StLoc("s".to_string()),
            Instr::LdLoc("s".to_string()),
            Instr::Ldc(ConstValue::Int32(1)),
            Instr::CallVirt(target("System.Collections.Generic.Set", "Add", "bool", &["object"])),
            write_line("object"),
            Instr::LdLoc("s".to_string()),
            Instr::Ldc(ConstValue::Int32(1)),
            Instr::CallVirt(target("System.Collections.Generic.Set", "Add", "bool", &["object"])),
            write_line("object"),
            Instr::LdLoc("s".to_string()),
            Instr::CallVirt(target("System.Collections.Generic.Set", "Count", "int32", &[])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![local("s", "System.Collections.Generic.Set")],
    );
    assert_eq!(interp.output, vec!["true".to_string(), "false".to_string(), "1".to_string()]);
}

#[test]
fn map_set_get_overwrites_existing_key() {
    let interp = run(
        vec![
            Instr::NewObj(target("System.Collections.Generic.Map", "ctor", "void", &[])),
            Instr::StLoc("m".to_string()),
            Instr::LdLoc("m".to_string()),
            Instr::LdStr("k".to_string()),
            Instr::Ldc(ConstValue::Int32(1)),
            Instr::CallVirt(target("System.Collections.Generic.Map", "Set", "void", &["object", "object"])),
            Instr::LdLoc("m".to_string()),
            Instr::LdStr("k".to_string()),
            Instr::Ldc(ConstValue::Int32(2)),
            Instr::CallVirt(target("System.Collections.Generic.Map", "Set", "void", &["object", "object"])),
            Instr::LdLoc("m".to_string()),
            Instr::LdStr("k".to_string()),
            Instr::CallVirt(target("System.Collections.Generic.Map", "Get", "object", &["object"])),
            write_line("object"),
            Instr::LdLoc("m".to_string()),
            Instr::CallVirt(target("System.Collections.Generic.Map", "Count", "int32", &[])),
            write_line("object"),
            Instr::Ret,
        ],
        vec![local("m", "System.Collections.Generic.Map")],
    );
    assert_eq!(interp.output, vec!["2".to_string(), "1".to_string()]);
}
