//! `ldfld`/`stfld` receiver resolution (spec.md §4.2): the stack-top object
//! is used when present, falling back to `F.this` only when it isn't.

mod common;

use objectir::instr::{ConstValue, Instr};
use objectir::module::{
    Access, ClassDef, Field, LocalVariable, Method, MethodBody, Primitive, TypeKind, TypeReference,
};
use objectir::overload::CallTarget;

fn call_target(declaring_type: &str, name: &str, return_type: &str, params: &[&str]) -> CallTarget {
    CallTarget {
        declaring_type: declaring_type.to_string(),
        name: name.to_string(),
        return_type: return_type.to_string(),
        parameter_types: params.iter().map(|s| s.to_string()).collect(),
    }
}

fn box_class() -> ClassDef {
    ClassDef {
        kind: TypeKind::Class,
        simple_name: "Box".to_string(),
        namespace: None,
        base_class: None,
        interfaces: vec![],
        fields: vec![Field {
            name: "Value".to_string(),
            type_ref: TypeReference::Primitive(Primitive::Int32),
            is_static: false,
            is_readonly: false,
            access: Access::Public,
        }],
        methods: vec![Method {
            name: "ctor".to_string(),
            return_type: TypeReference::void(),
            parameters: vec![],
            locals: vec![],
            body: MethodBody::Instructions {
                instructions: vec![Instr::Ret],
                label_map: Default::default(),
            },
            is_static: false,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            is_constructor: true,
        }],
        is_abstract: false,
        is_sealed: false,
    }
}

/// `Main` is static, so it has no `this` at all — `ldfld`/`stfld` can only
/// succeed here by taking the stack-top object, which proves the fallback
/// branch isn't silently doing the work instead.
#[test]
fn ldfld_and_stfld_target_the_stack_top_object_not_this() {
    let box_ctor = call_target("Box", "ctor", "void", &[]);
    let instructions = vec![
        Instr::NewObj(box_ctor.clone()),
        Instr::StLoc("other".to_string()),
        Instr::LdLoc("other".to_string()),
        Instr::Ldc(ConstValue::Int32(42)),
        Instr::StFld("Value".to_string()),
        Instr::LdLoc("other".to_string()),
        Instr::LdFld("Value".to_string()),
        Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
        Instr::Ret,
    ];
    let main = common::void_main(
        instructions,
        vec![LocalVariable {
            name: "other".to_string(),
            type_ref: TypeReference::Class("Box".to_string()),
        }],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program, box_class()]);
    result.unwrap();
    assert_eq!(interp.output, vec!["42".to_string()]);
}

/// Two distinct instances: writing through one local must not be visible
/// through the other, confirming the receiver really is whichever object
/// sat on the stack top, not some shared/default state.
#[test]
fn field_writes_are_scoped_to_the_instance_on_the_stack() {
    let box_ctor = call_target("Box", "ctor", "void", &[]);
    let instructions = vec![
        Instr::NewObj(box_ctor.clone()),
        Instr::StLoc("a".to_string()),
        Instr::NewObj(box_ctor),
        Instr::StLoc("b".to_string()),
        Instr::LdLoc("a".to_string()),
        Instr::Ldc(ConstValue::Int32(1)),
        Instr::StFld("Value".to_string()),
        Instr::LdLoc("b".to_string()),
        Instr::Ldc(ConstValue::Int32(2)),
        Instr::StFld("Value".to_string()),
        Instr::LdLoc("a".to_string()),
        Instr::LdFld("Value".to_string()),
        Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
        Instr::LdLoc("b".to_string()),
        Instr::LdFld("Value".to_string()),
        Instr::Call(call_target("System.Console", "WriteLine", "void", &["object"])),
        Instr::Ret,
    ];
    let main = common::void_main(
        instructions,
        vec![
            LocalVariable {
                name: "a".to_string(),
                type_ref: TypeReference::Class("Box".to_string()),
            },
            LocalVariable {
                name: "b".to_string(),
                type_ref: TypeReference::Class("Box".to_string()),
            },
        ],
    );
    let program = common::main_class("Program", main, vec![]);
    let (interp, result) = common::run_program(vec![program, box_class()]);
    result.unwrap();
    assert_eq!(interp.output, vec!["1".to_string(), "2".to_string()]);
}
