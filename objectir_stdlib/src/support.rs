//! Small helpers for building the stub `ClassDef`s the host bridge
//! registers — every host-backed method has a `MethodBody::Native` body, no
//! instructions, so these are mostly boilerplate constructors.

use objectir::module::{ClassDef, Method, MethodBody, Parameter, TypeKind, TypeReference};

pub fn native_class(simple_name: &str, namespace: &str, methods: Vec<Method>) -> ClassDef {
    ClassDef {
        kind: TypeKind::Class,
        simple_name: simple_name.to_string(),
        namespace: Some(namespace.to_string()),
        base_class: None,
        interfaces: vec![],
        fields: vec![],
        methods,
        is_abstract: false,
        is_sealed: true,
    }
}

pub fn native_method(
    name: &str,
    params: &[(&str, TypeReference)],
    return_type: TypeReference,
    is_static: bool,
) -> Method {
    Method {
        name: name.to_string(),
        return_type,
        parameters: params
            .iter()
            .map(|(n, t)| Parameter {
                name: n.to_string(),
                type_ref: t.clone(),
            })
            .collect(),
        locals: vec![],
        body: MethodBody::Native,
        is_static,
        is_virtual: false,
        is_override: false,
        is_abstract: false,
        is_constructor: false,
    }
}

pub fn native_constructor(params: &[(&str, TypeReference)]) -> Method {
    Method {
        name: "ctor".to_string(),
        return_type: TypeReference::void(),
        parameters: params
            .iter()
            .map(|(n, t)| Parameter {
                name: n.to_string(),
                type_ref: t.clone(),
            })
            .collect(),
        locals: vec![],
        body: MethodBody::Native,
        is_static: false,
        is_virtual: false,
        is_override: false,
        is_abstract: false,
        is_constructor: true,
    }
}
