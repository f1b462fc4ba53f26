//! Type-name normalization and overload resolution (spec.md §4.1, §4.4).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{VmError, VmResult};
use crate::module::{ClassId, ClassRegistry};

/// Normalize a textual type spelling to its canonical form.
///
/// Primitive aliases collapse to one canonical spelling each
/// (`System.Int32`, `int`, and `INT32` all normalize to `int32`); class
/// names are left exactly as given (minus a leading `System.` namespace
/// prefix, which only primitives use). Arrays recurse on the element type
/// and re-append `[]`. This function is idempotent:
/// `normalize_type_name(normalize_type_name(x)) == normalize_type_name(x)`.
pub fn normalize_type_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(elem) = trimmed.strip_suffix("[]") {
        return format!("{}[]", normalize_type_name(elem));
    }
    let lower = trimmed.to_ascii_lowercase();
    let key = lower.strip_prefix("system.").unwrap_or(&lower);
    let canonical = match key {
        "void" => Some("void"),
        "string" => Some("string"),
        "boolean" | "bool" => Some("bool"),
        "int32" | "int" => Some("int32"),
        "int64" | "long" => Some("int64"),
        "single" | "float" | "float32" => Some("float32"),
        "double" | "float64" => Some("float64"),
        "byte" | "uint8" => Some("uint8"),
        "sbyte" | "int8" => Some("int8"),
        "int16" | "short" => Some("int16"),
        "uint16" | "ushort" => Some("uint16"),
        "uint32" | "uint" => Some("uint32"),
        "uint64" | "ulong" => Some("uint64"),
        "char" => Some("char"),
        "object" => Some("object"),
        _ => None,
    };
    match canonical {
        Some(c) => c.to_string(),
        None => trimmed
            .strip_prefix("System.")
            .unwrap_or(trimmed)
            .to_string(),
    }
}

/// Which call kind produced this target: restricts candidates to static or
/// instance methods (spec.md §4.4 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Static,
    Instance,
}

/// The tuple a `call`/`callvirt` instruction carries: declaring type, method
/// name, declared return type, and parameter-type list, all as raw
/// (un-normalized) text.
#[derive(Debug, Clone)]
pub struct CallTarget {
    pub declaring_type: String,
    pub name: String,
    pub return_type: String,
    pub parameter_types: Vec<String>,
}

/// A resolved method: which class declares it, and its index within that
/// class's method list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub class_id: ClassId,
    pub method_index: usize,
}

fn simple_name_of(s: &str) -> &str {
    s.rsplit('.').next().unwrap_or(s)
}

/// A single requested parameter type matches a declared one when they're
/// equal after normalization, or — the spec's fallback for an unqualified
/// request matching a qualified declaration — when the request has no dots
/// and equals the declared type's simple-name component.
fn param_matches(requested: &str, declared: &str) -> bool {
    requested == declared || (!requested.contains('.') && simple_name_of(declared) == requested)
}

fn params_match(requested: &[String], declared: &[String]) -> bool {
    requested.len() == declared.len()
        && requested
            .iter()
            .zip(declared.iter())
            .all(|(r, d)| param_matches(r, d))
}

/// Caches resolved `(class, method name, normalized parameter types, kind)`
/// lookups so repeated calls inside a loop don't re-walk the ancestry chain
/// and re-run the matching rules every iteration (spec.md §9).
#[derive(Debug, Default)]
pub struct OverloadCache {
    cache: RefCell<HashMap<(ClassId, String, Vec<String>, bool), MethodRef>>,
}

impl OverloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Resolve `target` against `registry`, consulting (and populating) the
    /// cache. See spec.md §4.4 for the full algorithm.
    pub fn resolve(
        &self,
        registry: &ClassRegistry,
        target: &CallTarget,
        kind: CallKind,
    ) -> VmResult<MethodRef> {
        let class_id = registry.resolve(&target.declaring_type).ok_or_else(|| {
            VmError::not_found(format!("type '{}' not found", target.declaring_type))
        })?;
        let requested: Vec<String> = target
            .parameter_types
            .iter()
            .map(|t| normalize_type_name(t))
            .collect();
        let is_static = matches!(kind, CallKind::Static);

        let cache_key = (class_id, target.name.clone(), requested.clone(), is_static);
        if let Some(hit) = self.cache.borrow().get(&cache_key) {
            return Ok(*hit);
        }

        let resolved = Self::resolve_uncached(registry, class_id, &target.name, &requested, is_static)?;
        self.cache.borrow_mut().insert(cache_key, resolved);
        Ok(resolved)
    }

    fn resolve_uncached(
        registry: &ClassRegistry,
        class_id: ClassId,
        name: &str,
        requested: &[String],
        is_static: bool,
    ) -> VmResult<MethodRef> {
        let candidates: Vec<MethodRef> = registry
            .ancestry(class_id)
            .into_iter()
            .flat_map(|cid| {
                registry
                    .get(cid)
                    .methods
                    .iter()
                    .enumerate()
                    .filter(move |(_, m)| m.name == name && m.is_static == is_static)
                    .map(move |(idx, _)| MethodRef {
                        class_id: cid,
                        method_index: idx,
                    })
            })
            .collect();

        if candidates.is_empty() {
            return Err(VmError::no_matching_overload(format!(
                "no method named '{name}' on '{}' or its ancestors",
                registry.get(class_id).qualified_name()
            )));
        }

        // Ancestry is walked most-derived first; when a derived class and
        // one of its ancestors both declare a method with the same
        // signature, the derived one shadows it (override semantics) rather
        // than counting as a second, ambiguous candidate.
        let mut seen_signatures: Vec<Vec<String>> = Vec::new();
        let candidates: Vec<MethodRef> = candidates
            .into_iter()
            .filter(|m| {
                let sig = registry.get(m.class_id).methods[m.method_index].parameter_type_names();
                if seen_signatures.contains(&sig) {
                    false
                } else {
                    seen_signatures.push(sig);
                    true
                }
            })
            .collect();

        // Empty parameter-type list: caller didn't specify signature info at
        // all. Resolve by name alone, which requires a unique candidate.
        if requested.is_empty() {
            return match candidates.as_slice() {
                [only] => Ok(*only),
                _ => Err(VmError::ambiguous_overload(format!(
                    "'{name}' is ambiguous, provide parameterTypes"
                ))),
            };
        }

        let method_params = |m: &MethodRef| registry.get(m.class_id).methods[m.method_index].parameter_type_names();

        let exact: Vec<MethodRef> = candidates
            .iter()
            .copied()
            .filter(|m| params_match(requested, &method_params(m)))
            .collect();

        match exact.len() {
            1 => return Ok(exact[0]),
            n if n > 1 => {
                return Err(VmError::ambiguous_overload(format!(
                    "multiple candidates match '{name}({})'",
                    requested.join(", ")
                )))
            }
            _ => {}
        }

        // Legacy compatibility: a single candidate sharing arity wins even
        // without a type-level match.
        let same_arity: Vec<MethodRef> = candidates
            .iter()
            .copied()
            .filter(|m| method_params(m).len() == requested.len())
            .collect();
        if let [only] = same_arity.as_slice() {
            return Ok(*only);
        }

        let candidate_sigs: Vec<String> = candidates
            .iter()
            .map(|m| {
                format!(
                    "{}({})",
                    name,
                    method_params(m).join(", ")
                )
            })
            .collect();
        Err(VmError::no_matching_overload(format!(
            "no overload of '{name}({})' matches; candidates: [{}]",
            requested.join(", "),
            candidate_sigs.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ClassDef, Method, MethodBody, Parameter, TypeKind, TypeReference, Primitive};

    fn param(name: &str, ty: Primitive) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_ref: TypeReference::Primitive(ty),
        }
    }

    fn method(name: &str, params: Vec<Parameter>, is_static: bool) -> Method {
        Method {
            name: name.to_string(),
            return_type: TypeReference::void(),
            parameters: params,
            locals: vec![],
            body: MethodBody::Instructions {
                instructions: vec![],
                label_map: Default::default(),
            },
            is_static,
            is_virtual: false,
            is_override: false,
            is_abstract: false,
            is_constructor: false,
        }
    }

    fn class_with_methods(name: &str, methods: Vec<Method>) -> ClassDef {
        class_with_base(name, None, methods)
    }

    fn class_with_base(name: &str, base: Option<&str>, methods: Vec<Method>) -> ClassDef {
        ClassDef {
            kind: TypeKind::Class,
            simple_name: name.to_string(),
            namespace: None,
            base_class: base.map(str::to_string),
            interfaces: vec![],
            fields: vec![],
            methods,
            is_abstract: false,
            is_sealed: false,
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["System.Int32", "int", "INT32", "MyClass", "System.MyClass", "string[]"] {
            let once = normalize_type_name(raw);
            let twice = normalize_type_name(&once);
            assert_eq!(once, twice, "normalize not idempotent for {raw}");
        }
    }

    #[test]
    fn normalize_aliases_collapse() {
        assert_eq!(normalize_type_name("System.Int32"), "int32");
        assert_eq!(normalize_type_name("int"), "int32");
        assert_eq!(normalize_type_name("System.Boolean"), "bool");
        assert_eq!(normalize_type_name("float"), "float32");
        assert_eq!(normalize_type_name("System.Byte"), "uint8");
    }

    #[test]
    fn normalize_preserves_class_case() {
        assert_eq!(normalize_type_name("MyClass"), "MyClass");
        assert_eq!(normalize_type_name("System.MyClass"), "MyClass");
    }

    #[test]
    fn resolves_unique_static_method_by_exact_signature() {
        let mut reg = ClassRegistry::new();
        let math = class_with_methods(
            "Math",
            vec![method("Sqrt", vec![param("x", Primitive::Float64)], true)],
        );
        reg.register_class(math);
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Math".to_string(),
            name: "Sqrt".to_string(),
            return_type: "float64".to_string(),
            parameter_types: vec!["float64".to_string()],
        };
        let resolved = cache.resolve(&reg, &target, CallKind::Static).unwrap();
        assert_eq!(resolved.method_index, 0);
    }

    #[test]
    fn ambiguous_overload_raises() {
        let mut reg = ClassRegistry::new();
        let c = class_with_methods(
            "Box",
            vec![
                method("Make", vec![param("x", Primitive::Int32)], true),
                method("Make", vec![param("x", Primitive::Float64)], true),
            ],
        );
        reg.register_class(c);
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Box".to_string(),
            name: "Make".to_string(),
            return_type: "object".to_string(),
            parameter_types: vec![],
        };
        let err = cache.resolve(&reg, &target, CallKind::Static).unwrap_err();
        assert!(matches!(err, VmError::AmbiguousOverload(_)));
    }

    #[test]
    fn arity_fallback_picks_unique_candidate() {
        let mut reg = ClassRegistry::new();
        let c = class_with_methods(
            "Box",
            vec![method("Make", vec![param("x", Primitive::Int32)], true)],
        );
        reg.register_class(c);
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Box".to_string(),
            name: "Make".to_string(),
            return_type: "object".to_string(),
            parameter_types: vec!["string".to_string()],
        };
        let resolved = cache.resolve(&reg, &target, CallKind::Static).unwrap();
        assert_eq!(resolved.method_index, 0);
    }

    #[test]
    fn no_matching_overload_lists_candidates() {
        let mut reg = ClassRegistry::new();
        let c = class_with_methods(
            "Box",
            vec![
                method("Make", vec![param("x", Primitive::Int32)], true),
                method("Make", vec![param("x", Primitive::Float64), param("y", Primitive::Float64)], true),
            ],
        );
        reg.register_class(c);
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Box".to_string(),
            name: "Make".to_string(),
            return_type: "object".to_string(),
            parameter_types: vec!["string".to_string(), "string".to_string(), "string".to_string()],
        };
        let err = cache.resolve(&reg, &target, CallKind::Static).unwrap_err();
        assert!(matches!(err, VmError::NoMatchingOverload(_)));
    }

    #[test]
    fn resolution_is_deterministic_across_repeated_calls() {
        let mut reg = ClassRegistry::new();
        let c = class_with_methods(
            "Box",
            vec![method("Make", vec![param("x", Primitive::Int32)], true)],
        );
        reg.register_class(c);
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Box".to_string(),
            name: "Make".to_string(),
            return_type: "object".to_string(),
            parameter_types: vec!["int32".to_string()],
        };
        let a = cache.resolve(&reg, &target, CallKind::Static).unwrap();
        let b = cache.resolve(&reg, &target, CallKind::Static).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_override_shadows_base_method_of_same_signature() {
        let mut reg = ClassRegistry::new();
        reg.register_class(class_with_methods(
            "Animal",
            vec![method("Speak", vec![], false)],
        ));
        let derived = reg.register_class(class_with_base(
            "Dog",
            Some("Animal"),
            vec![method("Speak", vec![], false)],
        ));
        let cache = OverloadCache::new();
        let target = CallTarget {
            declaring_type: "Dog".to_string(),
            name: "Speak".to_string(),
            return_type: "void".to_string(),
            parameter_types: vec![],
        };
        let resolved = cache.resolve(&reg, &target, CallKind::Instance).unwrap();
        assert_eq!(resolved.class_id, derived);
    }
}
