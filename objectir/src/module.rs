//! The in-memory module representation: classes, fields, methods, and the
//! type references that tie them together.
//!
//! A `Module` is produced by some external collaborator (a textual-IR
//! parser, a JSON loader, a FOB binary reader — none of which are part of
//! this core) and handed to the interpreter as an already-built value. This
//! module only describes the shape of that value and the registry used to
//! look classes up by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::instr::Instr;

/// The four type kinds a module can declare. Only `Class` is executable;
/// the others are carried for `isinst`/`castclass` bookkeeping and future
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
}

/// A primitive value type. Names here are already canonical; see
/// [`crate::overload::normalize_type_name`] for the alias table that maps a
/// textual spelling (`System.Int32`, `int`, ...) onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Void,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Char,
    String,
    Object,
}

impl Primitive {
    /// The canonical, lowercase name used in normalized signatures.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Int8 => "int8",
            Primitive::UInt8 => "uint8",
            Primitive::Int16 => "int16",
            Primitive::UInt16 => "uint16",
            Primitive::Int32 => "int32",
            Primitive::UInt32 => "uint32",
            Primitive::Int64 => "int64",
            Primitive::UInt64 => "uint64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Char => "char",
            Primitive::String => "string",
            Primitive::Object => "object",
        }
    }

    /// Look up a primitive by its canonical name (no aliasing — callers
    /// normalize first).
    pub fn from_canonical_name(name: &str) -> Option<Self> {
        Some(match name {
            "void" => Primitive::Void,
            "bool" => Primitive::Bool,
            "int8" => Primitive::Int8,
            "uint8" => Primitive::UInt8,
            "int16" => Primitive::Int16,
            "uint16" => Primitive::UInt16,
            "int32" => Primitive::Int32,
            "uint32" => Primitive::UInt32,
            "int64" => Primitive::Int64,
            "uint64" => Primitive::UInt64,
            "float32" => Primitive::Float32,
            "float64" => Primitive::Float64,
            "char" => Primitive::Char,
            "string" => Primitive::String,
            "object" => Primitive::Object,
            _ => return None,
        })
    }
}

/// A reference to a value's static type: either a primitive, a named class
/// (resolved against the module's class registry at use-site), or an
/// array-of-T.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeReference {
    Primitive(Primitive),
    /// A class, by its textual name exactly as written by the producer
    /// (may be a simple name, a qualified name, or an alias — normalized
    /// and resolved lazily, never at construction time, since forward
    /// references between classes in the same module are legal).
    Class(String),
    Array(Box<TypeReference>),
}

impl TypeReference {
    pub fn void() -> Self {
        TypeReference::Primitive(Primitive::Void)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeReference::Primitive(Primitive::Void))
    }

    /// The normalized name used for overload matching: primitives use their
    /// canonical spelling, classes use [`crate::overload::normalize_type_name`]
    /// on their raw text, and arrays append `[]` to the element's name.
    pub fn normalized_name(&self) -> String {
        match self {
            TypeReference::Primitive(p) => p.canonical_name().to_string(),
            TypeReference::Class(name) => crate::overload::normalize_type_name(name),
            TypeReference::Array(elem) => format!("{}[]", elem.normalized_name()),
        }
    }
}

/// Field visibility. The spec only requires that *some* access flag exist;
/// it plays no role in this core's dispatch semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Public,
    Private,
    Protected,
    Internal,
}

impl Default for Access {
    fn default() -> Self {
        Access::Public
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeReference,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_readonly: bool,
    #[serde(default)]
    pub access: Access,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeReference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub type_ref: TypeReference,
}

/// A method's instruction body, or a marker that its implementation is
/// supplied by a host function registered under its normalized signature
/// (spec.md §4.5). The registry lookup happens at call time, not here —
/// `Method` never carries a function pointer, which keeps the whole module
/// value plain, serializable data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MethodBody {
    Instructions {
        instructions: Vec<Instr>,
        #[serde(default)]
        label_map: HashMap<String, usize>,
    },
    Native,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub return_type: TypeReference,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub locals: Vec<LocalVariable>,
    pub body: MethodBody,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_override: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_constructor: bool,
}

impl Method {
    pub fn parameter_type_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_ref.normalized_name())
            .collect()
    }

    pub fn is_native(&self) -> bool {
        matches!(self.body, MethodBody::Native)
    }

    pub fn instructions(&self) -> &[Instr] {
        match &self.body {
            MethodBody::Instructions { instructions, .. } => instructions,
            MethodBody::Native => &[],
        }
    }

    pub fn label_map(&self) -> Option<&HashMap<String, usize>> {
        match &self.body {
            MethodBody::Instructions { label_map, .. } => Some(label_map),
            MethodBody::Native => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub kind: TypeKind,
    pub simple_name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub base_class: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_sealed: bool,
}

impl ClassDef {
    /// `namespace.simple_name`, or just `simple_name` when there's no
    /// namespace.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.simple_name),
            _ => self.simple_name.clone(),
        }
    }

    pub fn find_method(&self, name: &str) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A self-describing module: a named, versioned set of types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub types: Vec<ClassDef>,
}

/// Registry of classes, indexed by both simple and fully-qualified name.
/// Built once when a module is registered with the interpreter and
/// consulted by overload resolution and `newobj`/`isinst`/`castclass`.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassDef>,
    by_simple_name: HashMap<String, Vec<usize>>,
    by_qualified_name: HashMap<String, usize>,
}

/// An opaque handle into the class registry. Stable for the lifetime of the
/// registry (classes are never removed or reordered once registered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every class in `module`, indexing it under its simple and
    /// qualified names. Registering a second module adds to the same
    /// registry rather than replacing it.
    pub fn register_module(&mut self, module: Module) {
        for class in module.types {
            self.register_class(class);
        }
    }

    pub fn register_class(&mut self, class: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len());
        let qualified = class.qualified_name();
        self.by_qualified_name.insert(qualified, id.0);
        self.by_simple_name
            .entry(class.simple_name.clone())
            .or_default()
            .push(id.0);
        self.classes.push(class);
        id
    }

    pub fn get(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0]
    }

    /// Resolve a class by, in order: exact qualified name, exact simple
    /// name (if unambiguous), or suffix match on `.Name` (spec.md §4.4
    /// step 1). Returns `None` rather than erroring — callers attach the
    /// appropriate `VmError` variant with call-site context.
    pub fn resolve(&self, name: &str) -> Option<ClassId> {
        if let Some(&idx) = self.by_qualified_name.get(name) {
            return Some(ClassId(idx));
        }
        if let Some(ids) = self.by_simple_name.get(name) {
            if let [only] = ids.as_slice() {
                return Some(ClassId(*only));
            }
        }
        let suffix = format!(".{name}");
        let mut matches = self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.qualified_name().ends_with(&suffix) || c.simple_name == name);
        let first = matches.next()?;
        if matches.next().is_none() {
            Some(ClassId(first.0))
        } else {
            None
        }
    }

    /// Walk `id` and its ancestors (base classes), innermost first.
    pub fn ancestry(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = vec![id];
        let mut current = self.get(id);
        while let Some(base_name) = &current.base_class {
            match self.resolve(base_name) {
                Some(base_id) if !chain.contains(&base_id) => {
                    chain.push(base_id);
                    current = self.get(base_id);
                }
                _ => break,
            }
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
