//! Compiled-unit descriptors.
//!
//! A `Unit` is one independently compiled module: a name, the names of the
//! units it references, and the class-like types it defines. Descriptors are
//! rebuilt for every processing pass; nothing here survives a build session.
//!
//! Base-type references are symbolic (`TypeName`): the unit defining the base
//! may not have been presented yet, so resolving an ancestor is always
//! fallible and a failed resolution simply ends the chain.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::{operand::TypeName, ops::Op};

pub mod operand;
pub mod ops;

/// A declared method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeName,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Param {
            name: Some(name.into()),
            ty: ty.into(),
        }
    }
}

/// A method: name, parameters, attribute tags and a mutable instruction
/// stream.
///
/// Two methods may share a simple name within one type (generated
/// writer/logic/reader variants do); identity is declaring type plus `uuid`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodDef {
    pub uuid: Uuid,
    pub name: String,
    /// Static methods have no implicit `this` slot.
    pub is_static: bool,
    pub params: Vec<Param>,
    /// Full names of the attribute types carried by this method. Presence
    /// only; the attributes carry no data.
    pub attributes: Vec<TypeName>,
    pub body: Vec<Op>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>) -> Self {
        MethodDef {
            uuid: Uuid::new_v4(),
            name: name.into(),
            is_static: false,
            params: Vec::new(),
            attributes: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<TypeName>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_body(mut self, body: Vec<Op>) -> Self {
        self.body = body;
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn has_attribute(&self, attribute: &TypeName) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

/// A class-like type: simple and full name, an optional base-type reference
/// and an ordered method list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeDef {
    pub uuid: Uuid,
    /// Simple name, e.g. `AsyncRpcCallManager`.
    pub name: String,
    /// Fully qualified name, unique across the build session.
    pub full_name: TypeName,
    /// Symbolic base-type reference; `None` at the top of a hierarchy.
    pub base: Option<TypeName>,
    /// Declaration order is meaningful and preserved.
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    pub fn new(full_name: impl Into<TypeName>) -> Self {
        let full_name = full_name.into();
        TypeDef {
            uuid: Uuid::new_v4(),
            name: full_name.simple_name().to_string(),
            full_name,
            base: None,
            methods: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// First method with the given name, in declaration order.
    pub fn method_by_name(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Index of the method with the given uuid.
    pub fn method_index(&self, uuid: Uuid) -> Option<usize> {
        self.methods.iter().position(|m| m.uuid == uuid)
    }
}

/// One compiled module as presented by the host pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unit {
    pub name: String,
    /// Names of the units this unit references.
    pub references: Vec<String>,
    pub types: BTreeMap<Uuid, TypeDef>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Unit {
            name: name.into(),
            references: Vec::new(),
            types: BTreeMap::new(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    /// Adds a type and returns its uuid.
    pub fn push_type(&mut self, ty: TypeDef) -> Uuid {
        let uuid = ty.uuid;
        self.types.insert(uuid, ty);
        uuid
    }

    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.push_type(ty);
        self
    }

    /// First top-level type with the given simple name.
    pub fn type_by_simple_name(&self, name: &str) -> Option<&TypeDef> {
        self.types.values().find(|t| t.name == name)
    }

    /// Type with the given full name, if defined in this unit.
    pub fn type_by_full_name(&self, name: &TypeName) -> Option<&TypeDef> {
        self.types.values().find(|t| &t.full_name == name)
    }

    /// Drops any reference entry naming this unit itself. Some toolchains
    /// leave one behind and a self-reference breaks write-out on the host
    /// side.
    pub fn prune_self_references(&mut self) {
        let name = self.name.clone();
        self.references.retain(|r| r != &name);
    }
}

/// Reflection capability the engine consumes instead of a concrete metadata
/// stack: cross-unit type lookup and marker-attribute queries.
///
/// Implementations decide where types come from (a session cache over the
/// units seen so far, a fixed fixture in tests) and what counts as the
/// marker.
pub trait TypeResolver {
    /// Resolve a full type name to its definition, if known. `None` is an
    /// expected outcome for references into units not presented yet.
    fn find_type(&self, name: &TypeName) -> Option<TypeDef>;

    /// Whether the method carries the marker attribute.
    fn has_marker(&self, method: &MethodDef) -> bool;
}
