//! Shared operand and reference types for instruction streams.
//!
//! Instructions reference three kinds of values: argument slots (`ArgSlot`),
//! in-stream targets (`InstrOffset`) and methods possibly defined in another
//! unit (`MethodRef`). Cross-unit type references are plain fully qualified
//! names (`TypeName`) because the referenced unit may not have been presented
//! yet; resolution is a separate, fallible step.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fully qualified type name, e.g. `FishNet.Connection.NetworkConnection`.
///
/// Used wherever a type in a possibly-different unit must be referenced.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeName(pub String);

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The simple (namespace-stripped) name.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        TypeName(s.to_string())
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        TypeName(s)
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argument slot index for `LdArg`.
///
/// On instance methods slot 0 is the implicit `this`; declared parameters
/// start at slot 1. Static methods start their parameters at slot 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArgSlot(pub u16);

impl std::fmt::Display for ArgSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "arg.{}", self.0)
    }
}

/// Absolute instruction index inside a method body, used as a branch target.
///
/// Stream edits that insert instructions must keep these consistent; see
/// `weave::editor::insert_ops`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrOffset(pub u32);

impl std::fmt::Display for InstrOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Reference to a method by declaring type and name.
///
/// The declaring type may live in a unit other than the one whose stream
/// contains the call; the reference stays symbolic until the host links the
/// rewritten unit.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodRef {
    pub declaring_type: TypeName,
    pub name: String,
}

impl MethodRef {
    pub fn new(declaring_type: impl Into<TypeName>, name: impl Into<String>) -> Self {
        MethodRef {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for MethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}
