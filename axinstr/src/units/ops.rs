//! Instruction stream operations.
//!
//! A method body is a flat, ordered `Vec<Op>`. The set is deliberately the
//! small stack-machine subset hook weaving needs to read and emit: argument
//! loads, an integer literal, calls, returns, offset branches and `Nop`.
//! Each operation is a small struct with public fields; the `Opcode` trait
//! gives uniform operand iteration over all of them.
use auto_enums::auto_enum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

use crate::units::operand::{ArgSlot, InstrOffset, MethodRef};

/// An operand as seen by stream inspection.
#[derive(Clone, Debug, PartialEq, Eq, EnumIs)]
pub enum OperandRef<'a> {
    /// An argument slot being loaded.
    Slot(ArgSlot),
    /// An immediate 32-bit integer.
    Const(i32),
    /// A branch target inside the same body.
    Target(InstrOffset),
    /// A called method.
    Method(&'a MethodRef),
}

/// Common interface implemented by every operation node.
pub trait Opcode {
    /// Iterate over this operation's operands.
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>>;

    /// Mutable access to the branch target, for operations that have one.
    fn target_mut(&mut self) -> Option<&mut InstrOffset> {
        None
    }
}

/// Push an argument slot onto the evaluation stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LdArg {
    pub slot: ArgSlot,
}

impl Opcode for LdArg {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::once(OperandRef::Slot(self.slot))
    }
}

/// Push a 32-bit integer constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LdcI4 {
    pub value: i32,
}

impl Opcode for LdcI4 {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::once(OperandRef::Const(self.value))
    }
}

/// Call a method, consuming its arguments from the evaluation stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    pub target: MethodRef,
}

impl Opcode for Call {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::once(OperandRef::Method(&self.target))
    }
}

/// Return from the method. The value, if any, is on the evaluation stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ret;

impl Opcode for Ret {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::empty()
    }
}

/// Unconditional branch to an instruction index in the same body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Br {
    pub target: InstrOffset,
}

impl Opcode for Br {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::once(OperandRef::Target(self.target))
    }

    fn target_mut(&mut self) -> Option<&mut InstrOffset> {
        Some(&mut self.target)
    }
}

/// Branch if the value on the evaluation stack is zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrFalse {
    pub target: InstrOffset,
}

impl Opcode for BrFalse {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::once(OperandRef::Target(self.target))
    }

    fn target_mut(&mut self) -> Option<&mut InstrOffset> {
        Some(&mut self.target)
    }
}

/// No operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Nop;

impl Opcode for Nop {
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        std::iter::empty()
    }
}

/// Discriminated union covering all operation kinds.
///
/// Use this enum to store heterogeneous instruction streams and to
/// pattern-match on specific operations. The generated `OpKind` discriminant
/// (via `strum`) can be helpful for fast classification.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(OpKind))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    LdArg(LdArg),
    LdcI4(LdcI4),
    Call(Call),
    Ret(Ret),
    Br(Br),
    BrFalse(BrFalse),
    Nop(Nop),
}

impl Op {
    /// Shorthand constructor for an argument load.
    pub fn ldarg(slot: ArgSlot) -> Self {
        Op::LdArg(LdArg { slot })
    }

    /// Shorthand constructor for a call.
    pub fn call(target: MethodRef) -> Self {
        Op::Call(Call { target })
    }

    /// Shorthand constructor for a return.
    pub fn ret() -> Self {
        Op::Ret(Ret)
    }
}

impl Opcode for Op {
    #[auto_enum(Iterator)]
    fn operands(&self) -> impl Iterator<Item = OperandRef<'_>> {
        match self {
            Op::LdArg(op) => op.operands(),
            Op::LdcI4(op) => op.operands(),
            Op::Call(op) => op.operands(),
            Op::Ret(op) => op.operands(),
            Op::Br(op) => op.operands(),
            Op::BrFalse(op) => op.operands(),
            Op::Nop(op) => op.operands(),
        }
    }

    fn target_mut(&mut self) -> Option<&mut InstrOffset> {
        match self {
            Op::Br(op) => op.target_mut(),
            Op::BrFalse(op) => op.target_mut(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::LdArg(op) => write!(f, "ldarg {}", op.slot),
            Op::LdcI4(op) => write!(f, "ldc.i4 {}", op.value),
            Op::Call(op) => write!(f, "call {}", op.target),
            Op::Ret(_) => write!(f, "ret"),
            Op::Br(op) => write!(f, "br {}", op.target),
            Op::BrFalse(op) => write!(f, "brfalse {}", op.target),
            Op::Nop(_) => write!(f, "nop"),
        }
    }
}
