//! Instruction-stream edit that weaves pre/post hook calls into a body.
//!
//! The edit is local and order-preserving: the pre-hook call sequence is
//! prepended at offset 0, and every `ret` gets its own post-hook call
//! sequence inserted immediately before it. A body with no `ret` at all gets
//! the post-hook sequence plus a synthesized `ret` appended. Branch targets
//! are instruction indices, so every insertion shifts the targets that point
//! at or past the insertion point; a branch keeps reaching the instruction
//! it originally named.
use smallvec::SmallVec;

use crate::{
    units::{
        MethodDef,
        operand::{ArgSlot, MethodRef, TypeName},
        ops::{Op, Opcode},
    },
    utils::Error,
};

/// The argument slots a hooked method forwards to both hooks, in the order
/// the hooks expect them.
pub type ForwardedSlots = SmallVec<ArgSlot, 2>;

/// Locates the two forwarded parameter slots on `method`.
///
/// Slots are matched by parameter type, not name: the first parameter of
/// `call_id_type` and the first of `connection_type`, in that order. Slot
/// numbering accounts for the implicit `this` of instance methods. Either
/// parameter missing is a signature mismatch for that method and must be
/// surfaced by the caller.
pub fn forwarded_slots(
    method: &MethodDef,
    declaring_type: &TypeName,
    call_id_type: &TypeName,
    connection_type: &TypeName,
) -> Result<ForwardedSlots, Error> {
    let base = if method.is_static { 0u16 } else { 1u16 };

    let mut slots = ForwardedSlots::new();
    for expected in [call_id_type, connection_type] {
        let position = method
            .params
            .iter()
            .position(|p| &p.ty == expected)
            .ok_or_else(|| Error::MissingForwardedSlot {
                declaring_type: declaring_type.clone(),
                method: method.name.clone(),
                expected: expected.clone(),
            })?;
        slots.push(ArgSlot(base + position as u16));
    }
    Ok(slots)
}

/// Weaves the hook calls into `body`.
///
/// Inserts `ldarg` for each forwarded slot followed by `call pre` at offset
/// 0, unconditionally, before any branching the body performs. Then every
/// `ret` in the (already-shifted) stream gets the same load sequence plus
/// `call post` inserted immediately before it; N returns produce N
/// independent post-call sites. A body without any `ret` gets the post
/// sequence and a synthesized `ret` appended instead.
pub fn inject_hooks(body: &mut Vec<Op>, pre: &MethodRef, post: &MethodRef, slots: &[ArgSlot]) {
    insert_ops(body, 0, hook_call(slots, pre));

    let ret_offsets: Vec<usize> = body
        .iter()
        .enumerate()
        .filter_map(|(offset, op)| op.is_ret().then_some(offset))
        .collect();

    if ret_offsets.is_empty() {
        let end = body.len();
        insert_ops(body, end, hook_call(slots, post));
        body.push(Op::ret());
        return;
    }

    // Back to front so earlier offsets stay valid across insertions.
    for offset in ret_offsets.into_iter().rev() {
        insert_ops(body, offset, hook_call(slots, post));
    }
}

/// The load-and-call sequence for one hook call site.
fn hook_call(slots: &[ArgSlot], hook: &MethodRef) -> Vec<Op> {
    let mut ops: Vec<Op> = slots.iter().map(|slot| Op::ldarg(*slot)).collect();
    ops.push(Op::call(hook.clone()));
    ops
}

/// Inserts `ops` at `offset`, shifting every branch target that points at or
/// past the insertion point so branches keep reaching the instruction they
/// originally named.
pub fn insert_ops(body: &mut Vec<Op>, offset: usize, ops: Vec<Op>) {
    let shift = ops.len() as u32;
    for op in body.iter_mut() {
        if let Some(target) = op.target_mut() {
            if target.0 as usize >= offset {
                target.0 += shift;
            }
        }
    }
    body.splice(offset..offset, ops);
}
