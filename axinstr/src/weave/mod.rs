//! Hook-weaving edits.
//!
//! Two pure pieces: [`naming`] picks which generated body of a hooked method
//! is the one that actually executes the logic, and [`editor`] performs the
//! instruction-stream edit that wraps that body in pre/post hook calls.
//! Neither holds state; everything operates on descriptors passed in.

pub mod editor;
pub mod naming;

pub use editor::{forwarded_slots, inject_hooks};
pub use naming::resolve_logic_body;
