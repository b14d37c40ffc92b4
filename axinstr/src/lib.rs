//! In-memory model of compiled code units and the hook-weaving edits over them.
//!
//! `axinstr` holds the descriptor types a build session manipulates (units,
//! type definitions, method definitions and their instruction streams) plus
//! the pure rewrite logic: resolving which generated body to edit and weaving
//! pre/post hook calls into it. Engine state (sessions, the deferred hook
//! registry, unit pipelines) lives in `axcore`.

pub mod units;
pub mod utils;
pub mod weave;
