//! Hook registry and deferred dispatch queue.
//!
//! The unit defining the hook methods may be compiled before or after the
//! units containing hooked methods, and the order is not ours to choose.
//! The registry decouples the two: a rewrite request submitted before the
//! hooks are known is buffered; the moment [`HookRegistry::publish`] runs,
//! the buffer drains in discovery order, and every request submitted
//! afterwards dispatches immediately. One registry spans one build session,
//! alongside its [`WeaveSession`](crate::session::WeaveSession).
use std::{collections::VecDeque, sync::Arc};

use axinstr::{
    units::{Unit, operand::MethodRef},
    weave::{editor::ForwardedSlots, inject_hooks, resolve_logic_body},
};
use log::{debug, trace, warn};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::session::WeaveSession;

/// The two resolved hook methods. Set at most once per build session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookPair {
    pub pre: MethodRef,
    pub post: MethodRef,
}

/// Which rewrite a request applies once the hooks are known.
///
/// A tagged strategy rather than a captured closure, so requests can be
/// inspected and the registry tested without carrying rewrite logic as
/// first-class functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteStrategy {
    /// Call the pre hook at entry and the post hook before every return of
    /// the resolved logic body, forwarding the validated argument slots.
    PrePostCall,
}

impl RewriteStrategy {
    fn apply(self, request: &HookRequest, pair: &HookPair) {
        match self {
            RewriteStrategy::PrePostCall => pre_post_call(request, pair),
        }
    }
}

/// One "this method needs hooks" command.
///
/// Consumed exactly once: immediately when the hooks are already published,
/// otherwise after buffering. Holds the unit handle so a rewrite draining
/// after the unit's own pass still lands in the storage the host will emit.
pub struct HookRequest {
    pub unit: Arc<RwLock<Unit>>,
    pub type_id: Uuid,
    pub method_id: Uuid,
    /// Slots validated against the original method's signature at discovery
    /// time.
    pub slots: ForwardedSlots,
    pub strategy: RewriteStrategy,
    /// Session of the pass that discovered the method; rewrite diagnostics
    /// attach here.
    pub session: Arc<WeaveSession>,
}

/// Session-scoped registry pairing buffered requests with the hook methods
/// once they exist.
#[derive(Default)]
pub struct HookRegistry {
    pair: Option<HookPair>,
    queue: VecDeque<HookRequest>,
}

impl HookRegistry {
    pub fn new() -> Self {
        HookRegistry::default()
    }

    /// Whether `publish` has run this session.
    pub fn hooks_available(&self) -> bool {
        self.pair.is_some()
    }

    /// Number of requests waiting for the hooks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatches `request` now if the hooks are known, otherwise buffers
    /// it in discovery order.
    pub fn submit(&mut self, request: HookRequest) {
        match &self.pair {
            Some(pair) => request.strategy.apply(&request, pair),
            None => self.queue.push_back(request),
        }
    }

    /// Makes the hook pair available and drains the buffer in insertion
    /// order.
    ///
    /// Publishing twice in one session is a configuration smell (two units
    /// matched the hook-unit marker): the pair is overwritten for future
    /// submissions, but requests drained under the previous pair are gone
    /// from the queue and are never re-invoked.
    pub fn publish(&mut self, pre: MethodRef, post: MethodRef) {
        if self.pair.is_some() {
            warn!(
                "hook pair published more than once in this build session; \
                 overwriting with `{}` / `{}`",
                pre, post
            );
        }
        let pair = HookPair { pre, post };
        debug!(
            "hooks available (`{}` / `{}`); draining {} buffered request(s)",
            pair.pre,
            pair.post,
            self.queue.len()
        );
        while let Some(request) = self.queue.pop_front() {
            request.strategy.apply(&request, &pair);
        }
        self.pair = Some(pair);
    }
}

/// The pre/post rewrite: resolve the logic body, weave the calls in.
fn pre_post_call(request: &HookRequest, pair: &HookPair) {
    let mut unit = request.unit.write();
    let unit_name = unit.name.clone();

    let Some(ty) = unit.types.get_mut(&request.type_id) else {
        trace!(
            "type {} vanished from unit `{}` before rewrite; dropping request",
            request.type_id, unit_name
        );
        return;
    };
    let Some(original_name) = ty
        .methods
        .iter()
        .find(|m| m.uuid == request.method_id)
        .map(|m| m.name.clone())
    else {
        trace!(
            "method {} vanished from `{}` before rewrite; dropping request",
            request.method_id, ty.full_name
        );
        return;
    };

    // A miss is a legal ordering of generation passes, not a failure: the
    // pass producing the body has not run. Drop the request.
    let Some(index) = resolve_logic_body(ty, &original_name, &request.session.config.logic_method_prefix)
    else {
        return;
    };

    let body_name = ty.methods[index].name.clone();
    inject_hooks(
        &mut ty.methods[index].body,
        &pair.pre,
        &pair.post,
        &request.slots,
    );
    debug!(
        "wove hooks into `{}::{}` (unit `{}`)",
        ty.full_name, body_name, unit_name
    );
}
