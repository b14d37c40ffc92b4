use std::sync::Arc;

use axcore::{
    config::WeaveConfig,
    registry::{HookRegistry, HookRequest, RewriteStrategy},
    session::WeaveSession,
};
use axinstr::{
    units::{
        MethodDef, Param, TypeDef, Unit,
        operand::MethodRef,
        ops::Op,
    },
    weave::forwarded_slots,
};
use parking_lot::RwLock;
use uuid::Uuid;

fn pre_hook(manager: &str) -> MethodRef {
    MethodRef::new(manager, "StartServerRpc")
}

fn post_hook(manager: &str) -> MethodRef {
    MethodRef::new(manager, "EndServerRpc")
}

/// A unit with one networked type carrying one marked method named `DoThing`.
fn behaviour_unit() -> (Arc<RwLock<Unit>>, Uuid, Uuid) {
    let config = WeaveConfig::default();
    let method = MethodDef::new("DoThing")
        .with_attribute(config.marker_attribute.clone())
        .with_params(vec![
            Param::new("callId", config.call_id_type.clone()),
            Param::new("connection", config.connection_type.clone()),
        ])
        .with_body(vec![Op::ret()]);
    let method_id = method.uuid;
    let ty = TypeDef::new("Game.T")
        .with_base(config.hooked_base_type)
        .with_method(method);
    let type_id = ty.uuid;
    let unit = Unit::new("Game.Logic").with_type(ty);
    (Arc::new(RwLock::new(unit)), type_id, method_id)
}

fn request_for(
    session: &Arc<WeaveSession>,
    unit: &Arc<RwLock<Unit>>,
    type_id: Uuid,
    method_id: Uuid,
) -> HookRequest {
    let slots = {
        let guard = unit.read();
        let ty = guard.types.get(&type_id).expect("type exists");
        let method = ty
            .methods
            .iter()
            .find(|m| m.uuid == method_id)
            .expect("method exists");
        forwarded_slots(
            method,
            &ty.full_name,
            &session.config.call_id_type,
            &session.config.connection_type,
        )
        .expect("fixture signature matches")
    };
    HookRequest {
        unit: Arc::clone(unit),
        type_id,
        method_id,
        slots,
        strategy: RewriteStrategy::PrePostCall,
        session: Arc::clone(session),
    }
}

fn body_of(unit: &Arc<RwLock<Unit>>, type_id: Uuid, method_id: Uuid) -> Vec<Op> {
    let guard = unit.read();
    guard.types[&type_id]
        .methods
        .iter()
        .find(|m| m.uuid == method_id)
        .expect("method exists")
        .body
        .clone()
}

#[test]
fn requests_buffer_until_hooks_are_published() {
    let session = WeaveSession::new(WeaveConfig::default());
    let mut registry = HookRegistry::new();
    let (unit, type_id, method_id) = behaviour_unit();

    registry.submit(request_for(&session, &unit, type_id, method_id));
    assert_eq!(registry.pending(), 1);
    assert!(!registry.hooks_available());
    assert_eq!(
        body_of(&unit, type_id, method_id),
        vec![Op::ret()],
        "nothing is rewritten before the hooks exist"
    );

    registry.publish(pre_hook("Game.M"), post_hook("Game.M"));
    assert_eq!(registry.pending(), 0);
    assert!(registry.hooks_available());

    let body = body_of(&unit, type_id, method_id);
    assert!(
        matches!(&body[2], Op::Call(call) if call.target == pre_hook("Game.M")),
        "drain must weave the buffered request"
    );
}

#[test]
fn submissions_after_publish_dispatch_immediately() {
    let session = WeaveSession::new(WeaveConfig::default());
    let mut registry = HookRegistry::new();
    let (unit, type_id, method_id) = behaviour_unit();

    registry.publish(pre_hook("Game.M"), post_hook("Game.M"));
    registry.submit(request_for(&session, &unit, type_id, method_id));

    assert_eq!(registry.pending(), 0);
    let body = body_of(&unit, type_id, method_id);
    assert!(matches!(&body[2], Op::Call(call) if call.target == pre_hook("Game.M")));
}

#[test]
fn republishing_never_reinvokes_drained_requests() {
    let session = WeaveSession::new(WeaveConfig::default());
    let mut registry = HookRegistry::new();
    let (unit, type_id, method_id) = behaviour_unit();

    registry.submit(request_for(&session, &unit, type_id, method_id));
    registry.publish(pre_hook("Game.First"), post_hook("Game.First"));
    let drained = body_of(&unit, type_id, method_id);

    registry.publish(pre_hook("Game.Second"), post_hook("Game.Second"));
    assert_eq!(
        body_of(&unit, type_id, method_id),
        drained,
        "a drained request must not be rewritten under the new pair"
    );

    // The overwritten pair applies to requests submitted from here on.
    let (unit2, type_id2, method_id2) = behaviour_unit();
    registry.submit(request_for(&session, &unit2, type_id2, method_id2));
    let body = body_of(&unit2, type_id2, method_id2);
    assert!(matches!(&body[2], Op::Call(call) if call.target == pre_hook("Game.Second")));
}

#[test]
fn buffered_requests_drain_in_discovery_order() {
    let session = WeaveSession::new(WeaveConfig::default());
    let mut registry = HookRegistry::new();
    let (unit_a, type_a, method_a) = behaviour_unit();
    let (unit_b, type_b, method_b) = behaviour_unit();

    registry.submit(request_for(&session, &unit_a, type_a, method_a));
    registry.submit(request_for(&session, &unit_b, type_b, method_b));
    assert_eq!(registry.pending(), 2);

    registry.publish(pre_hook("Game.M"), post_hook("Game.M"));
    assert_eq!(registry.pending(), 0);
    for (unit, type_id, method_id) in [
        (&unit_a, type_a, method_a),
        (&unit_b, type_b, method_b),
    ] {
        let body = body_of(unit, type_id, method_id);
        assert!(
            matches!(&body[2], Op::Call(call) if call.target == pre_hook("Game.M")),
            "every buffered request must be drained exactly once"
        );
    }
}

#[test]
fn vanished_target_method_drops_the_request_quietly() {
    let session = WeaveSession::new(WeaveConfig::default());
    let mut registry = HookRegistry::new();
    let (unit, type_id, method_id) = behaviour_unit();

    registry.submit(request_for(&session, &unit, type_id, method_id));
    unit.write()
        .types
        .get_mut(&type_id)
        .expect("type exists")
        .methods
        .clear();

    registry.publish(pre_hook("Game.M"), post_hook("Game.M"));
    assert_eq!(registry.pending(), 0);
    assert!(
        unit.read().types[&type_id].methods.is_empty(),
        "nothing must be resurrected or panicked on"
    );
}
