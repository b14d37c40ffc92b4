use axinstr::{
    units::{
        MethodDef, Param, TypeDef,
        operand::{ArgSlot, InstrOffset, MethodRef, TypeName},
        ops::{Br, LdcI4, Nop, Op, Ret},
    },
    utils::Error,
    weave::{forwarded_slots, inject_hooks, resolve_logic_body},
};

const CALL_ID_TYPE: &str = "System.Int32";
const CONNECTION_TYPE: &str = "FishNet.Connection.NetworkConnection";

fn pre_hook() -> MethodRef {
    MethodRef::new("Game.AsyncRpcCallManager", "StartServerRpc")
}

fn post_hook() -> MethodRef {
    MethodRef::new("Game.AsyncRpcCallManager", "EndServerRpc")
}

fn hooked_method(name: &str, body: Vec<Op>) -> MethodDef {
    MethodDef::new(name)
        .with_params(vec![
            Param::new("callId", CALL_ID_TYPE),
            Param::new("connection", CONNECTION_TYPE),
        ])
        .with_body(body)
}

fn call_offsets(body: &[Op], hook: &MethodRef) -> Vec<usize> {
    body.iter()
        .enumerate()
        .filter_map(|(offset, op)| match op {
            Op::Call(call) if &call.target == hook => Some(offset),
            _ => None,
        })
        .collect()
}

#[test]
fn two_returns_get_one_pre_and_two_post_call_sites() {
    let method = hooked_method(
        "DoThing",
        vec![
            Op::LdcI4(LdcI4 { value: 1 }),
            Op::Ret(Ret),
            Op::Nop(Nop),
            Op::Ret(Ret),
        ],
    );
    let declaring = TypeName::from("Game.T");
    let slots = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect("signature should match");

    let mut body = method.body.clone();
    inject_hooks(&mut body, &pre_hook(), &post_hook(), &slots);

    // Entry sequence: ldarg 1, ldarg 2, call pre.
    assert_eq!(body[0], Op::ldarg(ArgSlot(1)));
    assert_eq!(body[1], Op::ldarg(ArgSlot(2)));
    assert_eq!(call_offsets(&body, &pre_hook()), vec![2]);

    let posts = call_offsets(&body, &post_hook());
    assert_eq!(posts.len(), 2, "each return gets its own post-call site");
    let rets: Vec<usize> = body
        .iter()
        .enumerate()
        .filter_map(|(offset, op)| op.is_ret().then_some(offset))
        .collect();
    assert_eq!(rets.len(), 2, "no return should be added or removed");
    for (post, ret) in posts.iter().zip(rets.iter()) {
        assert_eq!(
            post + 1,
            *ret,
            "post-call must sit immediately before its return"
        );
    }
}

#[test]
fn body_without_return_gets_synthesized_return() {
    let method = hooked_method("FireAndForget", vec![Op::Nop(Nop)]);
    let declaring = TypeName::from("Game.T");
    let slots = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect("signature should match");

    let mut body = method.body.clone();
    inject_hooks(&mut body, &pre_hook(), &post_hook(), &slots);

    assert_eq!(call_offsets(&body, &pre_hook()), vec![2]);
    assert_eq!(call_offsets(&body, &post_hook()).len(), 1);
    assert!(
        body.last().expect("body not empty").is_ret(),
        "a return must be synthesized at the end"
    );
    let rets = body.iter().filter(|op| op.is_ret()).count();
    assert_eq!(rets, 1);
}

#[test]
fn branch_targets_keep_reaching_their_original_instruction() {
    // brfalse over the nop, then fall through to ret.
    let method = hooked_method(
        "Branchy",
        vec![
            Op::Br(Br {
                target: InstrOffset(2),
            }),
            Op::Nop(Nop),
            Op::LdcI4(LdcI4 { value: 7 }),
            Op::Ret(Ret),
        ],
    );
    let declaring = TypeName::from("Game.T");
    let slots = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect("signature should match");

    let mut body = method.body.clone();
    inject_hooks(&mut body, &pre_hook(), &post_hook(), &slots);

    let br_target = body
        .iter()
        .find_map(|op| match op {
            Op::Br(br) => Some(br.target),
            _ => None,
        })
        .expect("branch survives the edit");
    assert_eq!(
        body[br_target.0 as usize],
        Op::LdcI4(LdcI4 { value: 7 }),
        "the branch must still reach the instruction it originally named"
    );
}

#[test]
fn forwarded_slots_match_by_type_in_hook_order() {
    // Parameters declared connection-first; forwarding order is still
    // call id then connection.
    let method = MethodDef::new("Reversed").with_params(vec![
        Param::new("connection", CONNECTION_TYPE),
        Param::new("callId", CALL_ID_TYPE),
    ]);
    let declaring = TypeName::from("Game.T");
    let slots = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect("signature should match");
    assert_eq!(&slots[..], &[ArgSlot(2), ArgSlot(1)]);
}

#[test]
fn static_methods_have_no_this_slot() {
    let method = hooked_method("StaticRpc", Vec::new()).into_static();
    let declaring = TypeName::from("Game.T");
    let slots = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect("signature should match");
    assert_eq!(&slots[..], &[ArgSlot(0), ArgSlot(1)]);
}

#[test]
fn missing_forwarded_parameter_is_a_signature_mismatch() {
    let method = MethodDef::new("Broken").with_params(vec![Param::new("callId", CALL_ID_TYPE)]);
    let declaring = TypeName::from("Game.T");
    let err = forwarded_slots(
        &method,
        &declaring,
        &TypeName::from(CALL_ID_TYPE),
        &TypeName::from(CONNECTION_TYPE),
    )
    .expect_err("connection parameter is absent");
    assert!(matches!(err, Error::MissingForwardedSlot { expected, .. }
        if expected == TypeName::from(CONNECTION_TYPE)));
}

#[test]
fn logic_body_resolution_prefers_generated_variant() {
    let ty = TypeDef::new("Game.T")
        .with_method(MethodDef::new("DoThing"))
        .with_method(MethodDef::new("RpcLogic___DoThing_214748364"));
    let index = resolve_logic_body(&ty, "DoThing", "RpcLogic___").expect("candidate expected");
    assert_eq!(ty.methods[index].name, "RpcLogic___DoThing_214748364");
}
