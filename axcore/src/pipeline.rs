//! Per-unit processing.
//!
//! The host presents units one at a time; this module decides what each one
//! is and feeds the registry. The hook-defining unit publishes the hook pair
//! and passes through unmodified (`Ok(None)`). Every other unit is scanned:
//! its most-derived networked types are searched for marked methods and one
//! rewrite request per method is submitted. The returned handle is the
//! storage the host should emit; if the hooks are not known yet its bodies
//! are rewritten in place when they arrive, before the session ends.
use std::sync::Arc;

use axinstr::{units::Unit, weave::forwarded_slots};
use log::{debug, info};
use parking_lot::RwLock;

use crate::{
    axerror, finder, hierarchy, provider,
    registry::{HookRegistry, HookRequest, RewriteStrategy},
    scanner,
    session::WeaveSession,
    utils::error::{AxError, AxResult},
};

/// Processes one compiled unit.
///
/// Returns `Ok(None)` for the hook-defining unit (no rewritten output;
/// the unit passes through as-is) and `Ok(Some(handle))` for every other
/// unit. Host-side prefiltering (framework-internal units, units that do
/// not reference the runtime) is the host's responsibility and happens
/// before this call.
pub fn process_unit(
    session: &Arc<WeaveSession>,
    registry: &mut HookRegistry,
    unit: Arc<RwLock<Unit>>,
) -> AxResult<Option<Arc<RwLock<Unit>>>> {
    session.register_unit(Arc::clone(&unit));
    let unit_name = unit.read().name.clone();

    if finder::is_hook_unit(&unit_name, &session.config) {
        let pair = {
            let guard = unit.read();
            provider::resolve_hooks(&guard, &session.config)?
        };
        info!("unit `{}` defines the hooks; publishing", unit_name);
        registry.publish(pair.pre, pair.post);
        return Ok(None);
    }

    let mut pending: Vec<HookRequest> = Vec::new();
    {
        let guard = unit.read();
        let base = &session.config.hooked_base_type;

        let candidates = hierarchy::subclasses_of(&guard, base, session.as_ref());
        let leaves = hierarchy::most_derived(candidates, base, session.as_ref());

        for ty in leaves {
            for method in scanner::find_marked(ty, session.as_ref()) {
                let slots = match forwarded_slots(
                    method,
                    &ty.full_name,
                    &session.config.call_id_type,
                    &session.config.connection_type,
                ) {
                    Ok(slots) => slots,
                    Err(source) => {
                        let error = AxError::SignatureMismatch {
                            declaring_type: ty.full_name.clone(),
                            method: method.name.clone(),
                            source,
                        };
                        axerror!(session, "{}", error);
                        if session.config.abort_unit_on_bad_signature {
                            return Err(error);
                        }
                        continue;
                    }
                };
                pending.push(HookRequest {
                    unit: Arc::clone(&unit),
                    type_id: ty.uuid,
                    method_id: method.uuid,
                    slots,
                    strategy: RewriteStrategy::PrePostCall,
                    session: Arc::clone(session),
                });
            }
        }
    }

    unit.write().prune_self_references();

    let discovered = pending.len();
    for request in pending {
        registry.submit(request);
    }
    debug!(
        "unit `{}`: {} hooked method(s) discovered, {} request(s) now pending",
        unit_name,
        discovered,
        registry.pending()
    );

    Ok(Some(unit))
}
