//! Hook method resolution on the hook-defining unit.
use axinstr::units::{Unit, operand::MethodRef};

use crate::{
    config::WeaveConfig,
    registry::HookPair,
    utils::error::{AxError, AxResult},
};

/// Resolves the pre/post hook pair from the hook-defining unit.
///
/// The manager type is matched by exact simple name among the unit's
/// top-level types, the hook methods by exact name on it. Absence of either
/// is a configuration error the build must fail on; there is nothing to
/// degrade to.
pub fn resolve_hooks(unit: &Unit, config: &WeaveConfig) -> AxResult<HookPair> {
    let manager = unit
        .type_by_simple_name(&config.hook_manager_type)
        .ok_or_else(|| AxError::HookManagerTypeMissing {
            unit: unit.name.clone(),
            type_name: config.hook_manager_type.clone(),
        })?;

    let lookup = |name: &str| {
        manager
            .method_by_name(name)
            .map(|method| MethodRef::new(manager.full_name.clone(), method.name.clone()))
            .ok_or_else(|| AxError::HookMethodMissing {
                unit: unit.name.clone(),
                type_name: manager.full_name.to_string(),
                method: name.to_string(),
            })
    };

    let pre = lookup(&config.pre_hook_method)?;
    let post = lookup(&config.post_hook_method)?;
    Ok(HookPair { pre, post })
}
