//! Descriptor builders shared by tests.
use axinstr::units::{MethodDef, Param, TypeDef, Unit};

use crate::config::WeaveConfig;

/// A type deriving directly from the default hooked base type.
pub fn behaviour_type(full_name: &str) -> TypeDef {
    TypeDef::new(full_name).with_base(WeaveConfig::default().hooked_base_type)
}

/// A marked instance method with the expected hook signature and a plain
/// `ret` body.
pub fn marked_method(name: &str) -> MethodDef {
    let config = WeaveConfig::default();
    MethodDef::new(name)
        .with_attribute(config.marker_attribute)
        .with_params(vec![
            Param::new("callId", config.call_id_type),
            Param::new("connection", config.connection_type),
        ])
        .with_body(vec![axinstr::units::ops::Op::ret()])
}

/// A unit recognized as hook-defining, exposing both hook methods on the
/// manager type.
pub fn hook_unit() -> Unit {
    let config = WeaveConfig::default();
    let manager = TypeDef::new(format!("Game.{}", config.hook_manager_type))
        .with_method(MethodDef::new(config.pre_hook_method).into_static())
        .with_method(MethodDef::new(config.post_hook_method).into_static());
    Unit::new("Game.AsyncRpc").with_type(manager)
}
