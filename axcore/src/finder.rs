//! Hook unit recognition.
//!
//! Pure name tests; no state. The hook-defining unit is identified by a
//! marker substring in its declared name, the framework runtime unit by
//! exact name.
use crate::config::WeaveConfig;

/// Whether `unit_name` names the unit defining the hook methods.
///
/// The runtime unit is never the hook unit, whatever its name contains.
pub fn is_hook_unit(unit_name: &str, config: &WeaveConfig) -> bool {
    !is_runtime_unit(unit_name, config) && unit_name.contains(&config.hook_unit_marker)
}

/// Whether `unit_name` names the framework's own runtime unit. Host
/// prefilters consult this; the weave never rewrites it.
pub fn is_runtime_unit(unit_name: &str, config: &WeaveConfig) -> bool {
    unit_name == config.runtime_unit
}
