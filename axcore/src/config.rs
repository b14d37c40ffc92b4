//! Weave configuration.
//!
//! Every naming convention the weave relies on is a field here so hosts can
//! retarget the engine (different framework namespaces, different generated
//! prefixes) without touching code. Defaults cover the stock framework
//! conventions.
use std::path::{Path, PathBuf};

use axinstr::units::operand::TypeName;
use serde::{Deserialize, Serialize};

use crate::{
    magic::{
        CALL_ID_TYPE, CONNECTION_TYPE, ENV_WEAVE_CONFIG_PATH, HOOK_MANAGER_TYPE, HOOK_UNIT_MARKER,
        HOOKED_BASE_TYPE, LOGIC_METHOD_PREFIX, MARKER_ATTRIBUTE, POST_HOOK_METHOD, PRE_HOOK_METHOD,
        RUNTIME_UNIT_NAME,
    },
    utils::error::{AxError, AxResult},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Name of the framework runtime unit; consulted by host prefilters and
    /// never treated as the hook unit.
    pub runtime_unit: String,

    /// A unit whose name contains this substring is the hook-defining unit.
    pub hook_unit_marker: String,

    /// Simple name of the manager type defining both hook methods.
    pub hook_manager_type: String,

    /// Name of the hook called at entry of a hooked method.
    pub pre_hook_method: String,

    /// Name of the hook called before every return of a hooked method.
    pub post_hook_method: String,

    /// Prefix the upstream splitting pass puts on generated logic bodies.
    pub logic_method_prefix: String,

    /// Full name of the base type whose subclasses are scanned.
    pub hooked_base_type: TypeName,

    /// Full name of the marker attribute identifying hooked methods.
    pub marker_attribute: TypeName,

    /// Full name of the forwarded call-id parameter type.
    pub call_id_type: TypeName,

    /// Full name of the forwarded connection parameter type.
    pub connection_type: TypeName,

    /// When true, a signature mismatch aborts processing of the remaining
    /// methods of the unit instead of skipping just the offending method.
    /// The mismatch is surfaced as an error diagnostic either way.
    pub abort_unit_on_bad_signature: bool,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        WeaveConfig {
            runtime_unit: RUNTIME_UNIT_NAME.to_string(),
            hook_unit_marker: HOOK_UNIT_MARKER.to_string(),
            hook_manager_type: HOOK_MANAGER_TYPE.to_string(),
            pre_hook_method: PRE_HOOK_METHOD.to_string(),
            post_hook_method: POST_HOOK_METHOD.to_string(),
            logic_method_prefix: LOGIC_METHOD_PREFIX.to_string(),
            hooked_base_type: TypeName::from(HOOKED_BASE_TYPE),
            marker_attribute: TypeName::from(MARKER_ATTRIBUTE),
            call_id_type: TypeName::from(CALL_ID_TYPE),
            connection_type: TypeName::from(CONNECTION_TYPE),
            abort_unit_on_bad_signature: false,
        }
    }
}

impl WeaveConfig {
    /// Get the default path to the weave configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_WEAVE_CONFIG_PATH) {
            return config_path.into();
        }

        // Fallback to default paths based on OS
        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }

            path.push("axon");
            path.push("weave.toml");
        }
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }

            path.push("axon");
            path.push("weave.toml");
        }

        path
    }

    /// Load a WeaveConfig from a TOML file. Missing keys fall back to the
    /// stock conventions.
    pub fn load_from_toml(path: &Path) -> AxResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        toml::from_str(&toml_str).map_err(|e| AxError::ConfigParseError {
            source: e,
            file: path.display().to_string(),
        })
    }

    /// Save this WeaveConfig to a TOML file.
    pub fn save_to_toml(&self, path: &Path) -> AxResult<()> {
        let toml_str = toml::to_string(self).map_err(|e| {
            AxError::Unknown(format!(
                "Failed during serialization of TOML to path `{}`: {}",
                path.display(),
                e
            ))
        })?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_conventions() {
        let config = WeaveConfig::default();
        assert_eq!(config.hook_unit_marker, "AsyncRpc");
        assert_eq!(config.logic_method_prefix, "RpcLogic___");
        assert_eq!(config.call_id_type.as_str(), "System.Int32");
        assert!(!config.abort_unit_on_bad_signature);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: WeaveConfig =
            toml::from_str(r#"hook_unit_marker = "MyRpcUnit""#).expect("valid toml");
        assert_eq!(config.hook_unit_marker, "MyRpcUnit");
        assert_eq!(config.hook_manager_type, "AsyncRpcCallManager");
    }
}
