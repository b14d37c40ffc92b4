/// Name of the framework's own runtime unit. Never rewritten.
pub const RUNTIME_UNIT_NAME: &str = "FishNet.Runtime";

/// Substring identifying the unit that defines the hook methods.
pub const HOOK_UNIT_MARKER: &str = "AsyncRpc";

/// Simple name of the manager type carrying the hook methods.
pub const HOOK_MANAGER_TYPE: &str = "AsyncRpcCallManager";

/// Hook invoked when a hooked method starts executing.
pub const PRE_HOOK_METHOD: &str = "StartServerRpc";

/// Hook invoked right before a hooked method returns.
pub const POST_HOOK_METHOD: &str = "EndServerRpc";

/// Prefix the upstream splitting pass puts on generated logic bodies.
pub const LOGIC_METHOD_PREFIX: &str = "RpcLogic___";

/// Full name of the base type whose subclasses are scanned for hooked
/// methods.
pub const HOOKED_BASE_TYPE: &str = "FishNet.Object.NetworkBehaviour";

/// Full name of the marker attribute identifying hooked methods.
pub const MARKER_ATTRIBUTE: &str = "AsyncRpcAttribute";

/// Full name of the forwarded call-id parameter type.
pub const CALL_ID_TYPE: &str = "System.Int32";

/// Full name of the forwarded connection parameter type.
pub const CONNECTION_TYPE: &str = "FishNet.Connection.NetworkConnection";

/// Name of the environment variable containing the path to the weave
/// configuration file. If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/axon/weave.toml` or `$HOME/.config/axon/weave.toml`
///  (2) on Windows: `%APPDATA%\axon\weave.toml`
pub const ENV_WEAVE_CONFIG_PATH: &str = "AXON_CONFIG_PATH";
