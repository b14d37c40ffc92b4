use strum::EnumIs;
use thiserror::Error;

use crate::units::operand::TypeName;

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// A hooked method does not declare a parameter of a type the hooks
    /// forward.
    #[error(
        "Method `{method}` of type `{declaring_type}` does not declare a parameter of type `{expected}`. Hooked methods must carry both forwarded parameters, e.g. `void MyRpc(int callId, NetworkConnection connection)`."
    )]
    MissingForwardedSlot {
        declaring_type: TypeName,
        method: String,
        expected: TypeName,
    },
}
