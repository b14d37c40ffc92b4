use axinstr::units::operand::TypeName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AxError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse weave configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    /// The hook unit was recognized but does not define the manager type.
    #[error(
        "Hook unit `{unit}` does not define the manager type `{type_name}`. The weave cannot proceed without it."
    )]
    HookManagerTypeMissing { unit: String, type_name: String },

    /// The manager type exists but one of the two hook methods is absent.
    #[error(
        "Manager type `{type_name}` in unit `{unit}` does not define the hook method `{method}`."
    )]
    HookMethodMissing {
        unit: String,
        type_name: String,
        method: String,
    },

    /// A hooked method does not carry the forwarded parameters. Carries the
    /// offending type/method names for the diagnostic trail.
    #[error("Signature mismatch on `{declaring_type}::{method}`: {source}")]
    SignatureMismatch {
        declaring_type: TypeName,
        method: String,
        source: axinstr::utils::Error,
    },

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

pub type AxResult<T> = Result<T, AxError>;
