use thiserror::Error;

/// Raised while creating or updating controls. These are configuration or
/// user errors and are surfaced straight to the caller; nothing retries them.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("invalid bounds for `{id}`: {reason}")]
    InvalidBounds { id: String, reason: String },

    #[error("value {value} for `{id}` is outside [{min}, {max}]")]
    OutOfRange {
        id: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("`{value}` is not one of the options for `{id}`: {options:?}")]
    InvalidChoice {
        id: String,
        value: String,
        options: Vec<String>,
    },

    #[error("`{id}` expects {expected}, got {got}")]
    TypeMismatch {
        id: String,
        expected: &'static str,
        got: String,
    },

    #[error("no control named `{0}`")]
    UnknownControl(String),

    #[error("a control named `{0}` already exists")]
    DuplicateControl(String),
}

impl ControlError {
    pub(crate) fn invalid_bounds(
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidBounds {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
