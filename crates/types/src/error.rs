use thiserror::Error;

/// Errors raised while building or registering report definitions.
///
/// These are always fatal at construction/registration time; nothing is
/// silently replaced by a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {channel} component: {value} (must be in range 0 - 255)")]
    InvalidColorChannel { channel: &'static str, value: i64 },

    #[error("Invalid hex color '{0}': expected #RGB or #RRGGBB")]
    InvalidHexColor(String),

    #[error("Invalid variable type '{type_name}' for variable '{name}'")]
    InvalidVariableType { name: String, type_name: String },

    #[error("Invalid calculation type: {0}")]
    InvalidCalculationKind(String),

    #[error("Invalid reset value: {0} (expected 'end' or 'page')")]
    InvalidResetScope(String),

    #[error("Unregistered font name: {0}")]
    UnregisteredFont(String),

    #[error("Font '{0}' is already registered")]
    DuplicateFont(String),

    #[error("Font '{0}' declares no face names")]
    EmptyFontFaces(String),

    #[error("Invalid length '{0}'")]
    InvalidLength(String),

    #[error("Invalid text alignment '{0}' (expected left, center or right)")]
    InvalidAlignment(String),
}
