//! Error types for console registries and evaluation.

use thiserror::Error;

use super::CVarType;

/// Result alias used throughout the console core.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors raised by the CVar and command registries.
///
/// None of these are fatal to the console: the [`Console`](super::Console)
/// turns every error caused by user input into a line of scrollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// A variable or command with this name is already registered.
    #[error("'{name}' is already registered")]
    DuplicateName {
        /// The rejected name.
        name: String,
    },

    /// The name is empty or contains whitespace and could never be typed.
    #[error("'{name}' is not a valid console name")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// No variable or command with this name is registered.
    #[error("'{name}' is not registered")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// A string could not be converted to the variable's declared type.
    #[error("cannot convert \"{value}\" to {ty} for '{name}'")]
    Conversion {
        /// The variable being read or written.
        name: String,
        /// The offending string.
        value: String,
        /// The type the string was converted to.
        ty: CVarType,
    },

    /// The declared type has no entry in the conversion table.
    #[error("no conversion registered for type {ty}")]
    UnknownType {
        /// The unsupported type tag.
        ty: CVarType,
    },

    /// A declarative binding is missing an accessor or is otherwise unusable.
    #[error("invalid binding for '{name}': {reason}")]
    Binding {
        /// The descriptor name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ConsoleError {
    /// Create a [`ConsoleError::NotFound`].
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a [`ConsoleError::Conversion`].
    pub fn conversion(name: impl Into<String>, value: impl Into<String>, ty: CVarType) -> Self {
        Self::Conversion {
            name: name.into(),
            value: value.into(),
            ty,
        }
    }

    /// Create a [`ConsoleError::Binding`].
    pub fn binding(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Binding {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from a failed type conversion.
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }
}

/// Check that a name can be typed as a single console token.
pub(crate) fn validate_name(name: &str) -> ConsoleResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConsoleError::InvalidName { name: name.to_string() });
    }
    Ok(())
}
