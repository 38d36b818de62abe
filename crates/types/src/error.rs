//! Error taxonomy shared across the workspace.

use derive_more::{Display, Error};

/// Failure kinds a SIGA operation can end with.
///
/// Transport and cache failures are folded into the uniform
/// `{ success: false, message }` shape by the client before they reach a
/// caller; this type is what the lower layers return.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SigaError {
    /// No response arrived within the request budget.
    #[display("request timeout after {after_ms} ms")]
    Timeout {
        /// Budget that elapsed, in milliseconds.
        after_ms: u64,
    },
    /// The request could not be delivered or its body could not be decoded.
    #[display("load error: {_0}")]
    Transport(#[error(not(source))] String),
    /// A well-formed response reported `success: false`.
    #[display("{_0}")]
    Backend(#[error(not(source))] String),
    /// A local field check failed before any network activity.
    #[display("{field}: {message}")]
    Validation {
        /// Wire name of the offending field.
        field: String,
        /// Human readable reason.
        message: String,
    },
}

impl SigaError {
    /// Build a transport error from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Returns `true` for [`SigaError::Timeout`].
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siga_error_display() {
        let err = SigaError::Timeout { after_ms: 10_000 };
        assert_eq!(err.to_string(), "request timeout after 10000 ms");
        assert!(err.is_timeout());

        let err = SigaError::transport("HTTP 502");
        assert_eq!(err.to_string(), "load error: HTTP 502");
        assert!(!err.is_timeout());

        let err = SigaError::Backend("Hoja no encontrada".to_string());
        assert_eq!(err.to_string(), "Hoja no encontrada");

        let err = SigaError::validation("correoUsuario", "correo inválido");
        assert_eq!(err.to_string(), "correoUsuario: correo inválido");
    }
}
