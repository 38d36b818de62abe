//! The uniform `{ success, message }` outcome shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SigaError;

/// A backend response that carries a success flag and an optional message.
///
/// Every operation exposed to callers returns a type implementing this trait,
/// so UI code only ever checks [`Outcome::success`] and shows
/// [`Outcome::message`].
pub trait Outcome: Sized {
    /// The `success` flag.
    fn success(&self) -> bool;

    /// The optional human readable message.
    fn message(&self) -> Option<&str>;

    /// Build the failure shape carrying `message`.
    fn failure(message: String) -> Self;

    /// `Ok(self)` on success, otherwise a [`SigaError::Backend`] carrying the
    /// message, or `fallback` when the backend sent none.
    fn into_result(self, fallback: &str) -> Result<Self, SigaError> {
        if self.success() {
            return Ok(self);
        }
        let message = self.message().filter(|m| !m.trim().is_empty()).unwrap_or(fallback);
        Err(SigaError::Backend(message.to_string()))
    }
}

/// Response of `action=test`. Unknown fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Outcome for PingResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure(message: String) -> Self {
        Self { success: false, message: Some(message), extra: Map::new() }
    }
}

/// Acknowledgement of a single attachment upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome for UploadAck {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure(message: String) -> Self {
        Self { success: false, message: Some(message) }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ping_keeps_unknown_fields() {
        let resp: PingResponse = serde_json::from_value(json!({
            "success": true,
            "message": "Conexión exitosa",
            "timestamp": "2025-01-10T10:00:00Z",
            "hojas": 3
        }))
        .unwrap();

        assert!(resp.success());
        assert_eq!(resp.extra.get("hojas"), Some(&json!(3)));
        assert!(resp.extra.get("message").is_none());
    }

    #[test]
    fn failed_outcome_becomes_backend_error() {
        let ok = UploadAck { success: true, message: None };
        assert_eq!(ok.clone().into_result("fallback"), Ok(ok));

        let rejected = UploadAck::failure("Carpeta no encontrada".to_string());
        assert_eq!(
            rejected.into_result("fallback"),
            Err(SigaError::Backend("Carpeta no encontrada".to_string()))
        );

        let silent = UploadAck { success: false, message: Some("  ".to_string()) };
        let err = silent.into_result("Error al subir el archivo").unwrap_err();
        assert_eq!(err.to_string(), "Error al subir el archivo");
    }
}
