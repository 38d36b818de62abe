//! Executing unit records and the `buscar` / `obtener` response shapes.

use serde::{Deserialize, Serialize};

use crate::{de, outcome::Outcome};

/// An executing unit ("ejecutora") row from the backing sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ejecutora {
    #[serde(deserialize_with = "de::string_or_number")]
    pub codigo: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub nombre: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub coordinador: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub coordinador_abrev: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub correo: String,
    #[serde(default, rename = "analistaDGA", deserialize_with = "de::string_or_number")]
    pub analista_dga: String,
}

/// Response of `action=buscar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "de::seq_or_null")]
    pub resultados: Vec<Ejecutora>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    /// Successful response with no rows, used for terms too short to search.
    pub fn empty(message: impl Into<String>) -> Self {
        Self { success: true, resultados: Vec::new(), message: Some(message.into()) }
    }

    /// Whether this response may be memoized: success with at least one row.
    pub fn is_cacheable(&self) -> bool {
        self.success && !self.resultados.is_empty()
    }
}

impl Outcome for SearchResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure(message: String) -> Self {
        Self { success: false, resultados: Vec::new(), message: Some(message) }
    }
}

/// Response of `action=obtener`; entity fields are flattened into the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub ejecutora: Option<Ejecutora>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome for LookupResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure(message: String) -> Self {
        Self { success: false, ejecutora: None, message: Some(message) }
    }
}
