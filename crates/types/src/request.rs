//! Request descriptors for the Apps Script endpoint.

use std::fmt;

use bytes::Bytes;

/// Endpoint action selected through the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Connectivity probe.
    Test,
    /// Search executing units by code or name.
    Buscar,
    /// Fetch a single executing unit by code.
    Obtener,
    /// Create a ticket.
    GuardarTicket,
    /// Upload one attachment into a ticket folder.
    SubirArchivo,
}

impl Action {
    /// Wire name of the action.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Buscar => "buscar",
            Self::Obtener => "obtener",
            Self::GuardarTicket => "guardarTicket",
            Self::SubirArchivo => "subirArchivo",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query-string request: an action plus ordered parameters.
///
/// Values are kept raw; the transport percent-encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub action: Action,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request for `action` with no parameters.
    pub const fn new(action: Action) -> Self {
        Self { action, params: Vec::new() }
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Query pairs in wire order, `action` first.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once(("action", self.action.as_str()))
            .chain(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// A single attachment upload bound to an existing ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub numero_ticket: String,
    pub url_carpeta: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}
