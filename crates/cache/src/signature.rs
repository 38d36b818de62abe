//! Normalized cache keys.

use std::fmt;

use siga_types::Action;

/// Cache key for one logical request.
///
/// Queries that differ only in letter case or surrounding whitespace map to
/// the same signature for searches; lookups by code only trim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestSignature(String);

impl RequestSignature {
    /// Signature of a `buscar` request for `term`.
    pub fn search(term: &str) -> Self {
        Self(format!("{}_{}", Action::Buscar.as_str(), term.trim().to_lowercase()))
    }

    /// Signature of an `obtener` request for `codigo`.
    pub fn lookup(codigo: &str) -> Self {
        Self(format!("{}_{}", Action::Obtener.as_str(), codigo.trim()))
    }

    /// The key as stored in the cache.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
