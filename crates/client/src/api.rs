//! Endpoint operations with memoization and uniform failure shapes.

use serde::de::DeserializeOwned;
use siga_cache::{MemoryCache, RequestSignature, ResponseCache};
use siga_config::SigaConfig;
use siga_traits::{Cache, CacheStats, Transport};
use siga_transport::JsonpTransport;
use siga_types::{
    Action, ApiRequest, LookupResponse, Outcome, PingResponse, SearchResponse, SigaError,
    TicketForm, TicketReceipt, UploadAck, UploadRequest,
};

use crate::attachment::Attachment;

const CONNECTION_ERROR: &str = "Error de conexión";
const PING_ERROR: &str = "No se pudo conectar con el servidor";
const INVALID_CODE: &str = "Código no válido";

/// Client for the SIGA endpoint.
///
/// Searches and lookups go through the response cache; `ping`, ticket
/// creation and uploads always reach the network. No method returns an
/// error: failures come back as the response type's failure shape.
#[derive(Debug)]
pub struct SigaClient<T = JsonpTransport, C = MemoryCache> {
    transport: T,
    cache: ResponseCache<C>,
    min_search_chars: usize,
}

impl SigaClient {
    /// Build a client with the HTTP transport and an in-memory cache.
    pub fn from_config(config: &SigaConfig) -> Result<Self, SigaError> {
        let transport = JsonpTransport::from_config(&config.endpoint)?;
        let cache = ResponseCache::new(MemoryCache::new(), config.cache.ttl())
            .enabled(config.cache.enabled);
        Ok(Self::new(transport, cache).with_min_search_chars(config.search.min_chars))
    }
}

impl<T: Transport, C: Cache> SigaClient<T, C> {
    /// Assemble a client from its parts.
    pub fn new(transport: T, cache: ResponseCache<C>) -> Self {
        Self { transport, cache, min_search_chars: siga_config::DEFAULT_MIN_SEARCH_CHARS }
    }

    /// Override the shortest term that reaches the network.
    #[must_use]
    pub const fn with_min_search_chars(mut self, min: usize) -> Self {
        self.min_search_chars = min;
        self
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Search executing units by code or name.
    ///
    /// Terms shorter than the minimum (after trimming) succeed with no rows
    /// and never reach the network.
    pub async fn search(&self, term: &str) -> SearchResponse {
        let term = term.trim();
        if term.chars().count() < self.min_search_chars {
            return SearchResponse::empty(format!(
                "Ingrese al menos {} caracteres",
                self.min_search_chars
            ));
        }

        let signature = RequestSignature::search(term);
        let request = ApiRequest::new(Action::Buscar).param("termino", term);
        debug!(term, "searching ejecutoras");

        self.cache
            .cached_or_fetch(&signature, || self.fetch(&request))
            .await
            .unwrap_or_else(|err| connection_failure(CONNECTION_ERROR, err))
    }

    /// Fetch a single executing unit by code.
    pub async fn lookup(&self, codigo: &str) -> LookupResponse {
        let codigo = codigo.trim();
        if codigo.is_empty() {
            return LookupResponse::failure(INVALID_CODE.to_string());
        }

        let signature = RequestSignature::lookup(codigo);
        let request = ApiRequest::new(Action::Obtener).param("codigo", codigo);
        debug!(codigo, "looking up ejecutora");

        self.cache
            .cached_or_fetch(&signature, || self.fetch(&request))
            .await
            .unwrap_or_else(|err| connection_failure(CONNECTION_ERROR, err))
    }

    /// Probe the endpoint.
    pub async fn ping(&self) -> PingResponse {
        info!("checking connection to SIGA endpoint");
        self.fetch(&ApiRequest::new(Action::Test))
            .await
            .unwrap_or_else(|err| connection_failure(PING_ERROR, err))
    }

    /// Create a ticket from `form`. The form is sent as is; validate it first.
    pub async fn create_ticket(&self, form: &TicketForm) -> TicketReceipt {
        let receipt: TicketReceipt = self
            .fetch(&form.to_request())
            .await
            .unwrap_or_else(|err| connection_failure(CONNECTION_ERROR, err));

        if receipt.success {
            info!(ticket = %receipt.numero_ticket, "ticket created");
        } else {
            warn!(message = ?receipt.message, "ticket rejected");
        }
        receipt
    }

    /// Upload one attachment into the folder of an existing ticket.
    pub async fn upload_attachment(
        &self,
        receipt: &TicketReceipt,
        attachment: &Attachment,
    ) -> UploadAck {
        let request = UploadRequest {
            numero_ticket: receipt.numero_ticket.clone(),
            url_carpeta: receipt.url_carpeta.clone(),
            file_name: attachment.name.clone(),
            mime_type: attachment.mime_type.clone(),
            bytes: attachment.bytes.clone(),
        };

        match self.transport.upload(request).await {
            Ok(value) => decode(Action::SubirArchivo, value)
                .unwrap_or_else(|err| connection_failure(CONNECTION_ERROR, err)),
            Err(err) => connection_failure(CONNECTION_ERROR, err),
        }
    }

    /// Forget every memoized search and lookup.
    pub async fn clear_cache(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!(error = %e, "failed to clear cache");
        }
    }

    /// Summary of the memoized responses.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to read cache stats");
            CacheStats::default()
        })
    }

    async fn fetch<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R, SigaError> {
        let value = self.transport.call(request).await?;
        decode(request.action, value)
    }
}

fn decode<R: DeserializeOwned>(action: Action, value: serde_json::Value) -> Result<R, SigaError> {
    serde_json::from_value(value)
        .map_err(|e| SigaError::transport(format!("malformed {action} response: {e}")))
}

fn connection_failure<R: Outcome>(prefix: &str, err: SigaError) -> R {
    if err.is_timeout() {
        warn!(error = %err, "request timed out");
    } else {
        warn!(error = %err, "request failed");
    }
    R::failure(format!("{prefix}: {err}"))
}
