//! HTTP transport speaking the endpoint's JSONP contract.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, multipart};
use serde_json::Value;
use siga_config::EndpointConfig;
use siga_traits::Transport;
use siga_types::{Action, ApiRequest, SigaError, UploadRequest};
use url::Url;

use crate::{
    callback::CallbackIds,
    jsonp::{self, JsonpBody},
    registry::{CallbackRegistry, PendingCall},
};

/// [`Transport`] that issues requests with `reqwest` and settles them
/// through a [`CallbackRegistry`].
///
/// Every call registers a fresh callback id, appends `callback=<id>` to the
/// URL and races the response against the configured timeout. The
/// registration is torn down on every outcome.
#[derive(Debug, Clone)]
pub struct JsonpTransport {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    registry: Arc<CallbackRegistry>,
    ids: Arc<CallbackIds>,
}

impl JsonpTransport {
    /// Create a transport for `endpoint` with a per-call `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SigaError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SigaError::transport(format!("invalid endpoint {endpoint}: {e}")))?;
        let client = Client::builder()
            .build()
            .map_err(|e| SigaError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            registry: Arc::new(CallbackRegistry::new()),
            ids: Arc::new(CallbackIds::new()),
        })
    }

    /// Create a transport from the `[endpoint]` configuration section.
    pub fn from_config(config: &EndpointConfig) -> Result<Self, SigaError> {
        Self::new(&config.url, config.timeout())
    }

    /// The registry holding this transport's in-flight calls.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Configured per-call timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Endpoint URL carrying the request's query parameters, without callback.
    pub fn url_for(&self, request: &ApiRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        url
    }

    /// Issue a GET against `url` and settle with the callback payload.
    ///
    /// Fails with [`SigaError::Timeout`] when nothing arrives within
    /// `timeout`, and with [`SigaError::Transport`] on network errors,
    /// non-2xx statuses or undecodable bodies.
    pub async fn request(&self, url: &str, timeout: Duration) -> Result<Value, SigaError> {
        let mut pending = self.registry.register(self.ids.next_id());
        let target = jsonp::with_callback(url, pending.id());
        debug!(callback = %pending.id(), url = %target, "issuing request");

        let fetch = async {
            let response = self.client.get(&target).send().await.map_err(SigaError::transport)?;
            self.settle(&mut pending, response).await
        };
        self.race(fetch, timeout).await
    }

    async fn upload_file(
        &self,
        upload: UploadRequest,
        timeout: Duration,
    ) -> Result<Value, SigaError> {
        let request = ApiRequest::new(Action::SubirArchivo);
        let mut pending = self.registry.register(self.ids.next_id());
        let target = jsonp::with_callback(self.url_for(&request).as_str(), pending.id());
        debug!(
            callback = %pending.id(),
            file = %upload.file_name,
            size = upload.bytes.len(),
            "uploading attachment"
        );

        let file_part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                SigaError::transport(format!("invalid mime type {}: {e}", upload.mime_type))
            })?;
        let mut form = multipart::Form::new()
            .text("numeroTicket", upload.numero_ticket)
            .text("nombreArchivo", upload.file_name);
        if let Some(folder) = upload.url_carpeta {
            form = form.text("urlCarpeta", folder);
        }
        let form = form.part("archivo", file_part);

        let fetch = async {
            let response = self
                .client
                .post(&target)
                .multipart(form)
                .send()
                .await
                .map_err(SigaError::transport)?;
            self.settle(&mut pending, response).await
        };
        self.race(fetch, timeout).await
    }

    async fn settle(
        &self,
        pending: &mut PendingCall,
        response: reqwest::Response,
    ) -> Result<Value, SigaError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SigaError::transport(format!("HTTP {}", status.as_u16())));
        }
        let body = response.text().await.map_err(SigaError::transport)?;

        match jsonp::decode(&body)? {
            JsonpBody::Callback { name, payload } => {
                // Only this call's own id may be resolved from this response.
                if name != pending.id() {
                    return Err(SigaError::transport(format!(
                        "unexpected callback {name}, expected {}",
                        pending.id()
                    )));
                }
                self.registry.dispatch(&name, payload);
            }
            JsonpBody::Bare(payload) => {
                self.registry.dispatch(pending.id(), payload);
            }
        }
        pending.settled().await
    }

    async fn race<F>(&self, fetch: F, timeout: Duration) -> Result<Value, SigaError>
    where
        F: std::future::Future<Output = Result<Value, SigaError>>,
    {
        match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(value)) => {
                debug!("request settled");
                Ok(value)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "request failed");
                Err(err)
            }
            Err(_) => {
                let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(after_ms, "request timed out");
                Err(SigaError::Timeout { after_ms })
            }
        }
    }
}

#[async_trait]
impl Transport for JsonpTransport {
    async fn call(&self, request: &ApiRequest) -> Result<Value, SigaError> {
        let url = self.url_for(request);
        self.request(url.as_str(), self.timeout).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<Value, SigaError> {
        self.upload_file(request, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_encodes_values() {
        let transport =
            JsonpTransport::new("https://script.example.com/exec", Duration::from_secs(1)).unwrap();
        let request = ApiRequest::new(Action::Buscar).param("termino", "ñaña & co");
        let url = transport.url_for(&request);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("action".to_string(), "buscar".to_string()),
                ("termino".to_string(), "ñaña & co".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            JsonpTransport::new("not a url", Duration::from_secs(1)),
            Err(SigaError::Transport(_))
        ));
    }
}
