#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod api;
pub use api::SigaClient;

mod attachment;
pub use attachment::{Attachment, mime_for};

mod search;
pub use search::{SearchSession, SearchState};

mod submit;
pub use submit::{Submission, TicketSubmitter, UploadFailure, UploadReport};

mod validation;
pub use validation::{
    FieldIssue, MIN_DESCRIPTION_CHARS, MOBILE_DIGITS, ValidationReport, is_email, is_mobile,
    validate_ticket,
};

#[cfg(test)]
pub(crate) mod testutils {
    use std::{
        collections::{HashMap, VecDeque},
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use siga_traits::Transport;
    use siga_types::{Action, ApiRequest, SigaError, TicketForm, UploadRequest};

    pub(crate) fn valid_form() -> TicketForm {
        TicketForm {
            codigo_ue: "001".to_string(),
            nombre_ue: "Lima Norte".to_string(),
            coordinador_abrev: "J. Perez".to_string(),
            correo_coordinador: "jperez@example.pe".to_string(),
            coordinador: "Juan Perez".to_string(),
            nombre_usuario: "Ana Torres".to_string(),
            cargo_usuario: "Especialista en logística".to_string(),
            correo_usuario: "atorres@example.pe".to_string(),
            celular_usuario: "987 654 321".to_string(),
            modulo: "Logística".to_string(),
            submodulo: "Pedidos".to_string(),
            descripcion: "No se puede registrar el pedido de compra".to_string(),
            analista_dga: "M. Rojas".to_string(),
        }
    }

    pub(crate) fn lima_norte_response() -> Value {
        json!({
            "success": true,
            "resultados": [{
                "codigo": "001",
                "nombre": "Lima Norte",
                "coordinador": "Juan Perez",
                "coordinadorAbrev": "J. Perez",
                "correo": "jperez@example.pe",
                "analistaDGA": "M. Rojas"
            }]
        })
    }

    /// Scripted [`Transport`] that counts calls and records what it was sent.
    ///
    /// Actions with no scripted response fail with a transport error. Uploads
    /// pop scripted results in order and succeed once the script runs out.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        responses: HashMap<Action, Result<Value, SigaError>>,
        delay: Duration,
        calls: AtomicUsize,
        requests: Mutex<Vec<ApiRequest>>,
        upload_script: Mutex<VecDeque<Result<Value, SigaError>>>,
        uploads: Mutex<Vec<UploadRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(mut self, action: Action, value: Value) -> Self {
            self.responses.insert(action, Ok(value));
            self
        }

        pub(crate) fn fail(mut self, action: Action, err: SigaError) -> Self {
            self.responses.insert(action, Err(err));
            self
        }

        pub(crate) fn delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub(crate) fn upload_results(
            self,
            results: impl IntoIterator<Item = Result<Value, SigaError>>,
        ) -> Self {
            self.upload_script.lock().unwrap().extend(results);
            self
        }

        /// Network calls made so far, uploads included.
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn last_param(&self, key: &str) -> Option<String> {
            let requests = self.requests.lock().unwrap();
            let last = requests.last()?;
            last.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        }

        pub(crate) fn uploads(&self) -> Vec<UploadRequest> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn call(&self, request: &ApiRequest) -> Result<Value, SigaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.responses
                .get(&request.action)
                .cloned()
                .unwrap_or_else(|| Err(SigaError::transport("connection refused")))
        }

        async fn upload(&self, upload: UploadRequest) -> Result<Value, SigaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.uploads.lock().unwrap().push(upload);
            self.upload_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({ "success": true })))
        }
    }
}
