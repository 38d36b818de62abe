//! Two-phase ticket submission: create the ticket, then upload attachments.

use std::{fmt, sync::Arc};

use siga_cache::MemoryCache;
use siga_traits::{Cache, Transport};
use siga_transport::JsonpTransport;
use siga_types::{Outcome, TicketForm, TicketReceipt};

use crate::{
    api::SigaClient,
    attachment::Attachment,
    validation::{ValidationReport, validate_ticket},
};

const TICKET_FAILED: &str = "Error al registrar el ticket";
const UPLOAD_FAILED: &str = "Error al subir el archivo";

/// One attachment that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

/// Per-file result of the upload phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub total: usize,
    pub uploaded: usize,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    /// `true` when every file was uploaded.
    pub fn complete(&self) -> bool {
        self.uploaded == self.total
    }
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} de {} archivos subidos", self.uploaded, self.total)
    }
}

/// Outcome of [`TicketSubmitter::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The form failed local validation; nothing was sent.
    Invalid(ValidationReport),
    /// The backend did not create the ticket; no upload was attempted.
    Rejected(TicketReceipt),
    /// The ticket exists. `uploads` is `None` when there were no attachments.
    Created { receipt: TicketReceipt, uploads: Option<UploadReport> },
}

impl Submission {
    /// Whether the ticket was created, regardless of upload failures.
    pub const fn success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Created ticket number.
    pub fn ticket(&self) -> Option<&str> {
        match self {
            Self::Created { receipt, .. } => Some(receipt.numero_ticket.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(report) => write!(f, "{report}"),
            Self::Rejected(receipt) => f.write_str(receipt.message().unwrap_or(TICKET_FAILED)),
            Self::Created { receipt, uploads } => {
                write!(f, "Ticket {} registrado", receipt.numero_ticket)?;
                if let Some(uploads) = uploads {
                    write!(f, " ({uploads})")?;
                }
                Ok(())
            }
        }
    }
}

/// Validates, creates and then attaches files to a ticket.
///
/// Upload failures are counted but never undo a created ticket.
#[derive(Debug)]
pub struct TicketSubmitter<T = JsonpTransport, C = MemoryCache> {
    client: Arc<SigaClient<T, C>>,
}

impl<T: Transport, C: Cache> TicketSubmitter<T, C> {
    pub const fn new(client: Arc<SigaClient<T, C>>) -> Self {
        Self { client }
    }

    /// Submit `form` and upload `attachments` one after another.
    pub async fn submit(&self, form: &TicketForm, attachments: &[Attachment]) -> Submission {
        if let Err(report) = validate_ticket(form) {
            return Submission::Invalid(report);
        }

        let receipt = self.client.create_ticket(form).await;
        if !receipt.success {
            return Submission::Rejected(receipt);
        }

        let uploads = if attachments.is_empty() {
            None
        } else {
            Some(self.upload_all(&receipt, attachments).await)
        };
        Submission::Created { receipt, uploads }
    }

    async fn upload_all(&self, receipt: &TicketReceipt, attachments: &[Attachment]) -> UploadReport {
        let mut report = UploadReport { total: attachments.len(), ..Default::default() };

        for attachment in attachments {
            let ack = self.client.upload_attachment(receipt, attachment).await;
            match ack.into_result(UPLOAD_FAILED) {
                Ok(_) => {
                    debug!(ticket = %receipt.numero_ticket, file = %attachment.name, "attachment uploaded");
                    report.uploaded += 1;
                }
                Err(err) => {
                    warn!(ticket = %receipt.numero_ticket, file = %attachment.name, error = %err, "attachment upload failed");
                    report
                        .failures
                        .push(UploadFailure { file_name: attachment.name.clone(), message: err.to_string() });
                }
            }
        }

        info!(ticket = %receipt.numero_ticket, "{report}");
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use siga_cache::ResponseCache;
    use siga_types::{Action, SigaError};

    use super::*;
    use crate::testutils::{MockTransport, valid_form};

    fn submitter(mock: MockTransport) -> TicketSubmitter<MockTransport> {
        let cache = ResponseCache::new(MemoryCache::new(), Duration::from_secs(300));
        TicketSubmitter::new(Arc::new(SigaClient::new(mock, cache)))
    }

    fn created() -> serde_json::Value {
        json!({
            "success": true,
            "numeroTicket": "SIGA-2025-0001",
            "urlCarpeta": "https://drive.example/folders/abc"
        })
    }

    #[tokio::test]
    async fn test_no_attachments_skips_upload_phase() {
        let submitter = submitter(MockTransport::new().respond(Action::GuardarTicket, created()));

        let submission = submitter.submit(&valid_form(), &[]).await;

        assert!(submission.success());
        assert_eq!(submission.ticket(), Some("SIGA-2025-0001"));
        assert!(matches!(&submission, Submission::Created { uploads: None, .. }));
        assert_eq!(submission.to_string(), "Ticket SIGA-2025-0001 registrado");

        let transport = submitter.client.transport();
        assert_eq!(transport.calls(), 1);
        assert!(transport.uploads().is_empty());
        let sent = &transport.requests()[0];
        assert_eq!(sent.action, Action::GuardarTicket);
        assert!(sent.params.contains(&("celularUsuario".to_string(), "987 654 321".to_string())));
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let submitter = submitter(MockTransport::new().respond(Action::GuardarTicket, created()));
        let mut form = valid_form();
        form.celular_usuario = "12345".to_string();

        let submission = submitter.submit(&form, &[]).await;

        match &submission {
            Submission::Invalid(report) => assert_eq!(report.first().field, "celularUsuario"),
            other => panic!("unexpected submission {other:?}"),
        }
        assert!(!submission.success());
        assert_eq!(submitter.client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_ticket_skips_uploads() {
        let submitter = submitter(MockTransport::new().respond(
            Action::GuardarTicket,
            json!({ "success": false, "message": "Hoja de tickets no disponible" }),
        ));
        let files = [Attachment::new("captura.png", &b"png"[..])];

        let submission = submitter.submit(&valid_form(), &files).await;

        assert!(matches!(submission, Submission::Rejected(_)));
        assert_eq!(submission.to_string(), "Hoja de tickets no disponible");
        assert!(submitter.client.transport().uploads().is_empty());
    }

    #[tokio::test]
    async fn test_connection_error_on_create() {
        let submitter = submitter(
            MockTransport::new()
                .fail(Action::GuardarTicket, SigaError::Timeout { after_ms: 10_000 }),
        );

        let submission = submitter.submit(&valid_form(), &[]).await;

        assert_eq!(
            submission.to_string(),
            "Error de conexión: request timeout after 10000 ms"
        );
    }

    #[tokio::test]
    async fn test_partial_upload_failure_keeps_ticket() {
        let submitter = submitter(
            MockTransport::new().respond(Action::GuardarTicket, created()).upload_results([
                Ok(json!({ "success": true })),
                Ok(json!({ "success": false, "message": "Carpeta no encontrada" })),
                Err(SigaError::transport("HTTP 502")),
            ]),
        );
        let files = [
            Attachment::new("informe.pdf", &b"%PDF"[..]),
            Attachment::new("captura.png", &b"png"[..]),
            Attachment::new("datos.xlsx", &b"xl"[..]),
        ];

        let submission = submitter.submit(&valid_form(), &files).await;

        let Submission::Created { uploads: Some(report), .. } = &submission else {
            panic!("unexpected submission {submission:?}");
        };
        assert_eq!(report.uploaded, 1);
        assert_eq!(report.total, 3);
        assert!(!report.complete());
        assert_eq!(report.failures[0].file_name, "captura.png");
        assert_eq!(report.failures[0].message, "Carpeta no encontrada");
        assert_eq!(report.failures[1].message, "Error de conexión: load error: HTTP 502");
        assert_eq!(
            submission.to_string(),
            "Ticket SIGA-2025-0001 registrado (1 de 3 archivos subidos)"
        );

        let uploads = submitter.client.transport().uploads();
        let names: Vec<_> = uploads.iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(names, ["informe.pdf", "captura.png", "datos.xlsx"]);
        assert_eq!(uploads[0].numero_ticket, "SIGA-2025-0001");
        assert_eq!(uploads[0].url_carpeta.as_deref(), Some("https://drive.example/folders/abc"));
        assert_eq!(uploads[0].mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_silent_upload_rejection_uses_default_message() {
        let submitter = submitter(
            MockTransport::new()
                .respond(Action::GuardarTicket, created())
                .upload_results([Ok(json!({ "success": false }))]),
        );
        let files = [Attachment::new("acta.docx", &b"doc"[..])];

        let submission = submitter.submit(&valid_form(), &files).await;

        let Submission::Created { uploads: Some(report), .. } = submission else {
            panic!("ticket should have been created");
        };
        assert_eq!(report.uploaded, 0);
        assert_eq!(
            report.failures,
            [UploadFailure { file_name: "acta.docx".into(), message: UPLOAD_FAILED.into() }]
        );
    }
}
