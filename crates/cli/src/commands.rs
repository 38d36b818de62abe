//! Command execution and human-readable rendering.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use eyre::{Context, Result};
use siga_client::{Attachment, SigaClient, Submission, TicketSubmitter};
use siga_config::SigaConfig;
use siga_types::{Ejecutora, LookupResponse, Outcome, PingResponse, SearchResponse, TicketForm};

use crate::{
    cli::{Cli, Command},
    ticket::load_ticket,
};

/// What a command prints and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub success: bool,
    pub text: String,
}

impl Report {
    fn new(success: bool, text: impl Into<String>) -> Self {
        Self { success, text: text.into() }
    }
}

/// Run the command selected on `cli` against `config`.
pub async fn run(cli: &Cli, config: &SigaConfig) -> Result<Report> {
    let report = match &cli.command {
        Command::Check => Report::new(true, "Configuration is valid"),
        Command::Ping => render_ping(&connect(config)?.ping().await),
        Command::Search { term } => render_search(&connect(config)?.search(term).await),
        Command::Lookup { codigo } => render_lookup(&connect(config)?.lookup(codigo).await),
        Command::Submit { ticket, attachments } => {
            submit(Arc::new(connect(config)?), config, ticket, attachments).await?
        }
    };
    Ok(report)
}

fn connect(config: &SigaConfig) -> Result<SigaClient> {
    SigaClient::from_config(config).wrap_err("failed to build client")
}

async fn submit(
    client: Arc<SigaClient>,
    config: &SigaConfig,
    ticket: &Path,
    paths: &[PathBuf],
) -> Result<Report> {
    let mut form = load_ticket(ticket)?;
    complete_ejecutora(&client, &mut form).await;

    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        let attachment = Attachment::from_path(path, &config.attachments)
            .await
            .wrap_err_with(|| format!("cannot attach {}", path.display()))?;
        attachments.push(attachment);
    }

    let submission = TicketSubmitter::new(client).submit(&form, &attachments).await;
    Ok(render_submission(&submission))
}

/// Fill the executing unit fields from a lookup when the file only names a code.
async fn complete_ejecutora(client: &SigaClient, form: &mut TicketForm) {
    if form.codigo_ue.trim().is_empty() || !form.nombre_ue.trim().is_empty() {
        return;
    }
    let found = client.lookup(&form.codigo_ue).await;
    match found.ejecutora {
        Some(ejecutora) if found.success => form.apply_ejecutora(&ejecutora),
        _ => warn!(codigo = %form.codigo_ue, message = ?found.message, "executing unit not found"),
    }
}

pub fn render_ping(resp: &PingResponse) -> Report {
    let text = match (resp.success(), resp.message()) {
        (true, Some(message)) => format!("Conectado: {message}"),
        (true, None) => "Conectado".to_string(),
        (false, message) => message.unwrap_or("Sin respuesta del servidor").to_string(),
    };
    Report::new(resp.success(), text)
}

pub fn render_search(resp: &SearchResponse) -> Report {
    if !resp.success {
        return Report::new(false, resp.message().unwrap_or("Error al buscar"));
    }
    if resp.resultados.is_empty() {
        return Report::new(true, resp.message().unwrap_or("Sin resultados"));
    }

    let mut text = String::new();
    for row in &resp.resultados {
        let _ = writeln!(text, "{}", suggestion_line(row));
    }
    Report::new(true, text.trim_end())
}

fn suggestion_line(row: &Ejecutora) -> String {
    if row.coordinador.is_empty() {
        format!("{}  {}", row.codigo, row.nombre)
    } else {
        format!("{}  {}  ({})", row.codigo, row.nombre, row.coordinador)
    }
}

pub fn render_lookup(resp: &LookupResponse) -> Report {
    let Some(row) = resp.ejecutora.as_ref().filter(|_| resp.success) else {
        return Report::new(false, resp.message().unwrap_or("Unidad ejecutora no encontrada"));
    };

    let mut text = String::new();
    for (label, value) in [
        ("Código", &row.codigo),
        ("Nombre", &row.nombre),
        ("Coordinador", &row.coordinador),
        ("Correo", &row.correo),
        ("Analista DGA", &row.analista_dga),
    ] {
        if !value.is_empty() {
            let _ = writeln!(text, "{label}: {value}");
        }
    }
    Report::new(true, text.trim_end())
}

pub fn render_submission(submission: &Submission) -> Report {
    let mut text = submission.to_string();
    match submission {
        Submission::Invalid(report) => {
            for issue in report.issues() {
                let _ = write!(text, "\n  {}: {}", issue.field, issue.message);
            }
        }
        Submission::Created { uploads: Some(uploads), .. } => {
            for failure in &uploads.failures {
                let _ = write!(text, "\n  {}: {}", failure.file_name, failure.message);
            }
        }
        _ => {}
    }
    Report::new(submission.success(), text)
}
