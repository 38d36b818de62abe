//! Ticket form and the `guardarTicket` receipt.

use serde::{Deserialize, Serialize};

use crate::{
    de,
    ejecutora::Ejecutora,
    outcome::Outcome,
    request::{Action, ApiRequest},
};

/// Every field sent with `action=guardarTicket`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketForm {
    #[serde(rename = "codigoUE")]
    pub codigo_ue: String,
    #[serde(rename = "nombreUE")]
    pub nombre_ue: String,
    pub coordinador_abrev: String,
    pub correo_coordinador: String,
    pub coordinador: String,
    pub nombre_usuario: String,
    pub cargo_usuario: String,
    pub correo_usuario: String,
    pub celular_usuario: String,
    pub modulo: String,
    pub submodulo: String,
    pub descripcion: String,
    #[serde(rename = "analistaDGA")]
    pub analista_dga: String,
}

impl TicketForm {
    /// Copy the executing unit fields of a selected suggestion into the form.
    pub fn apply_ejecutora(&mut self, ejecutora: &Ejecutora) {
        self.codigo_ue = ejecutora.codigo.clone();
        self.nombre_ue = ejecutora.nombre.clone();
        self.coordinador = ejecutora.coordinador.clone();
        self.coordinador_abrev = ejecutora.coordinador_abrev.clone();
        self.correo_coordinador = ejecutora.correo.clone();
        self.analista_dga = ejecutora.analista_dga.clone();
    }

    /// Fields as `(wire name, value)` in wire order.
    pub fn fields(&self) -> [(&'static str, &str); 13] {
        [
            ("codigoUE", self.codigo_ue.as_str()),
            ("nombreUE", self.nombre_ue.as_str()),
            ("coordinadorAbrev", self.coordinador_abrev.as_str()),
            ("correoCoordinador", self.correo_coordinador.as_str()),
            ("coordinador", self.coordinador.as_str()),
            ("nombreUsuario", self.nombre_usuario.as_str()),
            ("cargoUsuario", self.cargo_usuario.as_str()),
            ("correoUsuario", self.correo_usuario.as_str()),
            ("celularUsuario", self.celular_usuario.as_str()),
            ("modulo", self.modulo.as_str()),
            ("submodulo", self.submodulo.as_str()),
            ("descripcion", self.descripcion.as_str()),
            ("analistaDGA", self.analista_dga.as_str()),
        ]
    }

    /// Build the `guardarTicket` request, trimming every value.
    pub fn to_request(&self) -> ApiRequest {
        self.fields()
            .into_iter()
            .fold(ApiRequest::new(Action::GuardarTicket), |req, (k, v)| req.param(k, v.trim()))
    }
}

/// Response of `action=guardarTicket`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReceipt {
    pub success: bool,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub numero_ticket: String,
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub url_carpeta: Option<String>,
    #[serde(default)]
    pub correo_enviado: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome for TicketReceipt {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure(message: String) -> Self {
        Self { success: false, message: Some(message), ..Default::default() }
    }
}
