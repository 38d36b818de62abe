//! Ticket form files.

use std::path::Path;

use eyre::{Context, Result};
use siga_types::TicketForm;

/// Read a ticket form from a TOML file keyed by wire field names.
pub fn load_ticket(path: impl AsRef<Path>) -> Result<TicketForm> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read ticket file {}", path.display()))?;
    toml::from_str(&contents)
        .wrap_err_with(|| format!("failed to parse ticket file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_ticket() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
codigoUE = "001"
nombreUsuario = "Ana Torres"
celularUsuario = "987654321"
analistaDGA = "M. Rojas"
descripcion = """
No se puede registrar
el pedido de compra"""
"#
        )
        .unwrap();

        let form = load_ticket(file.path()).unwrap();
        assert_eq!(form.codigo_ue, "001");
        assert_eq!(form.nombre_usuario, "Ana Torres");
        assert_eq!(form.analista_dga, "M. Rojas");
        assert!(form.descripcion.contains("pedido de compra"));
        assert!(form.modulo.is_empty());
    }

    #[test]
    fn test_load_ticket_errors_name_the_file() {
        let err = load_ticket("/nonexistent/ticket.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ticket.toml"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "codigoUE = [").unwrap();
        assert!(load_ticket(file.path()).is_err());
    }
}
