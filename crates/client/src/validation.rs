//! Local checks run on a ticket form before submission.

use std::fmt;

use siga_types::TicketForm;

/// Minimum length of the problem description.
pub const MIN_DESCRIPTION_CHARS: usize = 10;
/// Digits in a mobile number.
pub const MOBILE_DIGITS: usize = 9;

const AGGREGATE_WARNING: &str = "Por favor, complete correctamente todos los campos obligatorios";

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire name of the field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: &'static str,
}

/// Every invalid field of a form, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<FieldIssue>,
}

impl ValidationReport {
    /// All issues in form order.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// The field that should receive focus.
    pub fn first(&self) -> &FieldIssue {
        // Reports are only built with at least one issue.
        &self.issues[0]
    }

    /// Single aggregate warning for the whole form.
    pub const fn summary(&self) -> &'static str {
        AGGREGATE_WARNING
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} campo(s) inválido(s))", AGGREGATE_WARNING, self.issues.len())
    }
}

/// Check `form`, returning every invalid field when any check fails.
pub fn validate_ticket(form: &TicketForm) -> Result<(), ValidationReport> {
    let mut issues = Vec::new();
    let mut check = |ok: bool, field: &'static str, message: &'static str| {
        if !ok {
            issues.push(FieldIssue { field, message });
        }
    };

    check(!blank(&form.codigo_ue), "codigoUE", "Seleccione una unidad ejecutora");
    check(!blank(&form.nombre_ue), "nombreUE", "Seleccione una unidad ejecutora de la lista");
    check(!blank(&form.nombre_usuario), "nombreUsuario", "Ingrese su nombre completo");
    check(!blank(&form.cargo_usuario), "cargoUsuario", "Ingrese su cargo");
    check(is_email(&form.correo_usuario), "correoUsuario", "Ingrese un correo electrónico válido");
    check(
        is_mobile(&form.celular_usuario),
        "celularUsuario",
        "Ingrese un celular de 9 dígitos que empiece con 9",
    );
    check(!blank(&form.modulo), "modulo", "Seleccione un módulo");
    check(!blank(&form.submodulo), "submodulo", "Seleccione un submódulo");
    check(
        form.descripcion.trim().chars().count() >= MIN_DESCRIPTION_CHARS,
        "descripcion",
        "Describa el problema con al menos 10 caracteres",
    );

    if issues.is_empty() {
        Ok(())
    } else {
        debug!(count = issues.len(), first = issues[0].field, "ticket form failed validation");
        Err(ValidationReport { issues })
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld` with no whitespace and a dotted domain.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Nine digits starting with `9`; spaces and dashes are ignored.
pub fn is_mobile(value: &str) -> bool {
    let cleaned: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    cleaned.len() == MOBILE_DIGITS
        && cleaned.starts_with('9')
        && cleaned.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::testutils::valid_form;

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_ticket(&valid_form()).is_ok());
    }

    #[test]
    fn test_first_invalid_field_is_reported() {
        let mut form = valid_form();
        form.correo_usuario = "no-es-correo".to_string();
        form.descripcion = "corto".to_string();

        let report = validate_ticket(&form).unwrap_err();
        assert_eq!(report.issues().len(), 2);
        assert_eq!(report.first().field, "correoUsuario");
        assert_eq!(report.issues()[1].field, "descripcion");
        assert_eq!(report.summary(), AGGREGATE_WARNING);
    }

    #[test]
    fn test_empty_form_lists_every_field() {
        let report = validate_ticket(&TicketForm::default()).unwrap_err();
        let fields: Vec<_> = report.issues().iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "codigoUE",
                "nombreUE",
                "nombreUsuario",
                "cargoUsuario",
                "correoUsuario",
                "celularUsuario",
                "modulo",
                "submodulo",
                "descripcion",
            ]
        );
    }

    #[rstest]
    #[case("user@example.pe", true)]
    #[case(" user.name@sub.example.gob.pe ", true)]
    #[case("user@example", false)]
    #[case("@example.pe", false)]
    #[case("user@@example.pe", false)]
    #[case("us er@example.pe", false)]
    #[case("user@example..pe", false)]
    fn test_is_email(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_email(value), expected);
    }

    #[rstest]
    #[case("987654321", true)]
    #[case("987-654-321", true)]
    #[case("887654321", false)]
    #[case("98765432", false)]
    #[case("98765432a", false)]
    fn test_is_mobile(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_mobile(value), expected);
    }
}
