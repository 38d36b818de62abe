//! Files attached to a ticket.

use std::path::Path;

use bytes::Bytes;
use siga_config::AttachmentConfig;
use siga_types::SigaError;

/// A file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl Attachment {
    /// Build an attachment from in-memory content, inferring its MIME type.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime_type = mime_for(&name).to_string();
        Self { name, mime_type, bytes: bytes.into() }
    }

    /// Read `path` and check it against `limits`.
    pub async fn from_path(
        path: impl AsRef<Path>,
        limits: &AttachmentConfig,
    ) -> Result<Self, SigaError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                SigaError::validation("archivos", format!("ruta inválida: {}", path.display()))
            })?
            .to_string();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| SigaError::validation("archivos", format!("{name}: {e}")))?;
        check_size(&name, metadata.len(), limits)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SigaError::validation("archivos", format!("{name}: {e}")))?;
        let attachment = Self::new(name, bytes);
        attachment.check(limits)?;
        Ok(attachment)
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Reject files that are empty, too large or of a disallowed type.
    pub fn check(&self, limits: &AttachmentConfig) -> Result<(), SigaError> {
        if self.bytes.is_empty() {
            return Err(SigaError::validation("archivos", format!("{}: archivo vacío", self.name)));
        }
        check_size(&self.name, self.bytes.len() as u64, limits)?;
        match self.extension() {
            Some(ext) if limits.allows(&ext) => Ok(()),
            _ => Err(SigaError::validation(
                "archivos",
                format!("{}: tipo de archivo no permitido", self.name),
            )),
        }
    }
}

fn check_size(name: &str, size: u64, limits: &AttachmentConfig) -> Result<(), SigaError> {
    if size > limits.max_size_bytes {
        return Err(SigaError::validation(
            "archivos",
            format!("{name}: supera el tamaño máximo de {} bytes", limits.max_size_bytes),
        ));
    }
    Ok(())
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name).extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}

/// MIME type for a file name, by extension.
pub fn mime_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("informe.PDF", "application/pdf")]
    #[case("captura.jpeg", "image/jpeg")]
    #[case("datos.xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")]
    #[case("sin_extension", "application/octet-stream")]
    fn test_mime_for(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_for(name), expected);
    }

    #[test]
    fn test_check_limits() {
        let limits = AttachmentConfig { max_size_bytes: 4, allowed_extensions: vec!["pdf".into()] };

        assert!(Attachment::new("a.pdf", &b"1234"[..]).check(&limits).is_ok());
        assert!(Attachment::new("a.pdf", &b"12345"[..]).check(&limits).is_err());
        assert!(Attachment::new("a.exe", &b"12"[..]).check(&limits).is_err());
        assert!(Attachment::new("a.pdf", Bytes::new()).check(&limits).is_err());
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captura.png");
        std::fs::File::create(&path).unwrap().write_all(b"\x89PNG").unwrap();

        let limits = AttachmentConfig::default();
        let attachment = Attachment::from_path(&path, &limits).await.unwrap();
        assert_eq!(attachment.name, "captura.png");
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.size(), 4);

        let missing = Attachment::from_path(dir.path().join("nope.pdf"), &limits).await;
        assert!(matches!(missing, Err(SigaError::Validation { .. })));
    }
}
