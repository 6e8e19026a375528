//! Per-recipient certificate generation

use crate::config::Config;
use crate::records::{RecipientRecord, DATE_FIELD, NAME_FIELD};
use crate::renderer::render_field;
use crate::{CertError, Result};
use pdf_core::PdfDocument;
use std::path::{Path, PathBuf};

/// Extension of every written certificate
pub const OUTPUT_EXTENSION: &str = "pdf";

/// Prefix of every written certificate
pub const OUTPUT_PREFIX: &str = "Certificate_";

/// The pristine template, kept as bytes so every certificate starts from an
/// untouched copy
pub struct Template {
    bytes: Vec<u8>,
    page_count: usize,
    page_size: (f64, f64),
}

impl Template {
    /// Read and parse the template, checking that `page` exists
    ///
    /// A missing file is a [`CertError::Io`]; anything else that makes the
    /// template unusable is a [`CertError::Config`].
    pub fn load(path: impl AsRef<Path>, page: usize) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CertError::io(path, e))?;
        Self::from_bytes(bytes, page)
    }

    pub fn from_bytes(bytes: Vec<u8>, page: usize) -> Result<Self> {
        let doc = PdfDocument::open_from_bytes(&bytes)
            .map_err(|e| CertError::Config(format!("unusable template: {e}")))?;
        let page_count = doc.page_count();
        if page == 0 || page > page_count {
            return Err(CertError::Config(format!(
                "template has {page_count} pages, cannot draw on page {page}"
            )));
        }
        let page_size = doc
            .page_size(page)
            .map_err(|e| CertError::Config(format!("unusable template page {page}: {e}")))?;

        Ok(Self {
            bytes,
            page_count,
            page_size,
        })
    }

    /// A fresh, independent document parsed from the template bytes
    pub fn instantiate(&self) -> Result<PdfDocument> {
        Ok(PdfDocument::open_from_bytes(&self.bytes)?)
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size (width, height) in points of the page fields are drawn on
    pub fn page_size(&self) -> (f64, f64) {
        self.page_size
    }
}

/// Replace everything but ASCII letters and digits with `_`, then lower-case
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of the certificate for `name`
///
/// Distinct names can share a file name (`Jo!` and `Jo?`); the later
/// certificate then overwrites the earlier one.
pub fn certificate_file_name(name: &str) -> String {
    format!("{OUTPUT_PREFIX}{}.{OUTPUT_EXTENSION}", sanitize_name(name))
}

/// Builds one certificate per recipient record
pub struct CertificateBuilder<'a> {
    config: &'a Config,
    template: &'a Template,
}

impl<'a> CertificateBuilder<'a> {
    pub fn new(config: &'a Config, template: &'a Template) -> Self {
        Self { config, template }
    }

    /// Render and write the certificate for `record`
    ///
    /// Returns the written path. Only [`CertError::Validation`] (missing name)
    /// and [`CertError::Render`] (document or write failure) are returned.
    pub fn build(&self, record: &RecipientRecord) -> Result<PathBuf> {
        // Whitespace-only counts as missing; the value itself is used verbatim
        let name = record
            .get(NAME_FIELD)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                CertError::Validation(format!("missing required field '{NAME_FIELD}'"))
            })?;
        let date = record.get(DATE_FIELD);

        let page = self.config.page;
        let styles = &self.config.styles;

        let mut doc = self.template.instantiate()?;
        render_field(&mut doc, page, Some(name), &styles.name)?;
        render_field(&mut doc, page, date, &styles.date)?;
        render_field(&mut doc, page, Some(self.config.issuer.as_str()), &styles.issuer)?;
        let bytes = doc.to_bytes()?;

        let path = self.config.output_dir.join(certificate_file_name(name));
        std::fs::write(&path, bytes).map_err(|e| {
            CertError::Render(format!("failed to write {}: {e}", path.display()))
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Ada Lovelace"), "ada_lovelace");
        assert_eq!(sanitize_name("O'Brien-Smith Jr."), "o_brien_smith_jr_");
        assert_eq!(sanitize_name("José"), "jos_");
        assert_eq!(sanitize_name("R2D2"), "r2d2");
        assert_eq!(sanitize_name(""), "");
    }

    #[test]
    fn test_certificate_file_name() {
        assert_eq!(
            certificate_file_name("Grace Hopper"),
            "Certificate_grace_hopper.pdf"
        );
    }

    #[test]
    fn test_colliding_names() {
        assert_eq!(certificate_file_name("Jo!"), "Certificate_jo_.pdf");
        assert_eq!(certificate_file_name("Jo?"), "Certificate_jo_.pdf");
    }

    #[test]
    fn test_template_rejects_garbage() {
        let result = Template::from_bytes(b"%PDF-nope".to_vec(), 1);
        assert!(matches!(result, Err(CertError::Config(_))));
    }

    #[test]
    fn test_template_load_missing_file() {
        let result = Template::load("/no/such/template.pdf", 1);
        assert!(matches!(result, Err(CertError::Io { .. })));
    }
}
