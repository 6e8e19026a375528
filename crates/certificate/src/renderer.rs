//! Centered text rendering onto a template page

use crate::config::StyleDescriptor;
use crate::fit::{fit_text, ResolvedStyle};
use pdf_core::{Align, PdfDocument};

/// Draw `text` horizontally centered on the style's anchor
///
/// `insert_text` measures the text with the resolved font and size and draws
/// it from `anchor_x - width / 2` on the anchor's baseline. Empty text is
/// skipped.
pub fn draw_centered(
    doc: &mut PdfDocument,
    page: usize,
    text: &str,
    style: &ResolvedStyle,
) -> pdf_core::Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    doc.set_font(style.font_family.into(), style.font_size);
    doc.set_text_color(style.color.into());

    doc.insert_text(text, page, style.anchor_x, style.anchor_y, Align::Center)
}

/// Fit and draw an optional field value
///
/// Absent or empty values are skipped rather than treated as errors.
pub fn render_field(
    doc: &mut PdfDocument,
    page: usize,
    text: Option<&str>,
    style: &StyleDescriptor,
) -> pdf_core::Result<()> {
    match text {
        Some(text) if !text.is_empty() => draw_centered(doc, page, text, &fit_text(text, style)),
        _ => Ok(()),
    }
}
