//! PDF Core - Template overlay primitives
//!
//! This crate provides functionality for:
//! - Opening a template PDF from a path or from bytes
//! - Selecting one of the standard PDF fonts and measuring text with it
//! - Inserting text at specific coordinates on a page
//! - Serializing the result without touching the template on disk
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, Color, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! doc.set_font(StandardFont::HelveticaBold, 32.0);
//! doc.set_text_color(Color::rgb(0.1, 0.2, 0.5));
//! doc.insert_text("Ada Lovelace", 1, 421.0, 300.0, Align::Center)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, PdfDocument};
pub use font::StandardFont;
pub use text::{encode_win_ansi_hex, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("No font selected")]
    FontNotSet,

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment relative to the x coordinate passed to `insert_text`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    /// x is the center point of the rendered text
    Center,
    /// x is the right edge of the rendered text
    Right,
}
