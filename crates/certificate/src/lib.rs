//! Certificate generation - one personalized PDF per recipient
//!
//! This crate provides:
//! - Configuration (paths, delimiter, issuer text, per-field styles)
//! - A row source over delimited recipient lists
//! - The font-size fitting heuristic and centered text rendering
//! - The per-recipient certificate builder and the batch orchestrator
//! - Logging setup for the `certgen` binary
//!
//! # Example
//!
//! ```ignore
//! use certificate::{batch::run_batch, config::Config, logging::TracingLog};
//!
//! let config = Config::load("certgen.json")?;
//! config.validate()?;
//! let result = run_batch(&config, &TracingLog)?;
//! println!("{} of {} written", result.processed, result.total_recipients);
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod fit;
pub mod logging;
pub mod records;
pub mod renderer;

pub use batch::{run_batch, BatchResult, RecordError};
pub use builder::{certificate_file_name, sanitize_name, CertificateBuilder, Template};
pub use config::{Config, FontFamily, StyleDescriptor};
pub use fit::{fit_text, ResolvedStyle};
pub use records::{RecipientRecord, RowSource};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while generating certificates
#[derive(Debug, Error)]
pub enum CertError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CertError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CertError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error aborts the whole batch rather than a single record
    pub fn is_fatal(&self) -> bool {
        match self {
            CertError::Io { .. } | CertError::Stream(_) | CertError::Config(_) => true,
            CertError::Validation(_) | CertError::Render(_) => false,
        }
    }
}

impl From<pdf_core::PdfError> for CertError {
    fn from(err: pdf_core::PdfError) -> Self {
        CertError::Render(err.to_string())
    }
}

/// Result type for certificate operations
pub type Result<T> = std::result::Result<T, CertError>;
