//! Batch orchestration: one certificate per input row

use crate::builder::{CertificateBuilder, Template};
use crate::config::Config;
use crate::logging::RunLog;
use crate::records::{RowSource, NAME_FIELD};
use crate::{CertError, Result};
use std::path::Path;

/// A recipient whose certificate could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub recipient: String,
    pub message: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total_recipients: usize,
    pub processed: usize,
    /// Failures in input order
    pub errors: Vec<RecordError>,
}

impl BatchResult {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// Every recipient got a certificate
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.processed == self.total_recipients
    }
}

/// Create the output directory (and parents) if it does not exist yet
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| CertError::io(dir, e))
}

/// Generate a certificate for every recipient in the input file
///
/// Setup failures (configuration, output directory, template, recipient list) abort the run
/// before any certificate is written. Per-recipient failures are collected in
/// [`BatchResult::errors`] and the run continues with the next row.
pub fn run_batch(config: &Config, log: &dyn RunLog) -> Result<BatchResult> {
    config.validate()?;
    ensure_output_dir(&config.output_dir)?;

    let template = Template::load(&config.template_path, config.page)?;
    let (width, height) = template.page_size();
    log.info(&format!(
        "Loaded template {} ({} pages, drawing on page {} of {width:.0} x {height:.0} pt)",
        config.template_path.display(),
        template.page_count(),
        config.page,
    ));

    let source = RowSource::open(&config.input_path, config.delimiter_byte())?;
    if !source.headers().iter().any(|header| header == NAME_FIELD) {
        log.warn(&format!(
            "{} has no '{NAME_FIELD}' column; every row will fail validation",
            config.input_path.display()
        ));
    }
    let records = source.collect::<Result<Vec<_>>>()?;
    log.info(&format!("Found {} recipients", records.len()));

    let builder = CertificateBuilder::new(config, &template);
    let mut result = BatchResult {
        total_recipients: records.len(),
        ..BatchResult::default()
    };

    for record in &records {
        match builder.build(record) {
            Ok(path) => {
                result.processed += 1;
                log.info(&format!(
                    "Generated certificate for {} -> {}",
                    record.label(),
                    path.display()
                ));
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => result.errors.push(RecordError {
                recipient: record.label(),
                message: err.to_string(),
            }),
        }
    }

    log.info(&format!(
        "Processed {} of {} recipients",
        result.processed, result.total_recipients
    ));
    for error in &result.errors {
        log.warn(&format!("Failed: {}: {}", error.recipient, error.message));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_helpers() {
        let mut result = BatchResult {
            total_recipients: 2,
            processed: 2,
            errors: Vec::new(),
        };
        assert!(result.is_complete());
        assert_eq!(result.failed(), 0);

        result.processed = 1;
        result.errors.push(RecordError {
            recipient: "<unnamed, line 3>".to_string(),
            message: "Validation error: missing required field 'name'".to_string(),
        });
        assert!(!result.is_complete());
        assert_eq!(result.failed(), 1);
    }
}
