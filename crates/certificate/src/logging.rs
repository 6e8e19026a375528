//! Logging for certificate runs
//!
//! Events go to stdout and, optionally, to a log file that is truncated when
//! the run starts. The orchestrator reports through [`RunLog`] so tests can
//! capture what it says.

use crate::{CertError, Result};
use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Leveled logging capability handed to the batch orchestrator
pub trait RunLog {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// [`RunLog`] backed by the global `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl RunLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Local wall-clock timestamps, e.g. `2024-05-01 14:03:22`
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Handle on the log sinks of the current run
pub struct LogSession {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl LogSession {
    /// Path of the log file, if one is being written
    pub fn log_file(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flush the log file to disk at the end of the run
    pub fn close(self) -> Result<()> {
        if let (Some(file), Some(path)) = (self.file, self.path) {
            file.sync_all().map_err(|e| CertError::io(path, e))?;
        }
        Ok(())
    }
}

/// Install the global subscriber for this process
///
/// `RUST_LOG` overrides the default `info` level. Fails if the log file cannot
/// be created or a subscriber is already installed.
pub fn init(log_file: Option<&Path>) -> Result<LogSession> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer()
        .with_timer(LocalTime)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stdout);

    let (file_layer, file) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| CertError::io(parent, e))?;
            }
            let file = File::create(path).map_err(|e| CertError::io(path, e))?;
            let handle = file.try_clone().map_err(|e| CertError::io(path, e))?;

            let layer = fmt::layer()
                .with_timer(LocalTime)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(handle))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CertError::Config(format!("failed to install tracing subscriber: {e}")))?;

    Ok(LogSession {
        file,
        path: log_file.map(Path::to_path_buf),
    })
}
