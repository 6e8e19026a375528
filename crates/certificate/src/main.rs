//! `certgen` - generate one certificate PDF per recipient

use anyhow::{Context, Result};
use certificate::logging::{self, RunLog, TracingLog};
use certificate::{run_batch, Config};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "certgen", version, about = "Generate one certificate PDF per recipient")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recipient list (first row is the header)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Template PDF
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Directory certificates are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Field delimiter of the recipient list
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Log file (truncated at start)
    #[arg(long, conflicts_with = "no_log_file")]
    log_file: Option<PathBuf>,

    /// Only log to stdout
    #[arg(long)]
    no_log_file: bool,

    /// Issuer text printed on every certificate
    #[arg(long)]
    issuer: Option<String>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).context("failed to load configuration")?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(template) = self.template {
            config.template_path = template;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(issuer) = self.issuer {
            config.issuer = issuer;
        }
        if self.no_log_file {
            config.log_file = None;
        } else if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let session = match logging::init(config.log_file.as_deref()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {:#}", anyhow::Error::from(err));
            return ExitCode::FAILURE;
        }
    };

    let log = TracingLog;
    if let Some(path) = session.log_file() {
        log.info(&format!("Logging to {}", path.display()));
    }

    let code = match run_batch(&config, &log).context("certificate generation aborted") {
        Ok(result) => {
            log.info(&format!(
                "Done: {} generated, {} failed",
                result.processed,
                result.failed()
            ));
            ExitCode::SUCCESS
        }
        Err(err) => {
            log.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    };

    if let Err(err) = session.close() {
        eprintln!("error: {:#}", anyhow::Error::from(err));
    }

    code
}
