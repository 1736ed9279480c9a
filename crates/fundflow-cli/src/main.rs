mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use fundflow_core::Envelope;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout stays a clean envelope. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let envelope = commands::run(cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    exit_status(&envelope, cli.strict).map(ExitCode::from)
}

/// 0 on a clean envelope, 3 when it carries errors. Strict mode fails on any
/// warning or error instead.
fn exit_status(envelope: &Envelope<Value>, strict: bool) -> Result<u8, CliError> {
    if strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if !envelope.errors.is_empty() {
        return Ok(3);
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use fundflow_core::{EnvelopeError, EnvelopeMeta, ProviderId};
    use serde_json::json;

    use super::*;

    fn envelope(warnings: &[&str], errors: &[&str]) -> Envelope<Value> {
        let mut meta = EnvelopeMeta::new("req-00000001", vec![ProviderId::File], 1).expect("meta");
        for warning in warnings {
            meta.push_warning(*warning);
        }
        let errors = errors
            .iter()
            .map(|code| EnvelopeError::new(*code, "failed").expect("error"))
            .collect();
        Envelope::with_errors(meta, json!({}), errors).expect("envelope")
    }

    #[test]
    fn clean_envelope_exits_zero() {
        assert_eq!(exit_status(&envelope(&[], &[]), true).expect("status"), 0);
    }

    #[test]
    fn envelope_errors_exit_three() {
        let status = exit_status(&envelope(&[], &["calc.insufficient_data"]), false);
        assert_eq!(status.expect("status"), 3);
    }

    #[test]
    fn warnings_alone_pass_outside_strict_mode() {
        assert_eq!(exit_status(&envelope(&["dropped rows"], &[]), false).expect("status"), 0);
    }

    #[test]
    fn strict_mode_turns_warnings_into_exit_five() {
        let error = exit_status(&envelope(&["dropped rows"], &[]), true).expect_err("strict");

        assert!(matches!(
            error,
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0
            }
        ));
        assert_eq!(error.exit_code(), 5);
    }
}
