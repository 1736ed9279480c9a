mod analyze;
mod fetch;
mod metrics;

use fundflow_core::{
    CleanReport, Envelope, EnvelopeError, EnvelopeMeta, FetchError, FundflowConfig, MetricsError,
    ProviderId,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = resolve_config(cli)?;

    let command_result = match &cli.command {
        Command::Fetch(args) => fetch::run(args, &config).await?,
        Command::Metrics(_) => metrics::run(&config)?,
        Command::Analyze(args) => analyze::run(args, &config).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), source_chain, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Environment first, then command-line flags on top.
fn resolve_config(cli: &Cli) -> Result<FundflowConfig, CliError> {
    Ok(apply_flags(cli, FundflowConfig::from_env()?))
}

fn apply_flags(cli: &Cli, mut config: FundflowConfig) -> FundflowConfig {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config
}

fn fetch_error_entry(error: &FetchError) -> Result<EnvelopeError, CliError> {
    Ok(EnvelopeError::new(error.code(), error.to_string())?
        .with_retryable(error.retryable())
        .with_source(error.provider()))
}

fn metrics_error_entry(error: &MetricsError) -> Result<EnvelopeError, CliError> {
    Ok(EnvelopeError::new(error.code(), error.to_string())?
        .with_retryable(false)
        .with_source(ProviderId::File))
}

fn dropped_rows_warning(report: &CleanReport) -> Option<String> {
    (report.rows_dropped > 0).then(|| {
        format!(
            "dropped {} of {} rows with an invalid date or nav",
            report.rows_dropped, report.rows_received
        )
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use fundflow_core::{SchemeCode, StoreError};

    use super::*;

    fn env_config() -> FundflowConfig {
        FundflowConfig::from_lookup(|name| match name {
            "FUNDFLOW_MFAPI_BASE_URL" => Some(String::from("http://env.test")),
            "FUNDFLOW_DATA_FILE" => Some(String::from("env.csv")),
            "FUNDFLOW_TIMEOUT_MS" => Some(String::from("2500")),
            "FUNDFLOW_LOOKBACK_DAYS" => Some(String::from("30")),
            _ => None,
        })
        .expect("config")
    }

    #[test]
    fn flags_override_environment_values() {
        let cli = Cli::try_parse_from([
            "fundflow",
            "metrics",
            "--base-url",
            "http://flag.test",
            "--data-file",
            "flag.csv",
        ])
        .expect("valid arguments");

        let config = apply_flags(&cli, env_config());

        assert_eq!(config.base_url, "http://flag.test");
        assert_eq!(config.data_file, PathBuf::from("flag.csv"));
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.lookback_days, 30);
    }

    #[test]
    fn environment_values_stand_without_flags() {
        let cli = Cli::try_parse_from(["fundflow", "metrics"]).expect("valid arguments");

        assert_eq!(apply_flags(&cli, env_config()), env_config());
    }

    #[test]
    fn fetch_errors_name_the_failing_side() {
        let store = FetchError::Store(StoreError::Io {
            path: String::from("/missing/fund_data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        });
        let missing = FetchError::NoValidObservations {
            scheme_code: SchemeCode::parse("120503").expect("code"),
            rows_received: 3,
        };

        let store_entry = fetch_error_entry(&store).expect("entry");
        let missing_entry = fetch_error_entry(&missing).expect("entry");

        assert_eq!(store_entry.source, Some(ProviderId::File));
        assert_eq!(store_entry.code, "store.io");
        assert_eq!(missing_entry.source, Some(ProviderId::Mfapi));
    }
}
