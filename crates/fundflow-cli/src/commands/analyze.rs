use std::time::Instant;

use fundflow_core::{FundflowConfig, ProviderId, SchemeCode};
use serde_json::json;
use tracing::info;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::fetch::{loader_for, outcome_json};
use super::metrics::metrics_for;
use super::{dropped_rows_warning, fetch_error_entry, CommandResult};

/// Fetch and save, then compute metrics from the saved file. The second step
/// runs only when the first succeeded.
pub async fn run(args: &FetchArgs, config: &FundflowConfig) -> Result<CommandResult, CliError> {
    let scheme_code = SchemeCode::parse(&args.scheme_code)?;
    let loader = loader_for(args, config);
    let started = Instant::now();

    let outcome = match loader.load(&scheme_code).await {
        Ok(outcome) => outcome,
        Err(error) => {
            let data = json!({
                "scheme_code": scheme_code,
                "message": error.report_line(),
                "metrics": null,
            });
            return Ok(CommandResult::ok(data, vec![ProviderId::Mfapi])
                .with_error(fetch_error_entry(&error)?)
                .with_warning("metrics skipped because the nav history could not be loaded")
                .with_latency(started.elapsed().as_millis() as u64));
        }
    };

    info!(scheme_code = %scheme_code, rows = outcome.rows_written, "computing metrics");
    let (metrics, metrics_error) = metrics_for(&outcome.data_file)?;

    let mut data = outcome_json(&outcome);
    data["metrics"] = metrics["metrics"].clone();

    let mut result = CommandResult::ok(data, vec![ProviderId::Mfapi, ProviderId::File])
        .with_latency(started.elapsed().as_millis() as u64);
    if let Some(warning) = dropped_rows_warning(&outcome.report) {
        result = result.with_warning(warning);
    }
    if let Some(error) = metrics_error {
        result = result.with_error(error);
    }
    Ok(result)
}
