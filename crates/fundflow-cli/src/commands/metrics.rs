use std::path::Path;
use std::time::Instant;

use fundflow_core::{compute_metrics_from_file, FundflowConfig, ProviderId};
use serde_json::{json, Value};

use crate::error::CliError;

use super::{metrics_error_entry, CommandResult};

pub fn run(config: &FundflowConfig) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let (data, error) = metrics_for(&config.data_file)?;
    let latency_ms = started.elapsed().as_millis() as u64;

    let mut result = CommandResult::ok(data, vec![ProviderId::File]).with_latency(latency_ms);
    if let Some(error) = error {
        result = result.with_error(error);
    }
    Ok(result)
}

/// Metrics payload for the series at `path`, or a `null` metrics field plus the
/// envelope error explaining why.
pub(super) fn metrics_for(
    path: &Path,
) -> Result<(Value, Option<fundflow_core::EnvelopeError>), CliError> {
    let data_file = path.display().to_string();
    match compute_metrics_from_file(path) {
        Ok(metrics) => Ok((
            json!({
                "data_file": data_file,
                "metrics": metrics,
            }),
            None,
        )),
        Err(error) => Ok((
            json!({
                "data_file": data_file,
                "metrics": Value::Null,
            }),
            Some(metrics_error_entry(&error)?),
        )),
    }
}
