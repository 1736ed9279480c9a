use std::time::Instant;

use fundflow_core::{FundflowConfig, LoadOutcome, NavLoader, ProviderId, SchemeCode};
use serde_json::{json, Value};

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{dropped_rows_warning, fetch_error_entry, CommandResult};

pub async fn run(args: &FetchArgs, config: &FundflowConfig) -> Result<CommandResult, CliError> {
    let scheme_code = SchemeCode::parse(&args.scheme_code)?;
    let loader = loader_for(args, config);

    let started = Instant::now();
    let outcome = loader.load(&scheme_code).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(outcome) => {
            let mut result = CommandResult::ok(outcome_json(&outcome), vec![ProviderId::Mfapi])
                .with_latency(latency_ms);
            if let Some(warning) = dropped_rows_warning(&outcome.report) {
                result = result.with_warning(warning);
            }
            Ok(result)
        }
        Err(error) => {
            let data = json!({
                "scheme_code": scheme_code,
                "message": error.report_line(),
            });
            Ok(CommandResult::ok(data, vec![ProviderId::Mfapi])
                .with_error(fetch_error_entry(&error)?)
                .with_latency(latency_ms))
        }
    }
}

pub(super) fn loader_for(args: &FetchArgs, config: &FundflowConfig) -> NavLoader {
    let mut config = config.clone();
    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }
    NavLoader::from_config(&config)
}

pub(super) fn outcome_json(outcome: &LoadOutcome) -> Value {
    json!({
        "scheme_code": outcome.scheme_code,
        "scheme": outcome.meta,
        "message": outcome.summary(),
        "data_file": outcome.data_file.display().to_string(),
        "rows": outcome.rows_written,
        "first_date": outcome.series.first().map(|observation| observation.date),
        "last_date": outcome.series.last().map(|observation| observation.date),
        "clean": outcome.report,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fundflow_core::{clean_feed, CleanReport, RawNavRow, SchemeMeta};

    use super::*;

    #[test]
    fn outcome_json_exposes_summary_and_window() {
        let rows = vec![
            RawNavRow::new("02-01-2024", "11.0"),
            RawNavRow::new("01-01-2024", "10.0"),
        ];
        let outcome = LoadOutcome {
            scheme_code: SchemeCode::parse("120503").expect("code"),
            source: ProviderId::Mfapi,
            meta: SchemeMeta {
                scheme_name: Some(String::from("Axis Bluechip Fund")),
                ..SchemeMeta::default()
            },
            series: clean_feed(&rows).series,
            data_file: PathBuf::from("fund_data.csv"),
            rows_written: 2,
            report: CleanReport {
                rows_received: 2,
                ..CleanReport::default()
            },
        };

        let value = outcome_json(&outcome);
        assert_eq!(value["scheme_code"], "120503");
        assert_eq!(value["scheme"]["scheme_name"], "Axis Bluechip Fund");
        assert_eq!(value["first_date"], "2024-01-01");
        assert_eq!(value["last_date"], "2024-01-02");
        assert_eq!(value["rows"], 2);
        assert_eq!(
            value["message"],
            "Success: Data saved to 'fund_data.csv' with 2 rows. Columns: date, nav."
        );
    }
}
