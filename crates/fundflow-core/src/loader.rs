//! NAV history loader: fetch, clean, order and persist a scheme's NAV series.
//!
//! Cleaning rules, applied to the raw feed in this order:
//!
//! 1. every NAV field is parsed as `f64`; empty, non-numeric, non-finite and
//!    non-positive values are flagged invalid, never coerced to zero
//! 2. every date field is parsed as `DD-MM-YYYY`; failures are flagged invalid
//! 3. the full set is stably sorted by date, oldest first
//! 4. rows flagged invalid in either field are dropped
//!
//! Each field is judged on its own row only, so a defect never spills over to
//! a neighbouring observation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::MfapiAdapter;
use crate::config::FundflowConfig;
use crate::data_source::{NavSource, RawNavRow, SchemeMeta, SourceError};
use crate::http_client::ReqwestHttpClient;
use crate::store::{self, StoreError, DEFAULT_DATA_FILE};
use crate::{NavDate, NavObservation, NavSeries, ProviderId, SchemeCode};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid scheme code: {0}")]
    InvalidSchemeCode(#[from] crate::ValidationError),

    #[error("failed to fetch nav history for scheme '{scheme_code}': {source}")]
    Source {
        scheme_code: SchemeCode,
        #[source]
        source: SourceError,
    },

    #[error(
        "scheme '{scheme_code}' returned {rows_received} row(s) but none had a valid date and nav"
    )]
    NoValidObservations {
        scheme_code: SchemeCode,
        rows_received: usize,
    },

    #[error("failed to persist nav series: {0}")]
    Store(#[from] StoreError),
}

impl FetchError {
    /// The soft-failure line reported in place of a success summary.
    pub fn report_line(&self) -> String {
        format!("Error: {self}")
    }

    /// Where the failure happened: the NAV source or the data file.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Store(_) => ProviderId::File,
            _ => ProviderId::Mfapi,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSchemeCode(_) => "fetch.invalid_scheme_code",
            Self::Source { source, .. } => source.code(),
            Self::NoValidObservations { .. } => "fetch.no_valid_observations",
            Self::Store(error) => error.code(),
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            Self::Source { source, .. } => source.retryable(),
            _ => false,
        }
    }
}

/// Why a raw row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDefect {
    InvalidNav,
    InvalidDate,
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_received: usize,
    /// Rows whose NAV field was unusable (a row may also have a bad date).
    pub invalid_nav: usize,
    /// Rows whose date field was unusable (a row may also have a bad NAV).
    pub invalid_date: usize,
    /// Rows removed because at least one field was invalid.
    pub rows_dropped: usize,
    /// Valid rows removed because they predate the lookback window.
    pub outside_window: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedFeed {
    pub series: NavSeries,
    pub report: CleanReport,
}

#[derive(Debug)]
struct ParsedRow {
    date: Result<NavDate, RowDefect>,
    nav: Result<f64, RowDefect>,
}

/// Apply the cleaning rules to a raw feed.
pub fn clean_feed(rows: &[RawNavRow]) -> CleanedFeed {
    let mut parsed = rows
        .iter()
        .map(|row| ParsedRow {
            date: NavDate::parse_source(&row.date).map_err(|_| RowDefect::InvalidDate),
            nav: parse_nav(&row.nav),
        })
        .collect::<Vec<_>>();

    // Stable: equal dates keep feed order. Undated rows sort first and are dropped below.
    parsed.sort_by_key(|row| row.date.ok());

    let mut report = CleanReport {
        rows_received: rows.len(),
        ..CleanReport::default()
    };
    let mut observations = Vec::with_capacity(parsed.len());

    for row in parsed {
        if row.nav.is_err() {
            report.invalid_nav += 1;
        }
        if row.date.is_err() {
            report.invalid_date += 1;
        }

        match (row.date, row.nav) {
            // `parse_nav` already enforces a finite, positive value.
            (Ok(date), Ok(nav)) => observations.push(NavObservation { date, nav }),
            _ => report.rows_dropped += 1,
        }
    }

    CleanedFeed {
        series: NavSeries::from_ordered(observations),
        report,
    }
}

fn parse_nav(text: &str) -> Result<f64, RowDefect> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(RowDefect::InvalidNav),
    }
}

/// Result of a successful [`NavLoader::load`].
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub scheme_code: SchemeCode,
    pub source: ProviderId,
    pub meta: SchemeMeta,
    pub series: NavSeries,
    pub data_file: PathBuf,
    pub rows_written: usize,
    pub report: CleanReport,
}

impl LoadOutcome {
    pub fn summary(&self) -> String {
        format!(
            "Success: Data saved to '{}' with {} rows. Columns: date, nav.",
            self.data_file.display(),
            self.rows_written
        )
    }
}

/// Fetches a scheme's NAV history from a [`NavSource`] and persists the
/// cleaned series as CSV.
#[derive(Clone)]
pub struct NavLoader {
    source: Arc<dyn NavSource>,
    data_file: PathBuf,
    lookback_days: u32,
}

impl NavLoader {
    /// Loader over `source` with the default data file and no lookback limit.
    pub fn new(source: Arc<dyn NavSource>) -> Self {
        Self {
            source,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            lookback_days: 0,
        }
    }

    /// Loader over the MFAPI endpoint configured by `config`.
    pub fn from_config(config: &FundflowConfig) -> Self {
        let adapter = MfapiAdapter::with_http_client(Arc::new(ReqwestHttpClient::default()))
            .with_base_url(config.base_url.clone())
            .with_timeout_ms(config.timeout_ms);

        Self::new(Arc::new(adapter))
            .with_data_file(config.data_file.clone())
            .with_lookback_days(config.lookback_days)
    }

    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }

    /// Keep only observations within `days` of the latest one; `0` keeps everything.
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Fetch and clean, without touching disk.
    pub async fn fetch_series(&self, scheme_code: &SchemeCode) -> Result<NavSeries, FetchError> {
        self.fetch_cleaned(scheme_code)
            .await
            .map(|(_, cleaned)| cleaned.series)
    }

    /// Fetch, clean and persist.
    pub async fn load(&self, scheme_code: &SchemeCode) -> Result<LoadOutcome, FetchError> {
        let (meta, cleaned) = self.fetch_cleaned(scheme_code).await?;
        let rows_written = store::write_series(&self.data_file, &cleaned.series)?;

        info!(
            scheme_code = %scheme_code,
            path = %self.data_file.display(),
            rows = rows_written,
            "saved nav series"
        );

        Ok(LoadOutcome {
            scheme_code: scheme_code.clone(),
            source: self.source.id(),
            meta,
            series: cleaned.series,
            data_file: self.data_file.clone(),
            rows_written,
            report: cleaned.report,
        })
    }

    /// [`load`](Self::load) behind a soft-failure boundary: always returns a
    /// human-readable line, starting with `Success:` or `Error:`.
    pub async fn load_report(&self, scheme_code: &str) -> String {
        let outcome = match SchemeCode::parse(scheme_code) {
            Ok(code) => self.load(&code).await,
            Err(error) => Err(FetchError::from(error)),
        };

        match outcome {
            Ok(outcome) => outcome.summary(),
            Err(error) => {
                warn!(scheme_code, %error, "nav history load failed");
                error.report_line()
            }
        }
    }

    async fn fetch_cleaned(
        &self,
        scheme_code: &SchemeCode,
    ) -> Result<(SchemeMeta, CleanedFeed), FetchError> {
        let feed = self
            .source
            .nav_history(scheme_code)
            .await
            .map_err(|source| FetchError::Source {
                scheme_code: scheme_code.clone(),
                source,
            })?;

        let mut cleaned = clean_feed(&feed.rows);
        if cleaned.report.rows_dropped > 0 {
            warn!(
                scheme_code = %scheme_code,
                dropped = cleaned.report.rows_dropped,
                invalid_nav = cleaned.report.invalid_nav,
                invalid_date = cleaned.report.invalid_date,
                "dropped invalid nav rows"
            );
        }

        if cleaned.series.is_empty() {
            return Err(FetchError::NoValidObservations {
                scheme_code: scheme_code.clone(),
                rows_received: cleaned.report.rows_received,
            });
        }

        if self.lookback_days > 0 {
            if let Some(latest) = cleaned.series.last().map(|observation| observation.date) {
                let before = cleaned.series.len();
                cleaned.series = cleaned.series.since(latest.minus_days(self.lookback_days));
                cleaned.report.outside_window = before - cleaned.series.len();
            }
        }

        Ok((feed.meta, cleaned))
    }
}
