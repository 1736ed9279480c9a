//! Two-column CSV persistence for NAV series.
//!
//! The file carries a `date,nav` header, ISO dates and NAVs written in their
//! shortest round-trip decimal form, so a write followed by a read yields the
//! same `(date, nav)` sequence.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{NavDate, NavObservation, NavSeries, ValidationError};

/// Default location of the persisted series, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "fund_data.csv";

/// A persisted row that does not satisfy the series contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct ParseError {
    pub line: u64,
    #[source]
    pub source: ValidationError,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("persisted series is not ordered by date: {0}")]
    Order(ValidationError),
}

impl StoreError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "store.io",
            Self::Csv(_) => "store.csv",
            Self::Parse(_) => "store.parse",
            Self::Order(_) => "store.unordered",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NavRecord {
    date: String,
    nav: f64,
}

/// Write `series` as CSV to `path`, replacing any existing file. Returns the
/// number of data rows written.
pub fn write_series(path: impl AsRef<Path>, series: &NavSeries) -> Result<usize, StoreError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let rows = write_series_to(file, series)?;
    debug!(path = %path.display(), rows, "persisted nav series");
    Ok(rows)
}

/// Read a series previously written by [`write_series`].
pub fn read_series(path: impl AsRef<Path>) -> Result<NavSeries, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let series = read_series_from(file)?;
    debug!(path = %path.display(), rows = series.len(), "loaded nav series");
    Ok(series)
}

pub fn write_series_to<W: Write>(writer: W, series: &NavSeries) -> Result<usize, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written by hand so an empty series still produces a well-formed file.
    writer.write_record(["date", "nav"])?;
    for observation in series.observations() {
        writer.serialize(NavRecord {
            date: observation.date.format_iso(),
            nav: observation.nav,
        })?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(series.len())
}

pub fn read_series_from<R: Read>(reader: R) -> Result<NavSeries, StoreError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut observations = Vec::new();

    for record in reader.records() {
        let record = record?;
        // Physical line in the file; blank lines are skipped by the reader.
        let line = record.position().map_or(0, csv::Position::line);
        let record: NavRecord = record.deserialize(Some(&headers))?;
        let date = NavDate::parse_iso(&record.date).map_err(|source| ParseError { line, source })?;
        let observation =
            NavObservation::new(date, record.nav).map_err(|source| ParseError { line, source })?;
        observations.push(observation);
    }

    NavSeries::new(observations).map_err(StoreError::Order)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
