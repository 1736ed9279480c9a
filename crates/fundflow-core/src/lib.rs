//! # Fundflow Core
//!
//! Mutual fund NAV history loading and growth/risk metrics.
//!
//! The pipeline is two plain steps run in sequence:
//!
//! ```text
//! ┌──────────────┐   raw rows    ┌──────────────┐   fund_data.csv   ┌──────────────────┐
//! │  NavSource   │──────────────▶│  NavLoader   │──────────────────▶│ compute_metrics  │
//! │  (MFAPI)     │               │ clean + sort │   (date,nav)      │ CAGR, volatility │
//! └──────────────┘               └──────────────┘                   └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | NAV source adapters (MFAPI) |
//! | [`config`] | Environment-driven settings |
//! | [`data_source`] | Source trait, raw feed types and source errors |
//! | [`domain`] | Scheme codes, dates, observations and series |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`loader`] | Fetch, clean, order and persist |
//! | [`metrics`] | CAGR and annualized volatility |
//! | [`source`] | Provider identifiers |
//! | [`store`] | CSV persistence of a series |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fundflow_core::{compute_metrics, FundflowConfig, NavLoader, SchemeCode};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = NavLoader::from_config(&FundflowConfig::from_env()?);
//!     let outcome = loader.load(&SchemeCode::parse("120503")?).await?;
//!     let metrics = compute_metrics(&outcome.series)?;
//!     println!("CAGR {:.2}%  volatility {:.2}%", metrics.cagr, metrics.volatility);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod loader;
pub mod metrics;
pub mod source;
pub mod store;

pub use adapters::MfapiAdapter;

pub use config::{ConfigError, FundflowConfig};

pub use data_source::{NavSource, RawNavFeed, RawNavRow, SchemeMeta, SourceError, SourceErrorKind};

pub use domain::{NavDate, NavObservation, NavSeries, SchemeCode};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::ValidationError;

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

pub use loader::{clean_feed, CleanReport, CleanedFeed, FetchError, LoadOutcome, NavLoader, RowDefect};

pub use metrics::{
    compute_metrics, compute_metrics_from_file, daily_returns, CalcError, Metrics, MetricsError,
    DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR,
};

pub use source::ProviderId;

pub use store::{read_series, write_series, ParseError, StoreError};
