//! # Domain Models
//!
//! Canonical types for fund NAV history.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SchemeCode`] | Validated AMFI scheme code |
//! | [`NavDate`] | Calendar date of an observation |
//! | [`NavObservation`] | One `(date, nav)` pair with `nav > 0` |
//! | [`NavSeries`] | Date-ordered, immutable observation sequence |
//!
//! Every type enforces its invariants at construction time and returns a
//! [`ValidationError`](crate::ValidationError) otherwise.

mod date;
mod nav;
mod scheme;

pub use date::NavDate;
pub use nav::{NavObservation, NavSeries};
pub use scheme::SchemeCode;
