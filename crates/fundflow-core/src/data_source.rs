use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{ProviderId, SchemeCode};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured error raised while retrieving a raw NAV feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// One unparsed row of a NAV feed, exactly as the source delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNavRow {
    pub date: String,
    pub nav: String,
}

impl RawNavRow {
    pub fn new(date: impl Into<String>, nav: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            nav: nav.into(),
        }
    }
}

/// Descriptive fields a source publishes alongside the NAV history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_house: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_name: Option<String>,
}

/// Raw NAV history for one scheme, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNavFeed {
    pub scheme_code: SchemeCode,
    pub meta: SchemeMeta,
    pub rows: Vec<RawNavRow>,
}

/// NAV history source contract.
///
/// Implementations perform the network (or fixture) lookup only; cleaning and
/// ordering are the loader's job, so `rows` may arrive unsorted and dirty.
pub trait NavSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch the full NAV history published for `scheme_code`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the transport fails, the source answers with
    /// a non-success status, the scheme is unknown, or the payload cannot be
    /// decoded.
    fn nav_history<'a>(
        &'a self,
        scheme_code: &'a SchemeCode,
    ) -> Pin<Box<dyn Future<Output = Result<RawNavFeed, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_kind() {
        let error = SourceError::not_found("scheme 1 is unknown");
        assert_eq!(error.code(), "source.not_found");
        assert!(!error.retryable());
        assert_eq!(error.to_string(), "scheme 1 is unknown (source.not_found)");
        assert!(SourceError::unavailable("down").retryable());
    }
}
