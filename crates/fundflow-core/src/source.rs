use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Where a piece of output data came from. Recorded in envelope metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// The public MFAPI NAV history endpoint.
    Mfapi,
    /// A persisted series on local disk.
    File,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mfapi => "mfapi",
            Self::File => "file",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mfapi" => Ok(Self::Mfapi),
            "file" => Ok(Self::File),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_names_case_insensitively() {
        assert_eq!("MFAPI".parse::<ProviderId>(), Ok(ProviderId::Mfapi));
        assert_eq!(" file ".parse::<ProviderId>(), Ok(ProviderId::File));
        assert!("yahoo".parse::<ProviderId>().is_err());
    }
}
