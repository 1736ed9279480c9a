use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SCHEME_CODE_LEN: usize = 10;

/// AMFI scheme code identifying an Indian mutual fund scheme (e.g. `120503`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemeCode(String);

impl SchemeCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySchemeCode);
        }

        let len = trimmed.chars().count();
        if len > MAX_SCHEME_CODE_LEN {
            return Err(ValidationError::SchemeCodeTooLong {
                len,
                max: MAX_SCHEME_CODE_LEN,
            });
        }

        if let Some((index, ch)) = trimmed.chars().enumerate().find(|(_, ch)| !ch.is_ascii_digit())
        {
            return Err(ValidationError::SchemeCodeNotNumeric { ch, index });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SchemeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SchemeCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for SchemeCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SchemeCode> for String {
    fn from(value: SchemeCode) -> Self {
        value.0
    }
}
