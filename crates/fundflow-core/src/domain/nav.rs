use serde::{Deserialize, Serialize};

use crate::{NavDate, ValidationError};

/// Single NAV print for a scheme on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavObservation {
    pub date: NavDate,
    pub nav: f64,
}

impl NavObservation {
    pub fn new(date: NavDate, nav: f64) -> Result<Self, ValidationError> {
        validate_positive("nav", nav)?;
        Ok(Self { date, nav })
    }
}

/// Date-ordered NAV history.
///
/// Observations are non-decreasing by date. Several observations may share a
/// date; they are kept in the order they were supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NavSeries {
    observations: Vec<NavObservation>,
}

impl NavSeries {
    pub fn new(observations: Vec<NavObservation>) -> Result<Self, ValidationError> {
        for observation in &observations {
            validate_positive("nav", observation.nav)?;
        }

        if let Some(index) = observations
            .windows(2)
            .position(|pair| pair[1].date < pair[0].date)
        {
            return Err(ValidationError::UnorderedSeries { index: index + 1 });
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[NavObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&NavObservation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&NavObservation> {
        self.observations.last()
    }

    /// Wrap observations the caller has already validated and date-sorted.
    pub(crate) fn from_ordered(observations: Vec<NavObservation>) -> Self {
        debug_assert!(observations.windows(2).all(|pair| pair[0].date <= pair[1].date));
        Self { observations }
    }

    /// Keep observations dated on or after `start`.
    pub(crate) fn since(self, start: NavDate) -> Self {
        let observations = self
            .observations
            .into_iter()
            .filter(|observation| observation.date >= start)
            .collect();
        Self { observations }
    }
}

impl<'de> Deserialize<'de> for NavSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let observations = Vec::<NavObservation>::deserialize(deserializer)?;
        Self::new(observations).map_err(serde::de::Error::custom)
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
