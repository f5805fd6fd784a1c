//! Error types for colony optimization.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ColonyResult<T> = Result<T, ColonyError>;

/// Failures detected before or during setup of a colony run.
///
/// Runs never fail once started: degenerate roulette draws are recovered
/// locally and hitting the time budget is reported through
/// [`StopReason`](crate::aco::StopReason), not as an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColonyError {
    /// The problem instance cannot produce a tour (too few cities,
    /// non-finite coordinates).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A configuration parameter is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A caller-supplied city index does not exist.
    #[error("city {city} out of range for {len} cities")]
    CityOutOfRange {
        /// The offending index.
        city: usize,
        /// Number of cities in the instance.
        len: usize,
    },
}

impl ColonyError {
    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ColonyError::invalid_instance("need at least 2 cities, got 1");
        assert_eq!(
            err.to_string(),
            "invalid instance: need at least 2 cities, got 1"
        );

        let err = ColonyError::CityOutOfRange { city: 9, len: 4 };
        assert_eq!(err.to_string(), "city 9 out of range for 4 cities");
    }
}
