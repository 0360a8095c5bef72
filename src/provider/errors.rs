//! Error types for ephemeris and catalog providers

use thiserror::Error;

/// Error reported by an [`EphemerisProvider`](super::EphemerisProvider)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The loaded data has nothing for the requested body, frame or instrument
    #[error("No data for {0}")]
    NoData(String),

    /// A body, frame or instrument name could not be resolved
    #[error("Unknown name: {0}")]
    UnknownName(String),

    /// The instrument FOV has more boundary vectors than the caller accepts
    #[error("FOV of {instrument} has {count} boundary vectors (max {max})")]
    TooManyBoundaryVectors {
        /// Instrument NAIF ID
        instrument: i32,
        /// Number of boundary vectors defined for the instrument
        count: usize,
        /// Caller supplied maximum
        max: usize,
    },

    /// The backing service could not be reached or is not initialized
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Other, miscellaneous errors
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Whether the error only means the loaded data lacks what was asked for
    ///
    /// These are recoverable per body. Anything else (an unreachable service,
    /// a toolkit failure) is a failure of the whole session.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ProviderError::NoData(_) | ProviderError::UnknownName(_))
    }
}

/// Extension of the Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
