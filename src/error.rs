//! Error types
//!
//! Typed failures for blood-pressure parsing, metrics calculation,
//! command validation and roster loading.

use std::num::ParseIntError;
use thiserror::Error;

/// Blood-pressure string could not be read as `systolic/diastolic`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BloodPressureError {
    /// No `/` in the reading
    #[error("expected \"systolic/diastolic\", found no '/' in {0:?}")]
    MissingSeparator(String),

    /// More than one `/`
    #[error("expected exactly two readings, found {count} in {value:?}")]
    WrongPartCount { value: String, count: usize },

    /// One side is not an unsigned integer
    #[error("invalid {side} reading {part:?}: {source}")]
    InvalidReading {
        side: &'static str,
        part: String,
        #[source]
        source: ParseIntError,
    },
}

/// Metrics could not be computed for a patient list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// Nothing to divide by
    #[error("cannot compute metrics for an empty patient list")]
    EmptyPatientList,

    /// A stored record carries an unparseable blood pressure
    #[error("patient {patient:?} has malformed blood pressure {value:?}: {source}")]
    MalformedBloodPressure {
        patient: String,
        value: String,
        #[source]
        source: BloodPressureError,
    },

    /// No such physician in the roster
    #[error("unknown physician: {0}")]
    UnknownPhysician(String),
}

/// An add-patient command was rejected before touching the roster
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown physician: {0}")]
    UnknownPhysician(String),

    #[error("patient name must not be empty")]
    EmptyPatientName,

    #[error("invalid blood pressure: {0}")]
    BloodPressure(#[from] BloodPressureError),

    #[error("cholesterol must be a non-negative integer, got {0:?}")]
    InvalidCholesterol(String),

    #[error("HA1C must be a number, got {0:?}")]
    InvalidHa1c(String),

    #[error("HA1C must be between {min:.1} and {max:.1}, got {value}")]
    Ha1cOutOfRange { value: f64, min: f64, max: f64 },

    #[error("no physician selected: {0:?}")]
    InvalidSelection(String),
}

/// Seed roster could not be loaded
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("roster has no physicians")]
    Empty,

    #[error("duplicate physician in roster: {0}")]
    DuplicatePhysician(String),
}

/// Metrics result type
pub type MetricsResult<T> = Result<T, MetricsError>;
