use crate::error::BloodPressureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest accepted HA1C value (%)
pub const HA1C_MIN: f64 = 0.0;
/// Highest accepted HA1C value (%)
pub const HA1C_MAX: f64 = 15.0;

/// One patient's vitals as entered for a physician.
///
/// Blood pressure stays in its entered `systolic/diastolic` form and is
/// parsed on demand, so records loaded from a seed file may still carry a
/// malformed reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub name: String,
    pub blood_pressure: String,
    pub cholesterol: u32,
    pub ha1c: f64,
}

impl PatientRecord {
    pub fn new(
        name: impl Into<String>,
        blood_pressure: impl Into<String>,
        cholesterol: u32,
        ha1c: f64,
    ) -> Self {
        Self {
            name: name.into(),
            blood_pressure: blood_pressure.into(),
            cholesterol,
            ha1c,
        }
    }

    /// Parse the stored blood-pressure string
    pub fn parsed_blood_pressure(&self) -> Result<BloodPressure, BloodPressureError> {
        self.blood_pressure.parse()
    }
}

/// Blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    /// Parse `"systolic/diastolic"`. Each side must fit a `u16`, so negative
    /// readings and values above 65535 are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [systolic, diastolic] => Ok(Self {
                systolic: parse_reading("systolic", systolic)?,
                diastolic: parse_reading("diastolic", diastolic)?,
            }),
            [_] => Err(BloodPressureError::MissingSeparator(s.to_string())),
            _ => Err(BloodPressureError::WrongPartCount {
                value: s.to_string(),
                count: parts.len(),
            }),
        }
    }
}

fn parse_reading(side: &'static str, part: &str) -> Result<u16, BloodPressureError> {
    part.trim()
        .parse::<u16>()
        .map_err(|source| BloodPressureError::InvalidReading {
            side,
            part: part.to_string(),
            source,
        })
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blood_pressure() {
        let bp: BloodPressure = "120/80".parse().unwrap();
        assert_eq!(bp.systolic, 120);
        assert_eq!(bp.diastolic, 80);
        assert_eq!(bp.to_string(), "120/80");
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let bp: BloodPressure = " 118 / 78 ".parse().unwrap();
        assert_eq!(bp, BloodPressure { systolic: 118, diastolic: 78 });
    }

    #[test]
    fn test_not_a_number_is_rejected() {
        let err = "not-a-number".parse::<BloodPressure>().unwrap_err();
        assert!(matches!(err, BloodPressureError::MissingSeparator(_)));
    }

    #[test]
    fn test_non_numeric_side_is_rejected() {
        let err = "120/abc".parse::<BloodPressure>().unwrap_err();
        match err {
            BloodPressureError::InvalidReading { side, part, .. } => {
                assert_eq!(side, "diastolic");
                assert_eq!(part, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!("/80".parse::<BloodPressure>().is_err());
        assert!("-120/80".parse::<BloodPressure>().is_err());
        assert!("70000/80".parse::<BloodPressure>().is_err());
    }

    #[test]
    fn test_extra_separator_is_rejected() {
        let err = "120/80/60".parse::<BloodPressure>().unwrap_err();
        assert!(matches!(err, BloodPressureError::WrongPartCount { count: 3, .. }));
    }

    #[test]
    fn test_record_serialization() {
        let record = PatientRecord::new("John Doe", "120/80", 180, 6.0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["blood_pressure"], "120/80");
        assert_eq!(json["cholesterol"], 180);
    }
}
