//! Session commands
//!
//! The only mutation a session accepts is appending a patient record.

use crate::error::ValidationError;
use crate::health::{PatientRecord, PhysicianRoster, HA1C_MAX, HA1C_MIN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append `record` to `physician`'s patient list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddPatient {
    pub physician: String,
    pub record: PatientRecord,
}

impl AddPatient {
    pub fn new(physician: impl Into<String>, record: PatientRecord) -> Self {
        Self {
            physician: physician.into(),
            record,
        }
    }

    /// Check the command against the roster without applying it
    pub fn validate(&self, roster: &PhysicianRoster) -> Result<(), ValidationError> {
        if !roster.contains(&self.physician) {
            return Err(ValidationError::UnknownPhysician(self.physician.clone()));
        }

        if self.record.name.trim().is_empty() {
            return Err(ValidationError::EmptyPatientName);
        }

        self.record.parsed_blood_pressure()?;

        let ha1c = self.record.ha1c;
        if !ha1c.is_finite() || !(HA1C_MIN..=HA1C_MAX).contains(&ha1c) {
            return Err(ValidationError::Ha1cOutOfRange {
                value: ha1c,
                min: HA1C_MIN,
                max: HA1C_MAX,
            });
        }

        Ok(())
    }
}

/// Record of one applied [`AddPatient`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddPatientReceipt {
    pub id: Uuid,
    pub physician: String,
    pub patient: String,
    /// Physician's patient count after the append
    pub patient_count: usize,
    pub recorded_at: DateTime<Utc>,
}

impl AddPatientReceipt {
    pub fn new(physician: String, patient: String, patient_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            physician,
            patient,
            patient_count,
            recorded_at: Utc::now(),
        }
    }

    /// Confirmation shown after a successful submission
    pub fn message(&self) -> String {
        format!("Patient data added for {}!", self.physician)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BloodPressureError;

    fn command(bp: &str, ha1c: f64) -> AddPatient {
        AddPatient::new("Dr. Smith", PatientRecord::new("Kim Park", bp, 185, ha1c))
    }

    #[test]
    fn test_valid_command() {
        let roster = PhysicianRoster::seeded();
        assert!(command("122/79", 6.1).validate(&roster).is_ok());
        assert!(command("122/79", 0.0).validate(&roster).is_ok());
        assert!(command("122/79", 15.0).validate(&roster).is_ok());
    }

    #[test]
    fn test_unknown_physician() {
        let roster = PhysicianRoster::seeded();
        let mut cmd = command("122/79", 6.1);
        cmd.physician = "Dr. Nobody".to_string();
        assert_eq!(
            cmd.validate(&roster),
            Err(ValidationError::UnknownPhysician("Dr. Nobody".to_string()))
        );
    }

    #[test]
    fn test_blank_patient_name() {
        let roster = PhysicianRoster::seeded();
        let mut cmd = command("122/79", 6.1);
        cmd.record.name = "   ".to_string();
        assert_eq!(cmd.validate(&roster), Err(ValidationError::EmptyPatientName));
    }

    #[test]
    fn test_malformed_blood_pressure() {
        let roster = PhysicianRoster::seeded();
        let err = command("not-a-number", 6.1).validate(&roster).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BloodPressure(BloodPressureError::MissingSeparator(
                "not-a-number".to_string()
            ))
        );
    }

    #[test]
    fn test_ha1c_out_of_range() {
        let roster = PhysicianRoster::seeded();
        assert!(matches!(
            command("122/79", 15.1).validate(&roster),
            Err(ValidationError::Ha1cOutOfRange { .. })
        ));
        assert!(matches!(
            command("122/79", -0.1).validate(&roster),
            Err(ValidationError::Ha1cOutOfRange { .. })
        ));
        assert!(matches!(
            command("122/79", f64::NAN).validate(&roster),
            Err(ValidationError::Ha1cOutOfRange { .. })
        ));
    }

    #[test]
    fn test_receipt_message() {
        let receipt = AddPatientReceipt::new("Dr. Brown".to_string(), "Kim Park".to_string(), 4);
        assert_eq!(receipt.message(), "Patient data added for Dr. Brown!");
        assert_eq!(receipt.patient_count, 4);
    }
}
