//! Add-patient form
//!
//! Raw field text as typed by the user, converted into an [`AddPatient`]
//! command. Field-level rules mirror the input widgets: doctor is picked
//! from the roster, cholesterol is a non-negative integer, HA1C is a number
//! in [0, 15] stored as entered. Name and blood pressure are checked when
//! the command is applied.

use crate::error::ValidationError;
use crate::health::{PatientRecord, PhysicianRoster, HA1C_MAX, HA1C_MIN};
use crate::session::AddPatient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub doctor: String,
    pub patient: String,
    pub blood_pressure: String,
    pub cholesterol: String,
    pub ha1c: String,
}

impl PatientForm {
    pub fn into_command(self, roster: &PhysicianRoster) -> Result<AddPatient, ValidationError> {
        let physician = resolve_doctor(roster, &self.doctor)?;
        let cholesterol = parse_cholesterol(&self.cholesterol)?;
        let ha1c = parse_ha1c(&self.ha1c)?;

        let record = PatientRecord::new(
            self.patient.trim(),
            self.blood_pressure.trim(),
            cholesterol,
            ha1c,
        );
        Ok(AddPatient::new(physician, record))
    }
}

/// Resolve a doctor selection given as a name or a 1-based list number.
///
/// An exact name wins over a list number; otherwise a unique
/// case-insensitive match is accepted.
pub fn resolve_doctor(roster: &PhysicianRoster, input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::InvalidSelection(input.to_string()));
    }

    if roster.contains(input) {
        return Ok(input.to_string());
    }

    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| roster.physicians().get(index))
            .map(|p| p.name.clone())
            .ok_or_else(|| ValidationError::InvalidSelection(input.to_string()));
    }

    let matches: Vec<&str> = roster
        .physician_names()
        .filter(|name| name.eq_ignore_ascii_case(input))
        .collect();
    match matches.as_slice() {
        [name] => Ok(name.to_string()),
        _ => Err(ValidationError::UnknownPhysician(input.to_string())),
    }
}

fn parse_cholesterol(input: &str) -> Result<u32, ValidationError> {
    let input = input.trim();
    input
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidCholesterol(input.to_string()))
}

fn parse_ha1c(input: &str) -> Result<f64, ValidationError> {
    let input = input.trim();
    let value = input
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidHa1c(input.to_string()))?;

    if !(HA1C_MIN..=HA1C_MAX).contains(&value) {
        return Err(ValidationError::Ha1cOutOfRange {
            value,
            min: HA1C_MIN,
            max: HA1C_MAX,
        });
    }

    Ok(value)
}
