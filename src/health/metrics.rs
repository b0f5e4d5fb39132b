use super::record::{BloodPressure, PatientRecord};
use crate::error::{MetricsError, MetricsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical goal thresholds. A patient meets a goal when the value is
/// strictly below its threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoalThresholds {
    /// Systolic pressure goal (mmHg)
    pub bp_systolic_below: u16,
    /// Diastolic pressure goal (mmHg)
    pub bp_diastolic_below: u16,
    /// Total cholesterol goal (mg/dL)
    pub cholesterol_below: u32,
    /// HA1C goal (%)
    pub ha1c_below: f64,
}

impl Default for GoalThresholds {
    fn default() -> Self {
        Self {
            bp_systolic_below: 130,
            bp_diastolic_below: 80,
            cholesterol_below: 200,
            ha1c_below: 7.0,
        }
    }
}

impl GoalThresholds {
    pub fn blood_pressure_met(&self, reading: BloodPressure) -> bool {
        reading.systolic < self.bp_systolic_below && reading.diastolic < self.bp_diastolic_below
    }

    pub fn cholesterol_met(&self, cholesterol: u32) -> bool {
        cholesterol < self.cholesterol_below
    }

    pub fn ha1c_met(&self, ha1c: f64) -> bool {
        ha1c < self.ha1c_below
    }
}

/// Count of patients meeting one goal
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GoalAttainment {
    pub achieved: usize,
    pub total: usize,
    pub percentage: f64,
}

impl GoalAttainment {
    pub fn new(achieved: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            achieved as f64 / total as f64 * 100.0
        };
        Self {
            achieved,
            total,
            percentage,
        }
    }
}

impl fmt::Display for GoalAttainment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.achieved, self.percentage)
    }
}

/// Goal attainment for one physician's patients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSummary {
    pub total_patients: usize,
    pub blood_pressure: GoalAttainment,
    pub cholesterol: GoalAttainment,
    pub ha1c: GoalAttainment,
}

impl MetricsSummary {
    pub const TOTAL_PATIENTS: &'static str = "Total Patients";
    pub const BP_GOAL: &'static str = "BP Goal Achieved";
    pub const CHOLESTEROL_GOAL: &'static str = "Cholesterol Goal Achieved";
    pub const HA1C_GOAL: &'static str = "HA1C Goal Achieved";

    /// Labelled display values in presentation order
    pub fn entries(&self) -> [(&'static str, String); 4] {
        [
            (Self::TOTAL_PATIENTS, self.total_patients.to_string()),
            (Self::BP_GOAL, self.blood_pressure.to_string()),
            (Self::CHOLESTEROL_GOAL, self.cholesterol.to_string()),
            (Self::HA1C_GOAL, self.ha1c.to_string()),
        ]
    }
}

/// Computes goal attainment over a physician's patient list
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    thresholds: GoalThresholds,
}

impl MetricsCalculator {
    pub fn new(thresholds: GoalThresholds) -> Self {
        Self { thresholds }
    }

    /// Summarize a non-empty patient list.
    ///
    /// Fails with [`MetricsError::EmptyPatientList`] when there is nothing
    /// to divide by, and with [`MetricsError::MalformedBloodPressure`] on the
    /// first record whose blood pressure does not parse.
    pub fn calculate(&self, patients: &[PatientRecord]) -> MetricsResult<MetricsSummary> {
        if patients.is_empty() {
            return Err(MetricsError::EmptyPatientList);
        }

        let mut bp_goal = 0;
        let mut cholesterol_goal = 0;
        let mut ha1c_goal = 0;

        for patient in patients {
            let reading = patient.parsed_blood_pressure().map_err(|source| {
                MetricsError::MalformedBloodPressure {
                    patient: patient.name.clone(),
                    value: patient.blood_pressure.clone(),
                    source,
                }
            })?;

            if self.thresholds.blood_pressure_met(reading) {
                bp_goal += 1;
            }
            if self.thresholds.cholesterol_met(patient.cholesterol) {
                cholesterol_goal += 1;
            }
            if self.thresholds.ha1c_met(patient.ha1c) {
                ha1c_goal += 1;
            }
        }

        let total = patients.len();
        Ok(MetricsSummary {
            total_patients: total,
            blood_pressure: GoalAttainment::new(bp_goal, total),
            cholesterol: GoalAttainment::new(cholesterol_goal, total),
            ha1c: GoalAttainment::new(ha1c_goal, total),
        })
    }
}
