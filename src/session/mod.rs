//! Session module
//!
//! One user's working copy of the roster plus the calculator used to
//! summarize it. Sessions never share state; each starts from the seed.

pub mod command;

pub use command::{AddPatient, AddPatientReceipt};

use crate::config::Config;
use crate::error::{MetricsError, MetricsResult, RosterError, ValidationError};
use crate::health::{GoalThresholds, MetricsCalculator, MetricsSummary, PhysicianRoster};
use serde::Serialize;

/// Metrics for one named physician
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhysicianMetrics {
    pub physician: String,
    pub metrics: MetricsSummary,
}

pub struct Session {
    /// Working roster, mutated only through [`Session::add_patient`]
    roster: PhysicianRoster,
    calculator: MetricsCalculator,
    /// Applied commands in submission order
    receipts: Vec<AddPatientReceipt>,
}

impl Session {
    pub fn new(roster: PhysicianRoster, thresholds: GoalThresholds) -> Self {
        Self {
            roster,
            calculator: MetricsCalculator::new(thresholds),
            receipts: Vec::new(),
        }
    }

    /// Session over the built-in roster with default goals
    pub fn with_seed_data() -> Self {
        Self::new(PhysicianRoster::seeded(), GoalThresholds::default())
    }

    /// Session seeded from the configured seed file, or the built-in roster
    pub fn from_config(config: &Config) -> Result<Self, RosterError> {
        let roster = match &config.roster.seed_file {
            Some(path) => PhysicianRoster::load(path)?,
            None => PhysicianRoster::seeded(),
        };

        tracing::info!("session started with {} physicians", roster.len());
        Ok(Self::new(roster, config.goals.clone()))
    }

    pub fn roster(&self) -> &PhysicianRoster {
        &self.roster
    }

    pub fn receipts(&self) -> &[AddPatientReceipt] {
        &self.receipts
    }

    /// Summarize one physician's current patients
    pub fn metrics_for(&self, physician: &str) -> MetricsResult<MetricsSummary> {
        let patients = self
            .roster
            .patients(physician)
            .ok_or_else(|| MetricsError::UnknownPhysician(physician.to_string()))?;
        self.calculator.calculate(patients)
    }

    /// Summaries for every physician in roster order
    pub fn all_metrics(&self) -> MetricsResult<Vec<PhysicianMetrics>> {
        self.roster
            .physicians()
            .iter()
            .map(|physician| -> MetricsResult<PhysicianMetrics> {
                Ok(PhysicianMetrics {
                    physician: physician.name.clone(),
                    metrics: self.calculator.calculate(&physician.patients)?,
                })
            })
            .collect()
    }

    /// Validate and apply an add-patient command.
    ///
    /// On error the roster is left untouched.
    pub fn add_patient(&mut self, command: AddPatient) -> Result<AddPatientReceipt, ValidationError> {
        if let Err(e) = command.validate(&self.roster) {
            tracing::warn!("rejected add-patient for {}: {}", command.physician, e);
            return Err(e);
        }

        let AddPatient { physician, record } = command;
        let patient = record.name.clone();
        let patient_count = self
            .roster
            .append(&physician, record)
            .ok_or_else(|| ValidationError::UnknownPhysician(physician.clone()))?;

        let receipt = AddPatientReceipt::new(physician, patient, patient_count);
        tracing::info!(
            receipt = %receipt.id,
            "added {} to {} ({} patients)",
            receipt.patient,
            receipt.physician,
            receipt.patient_count
        );
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }
}
