pub mod metrics;
pub mod record;
pub mod roster;

pub use metrics::{GoalAttainment, GoalThresholds, MetricsCalculator, MetricsSummary};
pub use record::{BloodPressure, PatientRecord, HA1C_MAX, HA1C_MIN};
pub use roster::{Physician, PhysicianRoster};
