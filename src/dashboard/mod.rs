//! Dashboard rendering
//!
//! Text views over a [`Session`]. Metrics are computed when a view is
//! built, so a malformed record fails the build of that render pass and
//! nothing is printed for it.

pub mod form;
pub mod table;

pub use form::PatientForm;
pub use table::PatientTable;

use crate::config::DisplayConfig;
use crate::error::{MetricsError, MetricsResult};
use crate::health::{MetricsSummary, PatientRecord, PhysicianRoster};
use crate::session::{PhysicianMetrics, Session};
use std::fmt;

pub const TITLE: &str = "Physician Performance Metrics";

pub const INTRO: &str = "This app measures physician performance metrics based on the goals for \
blood pressure, cholesterol, and HA1C levels.\nThe metrics are calculated for each doctor and \
their respective patients.";

pub const UPDATED_HEADING: &str = "Updated Doctor and Patient Data";

fn heading(f: &mut fmt::Formatter<'_>, text: &str, underline: char) -> fmt::Result {
    writeln!(f, "{text}")?;
    writeln!(f, "{}", underline.to_string().repeat(text.chars().count()))
}

/// Metrics lines for one physician
pub struct MetricsBlock<'a> {
    physician: &'a str,
    summary: &'a MetricsSummary,
}

impl<'a> MetricsBlock<'a> {
    pub fn new(physician: &'a str, summary: &'a MetricsSummary) -> Self {
        Self { physician, summary }
    }
}

impl fmt::Display for MetricsBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, &format!("Performance Metrics for {}", self.physician), '=')?;
        for (label, value) in self.summary.entries() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Metrics block followed by the patient table, for one physician
pub struct PhysicianView<'a> {
    physician: &'a str,
    summary: MetricsSummary,
    patients: &'a [PatientRecord],
}

impl<'a> PhysicianView<'a> {
    pub fn build(session: &'a Session, physician: &str) -> MetricsResult<Self> {
        let summary = session.metrics_for(physician)?;
        // metrics_for already rejected unknown physicians
        let entry = session
            .roster()
            .get(physician)
            .ok_or_else(|| MetricsError::UnknownPhysician(physician.to_string()))?;
        Ok(Self {
            physician: entry.name.as_str(),
            summary,
            patients: entry.patients.as_slice(),
        })
    }

    pub fn summary(&self) -> &MetricsSummary {
        &self.summary
    }
}

impl fmt::Display for PhysicianView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MetricsBlock::new(self.physician, &self.summary))?;
        writeln!(f)?;
        heading(f, "Patient Data", '-')?;
        write!(f, "{}", PatientTable::new(self.patients))
    }
}

/// Every physician's patient table, shown after the form
pub struct UpdatedSection<'a> {
    roster: &'a PhysicianRoster,
}

impl<'a> UpdatedSection<'a> {
    pub fn new(roster: &'a PhysicianRoster) -> Self {
        Self { roster }
    }
}

impl fmt::Display for UpdatedSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, UPDATED_HEADING, '=')?;
        for physician in self.roster.physicians() {
            writeln!(f)?;
            heading(f, &format!("{}'s Patients", physician.name), '-')?;
            write!(f, "{}", PatientTable::new(&physician.patients))?;
        }
        Ok(())
    }
}

/// Full page: title, per-physician metrics and tables, then the updated
/// tables when enabled
pub struct Dashboard<'a> {
    session: &'a Session,
    summaries: Vec<PhysicianMetrics>,
    show_updated: bool,
}

impl<'a> Dashboard<'a> {
    pub fn build(session: &'a Session, display: &DisplayConfig) -> MetricsResult<Self> {
        Ok(Self {
            session,
            summaries: session.all_metrics()?,
            show_updated: display.show_updated_section,
        })
    }
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, TITLE, '#')?;
        writeln!(f, "{INTRO}")?;

        let physicians = self.session.roster().physicians();
        for (physician, summary) in physicians.iter().zip(&self.summaries) {
            writeln!(f)?;
            write!(f, "{}", MetricsBlock::new(&physician.name, &summary.metrics))?;
            writeln!(f)?;
            heading(f, "Patient Data", '-')?;
            write!(f, "{}", PatientTable::new(&physician.patients))?;
        }

        if self.show_updated {
            writeln!(f)?;
            write!(f, "{}", UpdatedSection::new(self.session.roster()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{GoalThresholds, Physician};

    #[test]
    fn test_metrics_block() {
        let session = Session::with_seed_data();
        let summary = session.metrics_for("Dr. Smith").unwrap();
        let rendered = MetricsBlock::new("Dr. Smith", &summary).to_string();

        assert_eq!(
            rendered,
            "Performance Metrics for Dr. Smith\n\
             =================================\n\
             Total Patients: 3\n\
             BP Goal Achieved: 0 (0.0%)\n\
             Cholesterol Goal Achieved: 2 (66.7%)\n\
             HA1C Goal Achieved: 2 (66.7%)\n"
        );
    }

    #[test]
    fn test_dashboard_sections() {
        let session = Session::with_seed_data();
        let rendered = Dashboard::build(&session, &DisplayConfig::default())
            .unwrap()
            .to_string();

        assert!(rendered.starts_with(TITLE));
        assert_eq!(rendered.matches("Performance Metrics for ").count(), 3);
        assert_eq!(rendered.matches("\nPatient Data\n").count(), 3);
        assert!(rendered.contains(UPDATED_HEADING));
        assert!(rendered.contains("Dr. Johnson's Patients"));
        // each patient appears once above the form and once below
        assert_eq!(rendered.matches("George Yellow").count(), 2);
    }

    #[test]
    fn test_dashboard_without_updated_section() {
        let session = Session::with_seed_data();
        let display = DisplayConfig {
            show_updated_section: false,
        };
        let rendered = Dashboard::build(&session, &display).unwrap().to_string();
        assert!(!rendered.contains(UPDATED_HEADING));
        assert_eq!(rendered.matches("George Yellow").count(), 1);
    }

    #[test]
    fn test_dashboard_fails_on_malformed_record() {
        let roster = PhysicianRoster::new(vec![Physician::new(
            "Dr. Lee",
            vec![PatientRecord::new("Broken", "not-a-number", 150, 5.0)],
        )])
        .unwrap();
        let session = Session::new(roster, GoalThresholds::default());

        let result = Dashboard::build(&session, &DisplayConfig::default());
        assert!(matches!(
            result.map(|d| d.to_string()),
            Err(MetricsError::MalformedBloodPressure { .. })
        ));
    }

    #[test]
    fn test_physician_view() {
        let session = Session::with_seed_data();
        let view = PhysicianView::build(&session, "Dr. Brown").unwrap();
        assert_eq!(view.summary().total_patients, 3);

        let rendered = view.to_string();
        assert!(rendered.starts_with("Performance Metrics for Dr. Brown"));
        assert!(rendered.contains("Diane White"));
        assert!(!rendered.contains("John Doe"));

        assert!(PhysicianView::build(&session, "Dr. Nobody").is_err());
    }
}
