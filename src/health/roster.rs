use super::record::PatientRecord;
use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A physician and their patients in insertion order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Physician {
    pub name: String,
    #[serde(default)]
    pub patients: Vec<PatientRecord>,
}

impl Physician {
    pub fn new(name: impl Into<String>, patients: Vec<PatientRecord>) -> Self {
        Self {
            name: name.into(),
            patients,
        }
    }
}

/// Physician name to patient list, in the order physicians were seeded.
///
/// Patients can only be appended; there is no update or removal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhysicianRoster {
    physicians: Vec<Physician>,
}

/// On-disk seed layout
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    physicians: Vec<Physician>,
}

impl PhysicianRoster {
    /// Build a roster, rejecting empty input and duplicate physician names
    pub fn new(physicians: Vec<Physician>) -> Result<Self, RosterError> {
        if physicians.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut seen = HashSet::new();
        for physician in &physicians {
            if !seen.insert(physician.name.as_str()) {
                return Err(RosterError::DuplicatePhysician(physician.name.clone()));
            }
        }

        Ok(Self { physicians })
    }

    /// The built-in demo roster
    pub fn seeded() -> Self {
        Self {
            physicians: seed_physicians(),
        }
    }

    /// Parse a TOML seed document
    pub fn from_toml_str(content: &str) -> Result<Self, RosterError> {
        let seed: SeedFile = toml::from_str(content)?;
        Self::new(seed.physicians)
    }

    /// Load a TOML seed file
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        tracing::debug!("loading seed roster from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn physicians(&self) -> &[Physician] {
        &self.physicians
    }

    pub fn physician_names(&self) -> impl Iterator<Item = &str> {
        self.physicians.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Physician> {
        self.physicians.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn patients(&self, name: &str) -> Option<&[PatientRecord]> {
        self.get(name).map(|p| p.patients.as_slice())
    }

    pub fn len(&self) -> usize {
        self.physicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.physicians.is_empty()
    }

    /// Append a record to a physician's list, returning the new patient count
    pub(crate) fn append(&mut self, physician: &str, record: PatientRecord) -> Option<usize> {
        let entry = self.physicians.iter_mut().find(|p| p.name == physician)?;
        entry.patients.push(record);
        Some(entry.patients.len())
    }
}

fn seed_physicians() -> Vec<Physician> {
    vec![
        Physician::new(
            "Dr. Smith",
            vec![
                PatientRecord::new("John Doe", "120/80", 180, 6.0),
                PatientRecord::new("Jane Roe", "130/85", 190, 6.5),
                PatientRecord::new("Alice Johnson", "140/90", 200, 7.0),
            ],
        ),
        Physician::new(
            "Dr. Brown",
            vec![
                PatientRecord::new("Bob Smith", "115/75", 170, 5.8),
                PatientRecord::new("Charlie Black", "135/88", 195, 6.3),
                PatientRecord::new("Diane White", "145/92", 210, 7.2),
            ],
        ),
        Physician::new(
            "Dr. Johnson",
            vec![
                PatientRecord::new("Edward Green", "118/78", 175, 5.9),
                PatientRecord::new("Fiona Blue", "138/89", 185, 6.4),
                PatientRecord::new("George Yellow", "148/94", 205, 7.3),
            ],
        ),
    ]
}
