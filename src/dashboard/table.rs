use crate::health::PatientRecord;
use std::fmt;

const HEADERS: [&str; 5] = ["", "Patient", "Blood Pressure", "Cholesterol", "HA1C"];

/// Plain-text patient table, indexed from 0 like a data frame
pub struct PatientTable<'a> {
    patients: &'a [PatientRecord],
}

impl<'a> PatientTable<'a> {
    pub fn new(patients: &'a [PatientRecord]) -> Self {
        Self { patients }
    }

    fn rows(&self) -> Vec<[String; 5]> {
        self.patients
            .iter()
            .enumerate()
            .map(|(index, p)| {
                [
                    index.to_string(),
                    p.name.clone(),
                    p.blood_pressure.clone(),
                    p.cholesterol.to_string(),
                    format!("{:.1}", p.ha1c),
                ]
            })
            .collect()
    }
}

impl fmt::Display for PatientTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(f, &HEADERS.map(String::from), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 5], widths: &[usize; 5]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(column, (cell, width))| {
            // names left-aligned, numbers right-aligned
            if column == 1 || column == 2 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    writeln!(f, "{}", line.join(" | ").trim_end())
}
