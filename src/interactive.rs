//! Interactive session
//!
//! A line-editing loop standing in for the dashboard page: the form is
//! filled one field at a time, and every successful submission re-renders
//! the affected physician and the updated tables.

use crate::config::DisplayConfig;
use crate::dashboard::form::resolve_doctor;
use crate::dashboard::{Dashboard, PatientForm, PhysicianView, UpdatedSection};
use crate::error::MetricsError;
use crate::session::Session;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;

const PROMPT: &str = "physician-metrics> ";

const HELP: &str = "\
Commands:
  show              Show the full dashboard
  metrics [doctor]  Show metrics for one doctor, or all doctors
  doctors           List doctors
  add               Add new patient data
  history           List patients added in this session
  help              Show this help
  exit | quit       Leave (data is not saved)";

/// Parsed interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveCommand {
    Show,
    Metrics(Option<String>),
    Doctors,
    Add,
    History,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

pub fn parse_command(input: &str) -> InteractiveCommand {
    let input = input.trim();
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command.to_lowercase().as_str() {
        "" => InteractiveCommand::Empty,
        "show" | "dashboard" => InteractiveCommand::Show,
        "metrics" if rest.is_empty() => InteractiveCommand::Metrics(None),
        "metrics" => InteractiveCommand::Metrics(Some(rest.to_string())),
        "doctors" => InteractiveCommand::Doctors,
        "add" => InteractiveCommand::Add,
        "history" => InteractiveCommand::History,
        "help" | "?" => InteractiveCommand::Help,
        "exit" | "quit" => InteractiveCommand::Exit,
        _ => InteractiveCommand::Unknown(input.to_string()),
    }
}

/// Source of input lines; `None` means end of input
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn add_history(&mut self, _line: &str) {}
}

/// Terminal input through rustyline
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!("history not recorded: {}", e);
        }
    }
}

/// Drives one session until `exit` or end of input
pub struct Interactive<'a, S, W> {
    session: &'a mut Session,
    display: &'a DisplayConfig,
    source: S,
    out: W,
}

impl<'a, S: LineSource, W: Write> Interactive<'a, S, W> {
    pub fn new(session: &'a mut Session, display: &'a DisplayConfig, source: S, out: W) -> Self {
        Self {
            session,
            display,
            source,
            out,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.show_dashboard()?;
        writeln!(self.out, "\nType 'help' for commands.")?;

        while let Some(line) = self.source.read_line(PROMPT)? {
            let command = parse_command(&line);
            if command != InteractiveCommand::Empty {
                self.source.add_history(line.trim());
            }

            match command {
                InteractiveCommand::Empty => {}
                InteractiveCommand::Show => self.show_dashboard()?,
                InteractiveCommand::Metrics(doctor) => self.show_metrics(doctor.as_deref())?,
                InteractiveCommand::Doctors => self.list_doctors()?,
                InteractiveCommand::Add => self.add_patient()?,
                InteractiveCommand::History => self.show_history()?,
                InteractiveCommand::Help => writeln!(self.out, "{HELP}")?,
                InteractiveCommand::Exit => break,
                InteractiveCommand::Unknown(input) => {
                    writeln!(self.out, "Unknown command: {input}. Type 'help' for commands.")?
                }
            }
        }

        tracing::info!(
            "session ended after {} submissions",
            self.session.receipts().len()
        );
        Ok(())
    }

    /// Consume the driver, returning the output sink
    pub fn into_output(self) -> W {
        self.out
    }

    fn show_dashboard(&mut self) -> Result<()> {
        let rendered = Dashboard::build(self.session, self.display).map(|d| d.to_string());
        match rendered {
            Ok(text) => write!(self.out, "{text}")?,
            Err(e) => self.render_failed(&e)?,
        }
        Ok(())
    }

    fn show_metrics(&mut self, doctor: Option<&str>) -> Result<()> {
        let names: Vec<String> = match doctor {
            Some(input) => match resolve_doctor(self.session.roster(), input) {
                Ok(name) => vec![name],
                Err(e) => {
                    writeln!(self.out, "Error: {e}")?;
                    return Ok(());
                }
            },
            None => self
                .session
                .roster()
                .physician_names()
                .map(String::from)
                .collect(),
        };

        for name in names {
            self.show_physician(&name)?;
        }
        Ok(())
    }

    fn show_physician(&mut self, name: &str) -> Result<()> {
        let rendered = PhysicianView::build(self.session, name).map(|v| v.to_string());
        match rendered {
            Ok(text) => writeln!(self.out, "{text}")?,
            Err(e) => self.render_failed(&e)?,
        }
        Ok(())
    }

    fn list_doctors(&mut self) -> Result<()> {
        for (index, physician) in self.session.roster().physicians().iter().enumerate() {
            writeln!(
                self.out,
                "  {}) {} ({} patients)",
                index + 1,
                physician.name,
                physician.patients.len()
            )?;
        }
        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        if self.session.receipts().is_empty() {
            writeln!(self.out, "No patients added in this session.")?;
            return Ok(());
        }
        for receipt in self.session.receipts() {
            writeln!(
                self.out,
                "  {} {} -> {} (#{})",
                receipt.recorded_at.format("%H:%M:%S"),
                receipt.patient,
                receipt.physician,
                receipt.patient_count
            )?;
        }
        Ok(())
    }

    fn add_patient(&mut self) -> Result<()> {
        writeln!(self.out, "Add New Patient Data")?;
        self.list_doctors()?;

        let Some(form) = self.fill_form()? else {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        };

        let command = match form.into_command(self.session.roster()) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("form rejected: {}", e);
                writeln!(self.out, "Error: {e}")?;
                return Ok(());
            }
        };

        let physician = command.physician.clone();
        match self.session.add_patient(command) {
            Ok(receipt) => {
                writeln!(self.out, "{}", receipt.message())?;
                writeln!(self.out)?;
                self.show_physician(&physician)?;
                if self.display.show_updated_section {
                    write!(self.out, "{}", UpdatedSection::new(self.session.roster()))?;
                }
            }
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(())
    }

    fn fill_form(&mut self) -> Result<Option<PatientForm>> {
        let prompts = [
            "Select Doctor: ",
            "Patient Name: ",
            "Blood Pressure (e.g., 120/80): ",
            "Cholesterol: ",
            "HA1C (0.0-15.0): ",
        ];

        let mut fields = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            match self.source.read_line(prompt)? {
                Some(value) => fields.push(value),
                None => return Ok(None),
            }
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Ok(Some(PatientForm {
            doctor: next(),
            patient: next(),
            blood_pressure: next(),
            cholesterol: next(),
            ha1c: next(),
        }))
    }

    fn render_failed(&mut self, error: &MetricsError) -> Result<()> {
        tracing::error!("render failed: {}", error);
        writeln!(self.out, "Error: {error}")?;
        Ok(())
    }
}
