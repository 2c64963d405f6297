//! Report format implementations
//!
//! Provides renderers for the terminal tables, Markdown and CSV.

pub mod csv;
pub mod markdown;
pub mod table;

pub use csv::CsvReporter;
pub use markdown::MarkdownReporter;
pub use table::TableReporter;

use crate::core::models::StudentProfile;
use crate::core::report::{RosterRow, StudentSummary};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Fixed-width columns for the terminal
    #[default]
    Table,
    /// Markdown tables
    Markdown,
    /// Comma-separated values with a header row
    Csv,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Table => "txt",
            Self::Markdown => "md",
            Self::Csv => "csv",
        }
    }

    /// Renderer for this format
    #[must_use]
    pub fn reporter(&self) -> Box<dyn ReportGenerator> {
        match self {
            Self::Table => Box::new(TableReporter::new()),
            Self::Markdown => Box::new(MarkdownReporter::new()),
            Self::Csv => Box::new(CsvReporter::new()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "txt" => Ok(Self::Table),
            "md" | "markdown" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for report renderers
pub trait ReportGenerator {
    /// Render the list of registered students
    fn render_students(&self, profiles: &[StudentProfile]) -> String;

    /// Render one student's profile and attendance breakdown
    fn render_student(&self, profile: &StudentProfile, summary: &StudentSummary) -> String;

    /// Render the all-students attendance report
    fn render_roster(&self, rows: &[RosterRow]) -> String;
}

/// Write rendered report content to `output_path`, creating its directory
///
/// # Errors
/// Returns an error if the directory or file cannot be written
pub fn write_report(content: &str, output_path: &Path) -> io::Result<()> {
    if let Some(parent) = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("TABLE".parse::<ReportFormat>(), Ok(ReportFormat::Table));
        assert_eq!("md".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert_eq!("csv".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_extension_and_display() {
        assert_eq!(ReportFormat::Markdown.extension(), "md");
        assert_eq!(ReportFormat::Csv.to_string(), "csv");
        assert_eq!(ReportFormat::default(), ReportFormat::Table);
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("roster.csv");
        write_report("id\n", &path).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "id\n");
    }
}
