//! Fixed-width terminal tables
//!
//! This is the layout the interactive menu prints.

use crate::core::models::StudentProfile;
use crate::core::report::{ReportGenerator, RosterRow, StudentSummary};
use std::fmt::Write;

/// Terminal table renderer
#[derive(Debug, Default)]
pub struct TableReporter;

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for TableReporter {
    fn render_students(&self, profiles: &[StudentProfile]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<8}{:<25}{:<12}{:<8}", "ID", "Name", "Year", "CGPA");
        let _ = writeln!(out, "{}", "-".repeat(55));
        for p in profiles {
            let _ = writeln!(
                out,
                "{:<8}{:<25}{:<12}{:<8.2}",
                p.id, p.name, p.year, p.cgpa
            );
        }
        out
    }

    fn render_student(&self, profile: &StudentProfile, summary: &StudentSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n--- Student Profile ---");
        let _ = writeln!(out, "Admission ID : {}", profile.id);
        let _ = writeln!(out, "Name         : {}", profile.name);
        let _ = writeln!(out, "DOB          : {}", profile.dob);
        let _ = writeln!(out, "Address      : {}", profile.address);
        let _ = writeln!(out, "Year         : {}", profile.year);
        let _ = writeln!(out, "CGPA         : {:.2}", profile.cgpa);

        let _ = writeln!(out, "\n--- Attendance Summary ---");
        if !summary.has_records() {
            let _ = writeln!(out, "No attendance records found for this student.");
            return out;
        }

        let _ = writeln!(out, "Total classes recorded : {}", summary.overall.total);
        let _ = writeln!(out, "Total present         : {}", summary.overall.present);
        let _ = writeln!(out, "Overall attendance    : {:.2}%", summary.percentage());

        let _ = writeln!(out, "\nSubject-wise breakdown:");
        let _ = writeln!(
            out,
            "{:<20}{:<10}{:<10}{:<12}",
            "Subject", "Total", "Present", "Percent"
        );
        let _ = writeln!(out, "{}", "-".repeat(54));
        for (subject, tally) in &summary.subjects {
            let _ = writeln!(
                out,
                "{:<20}{:<10}{:<10}{:<12.2}",
                subject,
                tally.total,
                tally.present,
                tally.percentage()
            );
        }
        out
    }

    fn render_roster(&self, rows: &[RosterRow]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<8}{:<25}{:<12}{:<12}{:<12}",
            "ID", "Name", "Total", "Present", "Percent"
        );
        let _ = writeln!(out, "{}", "-".repeat(70));
        for row in rows {
            let _ = writeln!(
                out,
                "{:<8}{:<25}{:<12}{:<12}{:<12.2}",
                row.id,
                row.name,
                row.tally.total,
                row.tally.present,
                row.tally.percentage()
            );
        }
        out
    }
}
