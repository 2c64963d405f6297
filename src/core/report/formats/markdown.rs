//! Markdown report generator
//!
//! Produces plain GitHub-flavoured tables that render in most viewers.

use crate::core::models::StudentProfile;
use crate::core::report::{ReportGenerator, RosterRow, StudentSummary};
use std::fmt::Write;

/// Markdown report generator
#[derive(Debug, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render_students(&self, profiles: &[StudentProfile]) -> String {
        let mut out = String::from("# Students\n\n");
        out.push_str("| ID | Name | Year | CGPA |\n");
        out.push_str("|---|---|---|---|\n");
        for p in profiles {
            let _ = writeln!(out, "| {} | {} | {} | {:.2} |", p.id, p.name, p.year, p.cgpa);
        }
        let _ = writeln!(out, "\n_{} students registered._", profiles.len());
        out
    }

    fn render_student(&self, profile: &StudentProfile, summary: &StudentSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {} ({})\n", profile.name, profile.id);
        let _ = writeln!(out, "- **Date of birth:** {}", profile.dob);
        let _ = writeln!(out, "- **Address:** {}", profile.address);
        let _ = writeln!(out, "- **Year:** {}", profile.year);
        let _ = writeln!(out, "- **CGPA:** {:.2}", profile.cgpa);

        out.push_str("\n## Attendance\n\n");
        if !summary.has_records() {
            out.push_str("No attendance records found for this student.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "Attended **{}** of **{}** classes (**{:.2}%**).\n",
            summary.overall.present,
            summary.overall.total,
            summary.percentage()
        );
        out.push_str("| Subject | Total | Present | Percent |\n");
        out.push_str("|---|---|---|---|\n");
        for (subject, tally) in &summary.subjects {
            let _ = writeln!(
                out,
                "| {subject} | {} | {} | {:.2}% |",
                tally.total,
                tally.present,
                tally.percentage()
            );
        }
        out
    }

    fn render_roster(&self, rows: &[RosterRow]) -> String {
        let mut out = String::from("# Attendance Report\n\n");
        out.push_str("| ID | Name | Total | Present | Percent |\n");
        out.push_str("|---|---|---|---|---|\n");
        for row in rows {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {:.2}% |",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::Tally;

    #[test]
    fn test_roster_markdown() {
        let rows = vec![
            RosterRow {
                id: 1,
                name: "A".to_string(),
                tally: Tally { total: 4, present: 3 },
            },
            RosterRow {
                id: 2,
                name: "B".to_string(),
                tally: Tally::default(),
            },
        ];
        let out = MarkdownReporter::new().render_roster(&rows);

        assert!(out.starts_with("# Attendance Report"));
        assert!(out.contains("| 1 | A | 4 | 3 | 75.00% |"));
        assert!(out.contains("| 2 | B | 0 | 0 | 0.00% |"));
    }

    #[test]
    fn test_students_markdown_counts_rows() {
        let profiles = vec![StudentProfile::new(
            5,
            "E".to_string(),
            "d".to_string(),
            "a".to_string(),
            "2nd".to_string(),
            6.0,
        )];
        let out = MarkdownReporter::new().render_students(&profiles);
        assert!(out.contains("| 5 | E | 2nd | 6.00 |"));
        assert!(out.contains("_1 students registered._"));
    }
}
