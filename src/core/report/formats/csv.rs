//! CSV report generator

use crate::core::models::{AdmissionId, StudentProfile};
use crate::core::report::{ReportGenerator, RosterRow, StudentSummary};
use csv::{Terminator, WriterBuilder};
use logger::error;
use serde::Serialize;

/// CSV report generator
#[derive(Debug, Default)]
pub struct CsvReporter;

impl CsvReporter {
    /// Create a new CSV reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct ProfileRow<'a> {
    id: AdmissionId,
    name: &'a str,
    dob: &'a str,
    address: &'a str,
    year: &'a str,
    cgpa: String,
}

#[derive(Serialize)]
struct SubjectRow<'a> {
    id: AdmissionId,
    name: &'a str,
    subject: &'a str,
    total: usize,
    present: usize,
    percent: String,
}

#[derive(Serialize)]
struct TotalRow<'a> {
    id: AdmissionId,
    name: &'a str,
    total: usize,
    present: usize,
    percent: String,
}

/// Header line followed by one serialized line per row
///
/// A row that fails to serialize is logged and left out.
fn render<T: Serialize>(header: &[&str], rows: impl IntoIterator<Item = T>) -> String {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if let Err(e) = writer.write_record(header) {
        error!("Failed to write CSV header: {e}");
    }
    for row in rows {
        if let Err(e) = writer.serialize(row) {
            error!("Failed to write CSV row: {e}");
        }
    }
    match writer.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            error!("Failed to finish CSV output: {e}");
            String::new()
        }
    }
}

impl ReportGenerator for CsvReporter {
    fn render_students(&self, profiles: &[StudentProfile]) -> String {
        render(
            &["id", "name", "dob", "address", "year", "cgpa"],
            profiles.iter().map(|p| ProfileRow {
                id: p.id,
                name: &p.name,
                dob: &p.dob,
                address: &p.address,
                year: &p.year,
                cgpa: format!("{:.2}", p.cgpa),
            }),
        )
    }

    fn render_student(&self, profile: &StudentProfile, summary: &StudentSummary) -> String {
        let overall = SubjectRow {
            id: profile.id,
            name: &profile.name,
            subject: "ALL",
            total: summary.overall.total,
            present: summary.overall.present,
            percent: format!("{:.2}", summary.percentage()),
        };
        let rows = summary
            .subjects
            .iter()
            .map(|(subject, tally)| SubjectRow {
                id: profile.id,
                name: &profile.name,
                subject,
                total: tally.total,
                present: tally.present,
                percent: format!("{:.2}", tally.percentage()),
            })
            .chain(std::iter::once(overall));
        render(
            &["id", "name", "subject", "total", "present", "percent"],
            rows,
        )
    }

    fn render_roster(&self, rows: &[RosterRow]) -> String {
        render(
            &["id", "name", "total", "present", "percent"],
            rows.iter().map(|row| TotalRow {
                id: row.id,
                name: &row.name,
                total: row.tally.total,
                present: row.tally.present,
                percent: format!("{:.2}", row.tally.percentage()),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::AttendanceRecord;
    use crate::core::report::{student_summary, Tally};

    #[test]
    fn test_roster_csv() {
        let rows = vec![RosterRow {
            id: 3,
            name: "Rao, Asha".to_string(),
            tally: Tally { total: 3, present: 1 },
        }];
        let out = CsvReporter::new().render_roster(&rows);
        assert_eq!(
            out,
            "id,name,total,present,percent\n3,\"Rao, Asha\",3,1,33.33\n"
        );
    }

    #[test]
    fn test_student_csv_has_total_row() {
        let profile = StudentProfile::new(
            1,
            "A".to_string(),
            "d".to_string(),
            "x".to_string(),
            "1st".to_string(),
            8.5,
        );
        let records = vec![
            AttendanceRecord::marked(1, "Math", "d1", true),
            AttendanceRecord::marked(1, "Art", "d1", false),
        ];
        let out = CsvReporter::new().render_student(&profile, &student_summary(&records, 1));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[1], "1,A,Art,1,0,0.00");
        assert_eq!(lines[2], "1,A,Math,1,1,100.00");
        assert_eq!(lines[3], "1,A,ALL,2,1,50.00");
    }

    #[test]
    fn test_students_csv_quotes_free_text() {
        let profiles = vec![StudentProfile::new(
            4,
            "the \"one\"".to_string(),
            "2001-01-01".to_string(),
            "12 Main St, Pune".to_string(),
            "2nd Year".to_string(),
            7.456,
        )];
        let out = CsvReporter::new().render_students(&profiles);
        assert_eq!(
            out,
            "id,name,dob,address,year,cgpa\n\
             4,\"the \"\"one\"\"\",2001-01-01,\"12 Main St, Pune\",2nd Year,7.46\n"
        );
    }

    #[test]
    fn test_empty_roster_is_header_only() {
        assert_eq!(
            CsvReporter::new().render_roster(&[]),
            "id,name,total,present,percent\n"
        );
    }
}
