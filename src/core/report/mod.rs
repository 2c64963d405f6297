//! Attendance reporting
//!
//! Both views are computed from a full load of the attendance file. The
//! per-student view groups by subject in sorted order; the roster view walks
//! the student store so students without any attendance still get a row.

pub mod formats;

use crate::core::models::{AdmissionId, AttendanceRecord, StudentProfile};
use std::collections::{BTreeMap, HashMap};

pub use formats::{
    CsvReporter, MarkdownReporter, ReportFormat, ReportGenerator, TableReporter,
};

/// Count of recorded classes and how many of them were attended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Classes recorded
    pub total: usize,
    /// Classes attended
    pub present: usize,
}

impl Tally {
    /// Count one more class
    pub fn record(&mut self, present: bool) {
        self.total += 1;
        if present {
            self.present += 1;
        }
    }

    /// Attended share in percent; `0.0` when nothing was recorded
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 / self.total as f64 * 100.0
        }
    }
}

/// Attendance of one student, overall and per subject
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentSummary {
    /// Admission id the summary was computed for
    pub id: AdmissionId,
    /// Totals across all subjects
    pub overall: Tally,
    /// Totals per subject, sorted by subject
    pub subjects: BTreeMap<String, Tally>,
}

impl StudentSummary {
    /// Overall attendance percentage
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.overall.percentage()
    }

    /// Whether any attendance was recorded for the student
    #[must_use]
    pub const fn has_records(&self) -> bool {
        self.overall.total > 0
    }
}

/// One line of the all-students report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    /// Admission id
    pub id: AdmissionId,
    /// Student name
    pub name: String,
    /// Totals across all subjects
    pub tally: Tally,
}

/// Summarise the attendance of student `id`
#[must_use]
pub fn student_summary(records: &[AttendanceRecord], id: AdmissionId) -> StudentSummary {
    let mut summary = StudentSummary {
        id,
        ..StudentSummary::default()
    };

    for record in records.iter().filter(|r| r.id == id) {
        let present = record.is_present();
        summary.overall.record(present);
        summary
            .subjects
            .entry(record.subject.clone())
            .or_default()
            .record(present);
    }

    summary
}

/// Summarise every registered student, in student store order
///
/// Records whose id matches no profile are ignored.
#[must_use]
pub fn roster_summary(profiles: &[StudentProfile], records: &[AttendanceRecord]) -> Vec<RosterRow> {
    let mut tallies: HashMap<AdmissionId, Tally> = HashMap::new();
    for record in records {
        tallies
            .entry(record.id)
            .or_default()
            .record(record.is_present());
    }

    profiles
        .iter()
        .map(|p| RosterRow {
            id: p.id,
            name: p.name.clone(),
            tally: tallies.get(&p.id).copied().unwrap_or_default(),
        })
        .collect()
}
