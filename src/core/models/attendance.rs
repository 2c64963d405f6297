//! Attendance record model and the present/absent rule

use super::student::AdmissionId;

/// Status written for a student marked present
pub const PRESENT: &str = "Present";

/// Status written for a student marked absent
pub const ABSENT: &str = "Absent";

/// One student's attendance in one subject on one date
///
/// Records are never edited after they are appended. The id is not checked
/// against the student store, and records for unknown ids are ignored by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Admission id of the student
    pub id: AdmissionId,

    /// Subject label; grouping is exact and case-sensitive
    pub subject: String,

    /// Date of the class in whatever format it was entered
    pub date: String,

    /// Free-text status, classified by [`is_present`]
    pub status: String,
}

impl AttendanceRecord {
    /// Create a new attendance record
    #[must_use]
    pub const fn new(id: AdmissionId, subject: String, date: String, status: String) -> Self {
        Self {
            id,
            subject,
            date,
            status,
        }
    }

    /// Build a record from a yes/no mark, using the canonical status words
    #[must_use]
    pub fn marked(id: AdmissionId, subject: &str, date: &str, present: bool) -> Self {
        let status = if present { PRESENT } else { ABSENT };
        Self::new(id, subject.to_string(), date.to_string(), status.to_string())
    }

    /// Whether this record counts as attended
    #[must_use]
    pub fn is_present(&self) -> bool {
        is_present(&self.status)
    }
}

/// Classify a status string
///
/// Present when the lower-cased status contains `present`, or is exactly `y`
/// or `yes`. Everything else, including an empty status, is absent.
#[must_use]
pub fn is_present(status: &str) -> bool {
    let lowered = status.to_ascii_lowercase();
    lowered.contains("present") || lowered == "y" || lowered == "yes"
}
