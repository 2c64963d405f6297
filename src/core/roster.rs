//! Roster operations
//!
//! Ties the student and attendance stores together: registration with a
//! duplicate check, attendance sessions for the whole class, reporting, and
//! the delete cascade. Every call reloads what it needs from the stores.

use crate::core::models::{AdmissionId, AttendanceRecord, StudentProfile};
use crate::core::report::{self, RosterRow, StudentSummary};
use crate::core::store::{find_index, AttendanceStore, RecordStore, StoreError, StudentStore};
use logger::{error, info, warn};
use thiserror::Error;

/// Today's date in the `YYYY-MM-DD` form used for attendance sessions
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Failure to register a student
#[derive(Debug, Error)]
pub enum AddError {
    /// A profile with this id is already stored
    #[error("a student with ID {0} already exists")]
    Duplicate(AdmissionId),
    /// The student file could not be read or appended to
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to start an attendance session
#[derive(Debug, Error)]
pub enum SessionError {
    /// No profiles are registered, so there is nobody to mark
    #[error("no students registered")]
    NoStudents,
    /// The student file could not be read
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while deleting a student
#[derive(Debug, Error)]
pub enum DeleteError {
    /// No profile with this id; neither file was touched
    #[error("no student found with ID {0}")]
    NotFound(AdmissionId),
    /// The student file could not be read
    #[error(transparent)]
    Load(#[from] StoreError),
    /// Rewriting the student file failed; attendance was not touched
    #[error("failed to update the student file: {0}")]
    ProfileWrite(#[source] StoreError),
    /// The profile is gone but its attendance rows could not be removed
    #[error("student {id} was removed but attendance cleanup failed, manual cleanup required: {source}")]
    AttendanceCleanup {
        /// Id whose attendance rows remain
        id: AdmissionId,
        /// Underlying store error
        #[source]
        source: StoreError,
    },
}

/// Result of an attendance session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Subject the session was recorded for
    pub subject: String,
    /// Date written on every record
    pub date: String,
    /// Number of records appended
    pub recorded: usize,
    /// Students whose record could not be appended
    pub failed: Vec<AdmissionId>,
    /// Students left unmarked because marking stopped early
    pub unmarked: usize,
}

impl SessionReport {
    /// Whether every student was asked and recorded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmarked == 0 && self.failed.is_empty()
    }
}

/// What a successful delete removed
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    /// The removed profile
    pub profile: StudentProfile,
    /// Number of attendance rows removed with it
    pub attendance_removed: usize,
}

/// The student and attendance stores used together
#[derive(Debug, Clone)]
pub struct Roster<S = StudentStore, A = AttendanceStore> {
    students: S,
    attendance: A,
}

impl<S, A> Roster<S, A>
where
    S: RecordStore<StudentProfile>,
    A: RecordStore<AttendanceRecord>,
{
    /// Create a roster over two stores
    #[must_use]
    pub const fn new(students: S, attendance: A) -> Self {
        Self {
            students,
            attendance,
        }
    }

    /// The student store
    #[must_use]
    pub const fn students(&self) -> &S {
        &self.students
    }

    /// The attendance store
    #[must_use]
    pub const fn attendance(&self) -> &A {
        &self.attendance
    }

    /// Register a new student
    ///
    /// # Errors
    /// `AddError::Duplicate` if the id is taken, `AddError::Store` on I/O failure
    pub fn add_student(&self, profile: &StudentProfile) -> Result<(), AddError> {
        let profiles = self.students.load_all()?;
        if find_index(&profiles, profile.id).is_some() {
            warn!("Refusing duplicate admission id {}", profile.id);
            return Err(AddError::Duplicate(profile.id));
        }
        self.students.append(profile)?;
        info!("Registered student {} ({})", profile.id, profile.name);
        Ok(())
    }

    /// All registered students in store order
    ///
    /// # Errors
    /// Returns an error if the student file cannot be read
    pub fn list_students(&self) -> Result<Vec<StudentProfile>, StoreError> {
        self.students.load_all()
    }

    /// The first profile with `id`, if any
    ///
    /// # Errors
    /// Returns an error if the student file cannot be read
    pub fn find_student(&self, id: AdmissionId) -> Result<Option<StudentProfile>, StoreError> {
        let mut profiles = self.students.load_all()?;
        Ok(find_index(&profiles, id).map(|idx| profiles.swap_remove(idx)))
    }

    /// Record one class for every registered student
    ///
    /// `mark` is asked once per student, in store order, whether they were
    /// present. Returning `None` stops the session; students not yet asked
    /// get no record and are counted in `unmarked`. A failed append is logged
    /// and reported but does not stop the session.
    ///
    /// # Errors
    /// `SessionError::NoStudents` when nobody is registered, or a store error
    /// if the student file cannot be read
    pub fn record_session<F>(
        &self,
        subject: &str,
        date: &str,
        mut mark: F,
    ) -> Result<SessionReport, SessionError>
    where
        F: FnMut(&StudentProfile) -> Option<bool>,
    {
        let profiles = self.students.load_all()?;
        if profiles.is_empty() {
            return Err(SessionError::NoStudents);
        }

        let mut report = SessionReport {
            subject: subject.to_string(),
            date: date.to_string(),
            recorded: 0,
            failed: Vec::new(),
            unmarked: 0,
        };

        for (idx, profile) in profiles.iter().enumerate() {
            let Some(present) = mark(profile) else {
                report.unmarked = profiles.len() - idx;
                warn!(
                    "Session for {subject} on {date} stopped with {} students unmarked",
                    report.unmarked
                );
                break;
            };
            let record = AttendanceRecord::marked(profile.id, subject, date, present);
            match self.attendance.append(&record) {
                Ok(()) => report.recorded += 1,
                Err(e) => {
                    error!("Failed to append attendance for ID {}: {e}", profile.id);
                    report.failed.push(profile.id);
                }
            }
        }

        info!(
            "Recorded {} attendance entries for {subject} on {date}",
            report.recorded
        );
        Ok(report)
    }

    /// Attendance summary for one student
    ///
    /// # Errors
    /// Returns an error if the attendance file cannot be read
    pub fn student_summary(&self, id: AdmissionId) -> Result<StudentSummary, StoreError> {
        let records = self.attendance.load_all()?;
        Ok(report::student_summary(&records, id))
    }

    /// Attendance totals for every registered student
    ///
    /// # Errors
    /// Returns an error if either file cannot be read
    pub fn roster_summary(&self) -> Result<Vec<RosterRow>, StoreError> {
        let profiles = self.students.load_all()?;
        let records = self.attendance.load_all()?;
        Ok(report::roster_summary(&profiles, &records))
    }

    /// Delete a student and every attendance record with their id
    ///
    /// The student file is rewritten first. If that fails nothing else is
    /// attempted. If the attendance rewrite then fails, the profile stays
    /// deleted and the error asks for manual cleanup.
    ///
    /// # Errors
    /// See [`DeleteError`]
    pub fn delete_student(&self, id: AdmissionId) -> Result<DeleteOutcome, DeleteError> {
        let mut profiles = self.students.load_all()?;
        let idx = find_index(&profiles, id).ok_or(DeleteError::NotFound(id))?;

        let profile = profiles.remove(idx);
        self.students.save_all(&profiles).map_err(|e| {
            error!("Delete of {id} aborted, student file not updated: {e}");
            DeleteError::ProfileWrite(e)
        })?;

        let cleanup = |source: StoreError| {
            error!("Student {id} removed but attendance cleanup failed: {source}");
            DeleteError::AttendanceCleanup { id, source }
        };
        let records = self.attendance.load_all().map_err(cleanup)?;
        let before = records.len();
        let kept: Vec<AttendanceRecord> = records.into_iter().filter(|r| r.id != id).collect();
        let attendance_removed = before - kept.len();
        self.attendance.rewrite_all(&kept).map_err(cleanup)?;

        info!("Deleted student {id} and {attendance_removed} attendance records");
        Ok(DeleteOutcome {
            profile,
            attendance_removed,
        })
    }
}
