//! Data models for `rollbook`

pub mod attendance;
pub mod student;

pub use attendance::{is_present, AttendanceRecord, ABSENT, PRESENT};
pub use student::{AdmissionId, StudentProfile};
