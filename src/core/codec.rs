//! Line codec for the student and attendance files
//!
//! Every record is one line of `|`-separated fields in a fixed order, with a
//! trailing `|`. Fields are trimmed on the way in. There is no escaping, so a
//! free-text field that contains `|` shifts every field after it.

use crate::core::models::{AdmissionId, AttendanceRecord, StudentProfile};
use thiserror::Error;

/// Field separator used by both files
pub const DELIM: char = '|';

/// Why a stored line was dropped during load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The first field is not an integer
    #[error("invalid admission id '{0}'")]
    InvalidId(String),
    /// The line ended before the named field
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    /// The line is not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// A record that can be stored as one delimited line
pub trait LineRecord: Sized {
    /// Short name used in log messages (e.g., "student")
    const KIND: &'static str;

    /// Decode one non-empty line
    ///
    /// # Errors
    /// Returns the reason the line must be skipped
    fn decode(line: &str) -> Result<Self, SkipReason>;

    /// Encode as one line, without the line terminator
    fn encode(&self) -> String;
}

/// Split a line into trimmed fields
///
/// A single empty piece after the final delimiter is not a field, so
/// `1|A|` has two fields while `1|A||` has three.
fn split_fields(line: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = line.split(DELIM).collect();
    if pieces.last().is_some_and(|last| last.is_empty()) {
        pieces.pop();
    }
    pieces.into_iter().map(str::trim).collect()
}

/// Walks the fields of one line in order
struct Fields<'a> {
    inner: std::vec::IntoIter<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            inner: split_fields(line).into_iter(),
        }
    }

    fn field(&mut self, name: &'static str) -> Result<&'a str, SkipReason> {
        self.inner.next().ok_or(SkipReason::MissingField(name))
    }

    fn id(&mut self) -> Result<AdmissionId, SkipReason> {
        let raw = self.field("id")?;
        raw.parse::<AdmissionId>()
            .map_err(|_| SkipReason::InvalidId(raw.to_string()))
    }
}

impl LineRecord for StudentProfile {
    const KIND: &'static str = "student";

    fn decode(line: &str) -> Result<Self, SkipReason> {
        let mut fields = Fields::new(line);
        let id = fields.id()?;
        let name = fields.field("name")?.to_string();
        let dob = fields.field("dob")?.to_string();
        let address = fields.field("address")?.to_string();
        let year = fields.field("year")?.to_string();
        // The cgpa field must be present, but a bad value is not fatal.
        let cgpa = Self::parse_cgpa(fields.field("cgpa")?);

        Ok(Self::new(id, name, dob, address, year, cgpa))
    }

    fn encode(&self) -> String {
        format!(
            "{id}{d}{name}{d}{dob}{d}{address}{d}{year}{d}{cgpa:.2}{d}",
            id = self.id,
            name = self.name,
            dob = self.dob,
            address = self.address,
            year = self.year,
            cgpa = self.cgpa,
            d = DELIM,
        )
    }
}

impl LineRecord for AttendanceRecord {
    const KIND: &'static str = "attendance";

    fn decode(line: &str) -> Result<Self, SkipReason> {
        let mut fields = Fields::new(line);
        let id = fields.id()?;
        let subject = fields.field("subject")?.to_string();
        let date = fields.field("date")?.to_string();
        let status = fields.field("status")?.to_string();

        Ok(Self::new(id, subject, date, status))
    }

    fn encode(&self) -> String {
        format!(
            "{id}{d}{subject}{d}{date}{d}{status}{d}",
            id = self.id,
            subject = self.subject,
            date = self.date,
            status = self.status,
            d = DELIM,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_drops_only_trailing_empty_piece() {
        assert_eq!(split_fields("1|A|"), vec!["1", "A"]);
        assert_eq!(split_fields("1|A||"), vec!["1", "A", ""]);
        assert_eq!(split_fields(" 1 | A "), vec!["1", "A"]);
    }

    #[test]
    fn test_decode_student() {
        let profile =
            StudentProfile::decode("12| Ravi Kumar |2002-11-30|4 Lake View|3rd Year|7.5|").unwrap();

        assert_eq!(profile.id, 12);
        assert_eq!(profile.name, "Ravi Kumar");
        assert_eq!(profile.dob, "2002-11-30");
        assert_eq!(profile.address, "4 Lake View");
        assert_eq!(profile.year, "3rd Year");
        assert!((profile.cgpa - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_student_bad_cgpa_defaults() {
        let profile = StudentProfile::decode("3|A|d|x|1st|n/a|").unwrap();
        assert!(profile.cgpa.abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_student_without_trailing_delimiter() {
        let profile = StudentProfile::decode("3|A|d|x|1st|6.40").unwrap();
        assert!((profile.cgpa - 6.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_student_skips() {
        assert_eq!(
            StudentProfile::decode("abc|A|d|x|1st|8.0|"),
            Err(SkipReason::InvalidId("abc".to_string()))
        );
        assert_eq!(
            StudentProfile::decode("3|A|d|x|1st|"),
            Err(SkipReason::MissingField("cgpa"))
        );
        assert_eq!(
            StudentProfile::decode("3|A"),
            Err(SkipReason::MissingField("dob"))
        );
    }

    #[test]
    fn test_encode_student_two_decimals() {
        let profile = StudentProfile::new(
            1,
            "A".to_string(),
            "2000-01-01".to_string(),
            "x".to_string(),
            "1st".to_string(),
            8.5,
        );
        assert_eq!(profile.encode(), "1|A|2000-01-01|x|1st|8.50|");
    }

    #[test]
    fn test_encode_student_rounds_cgpa() {
        let profile = StudentProfile::new(
            2,
            "B".to_string(),
            "2000-01-01".to_string(),
            "x".to_string(),
            "1st".to_string(),
            8.499,
        );
        assert_eq!(profile.encode(), "2|B|2000-01-01|x|1st|8.50|");
    }

    #[test]
    fn test_student_line_survives_reencoding() {
        let line = "41|Meera Iyer|2001-02-03|7 Park St|4th Year|9.13|";
        let decoded = StudentProfile::decode(line).unwrap();
        assert_eq!(decoded.encode(), line);
    }

    #[test]
    fn test_decode_attendance() {
        let record = AttendanceRecord::decode("1|Math|2024-01-01|Present|").unwrap();
        assert_eq!(
            record,
            AttendanceRecord::new(
                1,
                "Math".to_string(),
                "2024-01-01".to_string(),
                "Present".to_string()
            )
        );
    }

    #[test]
    fn test_decode_attendance_empty_status_is_kept() {
        let record = AttendanceRecord::decode("1|Math|2024-01-01||").unwrap();
        assert_eq!(record.status, "");
        assert!(!record.is_present());
    }

    #[test]
    fn test_decode_attendance_skips() {
        assert_eq!(
            AttendanceRecord::decode("1|Math|2024-01-01|"),
            Err(SkipReason::MissingField("status"))
        );
        assert_eq!(
            AttendanceRecord::decode("one|Math|2024-01-01|Present|"),
            Err(SkipReason::InvalidId("one".to_string()))
        );
    }

    #[test]
    fn test_encode_attendance() {
        let record = AttendanceRecord::marked(9, "Physics", "2024-02-10", false);
        assert_eq!(record.encode(), "9|Physics|2024-02-10|Absent|");
    }

    #[test]
    fn test_attendance_line_survives_reencoding() {
        for line in ["5|Chemistry|2024-02-11|Absent|", "6|Art|2024-02-12|yes|"] {
            let decoded = AttendanceRecord::decode(line).unwrap();
            assert_eq!(decoded.encode(), line);
        }
    }
}
