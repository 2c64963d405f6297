//! Student profile model

/// Unique integer identifier of a student, assigned by whoever registers them
pub type AdmissionId = i64;

/// One registered student
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    /// Admission id (unique at creation time)
    pub id: AdmissionId,

    /// Full name
    pub name: String,

    /// Date of birth, expected as `YYYY-MM-DD` but never validated
    pub dob: String,

    /// Postal address
    pub address: String,

    /// Year of study (e.g., "2nd Year")
    pub year: String,

    /// Cumulative grade point average, shown with two decimals
    pub cgpa: f64,
}

impl StudentProfile {
    /// Create a new profile
    #[must_use]
    pub const fn new(
        id: AdmissionId,
        name: String,
        dob: String,
        address: String,
        year: String,
        cgpa: f64,
    ) -> Self {
        Self {
            id,
            name,
            dob,
            address,
            year,
            cgpa,
        }
    }

    /// Parse a CGPA as typed by a user; anything unparsable becomes `0.0`
    #[must_use]
    pub fn parse_cgpa(input: &str) -> f64 {
        input.trim().parse::<f64>().unwrap_or(0.0)
    }
}
