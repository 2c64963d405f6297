//! Interactive menu
//!
//! Line-oriented prompts over any reader and writer so the whole loop can be
//! driven from a test. End of input behaves like choosing Exit.

use logger::{error, verbose};
use rollbook::core::models::{AdmissionId, StudentProfile};
use rollbook::core::report::{ReportGenerator, TableReporter};
use rollbook::core::roster::{today, AddError, DeleteError, Roster, SessionError};
use std::io::{self, BufRead, Write};

const MENU: &str = "\n===== STUDENT INFORMATION & ATTENDANCE SYSTEM =====
1. Add New Student Profile
2. Add Attendance for Today (subject-wise)
3. Add Past Attendance (subject + date)
4. View Student Details by Admission ID
5. List All Students
6. View Attendance Report (All Students)
7. Delete Student (Profile + Attendance)
8. Exit
Enter your choice: ";

const NO_STUDENTS: &str = "No students registered. Add profiles first.";

/// Prompting over a reader/writer pair
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wrap an input and an output stream
    pub const fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `text` without a newline and read one line; `None` at end of input
    ///
    /// Bytes that are not UTF-8 are replaced rather than failing the read.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Ask for an admission id until one parses
    fn prompt_id(&mut self, text: &str) -> io::Result<Option<AdmissionId>> {
        let mut answer = self.prompt(text)?;
        loop {
            let Some(raw) = answer else {
                return Ok(None);
            };
            if let Ok(id) = raw.trim().parse() {
                return Ok(Some(id));
            }
            answer = self.prompt("Invalid input. Enter numeric Admission ID: ")?;
        }
    }

    /// Ask a yes/no question; only an answer starting with `y` or `Y` is yes
    fn prompt_mark(&mut self, question: &str) -> io::Result<Option<bool>> {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            if let Some(c) = answer.trim().chars().next() {
                return Ok(Some(c.eq_ignore_ascii_case(&'y')));
            }
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

/// The menu loop over one roster
pub struct Shell<R, W> {
    roster: Roster,
    console: Console<R, W>,
    reporter: TableReporter,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Menu over `roster`, reading answers from `input`
    pub const fn new(roster: Roster, input: R, out: W) -> Self {
        Self {
            roster,
            console: Console::new(input, out),
            reporter: TableReporter::new(),
        }
    }

    /// Run until Exit is chosen or input ends
    ///
    /// # Errors
    /// Only terminal I/O errors end the loop early; store failures are
    /// reported and the menu continues.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(line) = self.console.prompt(MENU)? else {
                return self.exit();
            };
            let Ok(choice) = line.trim().parse::<u32>() else {
                self.console
                    .say("Invalid input. Enter a number between 1-8.")?;
                continue;
            };
            verbose!("Menu choice {choice}");
            match choice {
                1 => self.add_student()?,
                2 => self.take_attendance(false)?,
                3 => self.take_attendance(true)?,
                4 => self.show_student()?,
                5 => self.list_students()?,
                6 => self.attendance_report()?,
                7 => self.delete_student()?,
                8 => return self.exit(),
                _ => self.console.say("Invalid choice. Try again.")?,
            }
        }
    }

    fn exit(&mut self) -> io::Result<()> {
        let message = format!(
            "Exiting. Data files: '{}', '{}'.",
            self.roster.students().path().display(),
            self.roster.attendance().path().display()
        );
        self.console.say(&message)
    }

    fn add_student(&mut self) -> io::Result<()> {
        let Some(id) = self.console.prompt_id("Enter Admission ID (integer): ")? else {
            return Ok(());
        };
        let mut answers = Vec::with_capacity(5);
        for question in [
            "Enter Full Name: ",
            "Enter Date of Birth (YYYY-MM-DD): ",
            "Enter Address: ",
            "Enter Year of Study (e.g., 2nd Year): ",
            "Enter CGPA (e.g., 8.25): ",
        ] {
            let Some(answer) = self.console.prompt(question)? else {
                return Ok(());
            };
            answers.push(answer);
        }
        let mut answers = answers.into_iter();
        let mut next = || answers.next().unwrap_or_default();
        let profile = StudentProfile::new(
            id,
            next(),
            next(),
            next(),
            next(),
            StudentProfile::parse_cgpa(&next()),
        );

        match self.roster.add_student(&profile) {
            Ok(()) => self.console.say("Student profile added successfully."),
            Err(AddError::Duplicate(_)) => self
                .console
                .say("A student with this ID already exists. Aborting."),
            Err(AddError::Store(e)) => {
                error!("Add student {id} failed: {e}");
                self.console
                    .say("Failed to write student file. Check permissions.")
            }
        }
    }

    fn take_attendance(&mut self, past: bool) -> io::Result<()> {
        match self.roster.list_students() {
            Ok(profiles) if profiles.is_empty() => return self.console.say(NO_STUDENTS),
            Ok(_) => {}
            Err(e) => return self.store_failure(&e),
        }

        let Some(subject) = self.console.prompt("Enter Subject Name: ")? else {
            return Ok(());
        };
        let date = if past {
            let Some(date) = self.console.prompt("Enter Date (YYYY-MM-DD): ")? else {
                return Ok(());
            };
            self.console
                .say(&format!("Adding past attendance for {subject} on {date}"))?;
            date
        } else {
            let date = today();
            self.console
                .say(&format!("Taking attendance for {subject} on {date}"))?;
            date
        };

        let Self {
            roster, console, ..
        } = self;
        let mut io_failure = None;
        let result = roster.record_session(&subject, &date, |p| {
            let question = if past {
                format!("Was {} (ID {}) present on {date}? (y/n): ", p.name, p.id)
            } else {
                format!("Is {} (ID {}) present? (y/n): ", p.name, p.id)
            };
            console.prompt_mark(&question).unwrap_or_else(|e| {
                io_failure.get_or_insert(e);
                None
            })
        });
        if let Some(e) = io_failure {
            return Err(e);
        }

        match result {
            Ok(report) => {
                for id in &report.failed {
                    self.console
                        .say(&format!("Failed to append attendance for ID {id}"))?;
                }
                if report.unmarked > 0 {
                    return self.console.say(&format!(
                        "Attendance stopped early; {} students were not marked.",
                        report.unmarked
                    ));
                }
                self.console.say(if past {
                    "Past attendance entries added successfully."
                } else {
                    "Attendance recorded for all students."
                })
            }
            Err(SessionError::NoStudents) => self.console.say(NO_STUDENTS),
            Err(SessionError::Store(e)) => self.store_failure(&e),
        }
    }

    fn show_student(&mut self) -> io::Result<()> {
        let Some(id) = self.console.prompt_id("Enter Admission ID to search: ")? else {
            return Ok(());
        };
        let profile = match self.roster.find_student(id) {
            Ok(Some(profile)) => profile,
            Ok(None) => return self.console.say(&format!("No student found with ID {id}.")),
            Err(e) => return self.store_failure(&e),
        };
        match self.roster.student_summary(id) {
            Ok(summary) => {
                let text = self.reporter.render_student(&profile, &summary);
                self.console.say(&text)
            }
            Err(e) => self.store_failure(&e),
        }
    }

    fn list_students(&mut self) -> io::Result<()> {
        match self.roster.list_students() {
            Ok(profiles) if profiles.is_empty() => {
                self.console.say("No students registered yet.")
            }
            Ok(profiles) => {
                let text = self.reporter.render_students(&profiles);
                write!(self.console.out, "{text}")
            }
            Err(e) => self.store_failure(&e),
        }
    }

    fn attendance_report(&mut self) -> io::Result<()> {
        match self.roster.roster_summary() {
            Ok(rows) if rows.is_empty() => self.console.say("No students registered."),
            Ok(rows) => {
                let text = self.reporter.render_roster(&rows);
                write!(self.console.out, "{text}")
            }
            Err(e) => self.store_failure(&e),
        }
    }

    fn delete_student(&mut self) -> io::Result<()> {
        let Some(id) = self.console.prompt_id("Enter Admission ID to delete: ")? else {
            return Ok(());
        };
        let message = match self.roster.delete_student(id) {
            Ok(_) => "Student profile and attendance removed successfully.".to_string(),
            Err(DeleteError::NotFound(_)) => format!("No student found with ID {id}."),
            Err(DeleteError::Load(e)) => return self.store_failure(&e),
            Err(DeleteError::ProfileWrite(_)) => {
                "Failed to update profiles file. Aborting delete.".to_string()
            }
            Err(DeleteError::AttendanceCleanup { .. }) => {
                "Failed to update attendance file. Manual cleanup required.".to_string()
            }
        };
        self.console.say(&message)
    }

    fn store_failure(&mut self, err: &dyn std::error::Error) -> io::Result<()> {
        error!("{err}");
        self.console.say(&format!("Could not access data files: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook::core::store::{AttendanceStore, StudentStore};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn roster(dir: &TempDir) -> Roster {
        Roster::new(
            StudentStore::new(dir.path().join("students.txt")),
            AttendanceStore::new(dir.path().join("attendance.txt")),
        )
    }

    fn run(dir: &TempDir, input: &str) -> String {
        let mut out = Vec::new();
        Shell::new(roster(dir), Cursor::new(input.to_string()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_prints_data_files() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, "8\n");
        assert!(out.contains("===== STUDENT INFORMATION & ATTENDANCE SYSTEM ====="));
        assert!(out.contains("Exiting. Data files: '"));
        assert!(out.contains("students.txt', '"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir, "").contains("Exiting."));
    }

    #[test]
    fn test_invalid_choices() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, "abc\n9\n8\n");
        assert!(out.contains("Invalid input. Enter a number between 1-8."));
        assert!(out.contains("Invalid choice. Try again."));
    }

    #[test]
    fn test_add_student_retries_id_and_defaults_cgpa() {
        let dir = TempDir::new().unwrap();
        let out = run(
            &dir,
            "1\nxyz\n7\nAsha Rao\n2001-02-03\nMain St\n2nd Year\nnot-a-number\n8\n",
        );

        assert!(out.contains("Invalid input. Enter numeric Admission ID: "));
        assert!(out.contains("Student profile added successfully."));
        assert_eq!(
            fs::read_to_string(dir.path().join("students.txt")).unwrap(),
            "7|Asha Rao|2001-02-03|Main St|2nd Year|0.00|\n"
        );
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("students.txt"), "7|A|d|x|y|1.00|\n").unwrap();

        let out = run(&dir, "1\n7\nB\nd\nx\ny\n2.0\n8\n");

        assert!(out.contains("A student with this ID already exists. Aborting."));
        assert_eq!(
            fs::read_to_string(dir.path().join("students.txt")).unwrap(),
            "7|A|d|x|y|1.00|\n"
        );
    }

    #[test]
    fn test_attendance_without_students() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, "2\n8\n");
        assert!(out.contains(NO_STUDENTS));
        assert!(!out.contains("Enter Subject Name"));
    }

    #[test]
    fn test_past_attendance_then_details() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("students.txt"), "1|A|d|x|1st|8.50|\n").unwrap();

        let out = run(
            &dir,
            "3\nMath\n2024-01-01\ny\n3\nMath\n2024-01-02\n\nn\n4\n1\n8\n",
        );

        assert!(out.contains("Was A (ID 1) present on 2024-01-01? (y/n): "));
        assert!(out.contains("Past attendance entries added successfully."));
        assert_eq!(
            fs::read_to_string(dir.path().join("attendance.txt")).unwrap(),
            "1|Math|2024-01-01|Present|\n1|Math|2024-01-02|Absent|\n"
        );
        assert!(out.contains("Overall attendance    : 50.00%"));
    }

    #[test]
    fn test_today_attendance_uses_current_date() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("students.txt"), "1|A|d|x|1st|8.50|\n").unwrap();

        let out = run(&dir, "2\nArt\nY\n8\n");

        assert!(out.contains("Is A (ID 1) present? (y/n): "));
        assert!(out.contains("Attendance recorded for all students."));
        let stored = fs::read_to_string(dir.path().join("attendance.txt")).unwrap();
        assert_eq!(stored, format!("1|Art|{}|Present|\n", today()));
    }

    #[test]
    fn test_non_utf8_name_does_not_end_session() {
        let dir = TempDir::new().unwrap();
        let mut input = b"1\n5\nJos".to_vec();
        input.extend_from_slice(b"\xe9\nd\nx\ny\n7.0\n5\n8\n");
        let mut out = Vec::new();

        Shell::new(roster(&dir), Cursor::new(input), &mut out)
            .run()
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Student profile added successfully."));
        assert!(out.contains("Jos\u{fffd}"));
        assert!(out.contains("Exiting."));
    }

    #[test]
    fn test_input_ending_mid_session_writes_nothing_unasked() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("students.txt"),
            "1|A|d|x|1st|8.50|\n2|B|d|x|1st|7.00|\n",
        )
        .unwrap();

        let out = run(&dir, "3\nMath\n2024-01-01\ny\n");

        assert!(out.contains("Attendance stopped early; 1 students were not marked."));
        assert!(!out.contains("Past attendance entries added successfully."));
        assert_eq!(
            fs::read_to_string(dir.path().join("attendance.txt")).unwrap(),
            "1|Math|2024-01-01|Present|\n"
        );
    }

    #[test]
    fn test_list_and_report_when_empty() {
        let dir = TempDir::new().unwrap();
        let out = run(&dir, "5\n6\n8\n");
        assert!(out.contains("No students registered yet."));
        assert!(out.contains("No students registered.\n"));
    }

    #[test]
    fn test_delete_flow() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("students.txt"), "1|A|d|x|y|1.00|\n").unwrap();
        fs::write(dir.path().join("attendance.txt"), "1|Math|d|Present|\n").unwrap();

        let out = run(&dir, "7\n2\n7\n1\n8\n");

        assert!(out.contains("No student found with ID 2."));
        assert!(out.contains("Student profile and attendance removed successfully."));
        assert_eq!(
            fs::read_to_string(dir.path().join("students.txt")).unwrap(),
            ""
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("attendance.txt")).unwrap(),
            ""
        );
    }
}
