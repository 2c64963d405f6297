//! Non-interactive student and report commands

use logger::{error, info};
use rollbook::config::Config;
use rollbook::core::models::AdmissionId;
use rollbook::core::report::{formats::write_report, ReportFormat};
use rollbook::core::roster::{DeleteError, Roster};
use std::io::{self, Write};
use std::path::Path;

/// Print `content`, or write it to `output` when given
fn emit(content: &str, output: Option<&Path>) {
    let Some(path) = output else {
        print!("{content}");
        return;
    };
    match write_report(content, path) {
        Ok(()) => {
            info!("Wrote {}", path.display());
            println!("✓ Report written: {}", path.display());
        }
        Err(e) => {
            eprintln!("✗ Failed to write {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn fail(err: &dyn std::error::Error) -> ! {
    error!("{err}");
    eprintln!("✗ {err}");
    std::process::exit(1);
}

/// `rollbook list`
pub fn list(roster: &Roster, format: ReportFormat, output: Option<&Path>) {
    let profiles = roster.list_students().unwrap_or_else(|e| fail(&e));
    emit(&format.reporter().render_students(&profiles), output);
}

/// `rollbook show <ID>`
pub fn show(roster: &Roster, id: AdmissionId, format: ReportFormat, output: Option<&Path>) {
    let Some(profile) = roster.find_student(id).unwrap_or_else(|e| fail(&e)) else {
        eprintln!("No student found with ID {id}.");
        std::process::exit(1);
    };
    let summary = roster.student_summary(id).unwrap_or_else(|e| fail(&e));
    emit(&format.reporter().render_student(&profile, &summary), output);
}

/// `rollbook report`
///
/// With `save` the report goes to `attendance_report.<ext>` in the
/// configured reports directory.
pub fn report(
    roster: &Roster,
    config: &Config,
    format: ReportFormat,
    output: Option<&Path>,
    save: bool,
) {
    let rows = roster.roster_summary().unwrap_or_else(|e| fail(&e));
    let content = format.reporter().render_roster(&rows);
    if save {
        let path = config.report_path("attendance_report", format.extension());
        emit(&content, Some(&path));
    } else {
        emit(&content, output);
    }
}

/// `rollbook delete <ID>`
pub fn delete(roster: &Roster, id: AdmissionId, yes: bool) {
    let Some(profile) = roster.find_student(id).unwrap_or_else(|e| fail(&e)) else {
        eprintln!("No student found with ID {id}.");
        std::process::exit(1);
    };

    if !yes && !confirm(&format!(
        "Delete {} (ID {id}) and all of their attendance? (y/n): ",
        profile.name
    )) {
        println!("✗ Delete cancelled");
        return;
    }

    match roster.delete_student(id) {
        Ok(outcome) => println!(
            "✓ Removed {} and {} attendance records",
            outcome.profile.name, outcome.attendance_removed
        ),
        Err(DeleteError::AttendanceCleanup { id, source }) => {
            error!("Attendance cleanup for {id} failed: {source}");
            eprintln!("✗ Profile removed but the attendance file could not be updated. Manual cleanup required.");
            std::process::exit(1);
        }
        Err(e) => fail(&e),
    }
}

fn confirm(question: &str) -> bool {
    print!("{question}");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
