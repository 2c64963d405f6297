//! Command-line interface entry point for `rollbook`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use logger::{
    close_file_logging, enable_debug, enable_verbose, info, init_file_logging, set_level, warn,
    Level,
};
use rollbook::config::Config;
use rollbook::core::roster::Roster;
use std::io;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    if !config.logging.file.is_empty() {
        let log_path = std::path::PathBuf::from(&config.logging.file);
        if init_file_logging(&log_path) {
            info!("File logging initialized at: {}", log_path.display());
        } else {
            eprintln!(
                "✗ Failed to initialize file logging at: {}",
                log_path.display()
            );
        }
    }

    match args.command.unwrap_or(Command::Menu) {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Menu => run_menu(open_roster(&config)),
        Command::List { format, output } => {
            commands::students::list(&open_roster(&config), format, output.as_deref());
        }
        Command::Show { id, format, output } => {
            commands::students::show(&open_roster(&config), id, format, output.as_deref());
        }
        Command::Report {
            format,
            output,
            save,
        } => {
            let roster = open_roster(&config);
            commands::students::report(&roster, &config, format, output.as_deref(), save);
        }
        Command::Delete { id, yes } => commands::students::delete(&open_roster(&config), id, yes),
    }

    close_file_logging();
}

fn run_menu(roster: Roster) {
    let stdin = io::stdin();
    let mut shell = commands::menu::Shell::new(roster, stdin.lock(), io::stdout());
    if let Err(e) = shell.run() {
        eprintln!("✗ Terminal error: {e}");
    }
}

/// Build the roster and make sure both files exist
fn open_roster(config: &Config) -> Roster {
    let students = config.student_store();
    let attendance = config.attendance_store();

    for result in [students.ensure_exists(), attendance.ensure_exists()] {
        if let Err(e) = result {
            warn!("{e}");
        }
    }
    info!(
        "Using data files {} and {}",
        students.path().display(),
        attendance.path().display()
    );

    Roster::new(students, attendance)
}
