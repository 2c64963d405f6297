//! Configuration module for `Rollbook`

use crate::core::store::{AttendanceStore, StudentStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the rollbook config directory in path values
const DIR_VARIABLE: &str = "$ROLLBOOK";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const KEYS: [&str; 6] = [
    "level",
    "file",
    "verbose",
    "student_file",
    "attendance_file",
    "reports_dir",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path, empty for terminal output
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Data file locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Student profile file
    #[serde(default)]
    pub student_file: String,
    /// Attendance file
    #[serde(default)]
    pub attendance_file: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override student file
    pub student_file: Option<String>,
    /// Override attendance file
    pub attendance_file: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Copy `default` into `value` when `value` is empty; reports whether it did
fn fill_empty(value: &mut String, default: &str) -> bool {
    if value.is_empty() && !default.is_empty() {
        default.clone_into(value);
        true
    } else {
        false
    }
}

impl Config {
    /// Get the `$ROLLBOOK` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/rollbook`
    /// - macOS: `~/Library/Application Support/rollbook`
    /// - Windows: `%APPDATA%\rollbook`
    #[must_use]
    pub fn get_rollbook_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rollbook")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` are
    /// updated, so user settings survive an upgrade that adds new keys.
    ///
    /// Returns `true` if anything changed.
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let merged = [
            fill_empty(&mut self.logging.level, &defaults.logging.level),
            fill_empty(&mut self.logging.file, &defaults.logging.file),
            fill_empty(&mut self.paths.student_file, &defaults.paths.student_file),
            fill_empty(
                &mut self.paths.attendance_file,
                &defaults.paths.attendance_file,
            ),
            fill_empty(&mut self.paths.reports_dir, &defaults.paths.reports_dir),
        ];
        merged.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; nothing is written back to disk.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(student_file) = &overrides.student_file {
            self.paths.student_file.clone_from(student_file);
        }
        if let Some(attendance_file) = &overrides.attendance_file {
            self.paths.attendance_file.clone_from(attendance_file);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds and `dconfig.toml` for debug builds,
    /// inside [`get_rollbook_dir`](Self::get_rollbook_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_rollbook_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$ROLLBOOK` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_rollbook_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults and `$ROLLBOOK` is expanded in
    /// every path value.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [paths]
    /// student_file = "$ROLLBOOK/data/students.txt"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.student_file = Self::expand_variables(&config.paths.student_file);
        config.paths.attendance_file = Self::expand_variables(&config.paths.attendance_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file has missing fields merged in from the defaults and is
    /// saved back when that changed anything. On first run the defaults are
    /// written out. Any read or parse failure falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the
    /// file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Path keys also accept a dashed spelling (`student-file`). Returns
    /// `None` for an unknown key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "student_file" | "student-file" => Some(self.paths.student_file.clone()),
            "attendance_file" | "attendance-file" => Some(self.paths.attendance_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only. Call [`save()`](Config::save) to
    /// persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or `verbose` is given a
    /// value that is not `true` or `false`
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                if logger::Level::parse(value).is_none() {
                    return Err(format!("Invalid log level: '{value}'"));
                }
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "student_file" | "student-file" => {
                self.paths.student_file = Self::expand_variables(value);
            }
            "attendance_file" | "attendance-file" => {
                self.paths.attendance_file = Self::expand_variables(value);
            }
            "reports_dir" | "reports-dir" => self.paths.reports_dir = Self::expand_variables(value),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "student_file" | "student-file" => self
                .paths
                .student_file
                .clone_from(&defaults.paths.student_file),
            "attendance_file" | "attendance-file" => self
                .paths
                .attendance_file
                .clone_from(&defaults.paths.attendance_file),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Store for the configured student file
    #[must_use]
    pub fn student_store(&self) -> StudentStore {
        StudentStore::new(&self.paths.student_file)
    }

    /// Store for the configured attendance file
    #[must_use]
    pub fn attendance_store(&self) -> AttendanceStore {
        AttendanceStore::new(&self.paths.attendance_file)
    }

    /// Default output path for a report file named `stem`
    #[must_use]
    pub fn report_path(&self, stem: &str, extension: &str) -> PathBuf {
        PathBuf::from(&self.paths.reports_dir).join(format!("{stem}.{extension}"))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  student_file = \"{}\"", self.paths.student_file)?;
        writeln!(f, "  attendance_file = \"{}\"", self.paths.attendance_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_empty() {
        let mut value = String::new();
        assert!(fill_empty(&mut value, "warn"));
        assert_eq!(value, "warn");
        assert!(!fill_empty(&mut value, "debug"));
        assert_eq!(value, "warn");
    }

    #[test]
    fn test_expand_variables() {
        let expanded = Config::expand_variables("$ROLLBOOK/data/students.txt");
        assert!(!expanded.contains("$ROLLBOOK"));
        assert!(expanded.ends_with("students.txt"));
        assert_eq!(Config::expand_variables("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_set_rejects_bad_level() {
        let mut config = Config::from_defaults();
        assert!(config.set("level", "loud").is_err());
        assert!(config.set("level", "debug").is_ok());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_stores_follow_paths() {
        let mut config = Config::default();
        config.paths.student_file = "a.txt".to_string();
        config.paths.attendance_file = "b.txt".to_string();
        assert_eq!(config.student_store().path(), std::path::Path::new("a.txt"));
        assert_eq!(
            config.attendance_store().path(),
            std::path::Path::new("b.txt")
        );
    }

    #[test]
    fn test_report_path() {
        let mut config = Config::default();
        config.paths.reports_dir = "out".to_string();
        assert_eq!(
            config.report_path("roster", "csv"),
            PathBuf::from("out").join("roster.csv")
        );
    }
}
