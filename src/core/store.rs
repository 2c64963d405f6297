//! Flat-file record stores
//!
//! Each store owns one text file holding one record per line. Reads always
//! load the whole file; updates either append a line or rewrite the file from
//! scratch. Nothing is cached between calls and nothing is locked, so only one
//! process should use a data directory at a time.

use crate::core::codec::{LineRecord, SkipReason};
use crate::core::models::{AdmissionId, AttendanceRecord, StudentProfile};
use logger::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by store I/O
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The file could not be opened for writing or a write failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Storage contract shared by every record backend
///
/// Callers only rely on these operations, so a different backend can
/// replace the flat files without touching them.
pub trait RecordStore<R> {
    /// Load every valid record in storage order
    ///
    /// # Errors
    /// Returns `StoreError::Read` if existing storage cannot be read
    fn load_all(&self) -> Result<Vec<R>, StoreError>;

    /// Add one record after the existing ones
    ///
    /// # Errors
    /// Returns `StoreError::Write` if the record cannot be persisted
    fn append(&self, record: &R) -> Result<(), StoreError>;

    /// Replace the stored records with `records`, in order
    ///
    /// # Errors
    /// Returns `StoreError::Write` if storage cannot be rewritten. The previous
    /// contents may already be truncated when this happens.
    fn save_all(&self, records: &[R]) -> Result<(), StoreError>;

    /// Replace the stored records after a removal
    ///
    /// The delete cascade calls this on the attendance store. Backends that
    /// have a cheaper way to drop records can override it.
    ///
    /// # Errors
    /// Returns `StoreError::Write` if storage cannot be rewritten
    fn rewrite_all(&self, records: &[R]) -> Result<(), StoreError> {
        self.save_all(records)
    }
}

/// A store backed by one delimited text file
#[derive(Debug, Clone)]
pub struct FlatFileStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

/// Store for student profiles
pub type StudentStore = FlatFileStore<StudentProfile>;

/// Store for attendance records
pub type AttendanceStore = FlatFileStore<AttendanceRecord>;

impl<R> FlatFileStore<R> {
    /// Create a store over `path`; the file is not touched until first use
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file (and its directory) empty if it does not exist
    ///
    /// # Errors
    /// Returns `StoreError::Write` if the directory or file cannot be created
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        self.open_append().map(drop)
    }

    fn open_append(&self) -> Result<File, StoreError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl<R: LineRecord> RecordStore<R> for FlatFileStore<R> {
    fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for (idx, raw) in content.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() {
                continue;
            }
            let decoded = std::str::from_utf8(raw)
                .map_err(|_| SkipReason::InvalidUtf8)
                .and_then(R::decode);
            match decoded {
                Ok(record) => records.push(record),
                Err(reason) => debug!(
                    "Skipping {} line {} in {}: {reason}",
                    R::KIND,
                    idx + 1,
                    self.path.display()
                ),
            }
        }
        Ok(records)
    }

    fn append(&self, record: &R) -> Result<(), StoreError> {
        let mut file = self.open_append()?;
        writeln!(file, "{}", record.encode()).map_err(|e| self.write_error(e))?;
        debug!("Appended {} record to {}", R::KIND, self.path.display());
        Ok(())
    }

    fn save_all(&self, records: &[R]) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", record.encode()).map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))?;
        info!(
            "Rewrote {} with {} {} records",
            self.path.display(),
            records.len(),
            R::KIND
        );
        Ok(())
    }
}

/// Position of the first profile with `id`
#[must_use]
pub fn find_index(profiles: &[StudentProfile], id: AdmissionId) -> Option<usize> {
    profiles.iter().position(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile(id: AdmissionId, name: &str) -> StudentProfile {
        StudentProfile::new(
            id,
            name.to_string(),
            "2001-01-01".to_string(),
            "Main St".to_string(),
            "1st Year".to_string(),
            7.0,
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StudentStore::new(dir.path().join("absent.txt"));
        assert!(store.load_all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_ensure_exists_creates_parent_and_file() {
        let dir = TempDir::new().unwrap();
        let store = AttendanceStore::new(dir.path().join("data").join("attendance.txt"));

        store.ensure_exists().unwrap();
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");

        // Existing content is left alone
        store
            .append(&AttendanceRecord::marked(1, "Math", "2024-01-01", true))
            .unwrap();
        store.ensure_exists().unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.txt");
        fs::write(
            &path,
            "1|A|2000-01-01|x|1st|8.50|\n\nbad|B|d|x|y|1.0|\n2|C|d|x|y|\n3|D|d|x|y|oops|\n",
        )
        .unwrap();

        let loaded = StudentStore::new(&path).load_all().unwrap();
        let ids: Vec<AdmissionId> = loaded.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(loaded[1].cgpa.abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_skips_non_utf8_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.txt");
        let mut content = b"1|A|2000-01-01|x|1st|8.50|\n2|Jos".to_vec();
        content.extend_from_slice(b"\xe9|d|x|y|7.00|\r\n3|C|d|x|y|6.00|\n");
        fs::write(&path, content).unwrap();

        let store = StudentStore::new(&path);
        let ids: Vec<AdmissionId> = store.load_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);

        // The unreadable line does not block a rewrite either
        store.save_all(&[profile(3, "C")]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_save_all_truncates() {
        let dir = TempDir::new().unwrap();
        let store = StudentStore::new(dir.path().join("students.txt"));
        store.append(&profile(1, "A")).unwrap();
        store.append(&profile(2, "B")).unwrap();

        store.save_all(&[profile(2, "B")]).unwrap();

        assert_eq!(store.load_all().unwrap(), vec![profile(2, "B")]);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "2|B|2001-01-01|Main St|1st Year|7.00|\n"
        );
    }

    #[test]
    fn test_rewrite_attendance_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = AttendanceStore::new(dir.path().join("attendance.txt"));
        let records = vec![
            AttendanceRecord::marked(2, "Art", "2024-01-02", false),
            AttendanceRecord::marked(1, "Math", "2024-01-01", true),
        ];
        store.append(&AttendanceRecord::marked(3, "Math", "d", true)).unwrap();

        store.rewrite_all(&records).unwrap();

        assert_eq!(store.load_all().unwrap(), records);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "2|Art|2024-01-02|Absent|\n1|Math|2024-01-01|Present|\n"
        );
    }

    #[test]
    fn test_append_to_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file
        let store = StudentStore::new(dir.path());
        let err = store.append(&profile(1, "A")).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn test_find_index_returns_first_match() {
        let profiles = vec![profile(4, "A"), profile(9, "B"), profile(9, "C")];
        assert_eq!(find_index(&profiles, 9), Some(1));
        assert_eq!(find_index(&profiles, 5), None);
    }
}
