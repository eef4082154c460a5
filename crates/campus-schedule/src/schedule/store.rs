use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use super::domain::{FacultySchedule, ScheduleDocument};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleLoadError {
    #[error("failed to read schedule data from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid schedule data: {0}")]
    Format(#[from] serde_json::Error),
    #[error("schedule data does not define any faculty")]
    Empty,
    #[error("faculty code must not be blank")]
    BlankFaculty,
    #[error("primary faculty {code} is not defined in schedule data")]
    UnknownPrimaryFaculty { code: String },
}

/// Read-only holder of the schedule document. Built once at startup and shared
/// behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    document: ScheduleDocument,
}

impl ScheduleStore {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScheduleLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ScheduleLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path.display(), faculties = store.document.faculties.len(), "schedule data loaded");
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleLoadError> {
        let document: ScheduleDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_document(document: ScheduleDocument) -> Result<Self, ScheduleLoadError> {
        if document.faculties.is_empty() {
            return Err(ScheduleLoadError::Empty);
        }
        if document.faculties.keys().any(|code| code.trim().is_empty()) {
            return Err(ScheduleLoadError::BlankFaculty);
        }

        Ok(Self { document })
    }

    pub fn faculty(&self, code: &str) -> Option<&FacultySchedule> {
        self.document.faculties.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.document.faculties.contains_key(code)
    }

    pub fn faculty_codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.document.faculties.keys().map(String::as_str)
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EMPTY_FACULTY: &str = r#"{
        "FII": {
            "1": { "1": {}, "2": {}, "3": {} },
            "2": { "1": {}, "2": {}, "3": {} }
        }
    }"#;

    #[test]
    fn loads_minimal_document() {
        let store = ScheduleStore::from_reader(Cursor::new(EMPTY_FACULTY)).expect("store loads");
        assert!(store.contains("FII"));
        assert!(!store.contains("fii"));
        assert_eq!(store.faculty_codes().collect::<Vec<_>>(), vec!["FII"]);
    }

    #[test]
    fn rejects_empty_document() {
        let err = ScheduleStore::from_reader(Cursor::new("{}")).expect_err("empty rejected");
        assert!(matches!(err, ScheduleLoadError::Empty));
    }

    #[test]
    fn rejects_missing_semester_branch() {
        let raw = r#"{ "FII": { "1": { "1": {}, "2": {}, "3": {} } } }"#;
        let err = ScheduleStore::from_reader(Cursor::new(raw)).expect_err("missing semester");
        assert!(matches!(err, ScheduleLoadError::Format(_)));
    }

    #[test]
    fn rejects_unparsable_group() {
        let raw = r#"{ "FII": {
            "1": { "1": { "Luni": [ { "Grupa": "ABC", "Sala": "C2", "Tip": "Seminar" } ] }, "2": {}, "3": {} },
            "2": { "1": {}, "2": {}, "3": {} }
        } }"#;
        let err = ScheduleStore::from_reader(Cursor::new(raw)).expect_err("bad group rejected");
        assert!(err.to_string().contains("ABC"));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = ScheduleStore::from_path("does/not/exist.json").expect_err("missing file");
        match err {
            ScheduleLoadError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("does/not/exist.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
