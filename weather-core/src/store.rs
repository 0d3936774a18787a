//! Flat-file storage for the single location record.
//!
//! Reads and writes always cover the whole file. There is no locking:
//! concurrent writers race and the last write wins.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Duration, Utc};

use crate::{
    error::StoreError,
    model::{LocationInput, LocationRecord},
};

#[derive(Debug, Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure a record exists, writing the default one if the file is
    /// absent. Returns the record now on disk.
    pub fn initialize(&self) -> Result<LocationRecord, StoreError> {
        match self.get() {
            Err(StoreError::Missing { .. }) => {
                let record = LocationRecord::default_at(Utc::now());
                self.write(&record)?;
                tracing::info!(path = %self.path.display(), "created default location file");
                Ok(record)
            }
            other => other,
        }
    }

    /// Read the current record. Never writes.
    pub fn get(&self) -> Result<LocationRecord, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing { path: self.path.clone() });
            }
            Err(source) => {
                return Err(StoreError::Read { path: self.path.clone(), source });
            }
        };

        serde_json::from_str(&contents)
            .map_err(|source| StoreError::Malformed { path: self.path.clone(), source })
    }

    /// Replace the stored record with `input`, stamped with the current time.
    ///
    /// `city`, `latitude` and `longitude` are required; on validation failure
    /// the file is left untouched. The new stamp is always later than the one
    /// it replaces.
    pub fn set(&self, input: LocationInput) -> Result<LocationRecord, StoreError> {
        if let Some(&field) = input.missing_fields().first() {
            return Err(StoreError::Validation(field));
        }

        let LocationInput { city, state, country, latitude, longitude, extra, .. } = input;

        let mut last_updated = Utc::now();
        if let Ok(previous) = self.get() {
            if previous.last_updated >= last_updated {
                last_updated = previous.last_updated + Duration::microseconds(1);
            }
        }

        let record = LocationRecord {
            city: city.unwrap_or_default(),
            state,
            country: country.unwrap_or_default(),
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
            last_updated,
            extra,
        };

        self.write(&record)?;
        tracing::debug!(city = %record.city, "location record replaced");
        Ok(record)
    }

    fn write(&self, record: &LocationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Write { path: self.path.clone(), source })?;
        }

        fs::write(&self.path, json)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, LocationStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocationStore::new(dir.path().join("location.json"));
        (dir, store)
    }

    #[test]
    fn get_on_empty_store_is_missing_and_does_not_write() {
        let (_dir, store) = temp_store();

        let err = store.get().unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
        assert!(!store.path().exists());
    }

    #[test]
    fn initialize_writes_default_once() {
        let (_dir, store) = temp_store();

        let first = store.initialize().expect("initialize");
        assert_eq!(first.city, "Philadelphia");
        assert_eq!(first.coordinates(), Coordinates::DEFAULT);

        let read = store.get().expect("get after initialize");
        assert_eq!(read, first);

        let again = store.initialize().expect("second initialize");
        assert_eq!(again, first);
    }

    #[test]
    fn initialize_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocationStore::new(dir.path().join("nested/deeper/location.json"));

        store.initialize().expect("initialize");
        assert!(store.path().exists());
    }

    #[test]
    fn file_is_pretty_printed_json() {
        let (_dir, store) = temp_store();
        store.initialize().expect("initialize");

        let raw = fs::read_to_string(store.path()).expect("read");
        assert!(raw.contains("\n  \"city\": \"Philadelphia\""));
        assert!(raw.contains("\"lastUpdated\""));
    }

    #[test]
    fn set_then_get_returns_new_location() {
        let (_dir, store) = temp_store();
        let before = store.initialize().expect("initialize").last_updated;

        let stored = store
            .set(LocationInput::new("Paris", 48.8566, 2.3522))
            .expect("set");
        let read = store.get().expect("get");

        assert_eq!(read, stored);
        assert_eq!(read.city, "Paris");
        assert_eq!(read.latitude, 48.8566);
        assert_eq!(read.longitude, 2.3522);
        assert!(read.last_updated > before);
    }

    #[test]
    fn set_replaces_without_merging() {
        let (_dir, store) = temp_store();
        store.initialize().expect("initialize");

        let stored = store
            .set(LocationInput::new("Paris", 48.8566, 2.3522))
            .expect("set");

        assert_eq!(stored.state, None);
        assert_eq!(stored.country, "");
    }

    #[test]
    fn set_with_missing_fields_leaves_record_unchanged() {
        let (_dir, store) = temp_store();
        let original = store.initialize().expect("initialize");

        let err = store.set(LocationInput::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, StoreError::Validation("city")));

        assert_eq!(store.get().expect("get"), original);
    }

    #[test]
    fn set_overrides_caller_timestamp() {
        let (_dir, store) = temp_store();
        let input: LocationInput = serde_json::from_value(json!({
            "city": "Paris",
            "latitude": 48.8566,
            "longitude": 2.3522,
            "lastUpdated": "1999-01-01T00:00:00Z"
        }))
        .expect("input");

        let stored = store.set(input).expect("set");
        assert!(stored.last_updated.timestamp() > 946_684_800);
    }

    #[test]
    fn repeated_set_strictly_increases_timestamp() {
        let (_dir, store) = temp_store();
        let input = LocationInput::new("Paris", 48.8566, 2.3522).with_country("FR");

        let first = store.set(input.clone()).expect("first");
        let second = store.set(input).expect("second");

        assert!(second.last_updated > first.last_updated);
        assert_eq!(
            LocationRecord { last_updated: first.last_updated, ..second.clone() },
            first
        );
    }

    #[test]
    fn malformed_file_is_reported() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{ not json").expect("write");

        assert!(matches!(store.get().unwrap_err(), StoreError::Malformed { .. }));
        assert!(matches!(store.initialize().unwrap_err(), StoreError::Malformed { .. }));
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory where the file should be.
        let store = LocationStore::new(dir.path());

        assert!(matches!(store.get().unwrap_err(), StoreError::Read { .. }));
    }
}
