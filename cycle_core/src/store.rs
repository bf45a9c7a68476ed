//! Profile and cycle persistence with file locking.
//!
//! Everything lives in one JSON document owned by an explicitly constructed
//! [`Store`]; callers create one per data directory and pass it where it is
//! needed. Loads take a shared lock and degrade to an empty database when
//! the file is missing or unreadable; saves go through a locked temp file
//! and an atomic rename.

use crate::dates::days_between;
use crate::{CycleRecord, Error, Profile, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// The persisted document: every profile and every cycle record
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
}

impl Database {
    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Create a profile, optionally seeded with historical start dates
    ///
    /// Nicknames are unique; the new profile sorts after all existing ones.
    pub fn add_profile(
        &mut self,
        nickname: &str,
        avatar_color: &str,
        history: &[NaiveDate],
    ) -> Result<Uuid> {
        if self.profile_by_nickname(nickname).is_some() {
            return Err(Error::Store(format!(
                "nickname '{}' is already in use",
                nickname
            )));
        }

        let mut profile = Profile::new(nickname, avatar_color);
        profile.display_order = self
            .profiles
            .iter()
            .map(|p| p.display_order + 1)
            .max()
            .unwrap_or(0);
        let id = profile.id;
        self.profiles.push(profile);

        for &date in history {
            self.cycles.push(CycleRecord::new(id, date));
        }
        self.refresh_computed_lengths(id);

        tracing::info!("Created profile {} ({})", nickname, id);
        Ok(id)
    }

    /// All profiles in display order
    pub fn profiles_ordered(&self) -> Vec<&Profile> {
        let mut profiles: Vec<&Profile> = self.profiles.iter().collect();
        profiles.sort_by_key(|p| p.display_order);
        profiles
    }

    pub fn profile_by_nickname(&self, nickname: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.nickname == nickname)
    }

    fn profile_mut(&mut self, id: Uuid) -> Result<&mut Profile> {
        self.profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::Store(format!("no profile with id {}", id)))
    }

    pub fn rename_profile(&mut self, id: Uuid, nickname: &str) -> Result<()> {
        if self
            .profiles
            .iter()
            .any(|p| p.nickname == nickname && p.id != id)
        {
            return Err(Error::Store(format!(
                "nickname '{}' is already in use",
                nickname
            )));
        }
        self.profile_mut(id)?.nickname = nickname.into();
        Ok(())
    }

    pub fn set_avatar_color(&mut self, id: Uuid, avatar_color: &str) -> Result<()> {
        self.profile_mut(id)?.avatar_color = avatar_color.into();
        Ok(())
    }

    /// Set or clear the manual cycle length override
    ///
    /// Zero means "unset", matching the truthiness rule the estimator uses.
    pub fn set_manual_length(&mut self, id: Uuid, length: Option<u32>) -> Result<()> {
        self.profile_mut(id)?.manual_cycle_length = length.filter(|&l| l > 0);
        Ok(())
    }

    /// Remove a profile and cascade-delete its cycle records
    pub fn remove_profile(&mut self, id: Uuid) -> Result<()> {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            return Err(Error::Store(format!("no profile with id {}", id)));
        }

        self.cycles.retain(|c| c.profile_id != id);
        tracing::info!("Removed profile {} and its cycle records", id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cycles
    // ------------------------------------------------------------------

    /// Record a period start date for a profile
    pub fn add_cycle(&mut self, profile_id: Uuid, start_date: NaiveDate) -> Result<Uuid> {
        if !self.profiles.iter().any(|p| p.id == profile_id) {
            return Err(Error::Store(format!("no profile with id {}", profile_id)));
        }

        let record = CycleRecord::new(profile_id, start_date);
        let id = record.id;
        self.cycles.push(record);
        self.refresh_computed_lengths(profile_id);

        tracing::info!("Recorded cycle start {} for {}", start_date, profile_id);
        Ok(id)
    }

    /// A profile's cycle records, most recent first
    pub fn cycles_for(&self, profile_id: Uuid) -> Vec<&CycleRecord> {
        let mut cycles: Vec<&CycleRecord> = self
            .cycles
            .iter()
            .filter(|c| c.profile_id == profile_id)
            .collect();
        cycles.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        cycles
    }

    /// Move a recorded start date
    ///
    /// Duplicate dates are kept as-is, so this edits the first match.
    pub fn update_cycle(
        &mut self,
        profile_id: Uuid,
        old_date: NaiveDate,
        new_date: NaiveDate,
    ) -> Result<()> {
        let record = self
            .cycles
            .iter_mut()
            .find(|c| c.profile_id == profile_id && c.start_date == old_date)
            .ok_or_else(|| Error::Store(format!("no cycle starting {}", old_date)))?;
        record.start_date = new_date;
        self.refresh_computed_lengths(profile_id);
        Ok(())
    }

    /// Delete a recorded start date (the first match when duplicated)
    pub fn remove_cycle(&mut self, profile_id: Uuid, start_date: NaiveDate) -> Result<()> {
        let pos = self
            .cycles
            .iter()
            .position(|c| c.profile_id == profile_id && c.start_date == start_date)
            .ok_or_else(|| Error::Store(format!("no cycle starting {}", start_date)))?;
        self.cycles.remove(pos);
        self.refresh_computed_lengths(profile_id);
        Ok(())
    }

    /// Recompute the cached per-record lengths for one profile
    ///
    /// Each record caches the day count to the next newer recorded start;
    /// the newest record has nothing newer and caches nothing. Display-only:
    /// the projection core recomputes from raw dates on every call.
    fn refresh_computed_lengths(&mut self, profile_id: Uuid) {
        let mut idxs: Vec<usize> = (0..self.cycles.len())
            .filter(|&i| self.cycles[i].profile_id == profile_id)
            .collect();
        idxs.sort_by(|&a, &b| self.cycles[b].start_date.cmp(&self.cycles[a].start_date));

        let mut newer: Option<NaiveDate> = None;
        for &i in &idxs {
            let start = self.cycles[i].start_date;
            self.cycles[i].computed_length = newer.map(|n| days_between(start, n) as u32);
            newer = Some(start);
        }
    }
}

/// Path-scoped handle for loading and saving the database
///
/// Constructed by the caller and passed down; nothing in the crate holds a
/// process-wide instance.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    /// Default database location inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Store::new(data_dir.join("cyclelator.json"))
    }

    /// Load the database with shared locking
    ///
    /// Returns an empty database if the file doesn't exist. If the file is
    /// unreadable or corrupted, logs a warning and returns an empty one.
    pub fn load(&self) -> Result<Database> {
        if !self.path.exists() {
            tracing::info!("No database file found, starting empty");
            return Ok(Database::default());
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open database {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                return Ok(Database::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock database {:?}: {}. Starting empty.",
                self.path,
                e
            );
            return Ok(Database::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read database {:?}: {}. Starting empty.",
                self.path,
                e
            );
            return Ok(Database::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Database>(&contents) {
            Ok(db) => {
                tracing::debug!(
                    "Loaded {} profile(s), {} cycle(s) from {:?}",
                    db.profiles.len(),
                    db.cycles.len(),
                    self.path
                );
                Ok(db)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse database {:?}: {}. Starting empty.",
                    self.path,
                    e
                );
                Ok(Database::default())
            }
        }
    }

    /// Save the database with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "database path missing parent")
        })?)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(db)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved database to {:?}", self.path);
        Ok(())
    }

    /// Load the database, modify it, and save it back atomically
    pub fn update<F>(&self, f: F) -> Result<Database>
    where
        F: FnOnce(&mut Database) -> Result<()>,
    {
        let mut db = self.load()?;
        f(&mut db)?;
        self.save(&db)?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::in_dir(temp_dir.path());

        let mut db = Database::default();
        let id = db
            .add_profile("ada", "#4a90e2", &[date("2024-01-01"), date("2024-01-29")])
            .unwrap();
        store.save(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.profiles.len(), 1);
        assert_eq!(loaded.profiles[0].nickname, "ada");
        assert_eq!(loaded.cycles_for(id).len(), 2);
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::new(temp_dir.path().join("nonexistent.json"));

        let db = store.load().unwrap();
        assert!(db.profiles.is_empty());
        assert!(db.cycles.is_empty());
    }

    #[test]
    fn test_corrupted_database_starts_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let db = Store::new(&path).load().unwrap();
        assert!(db.profiles.is_empty());
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::in_dir(temp_dir.path());

        store.save(&Database::default()).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "cyclelator.json")
            .collect();
        assert!(extras.is_empty(), "unexpected extras: {:?}", extras);
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::in_dir(temp_dir.path());

        store
            .update(|db| {
                db.add_profile("ada", "#4a90e2", &[])?;
                Ok(())
            })
            .unwrap();

        let db = store.load().unwrap();
        assert!(db.profile_by_nickname("ada").is_some());
    }

    #[test]
    fn test_duplicate_nickname_rejected() {
        let mut db = Database::default();
        db.add_profile("ada", "#4a90e2", &[]).unwrap();

        let result = db.add_profile("ada", "#e24a4a", &[]);
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_display_order_increments() {
        let mut db = Database::default();
        db.add_profile("first", "#111111", &[]).unwrap();
        db.add_profile("second", "#222222", &[]).unwrap();
        db.add_profile("third", "#333333", &[]).unwrap();

        let ordered = db.profiles_ordered();
        assert_eq!(ordered[0].nickname, "first");
        assert_eq!(ordered[2].nickname, "third");
        assert!(ordered[0].display_order < ordered[2].display_order);
    }

    #[test]
    fn test_remove_profile_cascades_cycles() {
        let mut db = Database::default();
        let keep = db.add_profile("keep", "#111111", &[date("2024-01-01")]).unwrap();
        let gone = db.add_profile("gone", "#222222", &[date("2024-02-01")]).unwrap();

        db.remove_profile(gone).unwrap();

        assert!(db.profile_by_nickname("gone").is_none());
        assert!(db.cycles.iter().all(|c| c.profile_id == keep));
    }

    #[test]
    fn test_add_cycle_requires_profile() {
        let mut db = Database::default();
        let result = db.add_cycle(Uuid::new_v4(), date("2024-01-01"));
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_cycles_sorted_newest_first() {
        let mut db = Database::default();
        let id = db.add_profile("ada", "#4a90e2", &[]).unwrap();
        db.add_cycle(id, date("2024-01-01")).unwrap();
        db.add_cycle(id, date("2024-02-27")).unwrap();
        db.add_cycle(id, date("2024-01-29")).unwrap();

        let cycles = db.cycles_for(id);
        assert_eq!(cycles[0].start_date, date("2024-02-27"));
        assert_eq!(cycles[2].start_date, date("2024-01-01"));
    }

    #[test]
    fn test_computed_lengths_refresh_on_writes() {
        let mut db = Database::default();
        let id = db.add_profile("ada", "#4a90e2", &[]).unwrap();
        db.add_cycle(id, date("2024-01-01")).unwrap();
        db.add_cycle(id, date("2024-01-29")).unwrap();

        let cycles = db.cycles_for(id);
        // Newest record has nothing newer to measure against
        assert_eq!(cycles[0].computed_length, None);
        assert_eq!(cycles[1].computed_length, Some(28));

        db.remove_cycle(id, date("2024-01-29")).unwrap();
        let cycles = db.cycles_for(id);
        assert_eq!(cycles[0].computed_length, None);
    }

    #[test]
    fn test_update_cycle_moves_date_and_refreshes() {
        let mut db = Database::default();
        let id = db
            .add_profile("ada", "#4a90e2", &[date("2024-01-01"), date("2024-01-29")])
            .unwrap();

        db.update_cycle(id, date("2024-01-29"), date("2024-01-31"))
            .unwrap();

        let cycles = db.cycles_for(id);
        assert_eq!(cycles[0].start_date, date("2024-01-31"));
        assert_eq!(cycles[1].computed_length, Some(30));
    }

    #[test]
    fn test_manual_length_zero_clears_override() {
        let mut db = Database::default();
        let id = db.add_profile("ada", "#4a90e2", &[]).unwrap();

        db.set_manual_length(id, Some(30)).unwrap();
        assert_eq!(
            db.profile_by_nickname("ada").unwrap().manual_cycle_length,
            Some(30)
        );

        db.set_manual_length(id, Some(0)).unwrap();
        assert_eq!(
            db.profile_by_nickname("ada").unwrap().manual_cycle_length,
            None
        );
    }

    #[test]
    fn test_rename_profile_keeps_uniqueness() {
        let mut db = Database::default();
        let id = db.add_profile("ada", "#4a90e2", &[]).unwrap();
        db.add_profile("grace", "#e24a4a", &[]).unwrap();

        assert!(db.rename_profile(id, "grace").is_err());
        db.rename_profile(id, "ada2").unwrap();
        assert!(db.profile_by_nickname("ada2").is_some());
    }
}
