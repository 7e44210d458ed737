//! Generic JSON-backed repository
//!
//! Every entity kind lives in its own JSON file and is held in memory as a
//! vector, so listing returns records in the order they were inserted.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::GastosError;
use crate::models::{
    Category, City, Expense, HourlyRate, PartsItem, PartsPurchase, Vendor, WorkSession,
};

use super::file_io::{read_json, write_json_atomic};

/// A storable entity
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Display;

    /// Entity kind used in error messages and the audit log
    const ENTITY: EntityType;

    fn id(&self) -> Self::Id;

    /// Short human-readable label for audit entries
    fn label(&self) -> String;
}

/// On-disk layout of a repository file
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RecordFile<T> {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    records: Vec<T>,
}

fn default_version() -> u32 {
    1
}

impl<T> Default for RecordFile<T> {
    fn default() -> Self {
        Self {
            version: default_version(),
            records: Vec::new(),
        }
    }
}

/// Repository holding one entity kind, persisted to one JSON file
pub struct JsonRepository<T: Record> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T: Record> JsonRepository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, GastosError> {
        self.records
            .read()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, GastosError> {
        self.records
            .write()
            .map_err(|e| GastosError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, records: &[T]) -> Result<(), GastosError> {
        let file = RecordFile {
            version: default_version(),
            records: records.to_vec(),
        };
        write_json_atomic(&self.path, &file)
    }

    /// Load records from disk, replacing whatever is in memory
    pub fn load(&self) -> Result<(), GastosError> {
        let file: RecordFile<T> = read_json(&self.path)?;
        *self.write()? = file.records;
        log::debug!("loaded {} {} records", self.count()?, T::ENTITY);
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> Result<(), GastosError> {
        let records = self.read()?;
        self.persist(&records)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, GastosError> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    /// All records in insertion order
    pub fn get_all(&self) -> Result<Vec<T>, GastosError> {
        Ok(self.read()?.clone())
    }

    /// Records matching a predicate, in insertion order
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, GastosError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// First record matching a predicate
    pub fn find<F>(&self, predicate: F) -> Result<Option<T>, GastosError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().find(|r| predicate(r)).cloned())
    }

    /// The only record matching a predicate
    ///
    /// Used for id-prefix lookups; more than one match is an ambiguous id.
    pub fn find_unique<F>(&self, predicate: F) -> Result<Option<T>, GastosError>
    where
        F: Fn(&T) -> bool,
    {
        let records = self.read()?;
        let mut matches = records.iter().filter(|r| predicate(r));
        match (matches.next(), matches.next()) {
            (Some(_), Some(_)) => Err(GastosError::InvalidInput(format!(
                "ambiguous {} id: {} records match, type more characters",
                T::ENTITY,
                2 + matches.count()
            ))),
            (first, _) => Ok(first.cloned()),
        }
    }

    pub fn any<F>(&self, predicate: F) -> Result<bool, GastosError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().any(predicate))
    }

    /// Replace the record with the same id, or append a new one
    pub fn upsert(&self, record: T) -> Result<(), GastosError> {
        let mut records = self.write()?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    /// Append several records and persist them as one unit
    ///
    /// Either every record ends up on disk and in memory, or none does.
    pub fn commit_batch(&self, batch: Vec<T>) -> Result<(), GastosError> {
        let mut records = self.write()?;

        if let Some(dup) = batch
            .iter()
            .find(|new| records.iter().any(|r| r.id() == new.id()))
        {
            return Err(GastosError::Duplicate {
                entity_type: "Record",
                identifier: dup.id().to_string(),
            });
        }

        let original_len = records.len();
        records.extend(batch);

        if let Err(e) = self.persist(&records) {
            records.truncate(original_len);
            log::warn!("rolled back {} batch: {}", T::ENTITY, e);
            return Err(e);
        }

        Ok(())
    }

    /// Remove a record by id, returning it if it existed
    pub fn remove(&self, id: T::Id) -> Result<Option<T>, GastosError> {
        let mut records = self.write()?;
        Ok(records
            .iter()
            .position(|r| r.id() == id)
            .map(|index| records.remove(index)))
    }

    /// Remove every record matching a predicate, returning the removed ones
    pub fn remove_where<F>(&self, predicate: F) -> Result<Vec<T>, GastosError>
    where
        F: Fn(&T) -> bool,
    {
        let mut records = self.write()?;
        let (removed, kept): (Vec<T>, Vec<T>) = records.drain(..).partition(|r| predicate(r));
        *records = kept;
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, GastosError> {
        Ok(self.read()?.len())
    }
}

impl Record for Category {
    type Id = crate::models::CategoryId;
    const ENTITY: EntityType = EntityType::Category;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Record for Expense {
    type Id = crate::models::ExpenseId;
    const ENTITY: EntityType = EntityType::Expense;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {} {}", self.due_date, self.name, self.installment_label())
    }
}

impl Record for WorkSession {
    type Id = crate::models::WorkSessionId;
    const ENTITY: EntityType = EntityType::WorkSession;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        format!("{} {}", self.date, self.description)
    }
}

impl Record for HourlyRate {
    type Id = crate::models::HourlyRateId;
    const ENTITY: EntityType = EntityType::HourlyRate;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        self.price.to_string()
    }
}

impl Record for City {
    type Id = crate::models::CityId;
    const ENTITY: EntityType = EntityType::City;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        self.description.clone()
    }
}

impl Record for Vendor {
    type Id = crate::models::VendorId;
    const ENTITY: EntityType = EntityType::Vendor;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        self.description.clone()
    }
}

impl Record for PartsPurchase {
    type Id = crate::models::PartsPurchaseId;
    const ENTITY: EntityType = EntityType::PartsPurchase;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl Record for PartsItem {
    type Id = crate::models::PartsItemId;
    const ENTITY: EntityType = EntityType::PartsItem;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn label(&self) -> String {
        format!("{} x{}", self.description, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CityId, Money};
    use tempfile::TempDir;

    fn repo() -> (TempDir, JsonRepository<City>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonRepository::new(temp_dir.path().join("cities.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let (_temp, repo) = repo();
        for name in ["Zé Doca", "Curitiba", "Maringá"] {
            repo.upsert(City::new(name)).unwrap();
        }

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|c| c.description)
            .collect();
        assert_eq!(names, vec!["Zé Doca", "Curitiba", "Maringá"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (_temp, repo) = repo();
        let mut first = City::new("Curitba");
        repo.upsert(first.clone()).unwrap();
        repo.upsert(City::new("Londrina")).unwrap();

        first.description = "Curitiba".into();
        repo.upsert(first.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].description, "Curitiba");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = repo();
        let city = City::new("Cascavel");
        repo.upsert(city.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = JsonRepository::<City>::new(temp.path().join("cities.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(city.id).unwrap(), Some(city));
    }

    #[test]
    fn test_remove_and_remove_where() {
        let (_temp, repo) = repo();
        let a = City::new("A");
        repo.upsert(a.clone()).unwrap();
        repo.upsert(City::new("B")).unwrap();
        repo.upsert(City::new("B")).unwrap();

        assert_eq!(repo.remove(a.id).unwrap(), Some(a));
        assert_eq!(repo.remove(CityId::new()).unwrap(), None);
        assert_eq!(repo.remove_where(|c| c.description == "B").unwrap().len(), 2);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_find_unique_rejects_ambiguous_matches() {
        let (_temp, repo) = repo();
        let curitiba = City::new("Curitiba");
        repo.upsert(curitiba.clone()).unwrap();
        repo.upsert(City::new("Cascavel")).unwrap();
        repo.upsert(City::new("Castro")).unwrap();

        assert_eq!(
            repo.find_unique(|c| c.description.starts_with("Cu")).unwrap(),
            Some(curitiba)
        );
        assert_eq!(repo.find_unique(|c| c.description.starts_with("X")).unwrap(), None);

        let err = repo
            .find_unique(|c| c.description.starts_with("Ca"))
            .unwrap_err();
        assert!(matches!(err, GastosError::InvalidInput(ref msg) if msg.contains("2 records match")));
    }

    #[test]
    fn test_commit_batch_persists_everything() {
        let (temp, repo) = repo();
        let batch = vec![City::new("X"), City::new("Y")];
        repo.commit_batch(batch).unwrap();

        let reloaded = JsonRepository::<City>::new(temp.path().join("cities.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 2);
    }

    #[test]
    fn test_commit_batch_rolls_back_on_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("rates.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let repo = JsonRepository::<HourlyRate>::new(path);
        let batch = vec![
            HourlyRate::new(Money::from_cents(1000)),
            HourlyRate::new(Money::from_cents(2000)),
        ];

        assert!(repo.commit_batch(batch).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_commit_batch_rejects_existing_ids() {
        let (_temp, repo) = repo();
        let city = City::new("Toledo");
        repo.upsert(city.clone()).unwrap();

        assert!(matches!(
            repo.commit_batch(vec![city]),
            Err(GastosError::Duplicate { .. })
        ));
        assert_eq!(repo.count().unwrap(), 1);
    }
}
