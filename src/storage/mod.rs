//! Storage layer for Gastos
//!
//! One JSON file per entity kind under the data directory, atomic writes, and
//! the audit log that services append to after every change.

pub mod file_io;
pub mod init;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{JsonRepository, Record};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::GastosPaths;
use crate::error::GastosError;
use crate::models::{
    Category, City, Expense, HourlyRate, PartsItem, PartsPurchase, Vendor, WorkSession,
};

pub type CategoryRepository = JsonRepository<Category>;
pub type ExpenseRepository = JsonRepository<Expense>;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: GastosPaths,
    audit: AuditLogger,
    pub categories: CategoryRepository,
    pub expenses: ExpenseRepository,
    pub work_sessions: JsonRepository<WorkSession>,
    pub hourly_rates: JsonRepository<HourlyRate>,
    pub cities: JsonRepository<City>,
    pub vendors: JsonRepository<Vendor>,
    pub parts_purchases: JsonRepository<PartsPurchase>,
    pub parts_items: JsonRepository<PartsItem>,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: GastosPaths) -> Result<Self, GastosError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            categories: JsonRepository::new(paths.categories_file()),
            expenses: JsonRepository::new(paths.expenses_file()),
            work_sessions: JsonRepository::new(paths.work_sessions_file()),
            hourly_rates: JsonRepository::new(paths.hourly_rates_file()),
            cities: JsonRepository::new(paths.cities_file()),
            vendors: JsonRepository::new(paths.vendors_file()),
            parts_purchases: JsonRepository::new(paths.parts_purchases_file()),
            parts_items: JsonRepository::new(paths.parts_items_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &GastosPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), GastosError> {
        self.categories.load()?;
        self.expenses.load()?;
        self.work_sessions.load()?;
        self.hourly_rates.load()?;
        self.cities.load()?;
        self.vendors.load()?;
        self.parts_purchases.load()?;
        self.parts_items.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), GastosError> {
        self.categories.save()?;
        self.expenses.save()?;
        self.work_sessions.save()?;
        self.hourly_rates.save()?;
        self.cities.save()?;
        self.vendors.save()?;
        self.parts_purchases.save()?;
        self.parts_items.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Audit a newly created record
    pub fn log_create<T: Record>(&self, record: &T) -> Result<(), GastosError> {
        self.audit.log(&AuditEntry::create(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ))
    }

    /// Audit a batch of newly created records with one write
    pub fn log_create_batch<T: Record>(&self, records: &[T]) -> Result<(), GastosError> {
        let entries: Vec<_> = records
            .iter()
            .map(|r| AuditEntry::create(T::ENTITY, r.id().to_string(), Some(r.label()), r))
            .collect();
        self.audit.log_batch(&entries)
    }

    /// Audit an update; nothing is written when no field changed
    pub fn log_update<T: Record>(&self, before: &T, after: &T) -> Result<(), GastosError> {
        let entry = AuditEntry::update(
            T::ENTITY,
            after.id().to_string(),
            Some(after.label()),
            before,
            after,
        );
        if entry.has_changes() {
            self.audit.log(&entry)?;
        }
        Ok(())
    }

    pub fn log_delete<T: Record>(&self, record: &T) -> Result<(), GastosError> {
        self.audit.log(&AuditEntry::delete(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ))
    }

    /// Audit several deletions with one write
    pub fn log_delete_batch<T: Record>(&self, records: &[T]) -> Result<(), GastosError> {
        let entries: Vec<_> = records
            .iter()
            .map(|r| AuditEntry::delete(T::ENTITY, r.id().to_string(), Some(r.label()), r))
            .collect();
        self.audit.log_batch(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use tempfile::TempDir;

    fn storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_and_reload() {
        let (temp_dir, storage) = storage();
        storage.categories.upsert(Category::new("Lazer")).unwrap();
        storage.cities.upsert(City::new("Curitiba")).unwrap();
        storage.save_all().unwrap();

        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.categories.count().unwrap(), 1);
        assert_eq!(reopened.cities.count().unwrap(), 1);
    }

    #[test]
    fn test_audit_helpers() {
        let (_temp, storage) = storage();
        let before = Category::new("Mercado");
        let mut after = before.clone();

        storage.log_create(&before).unwrap();
        // Unchanged update is not recorded
        storage.log_update(&before, &after).unwrap();
        after.rename("Supermercado");
        storage.log_update(&before, &after).unwrap();
        storage.log_delete(&after).unwrap();

        let ops: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
    }
}
