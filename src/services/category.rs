//! Category service
//!
//! Business logic for expense categories: creation with derived slugs,
//! lookup by slug, name or id, and deletion guarded by the expenses that
//! still reference a category.

use crate::error::{GastosError, GastosResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Outcome of deleting a category
#[derive(Debug, Clone)]
pub struct CategoryDeletion {
    pub category: Category,
    /// Expenses removed along with the category (only with `force`)
    pub removed_expenses: usize,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    ///
    /// The slug is derived from the name unless one is given.
    pub fn create(&self, name: &str, slug: Option<&str>) -> GastosResult<Category> {
        let name = name.trim();
        let category = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => Category::with_slug(name, slug),
            None => Category::new(name),
        };

        category
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;
        self.ensure_unique(&category)?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;
        self.storage.log_create(&category)?;

        log::info!("created category {} ({})", category.name, category.slug);
        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> GastosResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    pub fn get_by_slug(&self, slug: &str) -> GastosResult<Option<Category>> {
        self.storage.categories.find(|c| c.slug == slug)
    }

    /// Find a category by slug, name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> GastosResult<Option<Category>> {
        let identifier = identifier.trim();

        if let Some(category) = self.get_by_slug(identifier)? {
            return Ok(Some(category));
        }

        let lower = identifier.to_lowercase();
        if let Some(category) = self
            .storage
            .categories
            .find(|c| c.name.to_lowercase() == lower)?
        {
            return Ok(Some(category));
        }

        self.storage.categories.find_unique(|c| c.id.matches(identifier))
    }

    /// Find a category or fail with `NotFound`
    pub fn resolve(&self, identifier: &str) -> GastosResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| GastosError::category_not_found(identifier))
    }

    /// List categories, optionally narrowed by a name search
    ///
    /// The search is split on whitespace and every word must appear in the
    /// name.
    pub fn list(&self, search: Option<&str>) -> GastosResult<Vec<Category>> {
        let words: Vec<String> = search
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        self.storage.categories.filter(|c| {
            let name = c.name.to_lowercase();
            words.iter().all(|w| name.contains(w.as_str()))
        })
    }

    /// Rename a category and/or change its slug
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        slug: Option<&str>,
    ) -> GastosResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| GastosError::category_not_found(id.to_string()))?;
        let before = category.clone();

        if let Some(name) = name {
            category.rename(name.trim());
        }
        if let Some(slug) = slug {
            category.slug = slug.trim().to_string();
        }

        category.updated_at = chrono::Utc::now();
        category
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;
        self.ensure_unique(&category)?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;
        self.storage.log_update(&before, &category)?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Fails while expenses reference it unless `force` is set, in which case
    /// those expenses are deleted too.
    pub fn delete(&self, id: CategoryId, force: bool) -> GastosResult<CategoryDeletion> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| GastosError::category_not_found(id.to_string()))?;

        let in_use = self
            .storage
            .expenses
            .filter(|e| e.category_id == id)?
            .len();
        if in_use > 0 && !force {
            return Err(GastosError::Validation(format!(
                "Cannot delete category '{}' - {} expenses use it. Use --force to delete them.",
                category.name, in_use
            )));
        }

        let removed = self.storage.expenses.remove_where(|e| e.category_id == id)?;
        if !removed.is_empty() {
            self.storage.expenses.save()?;
            self.storage.log_delete_batch(&removed)?;
            log::info!(
                "deleted {} expenses with category {}",
                removed.len(),
                category.slug
            );
        }

        self.storage.categories.remove(id)?;
        self.storage.categories.save()?;
        self.storage.log_delete(&category)?;

        Ok(CategoryDeletion {
            category,
            removed_expenses: removed.len(),
        })
    }

    fn ensure_unique(&self, category: &Category) -> GastosResult<()> {
        let lower = category.name.to_lowercase();
        if self
            .storage
            .categories
            .any(|c| c.id != category.id && c.name.to_lowercase() == lower)?
        {
            return Err(GastosError::Duplicate {
                entity_type: "Category",
                identifier: category.name.clone(),
            });
        }

        if self
            .storage
            .categories
            .any(|c| c.id != category.id && c.slug == category.slug)?
        {
            return Err(GastosError::Duplicate {
                entity_type: "Category",
                identifier: category.slug.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::GastosPaths;
    use crate::models::{DecimalComma, ExpenseInput};
    use crate::services::ExpenseService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Alimentação Fora", None).unwrap();
        assert_eq!(category.name, "Alimentação Fora");
        assert_eq!(category.slug, "alimentacao-fora");
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_with_explicit_slug() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Casa", Some("moradia")).unwrap();
        assert_eq!(category.slug, "moradia");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Lazer", None).unwrap();
        let err = service.create("lazer", Some("outro")).unwrap_err();
        assert!(matches!(err, GastosError::Duplicate { .. }));

        let err = service.create("Diversão", Some("lazer")).unwrap_err();
        assert!(matches!(err, GastosError::Duplicate { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(service.create("   ", None).unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_slug_name_and_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Saúde", None).unwrap();

        assert_eq!(service.find("saude").unwrap().unwrap().id, category.id);
        assert_eq!(service.find("SAÚDE").unwrap().unwrap().id, category.id);
        assert_eq!(
            service.find(&category.id.to_string()).unwrap().unwrap().id,
            category.id
        );
        assert!(service.find("nothing").unwrap().is_none());
        assert!(service.resolve("nothing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_with_search() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Supermercados", None).unwrap();
        service.create("Moradia", None).unwrap();
        service.create("Mercado Livre", None).unwrap();

        let found = service.list(Some("merc")).unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Supermercados", "Mercado Livre"]);
        assert_eq!(service.list(None).unwrap().len(), 3);

        let found = service.list(Some("livre  MERC")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Mercado Livre");
    }

    #[test]
    fn test_update_renames_and_reslugs() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Carro", None).unwrap();

        let updated = service.update(category.id, Some("Veículo"), None).unwrap();
        assert_eq!(updated.slug, "veiculo");
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_update_rejects_taken_slug() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Carro", None).unwrap();
        let other = service.create("Moto", None).unwrap();

        let err = service.update(other.id, None, Some("carro")).unwrap_err();
        assert!(matches!(err, GastosError::Duplicate { .. }));
    }

    #[test]
    fn test_delete_in_use_requires_force() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Educação", None).unwrap();

        let input = ExpenseInput {
            name: "Curso".into(),
            slug: None,
            category_id: category.id,
            total_value: DecimalComma::new("300,00"),
            installment_value: DecimalComma::new("100,00"),
            installment_count: 3,
        };
        ExpenseService::new(&storage)
            .create(input, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
            .unwrap();

        assert!(service.delete(category.id, false).unwrap_err().is_validation());
        assert_eq!(storage.expenses.count().unwrap(), 3);

        let deletion = service.delete(category.id, true).unwrap();
        assert_eq!(deletion.removed_expenses, 3);
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert!(service.get(category.id).unwrap().is_none());
    }
}
