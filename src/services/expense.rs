//! Expense service
//!
//! Creates expenses through the installment expander, and provides the
//! search, pagination, editing and autocomplete operations used by the CLI.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::{GastosError, GastosResult};
use crate::models::{CategoryId, DecimalComma, Expense, ExpenseId, ExpenseInput};
use crate::storage::Storage;

use super::installments;
use super::pagination::{paginate, Page};

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Options for listing expenses
#[derive(Debug, Clone)]
pub struct ExpenseQuery {
    /// Case-insensitive substring of the expense name
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            search: None,
            category_id: None,
            page: 1,
            per_page: 5,
        }
    }
}

impl ExpenseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        if let Some(category_id) = self.category_id {
            if expense.category_id != category_id {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => expense
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

/// Changes applied to a single stored expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<CategoryId>,
    pub total_value: Option<DecimalComma>,
    pub installment_value: Option<DecimalComma>,
    pub due_date: Option<NaiveDate>,
}

/// One autocomplete suggestion, serialized as `{"name": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameSuggestion {
    pub name: String,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an expense, expanded into one record per installment
    ///
    /// All installments are stored together or not at all.
    pub fn create(&self, input: ExpenseInput, start_date: NaiveDate) -> GastosResult<Vec<Expense>> {
        if self.storage.categories.get(input.category_id)?.is_none() {
            return Err(GastosError::category_not_found(input.category_id.to_string()));
        }

        let records = installments::expand(&input, input.installment_count, start_date)?;
        for record in &records {
            record
                .validate()
                .map_err(|e| GastosError::Validation(e.to_string()))?;
        }

        self.storage.expenses.commit_batch(records.clone())?;
        self.storage.log_create_batch(&records)?;

        log::info!(
            "created {} installments of '{}' starting {}",
            records.len(),
            input.name.trim(),
            start_date
        );
        Ok(records)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> GastosResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full or short ID string
    pub fn find(&self, identifier: &str) -> GastosResult<Option<Expense>> {
        let identifier = identifier.trim();
        self.storage.expenses.find_unique(|e| e.id.matches(identifier))
    }

    /// List expenses matching a query, one page at a time
    pub fn list(&self, query: &ExpenseQuery) -> GastosResult<Page<Expense>> {
        let matched = self.storage.expenses.filter(|e| query.matches(e))?;
        paginate(matched, query.page, query.per_page)
    }

    /// Expenses of the category with the given slug
    pub fn list_by_category_slug(
        &self,
        slug: &str,
        page: usize,
        per_page: usize,
    ) -> GastosResult<Page<Expense>> {
        let category = self
            .storage
            .categories
            .find(|c| c.slug == slug)?
            .ok_or_else(|| GastosError::category_not_found(slug))?;

        self.list(&ExpenseQuery::new().category(category.id).page(page, per_page))
    }

    /// Edit one stored expense; other installments of the same purchase are
    /// left untouched
    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> GastosResult<Expense> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| GastosError::expense_not_found(id.to_string()))?;
        let before = expense.clone();

        if let Some(name) = changes.name {
            expense.name = name.trim().to_string();
        }
        if let Some(slug) = changes.slug {
            expense.slug = slug.trim().to_string();
        }
        if let Some(category_id) = changes.category_id {
            if self.storage.categories.get(category_id)?.is_none() {
                return Err(GastosError::category_not_found(category_id.to_string()));
            }
            expense.category_id = category_id;
        }
        if let Some(value) = changes.total_value {
            expense.total_value = value;
        }
        if let Some(value) = changes.installment_value {
            expense.installment_value = value;
        }
        if let Some(date) = changes.due_date {
            expense.due_date = date;
        }

        expense.updated_at = Utc::now();
        expense
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;
        self.storage.log_update(&before, &expense)?;

        Ok(expense)
    }

    /// Delete one stored expense
    pub fn delete(&self, id: ExpenseId) -> GastosResult<Expense> {
        let expense = self
            .storage
            .expenses
            .remove(id)?
            .ok_or_else(|| GastosError::expense_not_found(id.to_string()))?;

        self.storage.expenses.save()?;
        self.storage.log_delete(&expense)?;

        Ok(expense)
    }

    /// Distinct expense names containing `term`, sorted
    ///
    /// An empty term returns every name.
    pub fn suggest_names(&self, term: &str) -> GastosResult<Vec<NameSuggestion>> {
        let term = term.trim().to_lowercase();
        let mut names: Vec<String> = self
            .storage
            .expenses
            .filter(|e| e.name.to_lowercase().contains(&term))?
            .into_iter()
            .map(|e| e.name)
            .collect();

        names.sort();
        names.dedup();

        Ok(names.into_iter().map(|name| NameSuggestion { name }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::GastosPaths;
    use crate::models::Category;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_category(storage: &Storage, name: &str) -> Category {
        let category = Category::new(name);
        storage.categories.upsert(category.clone()).unwrap();
        category
    }

    fn input(name: &str, category_id: CategoryId, count: u32) -> ExpenseInput {
        ExpenseInput {
            name: name.into(),
            slug: None,
            category_id,
            total_value: DecimalComma::new("1200,00"),
            installment_value: DecimalComma::new("100,00"),
            installment_count: count,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_stores_every_installment() {
        let (temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Eletrônicos");
        let service = ExpenseService::new(&storage);

        let records = service
            .create(input("Phone", category.id, 3), date(2024, 1, 1))
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].due_date, date(2024, 3, 1));

        // One audit entry per installment
        assert_eq!(storage.audit().read_all().unwrap().len(), 3);

        // Persisted without an explicit save
        let paths = GastosPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.expenses.count().unwrap(), 3);
    }

    #[test]
    fn test_create_with_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let err = service
            .create(input("Phone", CategoryId::new(), 2), date(2024, 1, 1))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_create_with_zero_installments() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Lazer");
        let service = ExpenseService::new(&storage);

        let err = service
            .create(input("Cinema", category.id, 0), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, GastosError::InvalidInput(_)));
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_create_rejects_unparsable_value() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Lazer");
        let service = ExpenseService::new(&storage);

        let mut bad = input("Cinema", category.id, 2);
        bad.installment_value = DecimalComma::new("dez reais");
        assert!(service.create(bad, date(2024, 1, 1)).unwrap_err().is_validation());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_list_searches_and_paginates() {
        let (_temp_dir, storage) = create_test_storage();
        let market = add_category(&storage, "Supermercados");
        let fuel = add_category(&storage, "Combustível");
        let service = ExpenseService::new(&storage);

        service
            .create(input("Mercado Central", market.id, 7), date(2024, 1, 5))
            .unwrap();
        service
            .create(input("Posto Shell", fuel.id, 2), date(2024, 1, 5))
            .unwrap();

        let page = service
            .list(&ExpenseQuery::new().search("MERCADO").page(2, 5))
            .unwrap();
        assert_eq!(page.total_items, 7);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].installment_index, 6);

        let page = service
            .list(&ExpenseQuery::new().category(fuel.id))
            .unwrap();
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn test_list_by_category_slug() {
        let (_temp_dir, storage) = create_test_storage();
        let fuel = add_category(&storage, "Combustível");
        let other = add_category(&storage, "Outros");
        let service = ExpenseService::new(&storage);

        service.create(input("Gasolina", fuel.id, 1), date(2024, 2, 1)).unwrap();
        service.create(input("Presente", other.id, 1), date(2024, 2, 1)).unwrap();

        let page = service.list_by_category_slug("combustivel", 1, 5).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Gasolina");

        assert!(service
            .list_by_category_slug("nope", 1, 5)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_single_installment() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Moradia");
        let service = ExpenseService::new(&storage);

        let records = service
            .create(input("Aluguel", category.id, 2), date(2024, 4, 10))
            .unwrap();

        let updated = service
            .update(
                records[1].id,
                ExpenseUpdate {
                    installment_value: Some(DecimalComma::new("120,50")),
                    due_date: Some(date(2024, 5, 15)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.installment_value.as_str(), "120,50");
        assert_eq!(updated.due_date, date(2024, 5, 15));

        let untouched = service.get(records[0].id).unwrap().unwrap();
        assert_eq!(untouched.installment_value.as_str(), "100,00");
    }

    #[test]
    fn test_update_to_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Moradia");
        let service = ExpenseService::new(&storage);
        let records = service
            .create(input("Luz", category.id, 1), date(2024, 4, 10))
            .unwrap();

        let err = service
            .update(
                records[0].id,
                ExpenseUpdate {
                    category_id: Some(CategoryId::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Saúde");
        let service = ExpenseService::new(&storage);
        let records = service
            .create(input("Farmácia", category.id, 2), date(2024, 4, 10))
            .unwrap();

        let short = records[0].id.to_string();
        assert_eq!(service.find(&short).unwrap().unwrap().id, records[0].id);

        service.delete(records[0].id).unwrap();
        assert!(service.get(records[0].id).unwrap().is_none());
        assert_eq!(storage.expenses.count().unwrap(), 1);
        assert!(service.delete(records[0].id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_rejects_ambiguous_prefix() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Saúde");
        let service = ExpenseService::new(&storage);
        let mut records = service
            .create(input("Farmácia", category.id, 2), date(2024, 4, 10))
            .unwrap();

        for (record, uuid) in records.iter_mut().zip([
            "0a1b2c3d-0000-4000-8000-000000000001",
            "0a1b2c3d-0000-4000-8000-000000000002",
        ]) {
            storage.expenses.remove(record.id).unwrap();
            record.id = ExpenseId::from(uuid::Uuid::parse_str(uuid).unwrap());
            storage.expenses.upsert(record.clone()).unwrap();
        }

        let err = service.find("0a1b2c3d").unwrap_err();
        assert!(matches!(err, GastosError::InvalidInput(_)));
        assert_eq!(
            service
                .find("0a1b2c3d-0000-4000-8000-000000000002")
                .unwrap()
                .unwrap()
                .id,
            records[1].id
        );
    }

    #[test]
    fn test_suggest_names() {
        let (_temp_dir, storage) = create_test_storage();
        let category = add_category(&storage, "Supermercados");
        let service = ExpenseService::new(&storage);

        for name in ["Mercado Central", "Padaria", "Mercado Bom Preço"] {
            service.create(input(name, category.id, 2), date(2024, 1, 1)).unwrap();
        }

        let names: Vec<_> = service
            .suggest_names("merc")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Mercado Bom Preço", "Mercado Central"]);

        assert_eq!(service.suggest_names("").unwrap().len(), 3);

        let json = serde_json::to_string(&service.suggest_names("pada").unwrap()).unwrap();
        assert_eq!(json, r#"[{"name":"Padaria"}]"#);
    }
}
