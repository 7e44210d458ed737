//! First-run setup: directories and a starter set of categories

use crate::config::paths::GastosPaths;
use crate::error::GastosError;
use crate::models::Category;

use super::repository::JsonRepository;

/// Categories created on `gastos init`
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Supermercados",
    "Moradia",
    "Combustível",
    "Transporte",
    "Saúde",
    "Educação",
    "Lazer",
    "Vestuário",
];

/// Initialize storage for a fresh installation
///
/// Existing category files are left untouched.
pub fn initialize_storage(paths: &GastosPaths) -> Result<(), GastosError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        let categories: Vec<_> = DEFAULT_CATEGORIES.iter().map(|name| Category::new(*name)).collect();
        JsonRepository::new(paths.categories_file()).commit_batch(categories)?;
        log::info!("created {} default categories", DEFAULT_CATEGORIES.len());
    }

    Ok(())
}

pub fn needs_initialization(paths: &GastosPaths) -> bool {
    !paths.categories_file().exists()
}
