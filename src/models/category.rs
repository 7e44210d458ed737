//! Category (segmento) model
//!
//! Categories group expenses for listing and for the monthly report. They are
//! looked up by slug, name or id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::slug::slugify;

/// Maximum length of a category name
pub const MAX_CATEGORY_NAME: usize = 50;

/// A named grouping of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Lookup key derived from the name unless given explicitly
    pub slug: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category with a slug derived from its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self::with_slug(name, slug)
    }

    /// Create a new category with an explicit slug
    pub fn with_slug(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            slug: slug.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename, keeping the slug in step
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.slug = slugify(&self.name);
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_CATEGORY_NAME {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if self.slug.is_empty() || self.slug != slugify(&self.slug) {
            return Err(CategoryValidationError::InvalidSlug(self.slug.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidSlug(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME
            ),
            Self::InvalidSlug(slug) => write!(f, "Invalid category slug: '{}'", slug),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_derives_slug() {
        let category = Category::new("Supermercados");
        assert_eq!(category.name, "Supermercados");
        assert_eq!(category.slug, "supermercados");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_rename_updates_slug() {
        let mut category = Category::new("Mercado");
        category.rename("Farmácia");
        assert_eq!(category.slug, "farmacia");
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid");
        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        let bad_slug = Category::with_slug("Contas", "Contas Fixas");
        assert!(matches!(
            bad_slug.validate(),
            Err(CategoryValidationError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let category = Category::new("Lazer");
        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category, deserialized);
    }
}
