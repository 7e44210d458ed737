//! Expense (gasto) model
//!
//! An expense is one payment due on one date. Purchases paid in installments
//! are stored as one expense per installment, all sharing name, values and
//! category; see [`crate::services::installments`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::decimal::DecimalComma;
use super::ids::{CategoryId, ExpenseId};
use super::slug::slugify;

/// Maximum length of an expense name
pub const MAX_EXPENSE_NAME: usize = 100;

/// A single expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub name: String,

    pub slug: String,

    /// The category this expense is filed under
    pub category_id: CategoryId,

    /// Value of the whole purchase, as entered
    pub total_value: DecimalComma,

    /// Value of each installment, as entered
    pub installment_value: DecimalComma,

    /// Number of installments of the purchase this record belongs to
    pub installment_count: u32,

    /// Position of this record within its purchase, starting at 1
    pub installment_index: u32,

    pub due_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the user submits when registering an expense
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub name: String,
    /// Derived from the name when None
    pub slug: Option<String>,
    pub category_id: CategoryId,
    pub total_value: DecimalComma,
    pub installment_value: DecimalComma,
    pub installment_count: u32,
}

impl ExpenseInput {
    /// The slug to store, falling back to one derived from the name
    pub fn resolved_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&self.name),
        }
    }
}

impl Expense {
    /// Build a record for one installment of `input`
    pub fn from_input(input: &ExpenseInput, installment_index: u32, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            name: input.name.trim().to_string(),
            slug: input.resolved_slug(),
            category_id: input.category_id,
            total_value: input.total_value.clone(),
            installment_value: input.installment_value.clone(),
            installment_count: input.installment_count,
            installment_index,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// "2/10" style installment label
    pub fn installment_label(&self) -> String {
        format!("{}/{}", self.installment_index, self.installment_count)
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_EXPENSE_NAME {
            return Err(ExpenseValidationError::NameTooLong(len));
        }

        if self.installment_count == 0 {
            return Err(ExpenseValidationError::ZeroInstallments);
        }

        if self.installment_index == 0 || self.installment_index > self.installment_count {
            return Err(ExpenseValidationError::IndexOutOfRange {
                index: self.installment_index,
                count: self.installment_count,
            });
        }

        for value in [&self.total_value, &self.installment_value] {
            if value.to_money().is_err() {
                return Err(ExpenseValidationError::BadValue(value.to_string()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.installment_label())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    NameTooLong(usize),
    ZeroInstallments,
    IndexOutOfRange { index: u32, count: u32 },
    BadValue(String),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Expense name too long ({} chars, max {})",
                len, MAX_EXPENSE_NAME
            ),
            Self::ZeroInstallments => write!(f, "Installment count must be at least 1"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "Installment {} is outside 1..={}", index, count)
            }
            Self::BadValue(value) => write!(f, "'{}' is not a valid amount", value),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
