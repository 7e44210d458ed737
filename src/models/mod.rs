//! Core data models for Gastos
//!
//! Expenses and their categories, plus the work-hour and vehicle-parts
//! records kept alongside them.

pub mod category;
pub mod decimal;
pub mod expense;
pub mod ids;
pub mod money;
pub mod parts;
pub mod reference;
pub mod slug;
pub mod work_session;

pub use category::Category;
pub use decimal::DecimalComma;
pub use expense::{Expense, ExpenseInput};
pub use ids::{
    CategoryId, CityId, ExpenseId, HourlyRateId, PartsItemId, PartsPurchaseId, VendorId,
    WorkSessionId,
};
pub use money::Money;
pub use parts::{PartsItem, PartsPurchase};
pub use reference::{City, HourlyRate, Vendor};
pub use slug::slugify;
pub use work_session::WorkSession;
