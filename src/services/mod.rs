//! Service layer for Gastos
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, cross-entity rules and the audit
//! trail.

pub mod category;
pub mod expense;
pub mod installments;
pub mod pagination;
pub mod parts;
pub mod reference;
pub mod work_session;

pub use category::{CategoryDeletion, CategoryService};
pub use expense::{ExpenseQuery, ExpenseService, ExpenseUpdate, NameSuggestion};
pub use installments::expand;
pub use pagination::{paginate, Page};
pub use parts::{PartsItemUpdate, PartsPurchaseInput, PartsPurchaseUpdate, PartsService};
pub use reference::{CityService, HourlyRateService, VendorService};
pub use work_session::{WorkSessionInput, WorkSessionService, WorkSessionUpdate, WorkTotals};
