//! Audit trail for Gastos
//!
//! Every create, update and delete performed through the services is appended
//! to `audit.log` as one JSON object per line, with the entity state before
//! and after the change.
//!
//! ```rust,ignore
//! use gastos::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Expense, id, Some(name), &expense))?;
//! ```

mod entry;
mod logger;

pub use entry::{changed_fields, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
