//! Gastos - personal expense, work-hour and vehicle-parts tracker
//!
//! This library provides the core functionality for the `gastos` command
//! line application. Expenses bought in installments are expanded into one
//! record per installment, due every 30 days, and a monthly report filters a
//! category's expenses by value and date range and totals them. Work sessions
//! priced by an hourly rate and vehicle parts purchases are tracked alongside.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, categories, work sessions, parts)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer, including the installment expander
//! - `reports`: The monthly spending report
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use gastos::config::{paths::GastosPaths, settings::Settings};
//! use gastos::storage::Storage;
//!
//! let paths = GastosPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::GastosError;
