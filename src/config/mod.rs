//! Configuration module for Gastos
//!
//! - XDG-compliant path resolution
//! - User settings persistence (currency, page sizes, report defaults)

pub mod paths;
pub mod settings;

pub use paths::GastosPaths;
pub use settings::Settings;
