//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod category;
pub mod expense;
pub mod parts;
pub mod reference;
pub mod report;
pub mod work;

pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use parts::{handle_parts_command, PartsCommands};
pub use reference::{
    handle_city_command, handle_rate_command, handle_vendor_command, CityCommands, RateCommands,
    VendorCommands,
};
pub use report::{handle_report_command, ReportCommands};
pub use work::{handle_work_command, WorkCommands};

use chrono::{NaiveDate, NaiveTime};

use crate::error::{GastosError, GastosResult};
use crate::models::{DecimalComma, Money};

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument, defaulting to today
pub(crate) fn parse_date_or_today(text: Option<&str>) -> GastosResult<NaiveDate> {
    match text {
        Some(text) => parse_date(text),
        None => Ok(today()),
    }
}

pub(crate) fn parse_date(text: &str) -> GastosResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
        GastosError::InvalidInput(format!("Invalid date: {}. Use YYYY-MM-DD", text))
    })
}

/// Parse an `HH:MM` argument
pub(crate) fn parse_time(text: &str) -> GastosResult<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|_| {
        GastosError::InvalidInput(format!("Invalid time: {}. Use HH:MM", text))
    })
}

/// Parse an amount written with either a comma or a period ("45,50", "45.50")
pub(crate) fn parse_money(text: &str) -> GastosResult<Money> {
    Money::parse_decimal_comma(text)
        .map_err(|e| GastosError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse an expense value, keeping its decimal-comma text
pub(crate) fn parse_decimal_comma(text: &str) -> GastosResult<DecimalComma> {
    DecimalComma::parse(text).map_err(|e| GastosError::Validation(format!("Invalid value: {}", e)))
}
