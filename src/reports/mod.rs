//! Reports module for Gastos
//!
//! The monthly spending report filters one category's expenses by value and
//! due-date range and totals them.

pub mod monthly;

pub use monthly::{aggregate, MonthlyReport, ReportFilter, ReportRequest, ReportRow, REPORT_COLUMNS};
