//! Monthly spending report
//!
//! Filters the expenses of one category by an optional literal value and an
//! inclusive due-date range, converts their decimal-comma values to money and
//! sums them. Rows keep the order in which expenses were stored.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::{GastosError, GastosResult};
use crate::models::decimal::normalize_value_filter;
use crate::models::{Category, Expense, ExpenseId, Money};
use crate::storage::Storage;

/// Field names and display titles of [`ReportRow`], in column order
pub const REPORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("name", "Name"),
    ("due_date", "Due Date"),
    ("value", "Value"),
    ("installment", "Installment"),
    ("category", "Category"),
];

/// Raw report form input; every field may be empty
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    /// Category slug, name or id
    pub segmento_id: String,
    pub dt_inicial: String,
    pub dt_final: String,
    pub valor: String,
}

/// Validated report filter
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    /// Category slug, name or id, resolved against the known categories
    pub category: String,
    /// Value text to match, already normalized to decimal-comma form
    pub value: Option<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl ReportFilter {
    /// Build a filter from form input
    ///
    /// An empty start date falls back to `epoch`, an empty end date to
    /// `today`. Non-empty dates must be `YYYY-MM-DD`.
    pub fn from_request(
        request: &ReportRequest,
        epoch: NaiveDate,
        today: NaiveDate,
    ) -> GastosResult<Self> {
        let value = request.valor.trim();

        Ok(Self {
            category: request.segmento_id.trim().to_string(),
            value: (!value.is_empty()).then(|| normalize_value_filter(value)),
            date_from: parse_date_or(&request.dt_inicial, epoch)?,
            date_to: parse_date_or(&request.dt_final, today)?,
        })
    }
}

fn parse_date_or(text: &str, default: NaiveDate) -> GastosResult<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(default);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        GastosError::InvalidInput(format!("'{}' is not a date (expected YYYY-MM-DD)", text))
    })
}

/// One expense in the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: ExpenseId,
    pub name: String,
    pub due_date: NaiveDate,
    pub value: Money,
    pub installment: String,
    pub category: String,
}

impl ReportRow {
    /// Cell texts in [`REPORT_COLUMNS`] order
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.due_date.to_string(),
            self.value.to_decimal_comma(),
            self.installment.clone(),
            self.category.clone(),
        ]
    }
}

/// Monthly spending report for one category
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub rows: Vec<ReportRow>,
    /// Sum of the row values
    pub total: Money,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub category: Category,
    pub value_filter: Option<String>,
}

/// Filter and normalize expenses into a report
///
/// # Errors
///
/// `InvalidFilter` when the filter's category is unknown. `MalformedValue`
/// for the first category/value match whose stored value is not a number,
/// even when its due date falls outside the range.
pub fn aggregate(
    records: &[Expense],
    categories: &[Category],
    filter: &ReportFilter,
) -> GastosResult<MonthlyReport> {
    let category = resolve_category(categories, &filter.category)?;

    let mut matched = Vec::new();
    for expense in records
        .iter()
        .filter(|e| e.category_id == category.id)
        .filter(|e| {
            filter
                .value
                .as_deref()
                .map_or(true, |value| e.total_value.as_str() == value)
        })
    {
        let value = expense.total_value.to_money().map_err(|_| {
            GastosError::MalformedValue(format!(
                "'{}' on expense '{}' ({})",
                expense.total_value, expense.name, expense.id
            ))
        })?;
        matched.push((expense, value));
    }

    let rows: Vec<ReportRow> = matched
        .into_iter()
        .filter(|(e, _)| e.due_date >= filter.date_from && e.due_date <= filter.date_to)
        .map(|(e, value)| ReportRow {
            id: e.id,
            name: e.name.clone(),
            due_date: e.due_date,
            value,
            installment: e.installment_label(),
            category: category.name.clone(),
        })
        .collect();

    let total = Money::checked_sum(rows.iter().map(|r| r.value)).ok_or_else(|| {
        GastosError::MalformedValue(format!(
            "total of {} expenses in '{}' is too large",
            rows.len(),
            category.name
        ))
    })?;
    log::debug!(
        "report for {} from {} to {}: {} rows",
        category.slug,
        filter.date_from,
        filter.date_to,
        rows.len()
    );

    Ok(MonthlyReport {
        rows,
        total,
        date_from: filter.date_from,
        date_to: filter.date_to,
        category: category.clone(),
        value_filter: filter.value.clone(),
    })
}

fn resolve_category<'c>(categories: &'c [Category], identifier: &str) -> GastosResult<&'c Category> {
    let lower = identifier.to_lowercase();
    if let Some(category) = categories
        .iter()
        .find(|c| c.slug == identifier)
        .or_else(|| categories.iter().find(|c| c.name.to_lowercase() == lower))
    {
        return Ok(category);
    }

    let mut by_id = categories.iter().filter(|c| c.id.matches(identifier));
    match (by_id.next(), by_id.next()) {
        (Some(category), None) => Ok(category),
        (Some(_), Some(_)) => Err(GastosError::InvalidFilter(format!(
            "category id '{}' is ambiguous",
            identifier
        ))),
        (None, _) => Err(GastosError::InvalidFilter(format!(
            "unknown category '{}'",
            identifier
        ))),
    }
}

impl MonthlyReport {
    /// Generate a report from stored expenses
    pub fn generate(
        storage: &Storage,
        request: &ReportRequest,
        epoch: NaiveDate,
        today: NaiveDate,
    ) -> GastosResult<Self> {
        let filter = ReportFilter::from_request(request, epoch, today)?;
        let categories = storage.categories.get_all()?;
        let expenses = storage.expenses.get_all()?;
        aggregate(&expenses, &categories, &filter)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Monthly Report: {} ({} to {})\n",
            self.category.name, self.date_from, self.date_to
        ));
        if let Some(value) = &self.value_filter {
            output.push_str(&format!("Value: {}\n", value));
        }
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No expenses match this filter.\n");
            return output;
        }

        let titles: Vec<&str> = REPORT_COLUMNS.iter().map(|(_, title)| *title).collect();
        output.push_str(&format!(
            "{:<12} {:<28} {:<10} {:>12} {:>11}\n",
            titles[0], titles[1], titles[2], titles[3], titles[4]
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:<28} {:<10} {:>12} {:>11}\n",
                row.id.to_string(),
                truncate(&row.name, 28),
                row.due_date,
                row.value.to_decimal_comma(),
                row.installment
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<52} {:>12}\n",
            format!("TOTAL ({} expenses)", self.rows.len()),
            self.total.format_with_symbol(currency_symbol)
        ));

        output
    }

    /// Export the report to CSV, with a trailing total row
    pub fn export_csv<W: Write>(&self, writer: W) -> GastosResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(REPORT_COLUMNS.iter().map(|(field, _)| *field))?;
        for row in &self.rows {
            csv.write_record(row.cells())?;
        }

        let mut total = vec![String::new(); REPORT_COLUMNS.len()];
        total[1] = "TOTAL".to_string();
        total[3] = self.total.to_decimal_comma();
        csv.write_record(&total)?;

        csv.flush()?;
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{}...", cut)
    }
}
