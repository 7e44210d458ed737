//! Expense display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{CategoryId, Expense};
use crate::services::Page;

use super::{page_footer, render_table, truncate};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Installment")]
    installment: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Format one page of expenses
///
/// `category_names` maps category ids to display names; unknown ids show as
/// the id itself.
pub fn format_expense_list(
    page: &Page<Expense>,
    category_names: &HashMap<CategoryId, String>,
) -> String {
    if page.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows = page
        .items
        .iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            due: e.due_date.to_string(),
            name: truncate(&e.name, 30),
            value: e.installment_value.to_string(),
            installment: e.installment_label(),
            category: category_names
                .get(&e.category_id)
                .cloned()
                .unwrap_or_else(|| e.category_id.to_string()),
        })
        .collect();

    format!("{}\n{}", render_table(rows), page_footer(page))
}

/// Format a single expense's details
pub fn format_expense_details(expense: &Expense, category_name: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.id));
    output.push_str(&format!("Name:        {}\n", expense.name));
    output.push_str(&format!("Slug:        {}\n", expense.slug));
    output.push_str(&format!(
        "Category:    {}\n",
        category_name.unwrap_or("(unknown)")
    ));
    output.push_str(&format!("Total:       {}\n", expense.total_value));
    output.push_str(&format!("Installment: {} of {}\n", expense.installment_value, expense.installment_label()));
    output.push_str(&format!("Due:         {}\n", expense.due_date.format("%Y-%m-%d")));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecimalComma, ExpenseInput};
    use crate::services::{expand, paginate};
    use chrono::NaiveDate;

    fn phone() -> Vec<Expense> {
        let input = ExpenseInput {
            name: "Phone".into(),
            slug: None,
            category_id: CategoryId::new(),
            total_value: DecimalComma::new("1200,00"),
            installment_value: DecimalComma::new("100,00"),
            installment_count: 12,
        };
        expand(&input, 12, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_format_expense_list() {
        let records = phone();
        let names = HashMap::from([(records[0].category_id, "Eletrônicos".to_string())]);
        let page = paginate(records, 1, 5).unwrap();

        let output = format_expense_list(&page, &names);
        assert!(output.contains("Phone"));
        assert!(output.contains("1/12"));
        assert!(output.contains("Eletrônicos"));
        assert!(output.contains("Page 1 of 3"));
        assert!(!output.contains("6/12"));
    }

    #[test]
    fn test_format_empty_list() {
        let page = paginate(Vec::new(), 1, 5).unwrap();
        assert!(format_expense_list(&page, &HashMap::new()).contains("No expenses found"));
    }

    #[test]
    fn test_format_expense_details() {
        let records = phone();
        let output = format_expense_details(&records[1], Some("Eletrônicos"));
        assert!(output.contains("Installment: 100,00 of 2/12"));
        assert!(output.contains("Due:         2024-01-31"));
    }
}
