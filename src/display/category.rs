//! Category display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{Category, CategoryId};

use super::render_table;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Expenses")]
    expenses: usize,
}

/// Format categories as a table with the number of expenses in each
pub fn format_category_list(
    categories: &[Category],
    expense_counts: &HashMap<CategoryId, usize>,
) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'gastos init' to create default categories."
            .to_string();
    }

    let rows = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: c.name.clone(),
            slug: c.slug.clone(),
            expenses: expense_counts.get(&c.id).copied().unwrap_or(0),
        })
        .collect();

    render_table(rows)
}

/// Format a single category's details
pub fn format_category_details(category: &Category, expense_count: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id));
    output.push_str(&format!("  Slug:     {}\n", category.slug));
    output.push_str(&format!("  Expenses: {}\n", expense_count));
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_list() {
        let output = format_category_list(&[], &HashMap::new());
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_format_category_list() {
        let moradia = Category::new("Moradia");
        let lazer = Category::new("Lazer");
        let counts = HashMap::from([(moradia.id, 4)]);

        let output = format_category_list(&[moradia, lazer], &counts);
        assert!(output.contains("Moradia"));
        assert!(output.contains("lazer"));
        assert!(output.contains('4'));
    }

    #[test]
    fn test_format_category_details() {
        let category = Category::new("Combustível");
        let output = format_category_details(&category, 2);
        assert!(output.contains("Category: Combustível"));
        assert!(output.contains("combustivel"));
    }
}
