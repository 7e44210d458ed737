//! Expense CLI commands
//!
//! `add` expands one purchase into its installments; the other commands act
//! on single stored installments.

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{GastosError, GastosResult};
use crate::models::{Expense, ExpenseInput};
use crate::services::{CategoryService, ExpenseQuery, ExpenseService, ExpenseUpdate};
use crate::storage::Storage;

use super::{parse_date, parse_date_or_today, parse_decimal_comma};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense, one record per installment
    Add {
        /// Expense name
        name: String,
        /// Category slug, name or ID
        #[arg(short, long)]
        category: String,
        /// Total value (e.g. "1200,00" or "1200")
        #[arg(short, long)]
        total: String,
        /// Value of each installment (defaults to the total)
        #[arg(short = 'v', long = "installment-value")]
        installment_value: Option<String>,
        /// Number of installments
        #[arg(short = 'n', long, default_value = "1")]
        installments: u32,
        /// Due date of the first installment (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,
    },

    /// List expenses
    List {
        /// Only expenses whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Category slug, name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// List the expenses of one category by its slug
    #[command(name = "by-category")]
    ByCategory {
        /// Category slug
        slug: String,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },

    /// Edit a single installment
    Edit {
        /// Expense ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        /// Category slug, name or ID
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        total: Option<String>,
        #[arg(short = 'v', long = "installment-value")]
        installment_value: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a single installment
    Delete {
        /// Expense ID
        id: String,
    },

    /// Print expense names containing a term as JSON
    Suggest {
        /// Search term (empty lists every name)
        #[arg(default_value = "")]
        term: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> GastosResult<()> {
    let service = ExpenseService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            name,
            category,
            total,
            installment_value,
            installments,
            date,
            slug,
        } => {
            let category = categories.resolve(&category)?;
            let total_value = parse_decimal_comma(&total)?;
            let installment_value = match installment_value {
                Some(value) => parse_decimal_comma(&value)?,
                None => total_value.clone(),
            };
            let start_date = parse_date_or_today(date.as_deref())?;

            let input = ExpenseInput {
                name,
                slug,
                category_id: category.id,
                total_value,
                installment_value,
                installment_count: installments,
            };
            let records = service.create(input, start_date)?;

            if let Some(first) = records.first() {
                println!("Added expense: {} ({})", first.name, category.name);
            }
            for record in &records {
                println!(
                    "  {}  {}  {}  {}",
                    record.id,
                    record.installment_label(),
                    record.due_date,
                    record.installment_value
                );
            }
        }

        ExpenseCommands::List {
            search,
            category,
            page,
        } => {
            let mut query = ExpenseQuery::new().page(page, settings.expenses_per_page);
            if let Some(term) = search {
                query = query.search(term);
            }
            if let Some(category) = category {
                query = query.category(categories.resolve(&category)?.id);
            }

            let page = service.list(&query)?;
            println!("{}", format_expense_list(&page, &category_names(storage)?));
        }

        ExpenseCommands::ByCategory { slug, page } => {
            let page = service.list_by_category_slug(&slug, page, settings.expenses_per_page)?;
            println!("{}", format_expense_list(&page, &category_names(storage)?));
        }

        ExpenseCommands::Show { id } => {
            let expense = find(&service, &id)?;
            let category = categories.get(expense.category_id)?;
            print!(
                "{}",
                format_expense_details(&expense, category.as_ref().map(|c| c.name.as_str()))
            );
        }

        ExpenseCommands::Edit {
            id,
            name,
            slug,
            category,
            total,
            installment_value,
            date,
        } => {
            let expense = find(&service, &id)?;

            let changes = ExpenseUpdate {
                name,
                slug,
                category_id: category
                    .map(|c| categories.resolve(&c).map(|c| c.id))
                    .transpose()?,
                total_value: total.map(|v| parse_decimal_comma(&v)).transpose()?,
                installment_value: installment_value
                    .map(|v| parse_decimal_comma(&v))
                    .transpose()?,
                due_date: date.map(|d| parse_date(&d)).transpose()?,
            };

            let updated = service.update(expense.id, changes)?;
            println!("Updated expense: {} {}", updated.name, updated.installment_label());
        }

        ExpenseCommands::Delete { id } => {
            let expense = find(&service, &id)?;
            let deleted = service.delete(expense.id)?;
            println!("Deleted expense: {} {}", deleted.name, deleted.installment_label());
        }

        ExpenseCommands::Suggest { term } => {
            let suggestions = service.suggest_names(&term)?;
            println!("{}", serde_json::to_string(&suggestions)?);
        }
    }

    Ok(())
}

fn find(service: &ExpenseService<'_>, id: &str) -> GastosResult<Expense> {
    service
        .find(id)?
        .ok_or_else(|| GastosError::expense_not_found(id))
}

fn category_names(storage: &Storage) -> GastosResult<HashMap<crate::models::CategoryId, String>> {
    Ok(storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}
