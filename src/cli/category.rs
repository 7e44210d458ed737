//! Category CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::GastosResult;
use crate::models::CategoryId;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only categories whose name contains every word
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,
    },

    /// Show category details
    Show {
        /// Category slug, name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category slug, name or ID
        category: String,
        /// New name (also renews the slug)
        #[arg(short, long)]
        name: Option<String>,
        /// New slug
        #[arg(long)]
        slug: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category slug, name or ID
        category: String,
        /// Also delete the expenses in this category
        #[arg(long)]
        force: bool,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> GastosResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { search } => {
            let categories = service.list(search.as_deref())?;
            let mut counts: HashMap<CategoryId, usize> = HashMap::new();
            for expense in storage.expenses.get_all()? {
                *counts.entry(expense.category_id).or_default() += 1;
            }
            println!("{}", format_category_list(&categories, &counts));
        }

        CategoryCommands::Create { name, slug } => {
            let category = service.create(&name, slug.as_deref())?;
            println!("Created category: {}", category.name);
            println!("  Slug: {}", category.slug);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.resolve(&category)?;
            let count = storage
                .expenses
                .filter(|e| e.category_id == category.id)?
                .len();
            print!("{}", format_category_details(&category, count));
        }

        CategoryCommands::Edit {
            category,
            name,
            slug,
        } => {
            let category = service.resolve(&category)?;

            if name.is_none() && slug.is_none() {
                println!("No changes specified. Use --name or --slug.");
                return Ok(());
            }

            let updated = service.update(category.id, name.as_deref(), slug.as_deref())?;
            println!("Updated category: {} ({})", updated.name, updated.slug);
        }

        CategoryCommands::Delete { category, force } => {
            let category = service.resolve(&category)?;
            let deletion = service.delete(category.id, force)?;
            println!("Deleted category: {}", deletion.category.name);
            if deletion.removed_expenses > 0 {
                println!("  Also deleted {} expenses", deletion.removed_expenses);
            }
        }
    }

    Ok(())
}
