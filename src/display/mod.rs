//! Display formatting for terminal output
//!
//! List views are rendered as tables; detail views as aligned key/value
//! blocks.

pub mod category;
pub mod expense;
pub mod parts;
pub mod reference;
pub mod work_session;

pub use category::{format_category_details, format_category_list};
pub use expense::{format_expense_details, format_expense_list};
pub use parts::{format_item_list, format_purchase_details, format_purchase_list, PlaceNames};
pub use reference::{format_city_list, format_rate_list, format_vendor_list};
pub use work_session::format_work_session_list;

use tabled::{settings::Style, Table, Tabled};

use crate::services::Page;

/// Render rows as a table
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// "Page 2 of 5 (23 items)" footer
pub(crate) fn page_footer<T>(page: &Page<T>) -> String {
    let mut footer = format!(
        "Page {} of {} ({} items)",
        page.number,
        page.total_pages(),
        page.total_items
    );
    if page.has_next() {
        footer.push_str(&format!(" - next: --page {}", page.number + 1));
    }
    footer
}

/// Truncate to at most `max` characters
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
