//! Work session display formatting

use tabled::Tabled;

use crate::models::WorkSession;
use crate::services::{Page, WorkTotals};

use super::{page_footer, render_table, truncate};

#[derive(Tabled)]
struct WorkSessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Rate/h")]
    rate: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format one page of work sessions, with totals for the page
pub fn format_work_session_list(page: &Page<WorkSession>) -> String {
    if page.is_empty() {
        return "No work sessions found.".to_string();
    }

    let rows = page
        .items
        .iter()
        .map(|s| WorkSessionRow {
            id: s.id.to_string(),
            date: s.date.to_string(),
            description: truncate(&s.description, 30),
            start: s.time_start.format("%H:%M").to_string(),
            end: s.time_end.format("%H:%M").to_string(),
            time: s.duration_label(),
            rate: s.rate_hour.to_string(),
            total: s.rate_total.to_string(),
        })
        .collect();

    let totals = WorkTotals::of(&page.items);
    format!(
        "{}\nTotal: {} = {}\n{}",
        render_table(rows),
        totals.duration_label(),
        totals.amount,
        page_footer(page)
    )
}
