//! Work session CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::work_session::format_work_session_list;
use crate::error::{GastosError, GastosResult};
use crate::models::WorkSession;
use crate::services::{WorkSessionInput, WorkSessionService, WorkSessionUpdate, WorkTotals};
use crate::storage::Storage;

use super::{parse_date, parse_date_or_today, parse_money, parse_time};

/// Work session subcommands
#[derive(Subcommand)]
pub enum WorkCommands {
    /// Log a work session
    Add {
        /// What was done
        description: String,
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,
        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Hourly rate (defaults to the latest registered rate)
        #[arg(short, long)]
        rate: Option<String>,
    },

    /// List work sessions
    List {
        /// Only sessions whose description contains this text
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Total hours and amount within a date range
    Summary {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        from: String,
        /// End date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Edit a work session
    Edit {
        /// Session ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        rate: Option<String>,
    },

    /// Delete a work session
    Delete {
        /// Session ID
        id: String,
    },
}

pub fn handle_work_command(
    storage: &Storage,
    settings: &Settings,
    cmd: WorkCommands,
) -> GastosResult<()> {
    let service = WorkSessionService::new(storage);

    match cmd {
        WorkCommands::Add {
            description,
            start,
            end,
            date,
            rate,
        } => {
            let session = service.create(WorkSessionInput {
                date: parse_date_or_today(date.as_deref())?,
                description,
                time_start: parse_time(&start)?,
                time_end: parse_time(&end)?,
                rate_hour: rate.map(|r| parse_money(&r)).transpose()?,
            })?;
            println!(
                "Logged {} on {}: {} x {}/h = {}",
                session.description,
                session.date,
                session.duration_label(),
                session.rate_hour,
                session.rate_total.format_with_symbol(&settings.currency_symbol)
            );
        }

        WorkCommands::List { search, page } => {
            let page = service.list(search.as_deref(), page, settings.default_page_size)?;
            println!("{}", format_work_session_list(&page));
        }

        WorkCommands::Summary { from, to } => {
            let from = parse_date(&from)?;
            let to = parse_date_or_today(to.as_deref())?;
            let sessions = service.in_range(from, to)?;
            let totals = WorkTotals::of(&sessions);
            println!("Work from {} to {}", from, to);
            println!("  Sessions: {}", sessions.len());
            println!("  Time:     {}", totals.duration_label());
            println!(
                "  Amount:   {}",
                totals.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        WorkCommands::Edit {
            id,
            description,
            start,
            end,
            date,
            rate,
        } => {
            let session = find(&service, &id)?;
            let changes = WorkSessionUpdate {
                date: date.map(|d| parse_date(&d)).transpose()?,
                description,
                time_start: start.map(|t| parse_time(&t)).transpose()?,
                time_end: end.map(|t| parse_time(&t)).transpose()?,
                rate_hour: rate.map(|r| parse_money(&r)).transpose()?,
            };
            let updated = service.update(session.id, changes)?;
            println!(
                "Updated work session: {} ({} = {})",
                updated.description,
                updated.duration_label(),
                updated.rate_total
            );
        }

        WorkCommands::Delete { id } => {
            let session = find(&service, &id)?;
            let deleted = service.delete(session.id)?;
            println!("Deleted work session: {} {}", deleted.date, deleted.description);
        }
    }

    Ok(())
}

fn find(service: &WorkSessionService<'_>, id: &str) -> GastosResult<WorkSession> {
    service.find(id)?.ok_or_else(|| GastosError::NotFound {
        entity_type: "Work session",
        identifier: id.to_string(),
    })
}
