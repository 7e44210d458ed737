//! CLI commands for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{GastosError, GastosResult};
use crate::reports::{MonthlyReport, ReportRequest};
use crate::storage::Storage;

use super::today;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Expenses of one category within a date range, with their total
    Monthly {
        /// Category slug, name or ID
        #[arg(short, long, default_value = "")]
        category: String,

        /// Start date (YYYY-MM-DD, defaults to the configured report epoch)
        #[arg(short, long, default_value = "")]
        from: String,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(short, long, default_value = "")]
        to: String,

        /// Only expenses with exactly this total value ("50" matches "50,00")
        #[arg(short, long, default_value = "")]
        value: String,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> GastosResult<()> {
    match cmd {
        ReportCommands::Monthly {
            category,
            from,
            to,
            value,
            output,
        } => {
            let request = ReportRequest {
                segmento_id: category,
                dt_inicial: from,
                dt_final: to,
                valor: value,
            };
            let report = MonthlyReport::generate(storage, &request, settings.report_epoch, today())?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    GastosError::Export(format!("Failed to create file {}: {}", path.display(), e))
                })?;
                report.export_csv(BufWriter::new(file))?;
                println!("Monthly report exported to: {}", path.display());
            } else {
                print!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }
    }

    Ok(())
}
