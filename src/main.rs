use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use gastos::cli::{
    handle_audit_command, handle_category_command, handle_city_command, handle_expense_command,
    handle_parts_command, handle_rate_command, handle_report_command, handle_vendor_command,
    handle_work_command,
};
use gastos::config::{paths::GastosPaths, settings::Settings};
use gastos::storage::init::DEFAULT_CATEGORIES;
use gastos::storage::Storage;

#[derive(Parser)]
#[command(
    name = "gastos",
    version,
    about = "Personal expense, work-hour and vehicle-parts tracker",
    long_about = "Gastos records expenses (expanded into monthly installments), \
                  their categories, worked hours priced by an hourly rate, and \
                  vehicle parts purchases, and reports spending per category \
                  over a date range."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense management commands
    #[command(subcommand, alias = "gasto")]
    Expense(gastos::cli::ExpenseCommands),

    /// Category management commands
    #[command(subcommand, alias = "segmento")]
    Category(gastos::cli::CategoryCommands),

    /// Spending reports
    #[command(subcommand)]
    Report(gastos::cli::ReportCommands),

    /// Work session commands
    #[command(subcommand)]
    Work(gastos::cli::WorkCommands),

    /// Hourly rate commands
    #[command(subcommand)]
    Rate(gastos::cli::RateCommands),

    /// City commands
    #[command(subcommand)]
    City(gastos::cli::CityCommands),

    /// Vendor commands
    #[command(subcommand)]
    Vendor(gastos::cli::VendorCommands),

    /// Vehicle parts commands
    #[command(subcommand)]
    Parts(gastos::cli::PartsCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize data directory and default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::new().filter_or("GASTOS_LOG", "warn")).init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = GastosPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Work(cmd)) => handle_work_command(&storage, &settings, cmd)?,
        Some(Commands::Rate(cmd)) => handle_rate_command(&storage, cmd)?,
        Some(Commands::City(cmd)) => handle_city_command(&storage, cmd)?,
        Some(Commands::Vendor(cmd)) => handle_vendor_command(&storage, cmd)?,
        Some(Commands::Parts(cmd)) => handle_parts_command(&storage, &settings, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing Gastos at: {}", paths.data_dir().display());
            gastos::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories: {}", DEFAULT_CATEGORIES.join(", "));
            println!();
            println!("Run 'gastos category list' to see all categories.");
        }
        Some(Commands::Config) => {
            println!("Gastos Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Report epoch:      {}", settings.report_epoch);
            println!("  Expenses per page: {}", settings.expenses_per_page);
            println!("  Parts per page:    {}", settings.parts_per_page);
            println!("  Other lists:       {}", settings.default_page_size);
        }
        None => {
            println!("Gastos - expenses, installments and monthly reports");
            println!();
            println!("Run 'gastos --help' for usage information.");
            println!("Run 'gastos init' to create the default categories.");
        }
    }

    Ok(())
}
