//! Hourly rate, city and vendor CLI commands

use clap::Subcommand;

use crate::display::reference::{format_city_list, format_rate_list, format_vendor_list};
use crate::error::{GastosError, GastosResult};
use crate::models::{City, HourlyRate, Vendor};
use crate::services::{CityService, HourlyRateService, VendorService};
use crate::storage::Storage;

use super::parse_money;

/// Hourly rate subcommands
#[derive(Subcommand)]
pub enum RateCommands {
    /// Register an hourly rate; the latest one prices new work sessions
    Add {
        /// Price per hour (e.g. "45,00")
        price: String,
    },
    /// List hourly rates
    List,
    /// Change a rate's price
    Edit {
        /// Rate ID
        id: String,
        price: String,
    },
    /// Delete a rate
    Delete {
        /// Rate ID
        id: String,
    },
}

/// City subcommands
#[derive(Subcommand)]
pub enum CityCommands {
    /// Add a city
    Add { description: String },
    /// List cities
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Rename a city
    Edit {
        /// City name or ID
        city: String,
        description: String,
    },
    /// Delete a city not used by any parts purchase
    Delete {
        /// City name or ID
        city: String,
    },
}

/// Vendor subcommands
#[derive(Subcommand)]
pub enum VendorCommands {
    /// Add a vendor
    Add { description: String },
    /// List vendors
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Rename a vendor
    Edit {
        /// Vendor name or ID
        vendor: String,
        description: String,
    },
    /// Delete a vendor not used by any parts purchase
    Delete {
        /// Vendor name or ID
        vendor: String,
    },
}

pub fn handle_rate_command(storage: &Storage, cmd: RateCommands) -> GastosResult<()> {
    let service = HourlyRateService::new(storage);
    let find = |id: &str| -> GastosResult<HourlyRate> {
        service.find(id)?.ok_or_else(|| GastosError::NotFound {
            entity_type: "Hourly rate",
            identifier: id.to_string(),
        })
    };

    match cmd {
        RateCommands::Add { price } => {
            let rate = service.create(parse_money(&price)?)?;
            println!("Added hourly rate {} ({})", rate.price, rate.id);
        }
        RateCommands::List => println!("{}", format_rate_list(&service.list()?)),
        RateCommands::Edit { id, price } => {
            let rate = find(&id)?;
            let updated = service.update(rate.id, parse_money(&price)?)?;
            println!("Updated hourly rate: {} -> {}", rate.price, updated.price);
        }
        RateCommands::Delete { id } => {
            let rate = find(&id)?;
            service.delete(rate.id)?;
            println!("Deleted hourly rate {}", rate.price);
        }
    }

    Ok(())
}

pub fn handle_city_command(storage: &Storage, cmd: CityCommands) -> GastosResult<()> {
    let service = CityService::new(storage);
    let find = |city: &str| -> GastosResult<City> {
        service.find(city)?.ok_or_else(|| GastosError::NotFound {
            entity_type: "City",
            identifier: city.to_string(),
        })
    };

    match cmd {
        CityCommands::Add { description } => {
            let city = service.create(&description)?;
            println!("Added city: {} ({})", city.description, city.id);
        }
        CityCommands::List { search } => {
            println!("{}", format_city_list(&service.list(search.as_deref())?));
        }
        CityCommands::Edit { city, description } => {
            let city = find(&city)?;
            let updated = service.update(city.id, &description)?;
            println!("Renamed city: {} -> {}", city.description, updated.description);
        }
        CityCommands::Delete { city } => {
            let city = find(&city)?;
            service.delete(city.id)?;
            println!("Deleted city: {}", city.description);
        }
    }

    Ok(())
}

pub fn handle_vendor_command(storage: &Storage, cmd: VendorCommands) -> GastosResult<()> {
    let service = VendorService::new(storage);
    let find = |vendor: &str| -> GastosResult<Vendor> {
        service.find(vendor)?.ok_or_else(|| GastosError::NotFound {
            entity_type: "Vendor",
            identifier: vendor.to_string(),
        })
    };

    match cmd {
        VendorCommands::Add { description } => {
            let vendor = service.create(&description)?;
            println!("Added vendor: {} ({})", vendor.description, vendor.id);
        }
        VendorCommands::List { search } => {
            println!("{}", format_vendor_list(&service.list(search.as_deref())?));
        }
        VendorCommands::Edit {
            vendor,
            description,
        } => {
            let vendor = find(&vendor)?;
            let updated = service.update(vendor.id, &description)?;
            println!("Renamed vendor: {} -> {}", vendor.description, updated.description);
        }
        VendorCommands::Delete { vendor } => {
            let vendor = find(&vendor)?;
            service.delete(vendor.id)?;
            println!("Deleted vendor: {}", vendor.description);
        }
    }

    Ok(())
}
