//! Vehicle parts CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::parts::{
    format_item_list, format_purchase_details, format_purchase_list, PlaceNames,
};
use crate::error::{GastosError, GastosResult};
use crate::models::{PartsItem, PartsPurchase};
use crate::services::{
    CityService, PartsItemUpdate, PartsPurchaseInput, PartsPurchaseUpdate, PartsService,
    VendorService,
};
use crate::storage::Storage;

use super::{parse_date, parse_date_or_today, parse_money};

/// Parts subcommands
#[derive(Subcommand)]
pub enum PartsCommands {
    /// Register a parts purchase
    Add {
        /// Vehicle the parts are for
        vehicle: String,
        /// Vendor name or ID
        #[arg(long)]
        vendor: String,
        /// City name or ID
        #[arg(long)]
        city: String,
        /// Amount paid
        #[arg(short, long)]
        total: String,
        /// Purchase date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Odometer reading at the change
        #[arg(long, default_value = "0")]
        km: u32,
        /// Odometer reading for the next change
        #[arg(long, default_value = "0")]
        next_km: u32,
    },

    /// List parts purchases
    List {
        /// Only purchases for vehicles matching this text
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show a purchase with its items
    Show {
        /// Purchase ID
        purchase: String,
    },

    /// Edit a parts purchase
    Edit {
        /// Purchase ID
        purchase: String,
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(short, long)]
        total: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        km: Option<u32>,
        #[arg(long)]
        next_km: Option<u32>,
    },

    /// Delete a purchase and its items
    Delete {
        /// Purchase ID
        purchase: String,
    },

    /// Add an item line to a purchase
    #[command(name = "add-item")]
    AddItem {
        /// Purchase ID
        purchase: String,
        /// Item description
        description: String,
        /// Unit price
        #[arg(short, long)]
        price: String,
        /// Quantity
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },

    /// List item lines
    Items {
        /// Only items of this purchase
        #[arg(long)]
        purchase: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Edit an item line
    #[command(name = "edit-item")]
    EditItem {
        /// Item ID
        item: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(short, long)]
        quantity: Option<u32>,
    },

    /// Delete an item line
    #[command(name = "delete-item")]
    DeleteItem {
        /// Item ID
        item: String,
    },
}

pub fn handle_parts_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PartsCommands,
) -> GastosResult<()> {
    let service = PartsService::new(storage);
    let per_page = settings.parts_per_page;

    match cmd {
        PartsCommands::Add {
            vehicle,
            vendor,
            city,
            total,
            date,
            km,
            next_km,
        } => {
            let purchase = service.create_purchase(PartsPurchaseInput {
                date: parse_date_or_today(date.as_deref())?,
                vehicle,
                changed_at_km: km,
                next_change_km: next_km,
                vendor_id: resolve_vendor(storage, &vendor)?,
                city_id: resolve_city(storage, &city)?,
                total: parse_money(&total)?,
            })?;
            println!("Registered parts purchase: {} ({})", purchase, purchase.id);
        }

        PartsCommands::List { vehicle, page } => {
            let page = service.list_purchases(vehicle.as_deref(), page, per_page)?;
            println!("{}", format_purchase_list(&page, &place_names(storage)?));
        }

        PartsCommands::Show { purchase } => {
            let purchase = find_purchase(&service, &purchase)?;
            let items = storage.parts_items.filter(|i| i.purchase_id == purchase.id)?;
            print!(
                "{}",
                format_purchase_details(&purchase, &items, &place_names(storage)?)
            );
        }

        PartsCommands::Edit {
            purchase,
            vehicle,
            vendor,
            city,
            total,
            date,
            km,
            next_km,
        } => {
            let purchase = find_purchase(&service, &purchase)?;
            let changes = PartsPurchaseUpdate {
                date: date.map(|d| parse_date(&d)).transpose()?,
                vehicle,
                changed_at_km: km,
                next_change_km: next_km,
                vendor_id: vendor.map(|v| resolve_vendor(storage, &v)).transpose()?,
                city_id: city.map(|c| resolve_city(storage, &c)).transpose()?,
                total: total.map(|t| parse_money(&t)).transpose()?,
            };
            let updated = service.update_purchase(purchase.id, changes)?;
            println!("Updated parts purchase: {}", updated);
        }

        PartsCommands::Delete { purchase } => {
            let purchase = find_purchase(&service, &purchase)?;
            let deletion = service.delete_purchase(purchase.id)?;
            println!(
                "Deleted parts purchase: {} ({} items)",
                deletion.purchase, deletion.removed_items
            );
        }

        PartsCommands::AddItem {
            purchase,
            description,
            price,
            quantity,
        } => {
            let purchase = find_purchase(&service, &purchase)?;
            let item = service.add_item(purchase.id, &description, parse_money(&price)?, quantity)?;
            println!(
                "Added item: {} x{} = {} ({})",
                item.description, item.quantity, item.subtotal, item.id
            );
        }

        PartsCommands::Items { purchase, page } => {
            let purchase_id = match purchase {
                Some(p) => Some(find_purchase(&service, &p)?.id),
                None => None,
            };
            let page = service.list_items(purchase_id, page, per_page)?;
            println!("{}", format_item_list(&page));
        }

        PartsCommands::EditItem {
            item,
            description,
            price,
            quantity,
        } => {
            let item = find_item(&service, &item)?;
            let updated = service.update_item(
                item.id,
                PartsItemUpdate {
                    description,
                    price: price.map(|p| parse_money(&p)).transpose()?,
                    quantity,
                },
            )?;
            println!(
                "Updated item: {} x{} = {}",
                updated.description, updated.quantity, updated.subtotal
            );
        }

        PartsCommands::DeleteItem { item } => {
            let item = find_item(&service, &item)?;
            service.delete_item(item.id)?;
            println!("Deleted item: {}", item.description);
        }
    }

    Ok(())
}

fn find_purchase(service: &PartsService<'_>, id: &str) -> GastosResult<PartsPurchase> {
    service.find_purchase(id)?.ok_or_else(|| GastosError::NotFound {
        entity_type: "Parts purchase",
        identifier: id.to_string(),
    })
}

fn find_item(service: &PartsService<'_>, id: &str) -> GastosResult<PartsItem> {
    service.find_item(id)?.ok_or_else(|| GastosError::NotFound {
        entity_type: "Parts item",
        identifier: id.to_string(),
    })
}

fn resolve_vendor(storage: &Storage, vendor: &str) -> GastosResult<crate::models::VendorId> {
    VendorService::new(storage)
        .find(vendor)?
        .map(|v| v.id)
        .ok_or_else(|| GastosError::NotFound {
            entity_type: "Vendor",
            identifier: vendor.to_string(),
        })
}

fn resolve_city(storage: &Storage, city: &str) -> GastosResult<crate::models::CityId> {
    CityService::new(storage)
        .find(city)?
        .map(|c| c.id)
        .ok_or_else(|| GastosError::NotFound {
            entity_type: "City",
            identifier: city.to_string(),
        })
}

fn place_names(storage: &Storage) -> GastosResult<PlaceNames> {
    Ok(PlaceNames {
        vendors: storage
            .vendors
            .get_all()?
            .into_iter()
            .map(|v| (v.id, v.description))
            .collect(),
        cities: storage
            .cities
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.description))
            .collect(),
    })
}
