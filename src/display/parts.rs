//! Parts purchase display formatting

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{CityId, Money, PartsItem, PartsPurchase, VendorId};
use crate::services::Page;

use super::{page_footer, render_table, truncate};

/// Vendor and city names used to label purchases
#[derive(Debug, Default)]
pub struct PlaceNames {
    pub vendors: HashMap<VendorId, String>,
    pub cities: HashMap<CityId, String>,
}

impl PlaceNames {
    fn vendor(&self, id: VendorId) -> String {
        self.vendors.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn city(&self, id: CityId) -> String {
        self.cities.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

#[derive(Tabled)]
struct PurchaseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Changed at km")]
    changed_at: u32,
    #[tabled(rename = "Next km")]
    next: u32,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

pub fn format_purchase_list(page: &Page<PartsPurchase>, names: &PlaceNames) -> String {
    if page.is_empty() {
        return "No parts purchases found.".to_string();
    }

    let rows = page
        .items
        .iter()
        .map(|p| PurchaseRow {
            id: p.id.to_string(),
            date: p.date.to_string(),
            vehicle: truncate(&p.vehicle, 20),
            changed_at: p.changed_at_km,
            next: p.next_change_km,
            vendor: truncate(&names.vendor(p.vendor_id), 20),
            city: names.city(p.city_id),
            total: p.total.to_string(),
        })
        .collect();

    format!("{}\n{}", render_table(rows), page_footer(page))
}

pub fn format_item_list(page: &Page<PartsItem>) -> String {
    if page.is_empty() {
        return "No parts items found.".to_string();
    }
    format!(
        "{}\n{}",
        render_table(item_rows(&page.items)),
        page_footer(page)
    )
}

fn item_rows(items: &[PartsItem]) -> Vec<ItemRow> {
    items
        .iter()
        .map(|i| ItemRow {
            id: i.id.to_string(),
            description: truncate(&i.description, 30),
            price: i.price.to_string(),
            quantity: i.quantity,
            subtotal: i.subtotal.to_string(),
        })
        .collect()
}

/// Format a purchase with its item lines
pub fn format_purchase_details(
    purchase: &PartsPurchase,
    items: &[PartsItem],
    names: &PlaceNames,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Parts purchase: {}\n", purchase.id));
    output.push_str(&format!("  Date:      {}\n", purchase.date));
    output.push_str(&format!("  Vehicle:   {}\n", purchase.vehicle));
    output.push_str(&format!(
        "  Odometer:  {} km, next change at {} km ({} km interval)\n",
        purchase.changed_at_km,
        purchase.next_change_km,
        purchase.change_interval_km()
    ));
    output.push_str(&format!("  Vendor:    {}\n", names.vendor(purchase.vendor_id)));
    output.push_str(&format!("  City:      {}\n", names.city(purchase.city_id)));
    output.push_str(&format!("  Total:     {}\n", purchase.total));

    if items.is_empty() {
        output.push_str("\n(no items)\n");
        return output;
    }

    let items_total: Money = items.iter().map(|i| i.subtotal).sum();
    output.push('\n');
    output.push_str(&render_table(item_rows(items)));
    output.push_str(&format!("\nItems total: {}\n", items_total));
    if items_total != purchase.total {
        output.push_str(&format!(
            "Note: items total differs from purchase total by {}\n",
            (purchase.total - items_total).abs()
        ));
    }

    output
}
