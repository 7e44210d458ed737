//! Vehicle parts service
//!
//! Parts purchases record where and when parts were bought for a vehicle and
//! at which odometer reading they were changed. Each purchase owns its item
//! lines; deleting a purchase deletes its items.

use chrono::{NaiveDate, Utc};

use crate::error::{GastosError, GastosResult};
use crate::models::{
    CityId, Money, PartsItem, PartsItemId, PartsPurchase, PartsPurchaseId, VendorId,
};
use crate::storage::Storage;

use super::pagination::{paginate, Page};

/// Service for parts purchases and their items
pub struct PartsService<'a> {
    storage: &'a Storage,
}

/// Input for registering a parts purchase
#[derive(Debug, Clone)]
pub struct PartsPurchaseInput {
    pub date: NaiveDate,
    pub vehicle: String,
    pub changed_at_km: u32,
    pub next_change_km: u32,
    pub vendor_id: VendorId,
    pub city_id: CityId,
    pub total: Money,
}

#[derive(Debug, Clone, Default)]
pub struct PartsPurchaseUpdate {
    pub date: Option<NaiveDate>,
    pub vehicle: Option<String>,
    pub changed_at_km: Option<u32>,
    pub next_change_km: Option<u32>,
    pub vendor_id: Option<VendorId>,
    pub city_id: Option<CityId>,
    pub total: Option<Money>,
}

#[derive(Debug, Clone, Default)]
pub struct PartsItemUpdate {
    pub description: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<u32>,
}

/// Outcome of deleting a purchase
#[derive(Debug, Clone)]
pub struct PurchaseDeletion {
    pub purchase: PartsPurchase,
    pub removed_items: usize,
}

impl<'a> PartsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Purchases ===

    pub fn create_purchase(&self, input: PartsPurchaseInput) -> GastosResult<PartsPurchase> {
        self.ensure_references(input.vendor_id, input.city_id)?;

        let mut purchase = PartsPurchase::new(
            input.date,
            input.vehicle.trim(),
            input.vendor_id,
            input.city_id,
            input.total,
        );
        purchase.changed_at_km = input.changed_at_km;
        purchase.next_change_km = input.next_change_km;
        purchase
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.parts_purchases.upsert(purchase.clone())?;
        self.storage.parts_purchases.save()?;
        self.storage.log_create(&purchase)?;

        log::info!("registered parts purchase {} for {}", purchase.id, purchase.vehicle);
        Ok(purchase)
    }

    pub fn get_purchase(&self, id: PartsPurchaseId) -> GastosResult<Option<PartsPurchase>> {
        self.storage.parts_purchases.get(id)
    }

    pub fn find_purchase(&self, identifier: &str) -> GastosResult<Option<PartsPurchase>> {
        self.storage
            .parts_purchases
            .find_unique(|p| p.id.matches(identifier))
    }

    /// List purchases, optionally only those for a vehicle (case-insensitive)
    pub fn list_purchases(
        &self,
        vehicle: Option<&str>,
        page: usize,
        per_page: usize,
    ) -> GastosResult<Page<PartsPurchase>> {
        let vehicle = vehicle.unwrap_or_default().trim().to_lowercase();
        let purchases = self
            .storage
            .parts_purchases
            .filter(|p| p.vehicle.to_lowercase().contains(&vehicle))?;
        paginate(purchases, page, per_page)
    }

    pub fn update_purchase(
        &self,
        id: PartsPurchaseId,
        changes: PartsPurchaseUpdate,
    ) -> GastosResult<PartsPurchase> {
        let mut purchase = self
            .storage
            .parts_purchases
            .get(id)?
            .ok_or_else(|| purchase_not_found(id))?;
        let before = purchase.clone();

        if let Some(date) = changes.date {
            purchase.date = date;
        }
        if let Some(vehicle) = changes.vehicle {
            purchase.vehicle = vehicle.trim().to_string();
        }
        if let Some(km) = changes.changed_at_km {
            purchase.changed_at_km = km;
        }
        if let Some(km) = changes.next_change_km {
            purchase.next_change_km = km;
        }
        if let Some(vendor_id) = changes.vendor_id {
            purchase.vendor_id = vendor_id;
        }
        if let Some(city_id) = changes.city_id {
            purchase.city_id = city_id;
        }
        if let Some(total) = changes.total {
            purchase.total = total;
        }

        self.ensure_references(purchase.vendor_id, purchase.city_id)?;
        purchase.updated_at = Utc::now();
        purchase
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.parts_purchases.upsert(purchase.clone())?;
        self.storage.parts_purchases.save()?;
        self.storage.log_update(&before, &purchase)?;

        Ok(purchase)
    }

    /// Delete a purchase together with its items
    pub fn delete_purchase(&self, id: PartsPurchaseId) -> GastosResult<PurchaseDeletion> {
        let purchase = self
            .storage
            .parts_purchases
            .remove(id)?
            .ok_or_else(|| purchase_not_found(id))?;

        let items = self.storage.parts_items.remove_where(|i| i.purchase_id == id)?;
        if !items.is_empty() {
            self.storage.parts_items.save()?;
            self.storage.log_delete_batch(&items)?;
        }

        self.storage.parts_purchases.save()?;
        self.storage.log_delete(&purchase)?;

        Ok(PurchaseDeletion {
            purchase,
            removed_items: items.len(),
        })
    }

    /// Sum of the item subtotals of a purchase
    pub fn items_total(&self, id: PartsPurchaseId) -> GastosResult<Money> {
        let items = self.storage.parts_items.filter(|i| i.purchase_id == id)?;
        Money::checked_sum(items.iter().map(|i| i.subtotal)).ok_or_else(total_overflow)
    }

    /// Fail when adding `subtotal` to the other items of the purchase overflows
    fn ensure_total_fits(
        &self,
        purchase_id: PartsPurchaseId,
        replacing: Option<PartsItemId>,
        subtotal: Money,
    ) -> GastosResult<()> {
        let others = self
            .storage
            .parts_items
            .filter(|i| i.purchase_id == purchase_id && Some(i.id) != replacing)?;
        Money::checked_sum(others.iter().map(|i| i.subtotal).chain([subtotal]))
            .map(|_| ())
            .ok_or_else(total_overflow)
    }

    fn ensure_references(&self, vendor_id: VendorId, city_id: CityId) -> GastosResult<()> {
        if self.storage.vendors.get(vendor_id)?.is_none() {
            return Err(GastosError::NotFound {
                entity_type: "Vendor",
                identifier: vendor_id.to_string(),
            });
        }
        if self.storage.cities.get(city_id)?.is_none() {
            return Err(GastosError::NotFound {
                entity_type: "City",
                identifier: city_id.to_string(),
            });
        }
        Ok(())
    }

    // === Items ===

    pub fn add_item(
        &self,
        purchase_id: PartsPurchaseId,
        description: &str,
        price: Money,
        quantity: u32,
    ) -> GastosResult<PartsItem> {
        if self.storage.parts_purchases.get(purchase_id)?.is_none() {
            return Err(purchase_not_found(purchase_id));
        }

        let item = PartsItem::new(purchase_id, description.trim(), price, quantity);
        item.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;
        self.ensure_total_fits(purchase_id, None, item.subtotal)?;

        self.storage.parts_items.upsert(item.clone())?;
        self.storage.parts_items.save()?;
        self.storage.log_create(&item)?;

        Ok(item)
    }

    pub fn find_item(&self, identifier: &str) -> GastosResult<Option<PartsItem>> {
        self.storage.parts_items.find_unique(|i| i.id.matches(identifier))
    }

    /// List items, optionally only those of one purchase
    pub fn list_items(
        &self,
        purchase_id: Option<PartsPurchaseId>,
        page: usize,
        per_page: usize,
    ) -> GastosResult<Page<PartsItem>> {
        let items = self
            .storage
            .parts_items
            .filter(|i| purchase_id.map_or(true, |id| i.purchase_id == id))?;
        paginate(items, page, per_page)
    }

    /// Edit an item; the subtotal is recomputed
    pub fn update_item(&self, id: PartsItemId, changes: PartsItemUpdate) -> GastosResult<PartsItem> {
        let mut item = self
            .storage
            .parts_items
            .get(id)?
            .ok_or_else(|| item_not_found(id))?;
        let before = item.clone();

        if let Some(description) = changes.description {
            item.description = description.trim().to_string();
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }

        item.recompute();
        item.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;
        self.ensure_total_fits(item.purchase_id, Some(item.id), item.subtotal)?;

        self.storage.parts_items.upsert(item.clone())?;
        self.storage.parts_items.save()?;
        self.storage.log_update(&before, &item)?;

        Ok(item)
    }

    pub fn delete_item(&self, id: PartsItemId) -> GastosResult<PartsItem> {
        let item = self
            .storage
            .parts_items
            .remove(id)?
            .ok_or_else(|| item_not_found(id))?;

        self.storage.parts_items.save()?;
        self.storage.log_delete(&item)?;

        Ok(item)
    }
}

fn total_overflow() -> GastosError {
    GastosError::Validation("Items total of the purchase is too large".into())
}

fn purchase_not_found(id: PartsPurchaseId) -> GastosError {
    GastosError::NotFound {
        entity_type: "Parts purchase",
        identifier: id.to_string(),
    }
}

fn item_not_found(id: PartsItemId) -> GastosError {
    GastosError::NotFound {
        entity_type: "Parts item",
        identifier: id.to_string(),
    }
}
