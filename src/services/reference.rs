//! Hourly rate, city and vendor services
//!
//! Cities and vendors are referenced by parts purchases and cannot be
//! deleted while a purchase points at them.

use crate::error::{GastosError, GastosResult};
use crate::models::{City, CityId, HourlyRate, HourlyRateId, Money, Vendor, VendorId};
use crate::storage::Storage;

/// Service for hourly rates
pub struct HourlyRateService<'a> {
    storage: &'a Storage,
}

impl<'a> HourlyRateService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, price: Money) -> GastosResult<HourlyRate> {
        let rate = HourlyRate::new(price);
        rate.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.hourly_rates.upsert(rate.clone())?;
        self.storage.hourly_rates.save()?;
        self.storage.log_create(&rate)?;

        Ok(rate)
    }

    pub fn find(&self, identifier: &str) -> GastosResult<Option<HourlyRate>> {
        self.storage.hourly_rates.find_unique(|r| r.id.matches(identifier))
    }

    pub fn list(&self) -> GastosResult<Vec<HourlyRate>> {
        self.storage.hourly_rates.get_all()
    }

    pub fn update(&self, id: HourlyRateId, price: Money) -> GastosResult<HourlyRate> {
        let mut rate = self
            .storage
            .hourly_rates
            .get(id)?
            .ok_or_else(|| not_found("Hourly rate", id))?;
        let before = rate.clone();

        rate.price = price;
        rate.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.hourly_rates.upsert(rate.clone())?;
        self.storage.hourly_rates.save()?;
        self.storage.log_update(&before, &rate)?;

        Ok(rate)
    }

    /// Delete a rate; sessions keep the rate they were priced with
    pub fn delete(&self, id: HourlyRateId) -> GastosResult<HourlyRate> {
        let rate = self
            .storage
            .hourly_rates
            .remove(id)?
            .ok_or_else(|| not_found("Hourly rate", id))?;

        self.storage.hourly_rates.save()?;
        self.storage.log_delete(&rate)?;

        Ok(rate)
    }
}

/// Service for cities
pub struct CityService<'a> {
    storage: &'a Storage,
}

impl<'a> CityService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, description: &str) -> GastosResult<City> {
        let city = City::new(description.trim());
        city.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        let lower = city.description.to_lowercase();
        if self
            .storage
            .cities
            .any(|c| c.description.to_lowercase() == lower)?
        {
            return Err(GastosError::Duplicate {
                entity_type: "City",
                identifier: city.description,
            });
        }

        self.storage.cities.upsert(city.clone())?;
        self.storage.cities.save()?;
        self.storage.log_create(&city)?;

        Ok(city)
    }

    /// Find a city by description (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> GastosResult<Option<City>> {
        let lower = identifier.trim().to_lowercase();
        if let Some(city) = self
            .storage
            .cities
            .find(|c| c.description.to_lowercase() == lower)?
        {
            return Ok(Some(city));
        }
        self.storage.cities.find_unique(|c| c.id.matches(identifier))
    }

    pub fn list(&self, search: Option<&str>) -> GastosResult<Vec<City>> {
        let term = search.unwrap_or_default().trim().to_lowercase();
        self.storage
            .cities
            .filter(|c| c.description.to_lowercase().contains(&term))
    }

    pub fn update(&self, id: CityId, description: &str) -> GastosResult<City> {
        let mut city = self
            .storage
            .cities
            .get(id)?
            .ok_or_else(|| not_found("City", id))?;
        let before = city.clone();

        city.description = description.trim().to_string();
        city.validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.cities.upsert(city.clone())?;
        self.storage.cities.save()?;
        self.storage.log_update(&before, &city)?;

        Ok(city)
    }

    pub fn delete(&self, id: CityId) -> GastosResult<City> {
        let city = self
            .storage
            .cities
            .get(id)?
            .ok_or_else(|| not_found("City", id))?;

        let purchases = self.storage.parts_purchases.filter(|p| p.city_id == id)?;
        if !purchases.is_empty() {
            return Err(GastosError::Validation(format!(
                "Cannot delete city '{}' - {} parts purchases reference it",
                city.description,
                purchases.len()
            )));
        }

        self.storage.cities.remove(id)?;
        self.storage.cities.save()?;
        self.storage.log_delete(&city)?;

        Ok(city)
    }
}

/// Service for vendors
pub struct VendorService<'a> {
    storage: &'a Storage,
}

impl<'a> VendorService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, description: &str) -> GastosResult<Vendor> {
        let vendor = Vendor::new(description.trim());
        vendor
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        let lower = vendor.description.to_lowercase();
        if self
            .storage
            .vendors
            .any(|v| v.description.to_lowercase() == lower)?
        {
            return Err(GastosError::Duplicate {
                entity_type: "Vendor",
                identifier: vendor.description,
            });
        }

        self.storage.vendors.upsert(vendor.clone())?;
        self.storage.vendors.save()?;
        self.storage.log_create(&vendor)?;

        Ok(vendor)
    }

    /// Find a vendor by description (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> GastosResult<Option<Vendor>> {
        let lower = identifier.trim().to_lowercase();
        if let Some(vendor) = self
            .storage
            .vendors
            .find(|v| v.description.to_lowercase() == lower)?
        {
            return Ok(Some(vendor));
        }
        self.storage.vendors.find_unique(|v| v.id.matches(identifier))
    }

    pub fn list(&self, search: Option<&str>) -> GastosResult<Vec<Vendor>> {
        let term = search.unwrap_or_default().trim().to_lowercase();
        self.storage
            .vendors
            .filter(|v| v.description.to_lowercase().contains(&term))
    }

    pub fn update(&self, id: VendorId, description: &str) -> GastosResult<Vendor> {
        let mut vendor = self
            .storage
            .vendors
            .get(id)?
            .ok_or_else(|| not_found("Vendor", id))?;
        let before = vendor.clone();

        vendor.description = description.trim().to_string();
        vendor
            .validate()
            .map_err(|e| GastosError::Validation(e.to_string()))?;

        self.storage.vendors.upsert(vendor.clone())?;
        self.storage.vendors.save()?;
        self.storage.log_update(&before, &vendor)?;

        Ok(vendor)
    }

    pub fn delete(&self, id: VendorId) -> GastosResult<Vendor> {
        let vendor = self
            .storage
            .vendors
            .get(id)?
            .ok_or_else(|| not_found("Vendor", id))?;

        let purchases = self.storage.parts_purchases.filter(|p| p.vendor_id == id)?;
        if !purchases.is_empty() {
            return Err(GastosError::Validation(format!(
                "Cannot delete vendor '{}' - {} parts purchases reference it",
                vendor.description,
                purchases.len()
            )));
        }

        self.storage.vendors.remove(id)?;
        self.storage.vendors.save()?;
        self.storage.log_delete(&vendor)?;

        Ok(vendor)
    }
}

fn not_found(entity_type: &'static str, id: impl ToString) -> GastosError {
    GastosError::NotFound {
        entity_type,
        identifier: id.to_string(),
    }
}
