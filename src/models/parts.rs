//! Vehicle parts purchases (peças) and their line items
//!
//! A purchase records where and when parts were bought for a vehicle and the
//! odometer readings of the change; items list what was bought.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CityId, PartsItemId, PartsPurchaseId, VendorId};
use super::money::Money;

/// A parts purchase for a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsPurchase {
    pub id: PartsPurchaseId,

    pub date: NaiveDate,

    /// Vehicle the parts went into
    pub vehicle: String,

    /// Odometer reading when the parts were changed
    pub changed_at_km: u32,

    /// Odometer reading at which the next change is due
    pub next_change_km: u32,

    pub vendor_id: VendorId,
    pub city_id: CityId,

    pub total: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartsPurchase {
    pub fn new(
        date: NaiveDate,
        vehicle: impl Into<String>,
        vendor_id: VendorId,
        city_id: CityId,
        total: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PartsPurchaseId::new(),
            date,
            vehicle: vehicle.into(),
            changed_at_km: 0,
            next_change_km: 0,
            vendor_id,
            city_id,
            total,
            created_at: now,
            updated_at: now,
        }
    }

    /// Kilometres between this change and the next one
    pub fn change_interval_km(&self) -> u32 {
        self.next_change_km.saturating_sub(self.changed_at_km)
    }

    pub fn validate(&self) -> Result<(), PartsValidationError> {
        if self.vehicle.trim().is_empty() {
            return Err(PartsValidationError::EmptyVehicle);
        }
        if self.next_change_km < self.changed_at_km {
            return Err(PartsValidationError::NextChangeBeforeChange {
                changed_at: self.changed_at_km,
                next: self.next_change_km,
            });
        }
        if self.total.is_negative() {
            return Err(PartsValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for PartsPurchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.vehicle)
    }
}

/// One line of a parts purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsItem {
    pub id: PartsItemId,
    pub purchase_id: PartsPurchaseId,
    pub description: String,
    pub price: Money,
    pub quantity: u32,

    /// Computed: price * quantity, saturating; `validate` rejects overflow
    pub subtotal: Money,
}

impl PartsItem {
    pub fn new(
        purchase_id: PartsPurchaseId,
        description: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            id: PartsItemId::new(),
            purchase_id,
            description: description.into(),
            price,
            quantity,
            subtotal: price * quantity,
        }
    }

    pub fn recompute(&mut self) {
        self.subtotal = self.price * self.quantity;
    }

    pub fn validate(&self) -> Result<(), PartsValidationError> {
        if self.description.trim().is_empty() {
            return Err(PartsValidationError::EmptyDescription);
        }
        if self.quantity == 0 {
            return Err(PartsValidationError::ZeroQuantity);
        }
        if self.price.is_negative() {
            return Err(PartsValidationError::NegativeAmount);
        }
        if self.price.checked_mul(self.quantity).is_none() {
            return Err(PartsValidationError::SubtotalOverflow);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartsValidationError {
    EmptyVehicle,
    EmptyDescription,
    ZeroQuantity,
    NegativeAmount,
    SubtotalOverflow,
    NextChangeBeforeChange { changed_at: u32, next: u32 },
}

impl fmt::Display for PartsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyVehicle => write!(f, "Vehicle cannot be empty"),
            Self::EmptyDescription => write!(f, "Item description cannot be empty"),
            Self::ZeroQuantity => write!(f, "Quantity must be at least 1"),
            Self::NegativeAmount => write!(f, "Amounts cannot be negative"),
            Self::SubtotalOverflow => write!(f, "Price times quantity is too large"),
            Self::NextChangeBeforeChange { changed_at, next } => write!(
                f,
                "Next change at {} km is before the change at {} km",
                next, changed_at
            ),
        }
    }
}

impl std::error::Error for PartsValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase() -> PartsPurchase {
        PartsPurchase::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            "CG 160",
            VendorId::new(),
            CityId::new(),
            Money::from_cents(35000),
        )
    }

    #[test]
    fn test_odometer_validation() {
        let mut p = purchase();
        p.changed_at_km = 12000;
        p.next_change_km = 15000;
        assert!(p.validate().is_ok());
        assert_eq!(p.change_interval_km(), 3000);

        p.next_change_km = 11000;
        assert!(matches!(
            p.validate(),
            Err(PartsValidationError::NextChangeBeforeChange { .. })
        ));
    }

    #[test]
    fn test_item_subtotal() {
        let mut item = PartsItem::new(PartsPurchaseId::new(), "Óleo 10W30", Money::from_cents(3290), 2);
        assert_eq!(item.subtotal.cents(), 6580);

        item.quantity = 3;
        item.recompute();
        assert_eq!(item.subtotal.cents(), 9870);
        assert!(item.validate().is_ok());

        item.quantity = 0;
        assert_eq!(item.validate(), Err(PartsValidationError::ZeroQuantity));
    }
}
