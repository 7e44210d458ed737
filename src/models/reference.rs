//! Small reference tables: hourly rates, cities and vendors
//!
//! These carry a single value each and are referenced from work sessions and
//! parts purchases.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CityId, HourlyRateId, VendorId};
use super::money::Money;

/// Maximum length of a city or vendor description
pub const MAX_DESCRIPTION: usize = 100;

/// A price per hour of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRate {
    pub id: HourlyRateId,
    pub price: Money,
}

impl HourlyRate {
    pub fn new(price: Money) -> Self {
        Self {
            id: HourlyRateId::new(),
            price,
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        if self.price.is_negative() {
            return Err(ReferenceValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// A city where purchases happen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub description: String,
}

impl City {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: CityId::new(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        validate_description(&self.description)
    }
}

/// A shop or vendor (comércio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub description: String,
}

impl Vendor {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: VendorId::new(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        validate_description(&self.description)
    }
}

fn validate_description(description: &str) -> Result<(), ReferenceValidationError> {
    if description.trim().is_empty() {
        return Err(ReferenceValidationError::EmptyDescription);
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION {
        return Err(ReferenceValidationError::DescriptionTooLong(len));
    }
    Ok(())
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceValidationError {
    EmptyDescription,
    DescriptionTooLong(usize),
    NegativePrice,
}

impl fmt::Display for ReferenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION
            ),
            Self::NegativePrice => write!(f, "Price cannot be negative"),
        }
    }
}

impl std::error::Error for ReferenceValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_are_validated() {
        assert!(City::new("Curitiba").validate().is_ok());
        assert_eq!(
            Vendor::new(" ").validate(),
            Err(ReferenceValidationError::EmptyDescription)
        );
        assert!(matches!(
            City::new("x".repeat(101)).validate(),
            Err(ReferenceValidationError::DescriptionTooLong(101))
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(HourlyRate::new(Money::from_cents(5000)).validate().is_ok());
        assert_eq!(
            HourlyRate::new(Money::from_cents(-1)).validate(),
            Err(ReferenceValidationError::NegativePrice)
        );
    }
}
