//! Decimal-comma monetary text
//!
//! Expense values are kept exactly as entered ("50,00"). The monthly report
//! filters on this text before converting it to [`Money`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::{Money, MoneyParseError};

/// Monetary text using a comma as decimal separator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalComma(String);

impl DecimalComma {
    /// Wrap raw text without checking it
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    /// Parse user input, rejecting anything that is not a number
    ///
    /// Whole numbers are stored with an explicit ",00" so that the stored text
    /// matches what the report value filter compares against.
    pub fn parse(text: &str) -> Result<Self, MoneyParseError> {
        let money = Money::parse_decimal_comma(text)?;
        let text = text.trim();
        if text.contains(',') {
            Ok(Self(text.to_string()))
        } else {
            Ok(Self(money.to_decimal_comma()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalize to a numeric amount
    pub fn to_money(&self) -> Result<Money, MoneyParseError> {
        Money::parse_decimal_comma(&self.0)
    }
}

impl From<Money> for DecimalComma {
    fn from(money: Money) -> Self {
        Self(money.to_decimal_comma())
    }
}

impl fmt::Display for DecimalComma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a report value filter the way values are stored
///
/// A filter without a comma gets ",00" appended; nothing else changes.
pub fn normalize_value_filter(value: &str) -> String {
    let value = value.trim();
    if value.contains(',') {
        value.to_string()
    } else {
        format!("{},00", value)
    }
}
