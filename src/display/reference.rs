//! Hourly rate, city and vendor tables

use tabled::Tabled;

use crate::models::{City, HourlyRate, Vendor};

use super::render_table;

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Price/h")]
    price: String,
}

#[derive(Tabled)]
struct DescriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn format_rate_list(rates: &[HourlyRate]) -> String {
    if rates.is_empty() {
        return "No hourly rates found.".to_string();
    }
    render_table(
        rates
            .iter()
            .map(|r| RateRow {
                id: r.id.to_string(),
                price: r.price.to_string(),
            })
            .collect(),
    )
}

pub fn format_city_list(cities: &[City]) -> String {
    if cities.is_empty() {
        return "No cities found.".to_string();
    }
    render_table(
        cities
            .iter()
            .map(|c| DescriptionRow {
                id: c.id.to_string(),
                description: c.description.clone(),
            })
            .collect(),
    )
}

pub fn format_vendor_list(vendors: &[Vendor]) -> String {
    if vendors.is_empty() {
        return "No vendors found.".to_string();
    }
    render_table(
        vendors
            .iter()
            .map(|v| DescriptionRow {
                id: v.id.to_string(),
                description: v.description.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_lists() {
        let output = format_rate_list(&[HourlyRate::new(Money::from_cents(4550))]);
        assert!(output.contains("45,50"));

        let output = format_city_list(&[City::new("Curitiba")]);
        assert!(output.contains("Curitiba"));

        assert!(format_vendor_list(&[]).contains("No vendors found"));
    }
}
