//! Installment expansion
//!
//! A purchase paid in N installments becomes N expense records, one per
//! installment, due every [`INSTALLMENT_INTERVAL_DAYS`] days from the first
//! due date. Values are copied as entered on every record; they are not
//! split or recomputed.

use chrono::{Days, NaiveDate};

use crate::error::{GastosError, GastosResult};
use crate::models::{Expense, ExpenseInput};

/// Days between consecutive installment due dates
pub const INSTALLMENT_INTERVAL_DAYS: u64 = 30;

/// Due date of installment `index` (1-based)
pub fn due_date(start_date: NaiveDate, index: u32) -> GastosResult<NaiveDate> {
    let offset = INSTALLMENT_INTERVAL_DAYS * u64::from(index.saturating_sub(1));
    start_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
        GastosError::InvalidInput(format!(
            "Installment {} due date overflows the calendar",
            index
        ))
    })
}

/// Expand one expense input into `count` installment records
///
/// # Errors
///
/// `InvalidInput` when `count` is zero or a due date cannot be represented.
pub fn expand(base: &ExpenseInput, count: u32, start_date: NaiveDate) -> GastosResult<Vec<Expense>> {
    if count == 0 {
        return Err(GastosError::InvalidInput(
            "Installment count must be at least 1".into(),
        ));
    }

    (1..=count)
        .map(|index| {
            let mut record = Expense::from_input(base, index, due_date(start_date, index)?);
            record.installment_count = count;
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, DecimalComma};
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn phone(count: u32) -> ExpenseInput {
        ExpenseInput {
            name: "Phone".into(),
            slug: None,
            category_id: CategoryId::new(),
            total_value: DecimalComma::new("1200,00"),
            installment_value: DecimalComma::new("100,00"),
            installment_count: count,
        }
    }

    #[test]
    fn test_phone_in_three_installments() {
        let records = expand(&phone(3), 3, date(2024, 1, 1)).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.due_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 31), date(2024, 3, 1)]);

        let indices: Vec<_> = records.iter().map(|r| r.installment_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        for record in &records {
            assert_eq!(record.name, "Phone");
            assert_eq!(record.total_value.as_str(), "1200,00");
            assert_eq!(record.installment_value.as_str(), "100,00");
            assert_eq!(record.installment_count, 3);
        }
    }

    #[test]
    fn test_indices_are_contiguous_for_any_count() {
        for count in 1..=36 {
            let records = expand(&phone(count), count, date(2023, 12, 15)).unwrap();
            assert_eq!(records.len(), count as usize);

            let indices: Vec<u32> = records.iter().map(|r| r.installment_index).collect();
            assert_eq!(indices, (1..=count).collect::<Vec<_>>());

            let first = records[0].due_date;
            for record in &records {
                let gap = (record.due_date - first).num_days();
                assert_eq!(gap, 30 * (i64::from(record.installment_index) - 1));
            }

            let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
            assert_eq!(ids.len(), records.len());
        }
    }

    #[test]
    fn test_single_installment_mirrors_input() {
        let input = phone(1);
        let records = expand(&input, 1, date(2024, 6, 10)).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.installment_index, 1);
        assert_eq!(record.installment_count, 1);
        assert_eq!(record.due_date, date(2024, 6, 10));
        assert_eq!(record.category_id, input.category_id);
        assert_eq!(record.slug, "phone");
    }

    #[test]
    fn test_zero_count_is_invalid() {
        let err = expand(&phone(0), 0, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, GastosError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_date_is_invalid() {
        let err = expand(&phone(2), 2, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, GastosError::InvalidInput(_)));
    }
}
