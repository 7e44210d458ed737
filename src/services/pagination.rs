//! Page slicing for list operations

use crate::error::{GastosError, GastosResult};

/// One page of a list result
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub number: usize,
    pub per_page: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.per_page)
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cut page `number` (1-based) out of `items`
///
/// Page 1 of an empty list is valid and empty; any other page past the end is
/// an error.
pub fn paginate<T>(items: Vec<T>, number: usize, per_page: usize) -> GastosResult<Page<T>> {
    if per_page == 0 {
        return Err(GastosError::InvalidInput("Page size must be at least 1".into()));
    }

    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    if number == 0 || number > total_pages {
        return Err(GastosError::InvalidInput(format!(
            "Page {} out of range (1-{})",
            number, total_pages
        )));
    }

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Ok(Page {
        items,
        number,
        per_page,
        total_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let page = paginate((1..=12).collect(), 3, 5).unwrap();
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_empty_first_page() {
        let page = paginate(Vec::<u8>::new(), 1, 5).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            paginate(vec![1, 2], 2, 5),
            Err(GastosError::InvalidInput(_))
        ));
        assert!(paginate(vec![1], 0, 5).is_err());
        assert!(paginate(vec![1], 1, 0).is_err());
    }
}
