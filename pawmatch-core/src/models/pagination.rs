//! Offset cursor for paged searches.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination cursor for the search result window.
///
/// While paging is driven by [`Pagination::advance`], `first` always equals
/// `(page - 1) * page_size`. [`Pagination::jump_to`] accepts an arbitrary
/// offset as the new ground truth and re-derives `page` from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based offset of the current page.
    pub first: usize,
    /// Number of dogs requested per page.
    pub page_size: usize,
    /// One-based page number.
    pub page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            first: 0,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl Pagination {
    /// Creates a cursor at the first page.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPageSize`] for a zero page size.
    pub fn new(page_size: usize) -> Result<Self, CoreError> {
        if page_size == 0 {
            return Err(CoreError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    /// Moves the cursor back to the first page.
    pub fn reset(&mut self) {
        self.first = 0;
        self.page = 1;
    }

    /// Offset the next page would start at. Saturates at `usize::MAX`.
    pub fn next_offset(&self) -> usize {
        self.first.saturating_add(self.page_size)
    }

    /// Returns true if another page exists given the server-reported total.
    pub fn has_next(&self, total: usize) -> bool {
        self.next_offset() < total
    }

    /// Advances one page.
    pub fn advance(&mut self) {
        self.first = self.next_offset();
        self.page = self.page.saturating_add(1);
    }

    /// Jumps to an arbitrary offset.
    pub fn jump_to(&mut self, first: usize) {
        self.first = first;
        self.page = (first / self.page_size).saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cursor() {
        let p = Pagination::default();
        assert_eq!(p.first, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            Pagination::new(0),
            Err(CoreError::InvalidPageSize(0))
        ));
    }

    #[test]
    fn test_has_next_boundaries() {
        let mut p = Pagination::new(10).unwrap();
        assert!(p.has_next(25));
        p.advance();
        assert_eq!(p.first, 10);
        assert!(p.has_next(25));
        p.advance();
        assert_eq!(p.first, 20);
        assert_eq!(p.page, 3);
        // 20 + 10 >= 25
        assert!(!p.has_next(25));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let mut p = Pagination::new(10).unwrap();
        p.advance();
        assert!(!p.has_next(20));
    }

    #[test]
    fn test_advance_keeps_offset_invariant() {
        let mut p = Pagination::new(7).unwrap();
        for _ in 0..5 {
            p.advance();
            assert_eq!(p.first, (p.page - 1) * p.page_size);
        }
    }

    #[test]
    fn test_cursor_saturates_at_max_offset() {
        let mut p = Pagination::new(1).unwrap();
        p.jump_to(usize::MAX);
        assert_eq!(p.page, usize::MAX);
        assert_eq!(p.next_offset(), usize::MAX);
        assert!(!p.has_next(usize::MAX));

        p.advance();
        assert_eq!(p.first, usize::MAX);
        assert_eq!(p.page, usize::MAX);
    }

    #[test]
    fn test_jump_rederives_page() {
        let mut p = Pagination::new(10).unwrap();
        p.jump_to(35);
        assert_eq!(p.first, 35);
        assert_eq!(p.page, 4);
        assert_eq!(p.next_offset(), 45);

        p.reset();
        assert_eq!(p.first, 0);
        assert_eq!(p.page, 1);
    }
}
