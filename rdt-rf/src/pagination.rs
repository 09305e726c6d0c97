//! Pagination over the job listing
//!
//! Pages are requested from index 0 upwards. Walking stops on the first
//! empty page or once the next index reaches the total page count reported
//! by the API. The index only ever moves forward.

/// Total assumed when a page omits `totalPages`
pub const DEFAULT_TOTAL_PAGES: u32 = 1;

/// Position while walking a paginated listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Page to request next (0-indexed)
    page_index: u32,
    /// Total reported by the most recent page
    total_pages: Option<u32>,
}

impl PageCursor {
    /// Cursor at page 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to request next
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Total page count reported so far, if any page has been seen
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Record the page just fetched and move past it
    ///
    /// Returns `true` while another page should be requested.
    ///
    /// # Examples
    /// ```
    /// use rdt_rf::pagination::PageCursor;
    ///
    /// let mut cursor = PageCursor::new();
    /// assert!(cursor.advance(10, Some(2)));   // page 0 of 2
    /// assert_eq!(cursor.page_index(), 1);
    /// assert!(!cursor.advance(4, Some(2)));  // page 1 was the last
    /// ```
    pub fn advance(&mut self, item_count: usize, reported_total: Option<u32>) -> bool {
        if item_count == 0 {
            return false;
        }

        let total = reported_total.unwrap_or(DEFAULT_TOTAL_PAGES);
        self.total_pages = Some(total);
        self.page_index = self.page_index.saturating_add(1);
        self.page_index < total
    }
}
