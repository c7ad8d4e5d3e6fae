//! Постраничный вывод (страницы нумеруются с 1).

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What happens to the current page when the list it pages over changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageResetPolicy {
    /// Stay on the current page, moving back to the last page if it no longer exists
    #[default]
    ClampToLast,
    /// Go back to page 1 on every change of the list
    ResetToFirst,
}

/// `max(1, ceil(total_items / page_size))`
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

/// One visible page of a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slices `sequence` for `current_page`.
///
/// A page past the end is clamped to the last page instead of coming back empty.
pub fn paginate<T: Clone>(sequence: &[T], page_size: usize, current_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(sequence.len(), page_size);
    let current_page = current_page.clamp(1, total_pages);
    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(sequence.len());
    Page {
        items: sequence.get(start..end).unwrap_or(&[]).to_vec(),
        current_page,
        total_pages,
        total_items: sequence.len(),
        page_size,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Index range of the current page within the paged sequence
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Moves to `page`, clamped into `1..=total_pages`. Returns the page landed on.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Always returns to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Records a new length of the paged sequence and re-establishes
    /// `1 <= current_page <= total_pages` according to `policy`.
    pub fn set_total_items(&mut self, total_items: usize, policy: PageResetPolicy) {
        self.total_items = total_items;
        match policy {
            PageResetPolicy::ClampToLast => {
                self.set_page(self.current_page);
            }
            PageResetPolicy::ResetToFirst => self.reset(),
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_page_slices_match_sequence() {
        let seq: Vec<u32> = (1..=23).collect();
        for page_size in [1, 5, 7, 10, 23, 50] {
            let pages = total_pages(seq.len(), page_size);
            for p in 1..=pages {
                let page = paginate(&seq, page_size, p);
                let start = (p - 1) * page_size;
                let end = (p * page_size).min(seq.len());
                assert!(page.items.len() <= page_size);
                assert_eq!(page.items, seq[start..end].to_vec());
                assert_eq!(page.current_page, p);
            }
        }
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let roles: Vec<u32> = (1..=25).collect();
        let page = paginate(&roles, 10, 4);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items, (21..=25).collect::<Vec<_>>());

        let page = paginate(&roles, 10, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let page = paginate::<u32>(&[], 10, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.is_empty());
    }

    #[test]
    fn test_state_clamps_when_list_shrinks() {
        let mut state = PaginationState::new(10);
        state.set_total_items(25, PageResetPolicy::ClampToLast);
        assert_eq!(state.set_page(3), 3);

        state.set_total_items(12, PageResetPolicy::ClampToLast);
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.range(), 10..12);

        state.set_total_items(0, PageResetPolicy::ClampToLast);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.range(), 0..0);
    }

    #[test]
    fn test_state_reset_policy() {
        let mut state = PaginationState::new(10);
        state.set_total_items(25, PageResetPolicy::ResetToFirst);
        state.set_page(2);
        state.set_total_items(24, PageResetPolicy::ResetToFirst);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_page_size_change_resets_to_first() {
        let mut state = PaginationState::new(10);
        state.set_total_items(25, PageResetPolicy::ClampToLast);
        state.set_page(3);
        state.set_page_size(5);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_pages(), 5);
    }

    #[test]
    fn test_next_prev_bounds() {
        let mut state = PaginationState::new(10);
        state.set_total_items(15, PageResetPolicy::ClampToLast);
        assert!(!state.prev_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.current_page(), 2);
    }
}
