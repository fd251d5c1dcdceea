//! Page bookkeeping for the item selector.
//! Keeps `1 <= page <= page_count` and `page_size >= 1` after every mutation.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    item_count: usize,
    reverse: bool,
}

impl Pager {
    pub fn new(item_count: usize, page_size: usize, reverse: bool) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            item_count,
            reverse,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn toggle_reverse(&mut self) {
        self.reverse = !self.reverse;
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.item_count.div_ceil(self.page_size).max(1)
    }

    /// Jump to `want`, clamping into `[1, page_count]`.
    pub fn set_page(&mut self, want: i64) {
        let max_page = i64::try_from(self.page_count()).unwrap_or(i64::MAX);
        self.page = want.clamp(1, max_page) as usize;
    }

    /// Move forward (positive) or backward (negative) by `delta` pages.
    pub fn advance(&mut self, delta: i64) {
        let current = i64::try_from(self.page).unwrap_or(i64::MAX);
        self.set_page(current.saturating_add(delta));
    }

    /// Resize pages while keeping the first item of the current page visible.
    pub fn set_page_size(&mut self, want: usize) {
        let page_size = want.max(1);
        let first_item_number = self.page_size * (self.page - 1) + 1;
        let new_page = first_item_number.div_ceil(page_size);
        self.page_size = page_size;
        self.set_page(i64::try_from(new_page).unwrap_or(i64::MAX));
    }

    /// Global index range of the items shown on the current page.
    pub fn item_range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.item_count);
        let end = (self.page * self.page_size).min(self.item_count);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_matches_ceiling() {
        for size in 1..=7 {
            for count in 0..=30 {
                let pager = Pager::new(count, size, false);
                let expected = count.div_ceil(size).max(1);
                assert_eq!(pager.page_count(), expected, "n={count} s={size}");
            }
        }
    }

    #[test]
    fn test_zero_page_size_is_coerced() {
        let pager = Pager::new(5, 0, false);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.page_count(), 5);
    }

    #[test]
    fn test_set_page_clamps_both_ends() {
        let mut pager = Pager::new(25, 10, false);
        pager.set_page(-4);
        assert_eq!(pager.page(), 1);
        pager.set_page(0);
        assert_eq!(pager.page(), 1);
        pager.set_page(99_999_999);
        assert_eq!(pager.page(), 3);
        pager.set_page(i64::MAX);
        assert_eq!(pager.page(), 3);
        pager.set_page(2);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_advance_saturates() {
        let mut pager = Pager::new(25, 10, false);
        pager.advance(1);
        assert_eq!(pager.page(), 2);
        pager.advance(10);
        assert_eq!(pager.page(), 3);
        pager.advance(-2);
        assert_eq!(pager.page(), 1);
        pager.advance(i64::MIN);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_resize_keeps_first_item_visible() {
        let mut pager = Pager::new(25, 10, false);
        pager.set_page(3);
        assert_eq!(pager.item_range(), 20..25);
        pager.set_page_size(5);
        assert_eq!(pager.page(), 5);
        assert!(pager.item_range().contains(&20));
    }

    #[test]
    fn test_resize_every_combination_keeps_first_item() {
        for old in 1..=6 {
            for new in 1..=6 {
                for page in 1..=5 {
                    let mut pager = Pager::new(23, old, false);
                    pager.set_page(page);
                    let first = pager.item_range().start;
                    pager.set_page_size(new);
                    assert!(
                        pager.item_range().contains(&first),
                        "old={old} new={new} page={page}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_list_has_single_empty_page() {
        let mut pager = Pager::new(0, 10, false);
        assert_eq!(pager.page_count(), 1);
        assert!(pager.item_range().is_empty());
        pager.set_page_size(3);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_toggle_reverse() {
        let mut pager = Pager::new(3, 2, false);
        pager.toggle_reverse();
        assert!(pager.is_reversed());
        pager.toggle_reverse();
        assert!(!pager.is_reversed());
    }
}
