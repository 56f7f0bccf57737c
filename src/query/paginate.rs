/// Listings fetched per "load more"
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// The next window after `displayed` items, and the new displayed count
///
/// The slice is shorter than `page_size` on the last page and empty once the
/// input is exhausted.
pub fn next_page<T>(filtered: &[T], displayed: usize, page_size: usize) -> (&[T], usize) {
    let start = displayed.min(filtered.len());
    let end = start.saturating_add(page_size).min(filtered.len());
    (&filtered[start..end], end)
}

/// Pagination cursor over a filtered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    displayed: usize,
    page: usize,
    page_size: usize,
}

impl Window {
    pub fn new(page_size: usize) -> Self {
        Self {
            displayed: 0,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.displayed = 0;
        self.page = 1;
    }

    /// Number of items already shown
    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// Next page to fetch, starting at 1
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.displayed < total
    }

    /// Advance over `items`, returning the slice newly shown. The page
    /// counter only moves when something was appended.
    pub fn advance<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        let (page, shown) = next_page(items, self.displayed, self.page_size);
        if !page.is_empty() {
            self.displayed = shown;
            self.page += 1;
        }
        page
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_slices() {
        let items: Vec<u32> = (0..20).collect();
        let (first, shown) = next_page(&items, 0, 9);
        assert_eq!(first, &items[0..9]);
        assert_eq!(shown, 9);

        let (last, shown) = next_page(&items, 18, 9);
        assert_eq!(last, &[18, 19]);
        assert_eq!(shown, 20);

        let (empty, shown) = next_page(&items, 20, 9);
        assert!(empty.is_empty());
        assert_eq!(shown, 20);

        let (beyond, shown) = next_page(&items, 99, 9);
        assert!(beyond.is_empty());
        assert_eq!(shown, 20);
    }

    #[test]
    fn window_tracks_pages() {
        let items: Vec<u32> = (0..20).collect();
        let mut window = Window::new(9);
        assert_eq!(window.advance(&items), &items[0..9]);
        assert_eq!(window.advance(&items), &items[9..18]);
        assert!(window.has_more(20));
        assert_eq!(window.page(), 3);
        assert_eq!(window.advance(&items), &[18, 19]);
        assert!(!window.has_more(20));
        assert_eq!(window.page(), 4);

        // exhausted: nothing appended, page stays put
        assert!(window.advance(&items).is_empty());
        assert_eq!(window.displayed(), 20);
        assert_eq!(window.page(), 4);
        assert_eq!(window.page() - 1, window.displayed().div_ceil(window.page_size()));

        window.reset();
        assert_eq!((window.displayed(), window.page()), (0, 1));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let mut window = Window::new(0);
        assert_eq!(window.advance(&["a", "b", "c"]), &["a"]);
    }
}
