//! Pagination over an already filtered and sorted client list
//!
//! Pages are 1-indexed. Navigation clamps to the valid range and the
//! paginator snaps back to page 1 whenever the size of the underlying list
//! changes.

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Pages shown on each side of the current one in the page bar
pub const PAGE_LINK_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
    last_total: Option<usize>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            last_total: None,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize, total_items: usize) {
        self.current_page = page.min(self.total_pages(total_items)).max(1);
    }

    pub fn next_page(&mut self, total_items: usize) {
        self.go_to_page(self.current_page + 1, total_items);
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Returns to page 1 when the list size differs from the last one seen.
    pub fn reset_if_changed(&mut self, total_items: usize) -> bool {
        let changed = self.last_total.is_some_and(|last| last != total_items);
        if changed {
            self.current_page = 1;
        }
        self.last_total = Some(total_items);
        changed
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        let total_items = items.len();
        let total_pages = self.total_pages(total_items);
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(total_items);
        let slice = items.get(start..end).unwrap_or(&[]);

        Page {
            items: slice,
            current_page: self.current_page,
            total_pages,
            total_items,
            start_index: start + 1,
            end_index: end,
            has_next_page: self.current_page < total_pages,
            has_prev_page: self.current_page > 1,
        }
    }
}

/// One page of rows plus the metadata the page bar needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first row shown
    pub start_index: usize,
    /// 1-based index of the last row shown
    pub end_index: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Number(usize),
    Gap,
}

/// Page bar: first and last page, a window around the current one, and gaps.
pub fn page_links(current_page: usize, total_pages: usize) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current_page = current_page.clamp(1, total_pages);
    let mut links = vec![PageLink::Number(1)];
    let window_start = current_page.saturating_sub(PAGE_LINK_WINDOW).max(2);
    let window_end = (current_page + PAGE_LINK_WINDOW).min(total_pages.saturating_sub(1));

    if window_start > 2 {
        links.push(PageLink::Gap);
    }
    links.extend((window_start..=window_end).map(PageLink::Number));
    if current_page + PAGE_LINK_WINDOW < total_pages.saturating_sub(1) {
        links.push(PageLink::Gap);
    }
    if total_pages > 1 {
        links.push(PageLink::Number(total_pages));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Number};

    #[test]
    fn test_pages_of_fifty() {
        let items: Vec<usize> = (1..=120).collect();
        let mut pager = Paginator::default();
        pager.reset_if_changed(items.len());

        let first = pager.page(&items);
        assert_eq!(first.items.first(), Some(&1));
        assert_eq!(first.items.last(), Some(&50));
        assert_eq!((first.start_index, first.end_index), (1, 50));
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        pager.go_to_page(3, items.len());
        let last = pager.page(&items);
        assert_eq!(last.items.len(), 20);
        assert_eq!(last.items.first(), Some(&101));
        assert_eq!((last.start_index, last.end_index), (101, 120));
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut pager = Paginator::new(50);
        pager.go_to_page(99, 120);
        assert_eq!(pager.current_page(), 3);
        pager.next_page(120);
        assert_eq!(pager.current_page(), 3);
        pager.go_to_page(0, 120);
        assert_eq!(pager.current_page(), 1);
        pager.prev_page();
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_reset_when_list_changes() {
        let mut pager = Paginator::new(50);
        assert!(!pager.reset_if_changed(120));
        pager.go_to_page(2, 120);
        assert!(!pager.reset_if_changed(120));
        assert_eq!(pager.current_page(), 2);
        assert!(pager.reset_if_changed(80));
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_empty_list() {
        let items: Vec<u8> = Vec::new();
        let page = Paginator::default().page(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }

    #[test]
    fn test_page_links() {
        assert_eq!(page_links(1, 1), vec![Number(1)]);
        assert_eq!(page_links(1, 3), vec![Number(1), Number(2), Number(3)]);
        assert_eq!(
            page_links(1, 10),
            vec![Number(1), Number(2), Number(3), Gap, Number(10)]
        );
        assert_eq!(
            page_links(5, 10),
            vec![
                Number(1),
                Gap,
                Number(3),
                Number(4),
                Number(5),
                Number(6),
                Number(7),
                Gap,
                Number(10)
            ]
        );
        assert_eq!(
            page_links(10, 10),
            vec![Number(1), Gap, Number(8), Number(9), Number(10)]
        );
    }

    #[test]
    fn test_page_links_past_the_end() {
        // The list can shrink before the paginator is reset
        assert_eq!(page_links(5, 3), vec![Number(1), Number(2), Number(3)]);
        assert_eq!(page_links(0, 2), vec![Number(1), Number(2)]);
    }
}
