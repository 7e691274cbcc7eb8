use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Splits content items into fixed-size pages. Pinned controls are not
/// paginated, the ring shows them on every page.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    total_items: usize,
    current: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items: 0,
            current: 0,
        }
    }

    pub fn paginate(total_items: usize, page_size: usize) -> Self {
        let mut pager = Self::new(page_size);
        pager.total_items = total_items;
        pager
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// Clamps into range and returns the resulting page.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current = page.min(self.total_pages() - 1);
        self.current
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.set_page(self.current);
    }

    /// New item count; snaps to the last page if the current one vanished.
    /// Returns whether the current page moved.
    pub fn refresh(&mut self, total_items: usize) -> bool {
        self.total_items = total_items;
        let before = self.current;
        self.set_page(self.current) != before
    }

    pub fn current_range(&self) -> Range<usize> {
        let start = (self.current * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn current_page_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.current_range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn page(&self) -> Page {
        Page {
            index: self.current,
            size: self.page_size,
            total_pages: self.total_pages(),
            total_items: self.total_items,
        }
    }
}
