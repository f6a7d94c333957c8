//! Fixed-size pagination and the compact pager label sequence.

use std::fmt;

/// Results per page.
pub const PAGE_SIZE: usize = 12;

/// Pager slot: a page number or a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Page(n) => write!(f, "{}", n),
            PageLabel::Ellipsis => f.write_str("…"),
        }
    }
}

/// Number of pages for `len` results; never less than 1.
pub fn total_pages(len: usize) -> u32 {
    let pages = len.div_ceil(PAGE_SIZE).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Items on 1-based `page`; empty when the page is past the end.
pub fn page_slice<T>(items: &[T], page: u32) -> &[T] {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Labels for a pager showing at most seven slots.
///
/// With more than seven pages the first and last are always shown, the
/// current page keeps its neighbours, and gaps become `Ellipsis`.
pub fn page_numbers(current: u32, total: u32) -> Vec<PageLabel> {
    use PageLabel::{Ellipsis, Page};

    if total <= 7 {
        return (1..=total).map(Page).collect();
    }
    if current <= 4 {
        return vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(total)];
    }
    if current >= total - 3 {
        return vec![
            Page(1),
            Ellipsis,
            Page(total - 4),
            Page(total - 3),
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ];
    }
    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}

/// 1-based inclusive bounds of the results on a page, for
/// "Showing first–last of total".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl ResultRange {
    /// `None` when there are no results.
    pub fn for_page(page: u32, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let offset = (page.max(1) as usize - 1).saturating_mul(PAGE_SIZE);
        Some(Self {
            first: offset.saturating_add(1).min(total),
            last: offset.saturating_add(PAGE_SIZE).min(total),
            total,
        })
    }
}

impl fmt::Display for ResultRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {}–{} of {} results", self.first, self.last, self.total)
    }
}
