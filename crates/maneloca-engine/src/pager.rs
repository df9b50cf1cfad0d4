//! Fixed-size paging over the visible set.

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 20;

/// Pages shown on either side of the current one in the navigation bar.
const WINDOW_RADIUS: usize = 2;

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Rows of 1-based page `current_page`. Pages past the end are empty.
pub fn page<T>(visible: &[T], current_page: usize, page_size: usize) -> &[T] {
    let from = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(visible.len());
    let to = from.saturating_add(page_size).min(visible.len());
    &visible[from..to]
}

pub fn is_valid_page(page: usize, total_pages: usize) -> bool {
    (1..=total_pages).contains(&page)
}

/// Parses the jump-to-page input; only pages inside `1..=total_pages` pass.
pub fn parse_jump(input: &str, total_pages: usize) -> Option<usize> {
    let page: usize = input.trim().parse().ok()?;
    is_valid_page(page, total_pages).then_some(page)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Navigation labels: a window of two pages around `current_page`, with the
/// first and last page pinned and an ellipsis over any gap.
pub fn page_numbers(current_page: usize, total_pages: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    if total_pages == 0 {
        return items;
    }
    let start = current_page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = (current_page + WINDOW_RADIUS).min(total_pages);

    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end + 1 < total_pages {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(20, PAGE_SIZE), 1);
        assert_eq!(total_pages(45, PAGE_SIZE), 3);
    }

    #[test]
    fn test_page_slices() {
        let v: Vec<usize> = (0..45).collect();
        assert_eq!(page(&v, 1, PAGE_SIZE), &v[0..20]);
        assert_eq!(page(&v, 3, PAGE_SIZE), &v[40..45]);
        assert!(page(&v, 4, PAGE_SIZE).is_empty());
        assert_eq!(page(&v, 0, PAGE_SIZE), &v[0..20]);
    }

    #[test]
    fn test_out_of_range_jump_is_rejected() {
        assert_eq!(parse_jump("3", 3), Some(3));
        assert_eq!(parse_jump(" 2 ", 3), Some(2));
        assert_eq!(parse_jump("4", 3), None);
        assert_eq!(parse_jump("0", 3), None);
        assert_eq!(parse_jump("two", 3), None);
        assert_eq!(parse_jump("1", 0), None);
    }

    #[test]
    fn test_page_numbers_small() {
        assert!(page_numbers(1, 0).is_empty());
        assert_eq!(page_numbers(1, 1), vec![Page(1)]);
        assert_eq!(page_numbers(2, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn test_page_numbers_with_gaps() {
        assert_eq!(
            page_numbers(1, 10),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(6, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Page(7), Page(8), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(10, 10),
            vec![Page(1), Ellipsis, Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_page_numbers_no_ellipsis_for_adjacent_edges() {
        assert_eq!(
            page_numbers(4, 7),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
    }

    proptest! {
        #[test]
        fn prop_pages_concatenate_to_visible_set(len in 0usize..200) {
            let v: Vec<usize> = (0..len).collect();
            let total = total_pages(len, PAGE_SIZE);
            prop_assert_eq!(total, (len + PAGE_SIZE - 1) / PAGE_SIZE);
            let joined: Vec<usize> = (1..=total)
                .flat_map(|p| page(&v, p, PAGE_SIZE).iter().copied())
                .collect();
            prop_assert_eq!(joined, v);
        }
    }
}
